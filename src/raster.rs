use thiserror::Error;

use crate::colour::{Colour, COLOR_MAX};

const PIXEL_DEPTH: usize = 4;

#[derive(Error, Debug, PartialEq)]
pub enum RasterError {
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} raster")]
    OutOfBounds { x: usize, y: usize, width: usize, height: usize },

    #[error("A {width}x{height} raster is too large to allocate")]
    TooLarge { width: usize, height: usize },
}

/// RGBA8 pixel buffer, row 0 at the top
#[derive(Clone, Debug)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

fn to_byte(v: f32) -> u8 {
    v.max(0.0).min(COLOR_MAX) as u8
}

impl Raster {
    pub fn new(width: usize, height: usize) -> Result<Raster, RasterError> {
        let len = width.checked_mul(height)
            .and_then(|n| n.checked_mul(PIXEL_DEPTH))
            .ok_or(RasterError::TooLarge { width, height })?;
        Ok(Raster { width, height, data: vec![0; len] })
    }

    /// Pack a colour into bytes, clamping each channel; alpha defaults to opaque
    pub fn pack(colour: &Colour) -> [u8; 4] {
        [
            to_byte(colour.r),
            to_byte(colour.g),
            to_byte(colour.b),
            colour.a.map_or(255, to_byte),
        ]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, colour: &Colour) -> Result<(), RasterError> {
        let offset = self.offset(x, y)?;
        self.data[offset..offset + PIXEL_DEPTH].copy_from_slice(&Raster::pack(colour));
        Ok(())
    }

    /// Overwrite a whole row with packed pixels
    pub fn set_row(&mut self, y: usize, pixels: &[[u8; 4]]) -> Result<(), RasterError> {
        for (x, pixel) in pixels.iter().enumerate() {
            let offset = self.offset(x, y)?;
            self.data[offset..offset + PIXEL_DEPTH].copy_from_slice(pixel);
        }
        Ok(())
    }

    pub fn pixel(&self, x: usize, y: usize) -> Result<[u8; 4], RasterError> {
        let offset = self.offset(x, y)?;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&self.data[offset..offset + PIXEL_DEPTH]);
        Ok(pixel)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn offset(&self, x: usize, y: usize) -> Result<usize, RasterError> {
        if x >= self.width || y >= self.height {
            return Err(RasterError::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        Ok((y * self.width + x) * PIXEL_DEPTH)
    }
}
