//! Portable float map (PFM) decoding.
//!
//! Layout per http://www.pauldebevec.com/Research/HDR/PFM/: three header
//! lines (`PF` or `Pf`, `<width> <height>`, scale) followed by raw 32-bit
//! floats, rows stored bottom to top. A negative scale means little-endian.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::colour::{Colour, COLOR_MAX};

/// The header must end within this many bytes
pub const MAX_HEADER_LENGTH: usize = 256;

#[derive(Error, Debug)]
pub enum PfmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PFM header longer than {} bytes", MAX_HEADER_LENGTH)]
    HeaderTooLong,

    #[error("PFM header not intact: expected 'PF' or 'Pf', got '{0}'")]
    BadSignature(String),

    #[error("Expected 2 dimensions, got '{0}'")]
    BadDimensions(String),

    #[error("Invalid scale/endianness value '{0}'")]
    BadScale(String),

    #[error("PFM data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Endianness {
    Little,
    Big,
}

#[derive(Debug)]
pub struct PfmImage {
    pub width: usize,
    pub height: usize,
    pub endianness: Endianness,
    /// RGB triples, top row first
    pixels: Vec<[f32; 3]>,
}

impl PfmImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<PfmImage, PfmError> {
        let bytes = fs::read(path)?;
        PfmImage::parse(&bytes)
    }

    pub fn parse(bytes: &[u8]) -> Result<PfmImage, PfmError> {
        // Find the end of the third header line within the allowed window
        let window = &bytes[..bytes.len().min(MAX_HEADER_LENGTH)];
        let mut breaks = window.iter().enumerate().filter(|&(_, &b)| b == b'\n').map(|(i, _)| i);
        let (first, second, third) = match (breaks.next(), breaks.next(), breaks.next()) {
            (Some(a), Some(b), Some(c)) => (a, b, c),
            _ => return Err(PfmError::HeaderTooLong),
        };
        let line = |from: usize, to: usize| String::from_utf8_lossy(&bytes[from..to]).trim_end_matches('\r').to_owned();

        let signature = line(0, first);
        let channels = match signature.as_str() {
            "PF" => 3,
            "Pf" => 1,
            _ => return Err(PfmError::BadSignature(signature)),
        };

        let raw_dimensions = line(first + 1, second);
        let dimensions: Vec<&str> = raw_dimensions.split(' ').collect();
        if dimensions.len() != 2 {
            return Err(PfmError::BadDimensions(raw_dimensions));
        }
        let parse_dim = |s: &str| s.parse::<usize>().map_err(|_| PfmError::BadDimensions(raw_dimensions.clone()));
        let width = parse_dim(dimensions[0])?;
        let height = parse_dim(dimensions[1])?;
        if width == 0 || height == 0 {
            return Err(PfmError::BadDimensions(raw_dimensions));
        }

        let raw_scale = line(second + 1, third);
        let scale: f32 = raw_scale.trim().parse().map_err(|_| PfmError::BadScale(raw_scale.clone()))?;
        let endianness = if scale < 0.0 { Endianness::Little } else { Endianness::Big };

        let data = &bytes[third + 1..];
        let expected = width.checked_mul(height)
            .and_then(|n| n.checked_mul(channels * 4))
            .ok_or_else(|| PfmError::BadDimensions(raw_dimensions.clone()))?;
        if data.len() < expected {
            return Err(PfmError::Truncated { expected, actual: data.len() });
        }

        let floats: Vec<f32> = data[..expected]
            .chunks_exact(4)
            .map(|c| {
                let word = [c[0], c[1], c[2], c[3]];
                match endianness {
                    Endianness::Little => f32::from_le_bytes(word),
                    Endianness::Big => f32::from_be_bytes(word),
                }
            })
            .collect();

        let mut pixels = Vec::with_capacity(width * height);
        // Stored bottom row first; flip so that row 0 is the top
        for row in (0..height).rev() {
            for col in 0..width {
                let i = (row * width + col) * channels;
                pixels.push(if channels == 3 {
                    [floats[i], floats[i + 1], floats[i + 2]]
                } else {
                    [floats[i]; 3]
                });
            }
        }

        Ok(PfmImage { width, height, endianness, pixels })
    }

    /// Sample pixel `(x, y)`, with `y` counted from the top row.
    /// Linear values are mapped onto the 0-255 colour range.
    pub fn get(&self, x: i64, y: i64) -> Option<Colour> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        let [r, g, b] = self.pixels[y as usize * self.width + x as usize];
        Some(Colour::new(r * COLOR_MAX, g * COLOR_MAX, b * COLOR_MAX))
    }
}
