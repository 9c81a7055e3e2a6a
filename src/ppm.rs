use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::Path;

use crate::raster::Raster;

/// ASCII (P3) image text; alpha is dropped
pub struct PpmImage {
    width: usize,
    height: usize,
    body: String,
}

impl PpmImage {
    pub fn create(width: usize, height: usize) -> PpmImage {
        PpmImage { width, height, body: String::from("") }
    }

    pub fn from_raster(raster: &Raster) -> PpmImage {
        let mut image = PpmImage::create(raster.width, raster.height);
        for pixel in raster.as_bytes().chunks_exact(4) {
            image.append_pixel(pixel[0], pixel[1], pixel[2]);
        }
        image
    }

    pub fn append_pixel(&mut self, r: u8, g: u8, b: u8) {
        self.body.push_str(&format!("{:4} {:4} {:4}\n", r, g, b));
    }

    pub fn get_text(&self) -> String {
        let mut text = String::new();
        // COLS x ROWS; 255 is max colour
        text.push_str(&format!("P3\n{} {}\n255\n", self.width, self.height));
        text.push_str(&self.body);
        text
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.get_text().as_bytes())
    }
}
