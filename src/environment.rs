use thiserror::Error;

use crate::colour::Colour;
use crate::math::Vec3;
use crate::pfm::PfmImage;

#[derive(Error, Debug, PartialEq)]
pub enum EnvironmentError {
    #[error("Environment sample ({x}, {y}) is outside the {width}x{height} probe")]
    OutOfBounds { x: i64, y: i64, width: usize, height: usize },
}

/// Incoming light for rays that leave the scene.
/// Depends only on direction, never on position.
pub trait Environment: Send + Sync {
    /// `direction` is expected to be unit length
    fn get(&self, direction: Vec3) -> Result<Colour, EnvironmentError>;
}

/// A uniform environment
impl Environment for Colour {
    fn get(&self, _direction: Vec3) -> Result<Colour, EnvironmentError> {
        Ok(*self)
    }
}

/// Light probe backed by a decoded PFM image.
///
/// Only the x/y components of the direction are used: they are scaled by a
/// quarter of the image size and offset from the image centre. This is not a
/// true spherical mapping but it suits the probes used with this renderer.
pub struct Lightmap {
    image: PfmImage,
}

impl Lightmap {
    pub fn new(image: PfmImage) -> Lightmap {
        Lightmap { image }
    }

    /// Pixel coordinates for a direction, rounded half up; no clamping
    pub fn locate(&self, direction: Vec3) -> (i64, i64) {
        let (width, height) = (self.image.width as f32, self.image.height as f32);
        let x = width / 2.0 + direction.x * ((width - 1.0) / 4.0);
        let y = height / 2.0 + direction.y * ((height - 1.0) / 4.0);
        ((x + 0.5).floor() as i64, (y + 0.5).floor() as i64)
    }
}

impl Environment for Lightmap {
    fn get(&self, direction: Vec3) -> Result<Colour, EnvironmentError> {
        let (x, y) = self.locate(direction);
        self.image.get(x, y).ok_or(EnvironmentError::OutOfBounds {
            x,
            y,
            width: self.image.width,
            height: self.image.height,
        })
    }
}
