use serde::{Deserialize, Serialize};

use crate::math::*;

/// Pinhole camera looking from `eye` towards `look_at`
#[derive(Clone, Copy, PartialEq, Debug, Deserialize, Serialize)]
pub struct CameraDeclaration {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub vertical_fov: f32,
}

impl Default for CameraDeclaration {
    fn default() -> CameraDeclaration {
        CameraDeclaration {
            eye: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, 1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            vertical_fov: 60.0,
        }
    }
}

impl CameraDeclaration {
    /// Reject views that would give degenerate (NaN) rays
    pub fn validate(&self) -> Result<(), String> {
        if !(self.vertical_fov > 0.0 && self.vertical_fov < 180.0) {
            return Err(format!("vertical_fov must be within (0, 180), got {}", self.vertical_fov));
        }
        let view = self.look_at - self.eye;
        if !(view.magnitude() > 0.0) {
            return Err("eye and look_at must differ".to_owned());
        }
        let side = cross(self.up, view.normalized());
        if !(side.magnitude() > 1e-6 * self.up.magnitude()) {
            return Err("up must not be parallel to the view direction".to_owned());
        }
        Ok(())
    }
}

pub struct Camera {
    lower_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    origin: Vec3,
}

impl Camera {
    pub fn new(decl: &CameraDeclaration, aspect_ratio: f32) -> Camera {
        // Compute field of view
        let theta = decl.vertical_fov.to_radians();
        let half_height = (0.5 * theta).tan();
        let half_width = aspect_ratio * half_height;

        // Compute basis; w points back towards the viewer
        let w = (decl.eye - decl.look_at).normalized();
        let u = cross(decl.up, w).normalized();
        let v = cross(w, u);

        let origin = decl.eye;
        let lower_left = origin - u * half_width - v * half_height - w;
        let horizontal = u * (2.0 * half_width);
        let vertical = v * (2.0 * half_height);

        Camera { lower_left, horizontal, vertical, origin }
    }

    /// Unit-direction ray through the centre of pixel `(x, y)`, row 0 at the top
    pub fn ray_for_pixel(&self, x: usize, y: usize, width: usize, height: usize) -> Ray {
        let u = (x as f32 + 0.5) / width as f32;
        let v = 1.0 - (y as f32 + 0.5) / height as f32;
        let target = self.lower_left + self.horizontal * u + self.vertical * v;
        Ray::new(self.origin, (target - self.origin).normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centre_pixel_looks_at_target() {
        let camera = Camera::new(&CameraDeclaration::default(), 1.0);
        let ray = camera.ray_for_pixel(1, 1, 3, 3);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction.z - 1.0).abs() < 1e-6);
        assert!(ray.direction.x.abs() < 1e-6);
        assert!(ray.direction.y.abs() < 1e-6);
    }

    #[test]
    fn top_left_pixel_looks_up_and_left() {
        let camera = Camera::new(&CameraDeclaration::default(), 2.0);
        let ray = camera.ray_for_pixel(0, 0, 40, 20);
        assert!(ray.direction.y > 0.0);
        // Looking down +z with y up, +x is on the left of the image
        assert!(ray.direction.x > 0.0);
        assert!((ray.direction.magnitude() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn degenerate_views_are_rejected() {
        assert!(CameraDeclaration::default().validate().is_ok());

        let looking_up = CameraDeclaration { look_at: Vec3::new(0.0, 10.0, 0.0), ..CameraDeclaration::default() };
        assert!(looking_up.validate().is_err());

        let no_up = CameraDeclaration { up: Vec3::ZERO, ..CameraDeclaration::default() };
        assert!(no_up.validate().is_err());

        let nowhere = CameraDeclaration { look_at: Vec3::ZERO, ..CameraDeclaration::default() };
        assert!(nowhere.validate().is_err());

        let flat = CameraDeclaration { vertical_fov: 180.0, ..CameraDeclaration::default() };
        assert!(flat.validate().is_err());
    }
}
