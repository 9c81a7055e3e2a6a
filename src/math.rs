use std::ops::{Add, Div, Mul, Neg, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {

    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    /// Three independent uniform samples in [0,1), normalised.
    /// Not uniform over the sphere: every component is non-negative, so the
    /// result always lies in the all-positive octant.
    pub fn random_unit<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
        Vec3::new(rng.gen::<f32>(), rng.gen::<f32>(), rng.gen::<f32>()).normalized()
    }

    pub fn magnitude(&self) -> f32 {
        self.len_sq().sqrt()
    }

    pub fn len_sq(&self) -> f32 {
        dot(*self, *self)
    }

    /// Zero vectors come back as NaN; callers must avoid them
    pub fn normalized(&self) -> Vec3 {
        *self / self.magnitude()
    }

    pub fn inverse(&self) -> Vec3 {
        -*self
    }

    pub fn plus(&self, other: Vec3) -> Vec3 {
        *self + other
    }

    pub fn minus(&self, other: Vec3) -> Vec3 {
        *self - other
    }

    pub fn times(&self, scale: f32) -> Vec3 {
        *self * scale
    }

    pub fn dot(&self, other: Vec3) -> f32 {
        dot(*self, other)
    }

    pub fn reflect(&self, normal: Vec3) -> Vec3 {
        reflect(*self, normal)
    }

    pub fn distance(&self, other: Vec3) -> f32 {
        (*self - other).magnitude()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3 { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z }
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3 { x: self.x - other.x, y: self.y - other.y, z: self.z - other.z }
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, scale: f32) -> Vec3 {
        Vec3 { x: self.x * scale, y: self.y * scale, z: self.z * scale }
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;
    fn div(self, scale: f32) -> Vec3 {
        Vec3 { x: self.x / scale, y: self.y / scale, z: self.z / scale }
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3 { x: -self.x, y: -self.y, z: -self.z }
    }
}

pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.x * b.x + a.y * b.y + a.z * b.z
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3 {
        x: a.y * b.z - a.z * b.y,
        y: a.z * b.x - a.x * b.z,
        z: a.x * b.y - a.y * b.x,
    }
}

/// Mirror `v` about the unit `normal`
pub fn reflect(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * (2.0 * dot(v, normal))
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Ray {
        Ray { origin, direction }
    }
    pub fn at_t(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
