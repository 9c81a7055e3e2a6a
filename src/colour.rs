use std::ops::{Add, AddAssign, Div, Mul};

use serde::{Deserialize, Serialize};

pub const COLOR_MAX: f32 = 255.0;

/// Nominally 0-255 per channel, but nothing here clamps.
/// Packing into bytes is left to the raster.
///
/// Arithmetic works on the RGB channels; alpha is carried over unchanged
/// from the left-hand operand.
#[derive(Clone, Copy, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f32>,
}

pub const WHITE: Colour = Colour { r: COLOR_MAX, g: COLOR_MAX, b: COLOR_MAX, a: None };
pub const BLACK: Colour = Colour { r: 0.0, g: 0.0, b: 0.0, a: None };
pub const RED: Colour = Colour { r: COLOR_MAX, g: 0.0, b: 0.0, a: None };
pub const GREEN: Colour = Colour { r: 0.0, g: COLOR_MAX, b: 0.0, a: None };

impl Colour {
    pub fn new(r: f32, g: f32, b: f32) -> Colour {
        Colour { r, g, b, a: None }
    }

    pub fn grey(v: f32) -> Colour {
        Colour::new(v, v, v)
    }

    /// Per-channel product, used to tint light by a surface colour
    pub fn mul_colour(&self, other: Colour) -> Colour {
        Colour { r: self.r * other.r, g: self.g * other.g, b: self.b * other.b, a: self.a }
    }
}

impl Add for Colour {
    type Output = Colour;
    fn add(self, other: Colour) -> Colour {
        Colour { r: self.r + other.r, g: self.g + other.g, b: self.b + other.b, a: self.a }
    }
}

impl AddAssign for Colour {
    fn add_assign(&mut self, other: Colour) {
        self.r += other.r;
        self.g += other.g;
        self.b += other.b;
    }
}

impl Mul<f32> for Colour {
    type Output = Colour;
    fn mul(self, scale: f32) -> Colour {
        Colour { r: self.r * scale, g: self.g * scale, b: self.b * scale, a: self.a }
    }
}

impl Div<f32> for Colour {
    type Output = Colour;
    fn div(self, scale: f32) -> Colour {
        Colour { r: self.r / scale, g: self.g / scale, b: self.b / scale, a: self.a }
    }
}
