#![deny(bare_trait_objects)]

pub mod math;
pub mod colour;
pub mod geometry;
pub mod scene;
pub mod environment;
pub mod pfm;
pub mod tracer;
pub mod camera;
pub mod raster;
pub mod ppm;
pub mod scenefile;
pub mod render;
