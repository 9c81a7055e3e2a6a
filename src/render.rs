//! Render pass driver: one primary ray per pixel, rows traced in parallel.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use thiserror::Error;

use crate::camera::Camera;
use crate::raster::{Raster, RasterError};
use crate::scene::Scene;
use crate::tracer::*;

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("Render aborted: {0}")]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}

#[derive(Clone, Copy, Debug)]
pub struct RenderSettings {
    pub width: usize,
    pub height: usize,
    pub trace: TraceSettings,
    /// Fixed seed for reproducible output; rows are seeded from it independently
    pub seed: Option<u64>,
}

impl Default for RenderSettings {
    fn default() -> RenderSettings {
        RenderSettings { width: 400, height: 300, trace: TraceSettings::default(), seed: None }
    }
}

pub struct RenderOutput {
    pub raster: Raster,
    /// Total rays cast, bounces included
    pub casts: u64,
}

fn row_rng(seed: Option<u64>, row: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(row as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Trace every pixel of the image. The first error aborts the whole pass.
pub fn render(scene: &Scene, camera: &Camera, settings: &RenderSettings) -> Result<RenderOutput, RenderError> {
    let RenderSettings { width, height, .. } = *settings;
    log::info!("Rendering {}x{} with {} objects", width, height, scene.objects.len());

    let mut raster = Raster::new(width, height)?;
    let tracer = Tracer::with_settings(scene, settings.trace);
    let rows = (0..height).into_par_iter()
        .map(|y| {
            let mut rng = row_rng(settings.seed, y);
            let row = (0..width)
                .map(|x| {
                    let ray = camera.ray_for_pixel(x, y, width, height);
                    tracer.cast(&ray, 0, &mut rng).map(|colour| Raster::pack(&colour))
                })
                .collect::<Result<Vec<_>, _>>();
            log::trace!("Row {} done", y);
            row
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (y, row) in rows.iter().enumerate() {
        raster.set_row(y, row)?;
    }

    let casts = tracer.stats.casts();
    log::info!("Render complete: {} casts", casts);
    Ok(RenderOutput { raster, casts })
}
