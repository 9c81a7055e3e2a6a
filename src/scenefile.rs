//! JSON scene descriptions.
//!
//! A scene file declares the camera, the objects and optionally a PFM light
//! probe. Environment paths are resolved relative to the scene file.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraDeclaration;
use crate::colour::Colour;
use crate::environment::Lightmap;
use crate::math::Vec3;
use crate::pfm::{PfmError, PfmImage};
use crate::scene::*;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object {index} is invalid: {reason}")]
    InvalidObject { index: usize, reason: String },

    #[error("Camera is invalid: {0}")]
    InvalidCamera(String),

    #[error("Failed to load environment {path}: {source}")]
    Environment { path: PathBuf, source: PfmError },
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct SphereDeclaration {
    pub centre: Vec3,
    pub radius: f32,
    pub spread: f32,
    pub colour: Colour,
}

fn default_intensity() -> f32 {
    1.0
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct LightDeclaration {
    pub centre: Vec3,
    pub radius: f32,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum ObjectDeclaration {
    Sphere(SphereDeclaration),
    Light(LightDeclaration),
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize, Serialize)]
pub struct SceneDeclaration {
    #[serde(default)]
    pub camera: CameraDeclaration,
    pub objects: Vec<ObjectDeclaration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<PathBuf>,
}

impl ObjectDeclaration {
    fn to_object(&self, index: usize) -> Result<SceneObject, SceneError> {
        let invalid = |reason: String| Err(SceneError::InvalidObject { index, reason });
        match *self {
            ObjectDeclaration::Sphere(ref s) => {
                if !(s.radius > 0.0) {
                    return invalid(format!("sphere radius must be positive, got {}", s.radius));
                }
                if !(0.0..=1.0).contains(&s.spread) {
                    return invalid(format!("sphere spread must be within [0, 1], got {}", s.spread));
                }
                Ok(SceneObject::Sphere {
                    centre: s.centre,
                    radius: s.radius,
                    material: Material { spread: s.spread, colour: s.colour },
                })
            },
            ObjectDeclaration::Light(ref l) => {
                if !(l.radius > 0.0) {
                    return invalid(format!("light radius must be positive, got {}", l.radius));
                }
                Ok(SceneObject::Light { centre: l.centre, radius: l.radius, intensity: l.intensity })
            },
        }
    }
}

impl SceneDeclaration {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<SceneDeclaration, SceneError> {
        // Open the file in read-only mode with buffer.
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Build the scene, loading the environment probe if one is declared.
    /// Relative environment paths are taken from `base_dir`.
    pub fn build(&self, base_dir: &Path) -> Result<Scene, SceneError> {
        self.camera.validate().map_err(SceneError::InvalidCamera)?;
        let objects = self.objects.iter()
            .enumerate()
            .map(|(index, obj)| obj.to_object(index))
            .collect::<Result<Vec<_>, _>>()?;
        log::debug!("Declared {} objects", objects.len());

        let mut scene = Scene::new(objects);
        if let Some(ref path) = self.environment {
            let path = base_dir.join(path);
            scene = scene.with_environment(Box::new(load_lightmap(&path)?));
        }
        Ok(scene)
    }
}

pub fn load_lightmap(path: &Path) -> Result<Lightmap, SceneError> {
    let image = PfmImage::open(path)
        .map_err(|source| SceneError::Environment { path: path.to_owned(), source })?;
    log::info!("Loaded {}x{} light probe from {}", image.width, image.height, path.display());
    Ok(Lightmap::new(image))
}

/// Read and build a scene file in one go
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<(Scene, CameraDeclaration), SceneError> {
    let path = path.as_ref();
    let decl = SceneDeclaration::read(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scene = decl.build(base_dir)?;
    log::info!("Loaded scene {} with {} objects", path.display(), scene.objects.len());
    Ok((scene, decl.camera))
}

/// A floor of randomised spheres under a few lights, viewed from above and behind
pub fn generate_scene<R: Rng + ?Sized>(rng: &mut R) -> SceneDeclaration {
    let mut objects = Vec::new();

    // Create closure that creates a randomised sphere within the x,z cell
    let mut random_sphere = |x: f32, z: f32| {
        let radius = 12.0 + 8.0 * rng.gen::<f32>();
        let centre = Vec3::new(x + 20.0 * rng.gen::<f32>(), radius - 40.0, z + 20.0 * rng.gen::<f32>());
        let colour = Colour::new(255.0 * rng.gen::<f32>(), 255.0 * rng.gen::<f32>(), 255.0 * rng.gen::<f32>());
        let spread = match rng.gen::<f32>() {
            d if d < 0.6 => 0.8,
            d if d < 0.85 => 0.3,
            _ => 0.05,
        };
        ObjectDeclaration::Sphere(SphereDeclaration { centre, radius, spread, colour })
    };

    for a in -3..4 {
        for b in 0..7 {
            objects.push(random_sphere(a as f32 * 45.0, b as f32 * 45.0 + 80.0));
        }
    }

    for &x in &[-120.0, 0.0, 120.0] {
        objects.push(ObjectDeclaration::Light(LightDeclaration {
            centre: Vec3::new(x, 150.0, 200.0),
            radius: 40.0,
            intensity: 1.0,
        }));
    }

    let camera = CameraDeclaration {
        eye: Vec3::new(0.0, 60.0, -120.0),
        look_at: Vec3::new(0.0, 0.0, 200.0),
        up: Vec3::new(0.0, 1.0, 0.0),
        vertical_fov: 50.0,
    };

    SceneDeclaration { camera, objects, environment: None }
}
