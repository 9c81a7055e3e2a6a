//! Recursive shading of rays against a scene.
//!
//! Each hit on a sphere fans out into several perturbed mirror bounces, the
//! fan shrinking with depth until it reaches zero. Lights are pure emitters
//! and rays that leave the scene pick up the environment, if there is one.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use thiserror::Error;

use crate::colour::*;
use crate::environment::EnvironmentError;
use crate::math::*;
use crate::scene::*;

/// Depth at which rays stop being traced
pub const MAX_BOUNCES: u32 = 3;
/// Fan-out at the first bounce
pub const MAX_BOUNCED_RAYS: u32 = 5;
/// Distance shown as black in depth mode
pub const DEPTH_RANGE: f32 = 300.0;

#[derive(Error, Debug, PartialEq)]
pub enum TraceError {
    #[error(transparent)]
    Environment(#[from] EnvironmentError),
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TraceMode {
    /// Full recursive shading
    Shaded,
    /// Grey level by distance to the nearest hit, no bouncing
    Depth,
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct TraceSettings {
    pub max_bounces: u32,
    pub max_bounced_rays: u32,
    pub mode: TraceMode,
}

impl Default for TraceSettings {
    fn default() -> TraceSettings {
        TraceSettings { max_bounces: MAX_BOUNCES, max_bounced_rays: MAX_BOUNCED_RAYS, mode: TraceMode::Shaded }
    }
}

impl TraceSettings {
    /// Number of bounce rays spawned from a hit at `iteration`.
    /// Falls off quadratically from `max_bounced_rays` at the first hit.
    pub fn bounce_count(&self, iteration: u32) -> u32 {
        let p = iteration as f32 / self.max_bounces as f32;
        (self.max_bounced_rays as f32 * (p - 1.0) * (p - 1.0)).floor() as u32
    }
}

/// Diagnostics for one render pass. Shared between threads; has no effect on output.
#[derive(Debug, Default)]
pub struct RenderStats {
    casts: AtomicU64,
}

impl RenderStats {
    pub fn record_cast(&self) {
        self.casts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn casts(&self) -> u64 {
        self.casts.load(Ordering::Relaxed)
    }
}

pub struct Tracer<'a> {
    pub scene: &'a Scene,
    pub settings: TraceSettings,
    pub stats: RenderStats,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene) -> Tracer<'a> {
        Tracer::with_settings(scene, TraceSettings::default())
    }

    pub fn with_settings(scene: &'a Scene, settings: TraceSettings) -> Tracer<'a> {
        Tracer { scene, settings, stats: RenderStats::default() }
    }

    /// Colour seen along `ray`, `iteration` bounces deep.
    pub fn cast<R: Rng + ?Sized>(&self, ray: &Ray, iteration: u32, rng: &mut R) -> Result<Colour, TraceError> {
        self.stats.record_cast();

        let hits = collide_ray(self.scene, ray);
        let nearest = match hits.first() {
            Some(hit) => hit,
            None => return self.escape(ray),
        };
        if iteration >= self.settings.max_bounces {
            return self.escape(ray);
        }

        if self.settings.mode == TraceMode::Depth {
            let dist = ray.origin.distance(nearest.collision.point);
            return Ok(Colour::grey(((1.0 - dist / DEPTH_RANGE) * COLOR_MAX).max(0.0).min(COLOR_MAX)));
        }

        match *nearest.object {
            // Direct hits on lights are full emission; intensity is not consulted
            SceneObject::Light { .. } => Ok(WHITE),
            SceneObject::Sphere { material, .. } => {
                let collision = nearest.collision;
                let mirror = reflect(ray.direction, collision.normal);
                let tint = material.colour / COLOR_MAX;

                let count = self.settings.bounce_count(iteration);
                let mut colour = BLACK;
                for _ in 0..count {
                    // Not renormalised after perturbing
                    let direction = mirror + Vec3::random_unit(rng) * material.spread;
                    let bounce = Ray::new(collision.point, direction);
                    colour += self.cast(&bounce, iteration + 1, rng)?.mul_colour(tint);
                }
                if count > 0 {
                    colour = colour / count as f32;
                }
                Ok(colour)
            },
        }
    }

    /// Colour for a ray that is not traced any further
    fn escape(&self, ray: &Ray) -> Result<Colour, TraceError> {
        match self.scene.environment {
            Some(ref environment) => Ok(environment.get(ray.direction.normalized())?),
            None => Ok(BLACK),
        }
    }
}

/// Shade a primary ray with default settings
pub fn cast<R: Rng + ?Sized>(scene: &Scene, ray: &Ray, rng: &mut R) -> Result<Colour, TraceError> {
    Tracer::new(scene).cast(ray, 0, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Environment;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn forward() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0))
    }

    fn mirror_sphere(colour: Colour) -> SceneObject {
        SceneObject::Sphere {
            centre: Vec3::new(0.0, 0.0, 100.0),
            radius: 50.0,
            material: Material { spread: 0.0, colour },
        }
    }

    /// A light directly behind the origin, which a head-on mirror bounce heads straight for
    fn light_behind() -> SceneObject {
        SceneObject::Light { centre: Vec3::new(0.0, 0.0, -100.0), radius: 10.0, intensity: 1.0 }
    }

    struct Sky;

    impl Environment for Sky {
        fn get(&self, direction: Vec3) -> Result<Colour, EnvironmentError> {
            // Echo the direction so tests can see it was normalised
            Ok(Colour::new(direction.x, direction.y, direction.z))
        }
    }

    #[test]
    fn bounce_count_falls_off_with_depth() {
        let settings = TraceSettings::default();
        assert_eq!(settings.bounce_count(0), 5);
        assert_eq!(settings.bounce_count(1), 2);
        assert_eq!(settings.bounce_count(2), 0);
        assert_eq!(settings.bounce_count(3), 0);
    }

    #[test]
    fn miss_without_environment_is_black() {
        let scene = Scene::default();
        assert_eq!(cast(&scene, &forward(), &mut rng()), Ok(BLACK));
    }

    #[test]
    fn miss_with_environment_uses_normalised_direction() {
        let scene = Scene::default().with_environment(Box::new(Sky));
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert_eq!(cast(&scene, &ray, &mut rng()), Ok(Colour::new(0.0, 0.6, 0.8)));
    }

    #[test]
    fn light_hit_is_white_below_max_depth() {
        let scene = Scene::new(vec![SceneObject::Light { centre: Vec3::new(0.0, 0.0, 50.0), radius: 10.0, intensity: 0.1 }]);
        let tracer = Tracer::new(&scene);
        for iteration in 0..MAX_BOUNCES {
            assert_eq!(tracer.cast(&forward(), iteration, &mut rng()), Ok(WHITE));
        }
    }

    #[test]
    fn max_depth_ignores_the_hit() {
        let scene = Scene::new(vec![SceneObject::Light { centre: Vec3::new(0.0, 0.0, 50.0), radius: 10.0, intensity: 1.0 }]);
        assert_eq!(Tracer::new(&scene).cast(&forward(), MAX_BOUNCES, &mut rng()), Ok(BLACK));

        let sky = Colour::new(1.0, 2.0, 3.0);
        let scene = Scene::new(vec![mirror_sphere(WHITE)]).with_environment(Box::new(sky));
        assert_eq!(Tracer::new(&scene).cast(&forward(), MAX_BOUNCES, &mut rng()), Ok(sky));
        assert_eq!(Tracer::new(&scene).cast(&forward(), MAX_BOUNCES + 4, &mut rng()), Ok(sky));
    }

    #[test]
    fn mirror_bounce_tints_the_light() {
        let scene = Scene::new(vec![mirror_sphere(RED), light_behind()]);
        let tracer = Tracer::new(&scene);
        assert_eq!(tracer.cast(&forward(), 0, &mut rng()), Ok(RED));
        // One primary cast plus five bounces
        assert_eq!(tracer.stats.casts(), 6);
    }

    #[test]
    fn tint_scales_by_intrinsic_colour() {
        let scene = Scene::new(vec![mirror_sphere(Colour::new(51.0, 102.0, 0.0)), light_behind()]);
        let colour = cast(&scene, &forward(), &mut rng()).unwrap();
        assert!((colour.r - 51.0).abs() < 1e-3);
        assert!((colour.g - 102.0).abs() < 1e-3);
        assert_eq!(colour.b, 0.0);
    }

    #[test]
    fn deep_sphere_hit_with_no_fan_out_is_black() {
        let scene = Scene::new(vec![mirror_sphere(WHITE), light_behind()]);
        let tracer = Tracer::new(&scene);
        assert_eq!(tracer.cast(&forward(), 2, &mut rng()), Ok(BLACK));
        assert_eq!(tracer.stats.casts(), 1);
    }

    #[test]
    fn bounces_that_escape_pick_up_the_environment() {
        let sky = Colour::new(100.0, 100.0, 100.0);
        let scene = Scene::new(vec![mirror_sphere(Colour::new(255.0, 0.0, 127.5))]).with_environment(Box::new(sky));
        let colour = cast(&scene, &forward(), &mut rng()).unwrap();
        assert_eq!(colour, Colour::new(100.0, 0.0, 50.0));
    }

    #[test]
    fn depth_mode_shades_by_distance() {
        let settings = TraceSettings { mode: TraceMode::Depth, ..TraceSettings::default() };
        let scene = Scene::new(vec![mirror_sphere(WHITE)]);
        let tracer = Tracer::with_settings(&scene, settings);
        // Nearest hit is 50 away
        let colour = tracer.cast(&forward(), 0, &mut rng()).unwrap();
        assert!((colour.r - 212.5).abs() < 1e-3);
        assert_eq!(tracer.stats.casts(), 1);

        // Beyond the range it bottoms out at black
        let far = Scene::new(vec![SceneObject::Light { centre: Vec3::new(0.0, 0.0, 500.0), radius: 10.0, intensity: 1.0 }]);
        let tracer = Tracer::with_settings(&far, settings);
        assert_eq!(tracer.cast(&forward(), 0, &mut rng()), Ok(BLACK));
    }

    #[test]
    fn environment_errors_abort_the_cast() {
        struct Broken;
        impl Environment for Broken {
            fn get(&self, _direction: Vec3) -> Result<Colour, EnvironmentError> {
                Err(EnvironmentError::OutOfBounds { x: -1, y: 0, width: 1, height: 1 })
            }
        }

        let scene = Scene::new(vec![mirror_sphere(WHITE)]).with_environment(Box::new(Broken));
        match cast(&scene, &forward(), &mut rng()) {
            Err(TraceError::Environment(EnvironmentError::OutOfBounds { x, .. })) => assert_eq!(x, -1),
            other => panic!("Expected the environment error to propagate, got {:?}", other),
        }
    }
}
