use std::cmp::Ordering;

use crate::colour::Colour;
use crate::environment::Environment;
use crate::geometry::*;
use crate::math::*;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Material {
    /// Width of the bounce cone, 0 for a perfect mirror
    pub spread: f32,
    pub colour: Colour,
}

/// Everything in a scene is geometrically a sphere; only shading tells them apart
#[derive(Clone, PartialEq, Debug)]
pub enum SceneObject {
    Sphere { centre: Vec3, radius: f32, material: Material },
    Light { centre: Vec3, radius: f32, intensity: f32 },
}

impl SceneObject {
    pub fn centre(&self) -> Vec3 {
        match *self {
            SceneObject::Sphere { centre, .. } | SceneObject::Light { centre, .. } => centre,
        }
    }

    pub fn radius(&self) -> f32 {
        match *self {
            SceneObject::Sphere { radius, .. } | SceneObject::Light { radius, .. } => radius,
        }
    }
}

/// A collision paired with the object it belongs to
#[derive(Clone, Copy, Debug)]
pub struct ObjectHit<'a> {
    pub object: &'a SceneObject,
    pub collision: Collision,
}

/// Objects to be rendered, plus an optional light probe for rays that escape.
/// Read-only while tracing.
#[derive(Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub environment: Option<Box<dyn Environment>>,
}

impl Scene {
    pub fn new(objects: Vec<SceneObject>) -> Scene {
        Scene { objects, environment: None }
    }

    pub fn with_environment(mut self, environment: Box<dyn Environment>) -> Scene {
        self.environment = Some(environment);
        self
    }
}

/// Every collision of `ray` with every object, nearest to the ray origin first.
/// A linear scan; objects that tie keep their scene order.
pub fn collide_ray<'a>(scene: &'a Scene, ray: &Ray) -> Vec<ObjectHit<'a>> {
    let mut hits: Vec<ObjectHit> = scene.objects.iter()
        .flat_map(|object| {
            intersect_sphere(ray, object.centre(), object.radius())
                .into_iter()
                .map(move |collision| ObjectHit { object, collision })
        })
        .collect();

    hits.sort_by(|h1, h2| {
        let d1 = ray.origin.distance(h1.collision.point);
        let d2 = ray.origin.distance(h2.collision.point);
        d1.partial_cmp(&d2).unwrap_or(Ordering::Equal)
    });
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::WHITE;

    fn sphere(z: f32, radius: f32) -> SceneObject {
        SceneObject::Sphere {
            centre: Vec3::new(0.0, 0.0, z),
            radius,
            material: Material { spread: 0.5, colour: WHITE },
        }
    }

    #[test]
    fn empty_scene_has_no_hits() {
        let scene = Scene::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!(collide_ray(&scene, &ray).is_empty());
    }

    #[test]
    fn hits_are_sorted_by_distance() {
        // Deliberately out of order
        let scene = Scene::new(vec![
            sphere(300.0, 20.0),
            SceneObject::Light { centre: Vec3::new(0.0, 0.0, 30.0), radius: 5.0, intensity: 1.0 },
            sphere(100.0, 10.0),
        ]);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let hits = collide_ray(&scene, &ray);
        assert_eq!(hits.len(), 6);

        let distances: Vec<f32> = hits.iter().map(|h| h.collision.point.magnitude()).collect();
        assert_eq!(distances, vec![25.0, 35.0, 90.0, 110.0, 280.0, 320.0]);
        match hits[0].object {
            SceneObject::Light { .. } => (),
            _ => panic!("The light should be nearest"),
        }
    }

    #[test]
    fn misses_are_dropped() {
        let scene = Scene::new(vec![
            sphere(100.0, 10.0),
            SceneObject::Sphere {
                centre: Vec3::new(500.0, 0.0, 100.0),
                radius: 10.0,
                material: Material { spread: 0.0, colour: WHITE },
            },
        ]);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let hits = collide_ray(&scene, &ray);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.object.centre().x == 0.0));
    }
}
