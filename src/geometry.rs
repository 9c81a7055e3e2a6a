use crate::math::*;

/// Rays passing closer than this to the rim are treated as glancing blows
pub const EPSILON: f32 = 0.0008;

/// A point where a ray crosses a sphere surface, with the outward unit normal there
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Collision {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Intersect a ray with a sphere by projecting the centre onto the ray.
///
/// The ray is followed to the plane through `centre` facing back along the
/// ray; the distance from that crossing to the centre decides the hit. Both
/// surface points are returned, near one first, regardless of whether the
/// origin lies inside the sphere.
///
/// Spheres whose centre plane is behind the origin are ignored, as are
/// glancing hits within `EPSILON` of the rim.
pub fn intersect_sphere(ray: &Ray, centre: Vec3, radius: f32) -> Vec<Collision> {
    let reverse = -ray.direction;
    let t = dot(centre - ray.origin, reverse) / dot(ray.direction, reverse);
    if t < 0.0 {
        return Vec::new();
    }

    let plane_hit = ray.at_t(t);
    let dist = plane_hit.distance(centre);
    if dist > radius {
        return Vec::new();
    }

    // Glancing blows yield nothing, not a single tangent point
    if radius - dist < EPSILON {
        return Vec::new();
    }

    let offset = (radius * radius - dist * dist).sqrt();
    let along = ray.direction * offset;
    [plane_hit - along, plane_hit + along]
        .iter()
        .map(|&point| Collision { point, normal: (point - centre).normalized() })
        .collect()
}
