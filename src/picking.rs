//! Screen-space picking against the scene registry.
//!
//! Rebuilds the primary ray the GPU tracer casts for a pixel and finds the
//! nearest sphere along it.

use glam::{Mat4, Vec2, Vec3};

use crate::math::{intersect_sphere, Ray};
use crate::scene::{SceneRegistry, Shape};

/// Nearest object hit by a picking ray
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Position of the object in registry enumeration order
    pub index: usize,
    pub name: String,
    pub distance: f32,
}

/// World-space ray through the pixel at `cursor` (origin top-left).
///
/// Pixel coordinates are mapped to NDC scaled by the viewport height, so the
/// vertical extent spans [-1, 1] and the horizontal extent follows the aspect
/// ratio. The camera-space target at depth 1 is then carried to world space
/// by `view_inverse`.
pub fn camera_ray(
    cursor: Vec2,
    camera_position: Vec3,
    view_inverse: &Mat4,
    fov_degrees: f32,
    resolution: Vec2,
) -> Ray {
    let ndc = Vec2::new(
        (2.0 * cursor.x - resolution.x) / resolution.y,
        (resolution.y - 2.0 * cursor.y) / resolution.y,
    );

    let tan_half_fov = (fov_degrees.to_radians() * 0.5).tan();
    let local_target = Vec3::new(ndc.x * tan_half_fov, ndc.y * tan_half_fov, -1.0);
    let target = view_inverse.transform_point3(local_target);

    Ray::new(camera_position, (target - camera_position).normalize())
}

/// Nearest object along `ray`, or `None` when nothing qualifies.
///
/// Objects are tested in registry order and only a strictly closer hit
/// replaces the current best, so equal distances resolve to the object
/// enumerated first.
pub fn pick(scene: &SceneRegistry, ray: &Ray) -> Option<PickHit> {
    let mut nearest: Option<(usize, &str, f32)> = None;

    for (index, object) in scene.iter().enumerate() {
        let distance = match &object.shape {
            Shape::Sphere(sphere) => intersect_sphere(ray, sphere.position, sphere.radius()),
            // Meshes are not pickable
            Shape::Mesh(_) => None,
        };

        if let Some(t) = distance {
            if nearest.map_or(true, |(_, _, best)| t < best) {
                nearest = Some((index, object.name(), t));
            }
        }
    }

    nearest.map(|(index, name, distance)| PickHit {
        index,
        name: name.to_string(),
        distance,
    })
}
