use glam::Vec3;

/// Ray with an origin and a (not necessarily normalized) direction
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Nearest non-negative hit distance of `ray` against a sphere.
///
/// Solves `a·t² + b·t + c = 0` with `a = d·d`, `b = 2·(o·d)`,
/// `c = o·o − r²` where `o` is the ray origin relative to the center, and
/// keeps only the smaller root. A ray starting inside the sphere therefore
/// reports no hit, matching the GPU tracer.
pub fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;

    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;
    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if t >= 0.0 {
        Some(t)
    } else {
        None
    }
}
