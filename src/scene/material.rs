use glam::Vec3;

use crate::types::MaterialData;

/// Surface description shared by spheres and triangles.
///
/// A plain value type: every object owns its own copy, so duplicating an
/// object never aliases materials.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: Vec3,
    pub emission_color: Vec3,
    pub emission_strength: f32,
    pub smoothness: f32,
    pub glossiness: f32,
}

impl Material {
    pub const fn new(
        base_color: Vec3,
        emission_color: Vec3,
        emission_strength: f32,
        smoothness: f32,
        glossiness: f32,
    ) -> Self {
        Self {
            base_color,
            emission_color,
            emission_strength,
            smoothness,
            glossiness,
        }
    }

    /// Non-emissive material with the given base color
    pub fn diffuse(base_color: Vec3) -> Self {
        Self {
            base_color,
            ..Self::default()
        }
    }

    pub fn to_gpu(&self) -> MaterialData {
        MaterialData::new(
            self.base_color.to_array(),
            self.smoothness,
            self.emission_color.to_array(),
            self.emission_strength,
            self.glossiness,
        )
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec3::splat(0.7),
            emission_color: Vec3::ZERO,
            emission_strength: 0.0,
            smoothness: 1.0,
            glossiness: 1.0,
        }
    }
}
