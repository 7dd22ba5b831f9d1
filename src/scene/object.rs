use glam::Vec3;

use super::material::Material;
use crate::error::SceneError;

/// Triangle with world-space vertices and its own material
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub material: Material,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        Self { v0, v1, v2, material }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }

    fn translate(&mut self, delta: Vec3) {
        self.v0 += delta;
        self.v1 += delta;
        self.v2 += delta;
    }

    fn is_finite(&self) -> bool {
        self.v0.is_finite() && self.v1.is_finite() && self.v2.is_finite()
    }

    fn scale_about(&mut self, pivot: Vec3, factor: f32) {
        self.v0 = pivot + (self.v0 - pivot) * factor;
        self.v1 = pivot + (self.v1 - pivot) * factor;
        self.v2 = pivot + (self.v2 - pivot) * factor;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    pub position: Vec3,
    radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(position: Vec3, radius: f32, material: Material) -> Result<Self, SceneError> {
        check_positive("radius", radius)?;
        Ok(Self {
            position,
            radius,
            material,
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<(), SceneError> {
        check_positive("radius", radius)?;
        self.radius = radius;
        Ok(())
    }
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            radius: 1.0,
            material: Material::default(),
        }
    }
}

/// Triangle mesh whose vertices are stored directly in world space.
///
/// There is no separate local transform: `position` and `scale` are
/// bookkeeping for the editor, and changing either rewrites every owned
/// triangle's vertices in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    position: Vec3,
    scale: f32,
}

impl Mesh {
    /// Builds a mesh positioned at the centroid of its triangles, scale 1
    pub fn new(triangles: Vec<Triangle>) -> Self {
        let position = if triangles.is_empty() {
            Vec3::ZERO
        } else {
            triangles.iter().map(Triangle::centroid).sum::<Vec3>() / triangles.len() as f32
        };

        Self {
            triangles,
            position,
            scale: 1.0,
        }
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn translate(&mut self, delta: Vec3) {
        for triangle in &mut self.triangles {
            triangle.translate(delta);
        }
        self.position += delta;
    }

    /// Moves the mesh so its position lands on `position`, translating every vertex by the delta
    pub fn move_to(&mut self, position: Vec3) {
        self.translate(position - self.position);
    }

    /// Rescales every vertex about the mesh position relative to the current scale
    ///
    /// The mesh is left unchanged when the step would produce non-finite vertices.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), SceneError> {
        check_positive("scale", scale)?;
        let factor = scale / self.scale;
        let out_of_range = SceneError::InvalidValue { field: "scale", value: scale };
        if !factor.is_finite() {
            return Err(out_of_range);
        }

        let pivot = self.position;
        let mut scaled = self.triangles.clone();
        for triangle in &mut scaled {
            triangle.scale_about(pivot, factor);
            if !triangle.is_finite() {
                return Err(out_of_range);
            }
        }

        self.triangles = scaled;
        self.scale = scale;
        Ok(())
    }

    pub fn materials_mut(&mut self) -> impl Iterator<Item = &mut Material> {
        self.triangles.iter_mut().map(|t| &mut t.material)
    }
}

/// Closed set of object kinds the editor knows about
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Sphere(Sphere),
    Mesh(Mesh),
}

/// Named entry of the scene registry.
///
/// The name is the primary key and can only be chosen at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    name: String,
    pub shape: Shape,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn sphere(name: impl Into<String>, sphere: Sphere) -> Self {
        Self::new(name, Shape::Sphere(sphere))
    }

    pub fn mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self::new(name, Shape::Mesh(mesh))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &'static str {
        match self.shape {
            Shape::Sphere(_) => "sphere",
            Shape::Mesh(_) => "mesh",
        }
    }

    pub fn position(&self) -> Vec3 {
        match &self.shape {
            Shape::Sphere(sphere) => sphere.position,
            Shape::Mesh(mesh) => mesh.position(),
        }
    }

    /// Spheres are repositioned directly, meshes go through a delta translation of their vertices
    pub fn move_to(&mut self, position: Vec3) {
        match &mut self.shape {
            Shape::Sphere(sphere) => sphere.position = position,
            Shape::Mesh(mesh) => mesh.move_to(position),
        }
    }

    /// Sphere radius or mesh scale
    pub fn size(&self) -> f32 {
        match &self.shape {
            Shape::Sphere(sphere) => sphere.radius(),
            Shape::Mesh(mesh) => mesh.scale(),
        }
    }

    pub fn set_size(&mut self, size: f32) -> Result<(), SceneError> {
        match &mut self.shape {
            Shape::Sphere(sphere) => sphere.set_radius(size),
            Shape::Mesh(mesh) => mesh.set_scale(size),
        }
    }

    /// Applies `edit` to every material the object owns
    pub fn edit_materials(&mut self, mut edit: impl FnMut(&mut Material)) {
        match &mut self.shape {
            Shape::Sphere(sphere) => edit(&mut sphere.material),
            Shape::Mesh(mesh) => mesh.materials_mut().for_each(edit),
        }
    }

    /// Deep copy under a different name
    pub(crate) fn renamed(&self, name: String) -> Self {
        Self {
            name,
            shape: self.shape.clone(),
        }
    }
}

/// Positive and normal: zero, subnormals, infinities and NaN are rejected
fn check_positive(field: &'static str, value: f32) -> Result<(), SceneError> {
    if value > 0.0 && value.is_normal() {
        Ok(())
    } else {
        Err(SceneError::InvalidValue { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            Material::default(),
        )
    }

    #[test]
    fn test_sphere_rejects_non_positive_radius() {
        assert!(Sphere::new(Vec3::ZERO, 0.0, Material::default()).is_err());
        assert!(Sphere::new(Vec3::ZERO, -1.0, Material::default()).is_err());

        let mut sphere = Sphere::default();
        assert!(sphere.set_radius(f32::NAN).is_err());
        assert_eq!(sphere.radius(), 1.0);
    }

    #[test]
    fn test_mesh_position_is_triangle_centroid() {
        let mesh = Mesh::new(vec![unit_triangle()]);
        assert_eq!(mesh.position(), Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.scale(), 1.0);
    }

    #[test]
    fn test_mesh_move_rewrites_vertices() {
        let mut mesh = Mesh::new(vec![unit_triangle()]);
        mesh.move_to(Vec3::new(11.0, 1.0, 5.0));

        let triangle = &mesh.triangles()[0];
        assert_eq!(triangle.v0, Vec3::new(10.0, 0.0, 5.0));
        assert_eq!(triangle.v1, Vec3::new(13.0, 0.0, 5.0));
        assert_eq!(triangle.v2, Vec3::new(10.0, 3.0, 5.0));
        assert_eq!(mesh.position(), Vec3::new(11.0, 1.0, 5.0));
    }

    #[test]
    fn test_mesh_scale_is_relative_to_current_scale() {
        let mut mesh = Mesh::new(vec![unit_triangle()]);
        mesh.set_scale(2.0).unwrap();
        assert_eq!(mesh.triangles()[0].v1, Vec3::new(5.0, -1.0, 0.0));

        // Going back to 1.0 restores the original vertices
        mesh.set_scale(1.0).unwrap();
        assert_eq!(mesh.triangles()[0].v1, Vec3::new(3.0, 0.0, 0.0));

        assert!(mesh.set_scale(0.0).is_err());
        assert_eq!(mesh.scale(), 1.0);
    }

    #[test]
    fn test_mesh_scale_rejects_subnormal_values() {
        let mut mesh = Mesh::new(vec![unit_triangle()]);
        let before = mesh.clone();

        assert_eq!(
            mesh.set_scale(1e-40),
            Err(SceneError::InvalidValue { field: "scale", value: 1e-40 })
        );
        assert_eq!(mesh, before);

        mesh.set_scale(1.0).unwrap();
        assert!(mesh.triangles()[0].is_finite());
        assert_eq!(mesh.triangles()[0].v1, Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_mesh_scale_rejects_overflowing_vertices() {
        let far = Triangle::new(
            Vec3::new(-3.0e38, 0.0, 0.0),
            Vec3::new(3.0e38, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Material::default(),
        );
        let mut mesh = Mesh::new(vec![far]);
        let before = mesh.clone();

        assert!(mesh.set_scale(4.0).is_err());
        assert_eq!(mesh, before);
        assert_eq!(mesh.scale(), 1.0);
    }

    #[test]
    fn test_sphere_rejects_subnormal_radius() {
        let mut sphere = Sphere::default();
        assert!(sphere.set_radius(1e-40).is_err());
        assert!(sphere.set_radius(f32::INFINITY).is_err());
        assert_eq!(sphere.radius(), 1.0);
    }

    #[test]
    fn test_object_move_dispatches_by_kind() {
        let mut sphere = SceneObject::sphere("Ball", Sphere::default());
        sphere.move_to(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.position(), Vec3::new(1.0, 2.0, 3.0));

        let mut mesh = SceneObject::mesh("Tri", Mesh::new(vec![unit_triangle()]));
        mesh.move_to(Vec3::ZERO);
        assert_eq!(mesh.position(), Vec3::ZERO);
        match &mesh.shape {
            Shape::Mesh(m) => assert_eq!(m.triangles()[0].v0, Vec3::new(-1.0, -1.0, 0.0)),
            Shape::Sphere(_) => panic!("expected a mesh"),
        }
    }

    #[test]
    fn test_edit_materials_reaches_every_triangle() {
        let mut mesh = SceneObject::mesh("Tris", Mesh::new(vec![unit_triangle(), unit_triangle()]));
        mesh.edit_materials(|m| m.base_color = Vec3::X);

        match &mesh.shape {
            Shape::Mesh(m) => assert!(m.triangles().iter().all(|t| t.material.base_color == Vec3::X)),
            Shape::Sphere(_) => panic!("expected a mesh"),
        }
    }
}
