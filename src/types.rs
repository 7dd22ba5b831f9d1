//! Fixed-layout records shared with the ray tracing shader.
//!
//! Layouts follow storage-buffer alignment: every vec3 starts on a 16-byte
//! boundary and is followed either by a scalar that fills the gap or by
//! explicit padding. All fields are little-endian f32 on the wire.

use std::mem::size_of;

/// Storage-buffer binding of the sphere records
pub const SPHERE_BINDING: u32 = 0;
/// Storage-buffer binding of the triangle records
pub const TRIANGLE_BINDING: u32 = 1;
/// Uniform binding of [`SceneCounts`]
pub const COUNTS_BINDING: u32 = 2;
/// Uniform binding of [`FrameUniform`]
pub const FRAME_BINDING: u32 = 3;
/// Storage texture the tracer writes into
pub const OUTPUT_BINDING: u32 = 4;

/// Material record: 48 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialData {
    pub color: [f32; 3],
    pub smoothness: f32,
    pub emission_color: [f32; 3],
    pub emission_strength: f32,
    pub _pad0: [f32; 3],
    pub glossiness: f32,
}

impl MaterialData {
    pub const fn new(
        color: [f32; 3],
        smoothness: f32,
        emission_color: [f32; 3],
        emission_strength: f32,
        glossiness: f32,
    ) -> Self {
        Self {
            color,
            smoothness,
            emission_color,
            emission_strength,
            _pad0: [0.0; 3],
            glossiness,
        }
    }
}

/// Sphere record: 16 + 48 = 64 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SphereData {
    pub position: [f32; 3],
    pub radius: f32,
    pub material: MaterialData,
}

/// Triangle record: 48 + 48 = 96 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TriangleData {
    pub v0: [f32; 3],
    pub _pad0: f32,
    pub v1: [f32; 3],
    pub _pad1: f32,
    pub v2: [f32; 3],
    pub _pad2: f32,
    pub material: MaterialData,
}

impl TriangleData {
    pub const fn new(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3], material: MaterialData) -> Self {
        Self {
            v0,
            _pad0: 0.0,
            v1,
            _pad1: 0.0,
            v2,
            _pad2: 0.0,
            material,
        }
    }
}

/// Record counts uploaded alongside the storage buffers (`numSpheres`, `numTriangles`)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneCounts {
    pub num_spheres: u32,
    pub num_triangles: u32,
    pub _pad: [u32; 2],
}

impl SceneCounts {
    pub const fn new(num_spheres: u32, num_triangles: u32) -> Self {
        Self {
            num_spheres,
            num_triangles,
            _pad: [0; 2],
        }
    }
}

/// Per-frame camera and shader settings for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_inverse: [[f32; 4]; 4],
    pub camera_position: [f32; 3],
    pub tan_half_fov: f32,
    pub resolution: [f32; 2],
    pub ambient_weight: f32,
    pub _pad: f32,
}

const _: () = assert!(size_of::<MaterialData>() == 48);
const _: () = assert!(size_of::<SphereData>() == 64);
const _: () = assert!(size_of::<TriangleData>() == 96);
const _: () = assert!(size_of::<SceneCounts>() == 16);
const _: () = assert!(size_of::<FrameUniform>() == 96);
