//! CPU -> GPU synchronization of the scene registry.
//!
//! Packing turns the registry into the fixed-layout records of
//! [`crate::types`]. [`SceneSync`] decides once per frame whether packing is
//! needed at all by comparing the registry revision against the last uploaded
//! one, and [`SceneBuffers`] owns the storage buffers the tracer reads.

use std::mem::size_of;

use log::debug;
use wgpu::util::DeviceExt;

use crate::scene::{SceneRegistry, Shape, Sphere, Triangle};
use crate::types::{SceneCounts, SphereData, TriangleData};

fn sphere_record(sphere: &Sphere) -> SphereData {
    SphereData {
        position: sphere.position.to_array(),
        radius: sphere.radius(),
        material: sphere.material.to_gpu(),
    }
}

fn triangle_record(triangle: &Triangle) -> TriangleData {
    TriangleData::new(
        triangle.v0.to_array(),
        triangle.v1.to_array(),
        triangle.v2.to_array(),
        triangle.material.to_gpu(),
    )
}

/// Sphere records in registry order
pub fn pack_spheres(scene: &SceneRegistry) -> Vec<SphereData> {
    scene.spheres().map(|(_, sphere)| sphere_record(sphere)).collect()
}

/// Triangle records of every mesh, meshes in registry order
pub fn pack_triangles(scene: &SceneRegistry) -> Vec<TriangleData> {
    scene
        .meshes()
        .flat_map(|(_, mesh)| mesh.triangles())
        .map(triangle_record)
        .collect()
}

/// Snapshot of the registry in upload form
#[derive(Debug, Clone, Default)]
pub struct PackedScene {
    pub spheres: Vec<SphereData>,
    pub triangles: Vec<TriangleData>,
}

impl PackedScene {
    pub fn counts(&self) -> SceneCounts {
        SceneCounts::new(self.spheres.len() as u32, self.triangles.len() as u32)
    }

    pub fn sphere_bytes(&self) -> &[u8] {
        let bytes: &[u8] = bytemuck::cast_slice(&self.spheres);
        assert_eq!(bytes.len(), self.spheres.len() * size_of::<SphereData>());
        bytes
    }

    pub fn triangle_bytes(&self) -> &[u8] {
        let bytes: &[u8] = bytemuck::cast_slice(&self.triangles);
        assert_eq!(bytes.len(), self.triangles.len() * size_of::<TriangleData>());
        bytes
    }
}

pub fn pack_scene(scene: &SceneRegistry) -> PackedScene {
    let mut packed = PackedScene::default();

    // Single pass keeps both lists consistent with one registry snapshot
    for object in scene.iter() {
        match &object.shape {
            Shape::Sphere(sphere) => packed.spheres.push(sphere_record(sphere)),
            Shape::Mesh(mesh) => packed.triangles.extend(mesh.triangles().iter().map(triangle_record)),
        }
    }

    packed
}

/// Dirty check between the registry and the last upload
#[derive(Debug, Default, Clone)]
pub struct SceneSync {
    uploaded: Option<u64>,
}

impl SceneSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dirty(&self, scene: &SceneRegistry) -> bool {
        self.uploaded != Some(scene.revision())
    }

    /// Packs the scene if it changed since the previous call, marking the
    /// current revision as uploaded
    pub fn take_changes(&mut self, scene: &SceneRegistry) -> Option<PackedScene> {
        if !self.is_dirty(scene) {
            return None;
        }

        self.uploaded = Some(scene.revision());
        Some(pack_scene(scene))
    }

    /// Forces a re-pack on the next frame, e.g. after the GPU buffers were recreated
    pub fn invalidate(&mut self) {
        self.uploaded = None;
    }
}

/// GPU-side scene storage bound at the fixed sphere/triangle binding points
pub struct SceneBuffers {
    pub spheres: wgpu::Buffer,
    pub triangles: wgpu::Buffer,
    pub counts: wgpu::Buffer,
    sphere_capacity: usize,
    triangle_capacity: usize,
}

impl SceneBuffers {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            spheres: Self::create_storage(device, "Sphere Buffer", 1, size_of::<SphereData>()),
            triangles: Self::create_storage(device, "Triangle Buffer", 1, size_of::<TriangleData>()),
            counts: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Scene Counts Buffer"),
                contents: bytemuck::cast_slice(&[SceneCounts::default()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            }),
            sphere_capacity: 1,
            triangle_capacity: 1,
        }
    }

    /// Storage buffers never shrink below one record; an empty binding is invalid
    fn create_storage(device: &wgpu::Device, label: &str, records: usize, stride: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (records.max(1) * stride) as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Writes the packed records and counts. Returns true when a buffer had
    /// to be reallocated, in which case bind groups referencing it are stale.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, packed: &PackedScene) -> bool {
        let mut reallocated = false;

        if packed.spheres.len() > self.sphere_capacity {
            self.sphere_capacity = packed.spheres.len().next_power_of_two();
            self.spheres =
                Self::create_storage(device, "Sphere Buffer", self.sphere_capacity, size_of::<SphereData>());
            reallocated = true;
        }

        if packed.triangles.len() > self.triangle_capacity {
            self.triangle_capacity = packed.triangles.len().next_power_of_two();
            self.triangles = Self::create_storage(
                device,
                "Triangle Buffer",
                self.triangle_capacity,
                size_of::<TriangleData>(),
            );
            reallocated = true;
        }

        if !packed.spheres.is_empty() {
            queue.write_buffer(&self.spheres, 0, packed.sphere_bytes());
        }
        if !packed.triangles.is_empty() {
            queue.write_buffer(&self.triangles, 0, packed.triangle_bytes());
        }
        queue.write_buffer(&self.counts, 0, bytemuck::cast_slice(&[packed.counts()]));

        debug!(
            "Uploaded {} spheres, {} triangles{}",
            packed.spheres.len(),
            packed.triangles.len(),
            if reallocated { " (buffers reallocated)" } else { "" }
        );

        reallocated
    }
}
