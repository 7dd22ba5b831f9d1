use anyhow::{bail, Context, Result};
use glam::{Mat4, Vec3};
use log::{debug, info};
use std::path::Path;

use crate::scene::{Material, Mesh, Triangle};

/// Loads every triangle of a glTF file as one world-space mesh.
///
/// Node transforms are baked into the vertices. Each triangle carries the
/// material of its primitive. A file without any triangles is an error.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    info!("Loading glTF file: {:?}", path);

    let (gltf, buffers, _images) =
        gltf::import(path).with_context(|| format!("Failed to load glTF file: {:?}", path))?;

    debug!(
        "glTF loaded: {} scenes, {} nodes, {} meshes, {} materials",
        gltf.scenes().count(),
        gltf.nodes().count(),
        gltf.meshes().count(),
        gltf.materials().count()
    );

    let mut triangles = Vec::new();
    for scene in gltf.scenes() {
        for node in scene.nodes() {
            process_node(&node, &buffers, &Mat4::IDENTITY, &mut triangles)?;
        }
    }

    if triangles.is_empty() {
        bail!("glTF file {:?} contains no triangles", path);
    }

    info!("Extracted {} triangles from {:?}", triangles.len(), path);
    Ok(Mesh::new(triangles))
}

/// Recursively processes glTF nodes
fn process_node(
    node: &gltf::Node,
    buffers: &[gltf::buffer::Data],
    parent_transform: &Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    let local_transform = Mat4::from_cols_array_2d(&node.transform().matrix());
    let global_transform = *parent_transform * local_transform;

    if let Some(mesh) = node.mesh() {
        process_mesh(&mesh, buffers, &global_transform, triangles)?;
    }

    for child in node.children() {
        process_node(&child, buffers, &global_transform, triangles)?;
    }

    Ok(())
}

fn process_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    transform: &Mat4,
    triangles: &mut Vec<Triangle>,
) -> Result<()> {
    debug!("  Processing mesh: {:?}", mesh.name());

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            debug!("  Skipping non-triangle primitive ({:?})", primitive.mode());
            continue;
        }

        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data.0[..]));

        let vertices: Vec<Vec3> = reader
            .read_positions()
            .context("Mesh primitive has no positions")?
            .map(|pos| transform.transform_point3(Vec3::from_array(pos)))
            .collect();

        let material = convert_material(&primitive.material());

        // Without indices the positions are a plain triangle list
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };

        for corners in indices.chunks_exact(3) {
            let vertex = |i: u32| {
                vertices
                    .get(i as usize)
                    .copied()
                    .with_context(|| format!("Vertex index {} out of range ({} vertices)", i, vertices.len()))
            };

            triangles.push(Triangle::new(
                vertex(corners[0])?,
                vertex(corners[1])?,
                vertex(corners[2])?,
                material,
            ));
        }
    }

    Ok(())
}

fn convert_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    pbr_material(
        pbr.base_color_factor(),
        material.emissive_factor(),
        pbr.roughness_factor(),
        pbr.metallic_factor(),
    )
}

/// Maps glTF metallic-roughness factors onto the tracer's material model
pub fn pbr_material(base_color: [f32; 4], emissive: [f32; 3], roughness: f32, metallic: f32) -> Material {
    let emission_color = Vec3::from_array(emissive);
    let emission_strength = if emission_color.max_element() > 0.0 { 1.0 } else { 0.0 };

    Material {
        base_color: Vec3::new(base_color[0], base_color[1], base_color[2]),
        emission_color,
        emission_strength,
        smoothness: (1.0 - roughness).clamp(0.0, 1.0),
        glossiness: metallic.clamp(0.0, 1.0),
    }
}

/// Object name for a mesh loaded from `path`: the file stem with each run of
/// whitespace replaced by `_`, or `Mesh` when nothing is left
pub fn mesh_name(path: &Path) -> String {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = stem.split_whitespace().collect::<Vec<_>>().join("_");
    if name.is_empty() {
        "Mesh".to_string()
    } else {
        name
    }
}
