pub mod gltf;

pub use gltf::{load_mesh, mesh_name};
