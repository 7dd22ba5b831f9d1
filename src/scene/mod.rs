mod material;
mod object;
mod registry;

pub use material::Material;
pub use object::{Mesh, SceneObject, Shape, Sphere, Triangle};
pub use registry::SceneRegistry;
