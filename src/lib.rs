pub mod camera;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod frame;
pub mod loaders;
pub mod math;
pub mod persistence;
pub mod picking;
pub mod renderer;
pub mod scene;
pub mod session;
pub mod sync;
pub mod types;
pub mod ui;

pub use command::{Command, CommandContext, CommandInterpreter};
pub use error::{CommandError, SceneError};
pub use scene::{Material, Mesh, SceneObject, SceneRegistry, Shape, Sphere, Triangle};
