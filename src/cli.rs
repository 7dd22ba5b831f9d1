// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "scene-editor")]
#[command(about = "Interactive scene editor for the WebGPU ray tracer", long_about = None)]
pub struct Cli {
    /// JSON file with editor settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scene file used by save/load
    #[arg(long)]
    pub scene: Option<PathBuf>,

    /// Load the scene file on startup
    #[arg(long, default_value = "false")]
    pub load: bool,

    /// glTF mesh to import on startup (repeatable)
    #[arg(long = "import")]
    pub imports: Vec<PathBuf>,

    /// Editor command to run on startup, e.g. --exec "new sphere Foo 1 2 3" (repeatable)
    #[arg(long = "exec")]
    pub exec: Vec<String>,

    /// Vertical field of view in degrees
    #[arg(long)]
    pub fov: Option<f32>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}
