use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use glam::Vec3;

use super::args::{parse_f32, parse_vec3, resolve_target, split_target};
use super::{Command, CommandContext};
use crate::error::{CommandError, SceneError};
use crate::loaders::gltf::{load_mesh, mesh_name};
use crate::persistence::{load_scene, save_scene};
use crate::scene::{SceneObject, Sphere};

/// Built-in commands in registration order
pub fn builtin_commands() -> Vec<Box<dyn Command>> {
    vec![
        Box::new(Select),
        Box::new(Deselect),
        Box::new(New),
        Box::new(Move),
        Box::new(Help),
        Box::new(Delete),
        Box::new(Duplicate),
        Box::new(Resize),
        Box::new(Color),
        Box::new(List),
        Box::new(Import),
        Box::new(Save),
        Box::new(Load),
        Box::new(Clear),
    ]
}

fn format_vec3(v: Vec3) -> String {
    format!("({}, {}, {})", v.x, v.y, v.z)
}

pub struct Select;

impl Command for Select {
    fn name(&self) -> &'static str {
        "select"
    }

    fn usage(&self) -> &'static str {
        "select <name>"
    }

    fn summary(&self) -> &'static str {
        "Sets the default target used when a command omits its target"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let [name] = args else {
            return Err(CommandError::Arity {
                command: self.name(),
                usage: self.usage(),
            });
        };

        if !ctx.scene.exists(name) {
            return Err(CommandError::TargetNotFound(name.to_string()));
        }

        *ctx.target = Some(name.to_string());
        Ok(format!("Selected \"{}\" as default target", name))
    }
}

pub struct Deselect;

impl Command for Deselect {
    fn name(&self) -> &'static str {
        "deselect"
    }

    fn usage(&self) -> &'static str {
        "deselect"
    }

    fn summary(&self) -> &'static str {
        "Clears the default target"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        if !args.is_empty() {
            return Err(CommandError::Arity {
                command: self.name(),
                usage: self.usage(),
            });
        }

        *ctx.target = None;
        Ok("Removed the default target".to_string())
    }
}

pub struct New;

impl New {
    const BASE_NAME: &'static str = "Sphere";
}

impl Command for New {
    fn name(&self) -> &'static str {
        "new"
    }

    fn usage(&self) -> &'static str {
        "new sphere [name] [<x> <y> <z>]"
    }

    fn summary(&self) -> &'static str {
        "Creates a sphere, at the origin unless a position is given"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let arity = || CommandError::Arity {
            command: self.name(),
            usage: self.usage(),
        };

        let (kind, rest) = args.split_first().ok_or_else(arity)?;
        if *kind != "sphere" {
            return Err(CommandError::parse(self.name(), kind, "\"sphere\""));
        }

        let (name, position) = match rest {
            [] => (None, Vec3::ZERO),
            [name] => (Some(*name), Vec3::ZERO),
            [_, _, _] => (None, parse_vec3(self.name(), rest)?),
            [name, coords @ ..] if coords.len() == 3 => (Some(*name), parse_vec3(self.name(), coords)?),
            _ => return Err(arity()),
        };

        let name = match name {
            Some(name) => name.to_string(),
            None => ctx.scene.unique_name(Self::BASE_NAME),
        };

        let mut sphere = Sphere::default();
        sphere.position = position;
        ctx.scene.insert(SceneObject::sphere(name.clone(), sphere))?;

        Ok(format!("Created sphere \"{}\" at {}", name, format_vec3(position)))
    }
}

pub struct Move;

impl Command for Move {
    fn name(&self) -> &'static str {
        "move"
    }

    fn usage(&self) -> &'static str {
        "move [target] <x> <y> <z>"
    }

    fn summary(&self) -> &'static str {
        "Moves an object to an absolute position"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let (target, coords) = split_target(self.name(), self.usage(), args, 3)?;
        let position = parse_vec3(self.name(), coords)?;
        let name = resolve_target(self.name(), target, ctx)?;

        // Meshes translate every vertex by the delta to `position`
        ctx.scene.get_mut(&name)?.move_to(position);

        Ok(format!("Moved \"{}\" to {}", name, format_vec3(position)))
    }
}

pub struct Help;

impl Command for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn usage(&self) -> &'static str {
        "help [command]"
    }

    fn summary(&self) -> &'static str {
        "Lists commands, or shows the usage of one"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        match args {
            [] => {
                let names: Vec<_> = ctx.commands.iter().map(|c| c.name()).collect();
                Ok(format!("Commands: {}", names.join(", ")))
            }
            [name] => ctx
                .commands
                .iter()
                .find(|c| c.name() == *name)
                .map(|c| format!("{} - {}", c.usage(), c.summary()))
                .ok_or_else(|| CommandError::UnknownCommand(name.to_string())),
            _ => Err(CommandError::Arity {
                command: self.name(),
                usage: self.usage(),
            }),
        }
    }
}

pub struct Delete;

impl Command for Delete {
    fn name(&self) -> &'static str {
        "delete"
    }

    fn usage(&self) -> &'static str {
        "delete [target]"
    }

    fn summary(&self) -> &'static str {
        "Removes an object from the scene"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let (target, _) = split_target(self.name(), self.usage(), args, 0)?;
        let name = resolve_target(self.name(), target, ctx)?;

        ctx.scene.remove(&name)?;
        if ctx.target.as_deref() == Some(name.as_str()) {
            *ctx.target = None;
        }

        Ok(format!("Deleted \"{}\"", name))
    }
}

pub struct Duplicate;

impl Command for Duplicate {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn usage(&self) -> &'static str {
        "duplicate [target]"
    }

    fn summary(&self) -> &'static str {
        "Copies an object under the next free numbered name"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let (target, _) = split_target(self.name(), self.usage(), args, 0)?;
        let name = resolve_target(self.name(), target, ctx)?;

        let copy = ctx.scene.duplicate(&name)?;
        Ok(format!("Duplicated \"{}\" as \"{}\"", name, copy.name()))
    }
}

pub struct Resize;

impl Command for Resize {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn usage(&self) -> &'static str {
        "resize [target] <size>"
    }

    fn summary(&self) -> &'static str {
        "Sets a sphere's radius or a mesh's scale"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let (target, values) = split_target(self.name(), self.usage(), args, 1)?;
        let size = parse_f32(self.name(), values[0])?;
        if size <= 0.0 {
            return Err(CommandError::invalid(
                self.name(),
                format!("size must be greater than zero, got {}", size),
            ));
        }
        let name = resolve_target(self.name(), target, ctx)?;

        ctx.scene.get_mut(&name)?.set_size(size)?;
        Ok(format!("Resized \"{}\" to {}", name, size))
    }
}

pub struct Color;

impl Command for Color {
    fn name(&self) -> &'static str {
        "color"
    }

    fn usage(&self) -> &'static str {
        "color [target] <r> <g> <b>"
    }

    fn summary(&self) -> &'static str {
        "Sets the base color (components in 0..1)"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let (target, values) = split_target(self.name(), self.usage(), args, 3)?;
        let color = parse_vec3(self.name(), values)?;
        if color.min_element() < 0.0 || color.max_element() > 1.0 {
            return Err(CommandError::invalid(
                self.name(),
                "color components must be between 0 and 1",
            ));
        }
        let name = resolve_target(self.name(), target, ctx)?;

        ctx.scene
            .get_mut(&name)?
            .edit_materials(|material| material.base_color = color);
        Ok(format!("Set color of \"{}\" to {}", name, format_vec3(color)))
    }
}

pub struct List;

impl Command for List {
    fn name(&self) -> &'static str {
        "list"
    }

    fn usage(&self) -> &'static str {
        "list"
    }

    fn summary(&self) -> &'static str {
        "Lists every object in the scene"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        if !args.is_empty() {
            return Err(CommandError::Arity {
                command: self.name(),
                usage: self.usage(),
            });
        }

        if ctx.scene.is_empty() {
            return Ok("The scene is empty".to_string());
        }

        let mut output = format!("{} objects:", ctx.scene.len());
        for object in ctx.scene.iter() {
            let marker = if ctx.target.as_deref() == Some(object.name()) { "*" } else { " " };
            let _ = write!(
                output,
                "\n{} {} ({}) at {}",
                marker,
                object.name(),
                object.kind(),
                format_vec3(object.position())
            );
        }
        Ok(output)
    }
}

pub struct Import;

impl Command for Import {
    fn name(&self) -> &'static str {
        "import"
    }

    fn usage(&self) -> &'static str {
        "import <path> [name]"
    }

    fn summary(&self) -> &'static str {
        "Imports a glTF file as a triangle mesh"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let (path, name) = match args {
            [path] => (Path::new(path), None),
            [path, name] => (Path::new(path), Some(*name)),
            _ => {
                return Err(CommandError::Arity {
                    command: self.name(),
                    usage: self.usage(),
                })
            }
        };

        if let Some(name) = name {
            if ctx.scene.exists(name) {
                return Err(SceneError::DuplicateName(name.to_string()).into());
            }
        }

        let mesh = load_mesh(path).map_err(CommandError::Import)?;
        let name = match name {
            Some(name) => name.to_string(),
            None => ctx.scene.unique_name(&mesh_name(path)),
        };

        let triangles = mesh.triangles().len();
        ctx.scene.insert(SceneObject::mesh(name.clone(), mesh))?;
        Ok(format!("Imported \"{}\" with {} triangles", name, triangles))
    }
}

fn path_argument(
    command: &'static str,
    usage: &'static str,
    args: &[&str],
    default: &Path,
) -> Result<PathBuf, CommandError> {
    match args {
        [] => Ok(default.to_path_buf()),
        [path] => Ok(PathBuf::from(path)),
        _ => Err(CommandError::Arity { command, usage }),
    }
}

pub struct Save;

impl Command for Save {
    fn name(&self) -> &'static str {
        "save"
    }

    fn usage(&self) -> &'static str {
        "save [path]"
    }

    fn summary(&self) -> &'static str {
        "Writes every sphere to a scene file"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let path = path_argument(self.name(), self.usage(), args, ctx.save_path)?;
        let summary = save_scene(ctx.scene, &path).map_err(CommandError::Persistence)?;

        let mut output = format!("Saved {} spheres to {}", summary.spheres, path.display());
        if summary.skipped_meshes > 0 {
            let _ = write!(output, " ({} meshes not saved)", summary.skipped_meshes);
        }
        Ok(output)
    }
}

pub struct Load;

impl Command for Load {
    fn name(&self) -> &'static str {
        "load"
    }

    fn usage(&self) -> &'static str {
        "load [path]"
    }

    fn summary(&self) -> &'static str {
        "Replaces every sphere with the contents of a scene file"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        let path = path_argument(self.name(), self.usage(), args, ctx.save_path)?;
        let loaded = load_scene(ctx.scene, &path).map_err(CommandError::Persistence)?;

        if let Some(target) = ctx.target.as_deref() {
            if !ctx.scene.exists(target) {
                *ctx.target = None;
            }
        }

        Ok(format!("Loaded {} spheres from {}", loaded, path.display()))
    }
}

pub struct Clear;

impl Command for Clear {
    fn name(&self) -> &'static str {
        "clear"
    }

    fn usage(&self) -> &'static str {
        "clear"
    }

    fn summary(&self) -> &'static str {
        "Removes every object"
    }

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError> {
        if !args.is_empty() {
            return Err(CommandError::Arity {
                command: self.name(),
                usage: self.usage(),
            });
        }

        let removed = ctx.scene.len();
        ctx.scene.clear();
        *ctx.target = None;
        Ok(format!("Removed {} objects", removed))
    }
}
