//! Edit session: the scene, the command interpreter and the console
//! transcript, owned together and driven from the input loop.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use glam::Vec2;
use log::{info, warn};

use crate::command::CommandInterpreter;
use crate::error::{CommandError, SceneError};
use crate::frame::FrameContext;
use crate::loaders::{load_mesh, mesh_name};
use crate::picking::{pick, PickHit};
use crate::scene::{SceneObject, SceneRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Echo of a command the user typed
    Input,
    Output,
    Error,
}

#[derive(Debug, Clone)]
pub struct ConsoleLine {
    pub time: DateTime<Local>,
    pub kind: LineKind,
    pub text: String,
}

/// Bounded console transcript, oldest lines dropped first
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    lines: VecDeque<ConsoleLine>,
    capacity: usize,
}

impl ConsoleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, kind: LineKind, text: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(ConsoleLine {
            time: Local::now(),
            kind,
            text: text.into(),
        });
    }

    pub fn lines(&self) -> impl Iterator<Item = &ConsoleLine> + '_ {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::new(500)
    }
}

pub struct EditSession {
    pub scene: SceneRegistry,
    interpreter: CommandInterpreter,
    console: ConsoleLog,
}

impl EditSession {
    pub fn new(save_path: impl Into<PathBuf>, console_capacity: usize) -> Self {
        Self {
            scene: SceneRegistry::new(),
            interpreter: CommandInterpreter::new().with_save_path(save_path),
            console: ConsoleLog::new(console_capacity),
        }
    }

    /// Runs one command line, recording it and its outcome in the console
    pub fn execute(&mut self, line: &str) -> Result<String, CommandError> {
        let line = line.trim();
        self.console.push(LineKind::Input, format!("> {}", line));

        let result = self.interpreter.execute(line, &mut self.scene);
        match &result {
            Ok(output) => {
                info!("{}", output);
                self.console.push(LineKind::Output, output.as_str());
            }
            Err(error) => {
                warn!("Command \"{}\" rejected: {}", line, error);
                self.console.push(LineKind::Error, error.to_string());
            }
        }
        result
    }

    pub fn interpreter(&self) -> &CommandInterpreter {
        &self.interpreter
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    pub fn save_path(&self) -> &Path {
        self.interpreter.save_path()
    }

    /// Current default target
    pub fn target(&self) -> Option<&str> {
        self.interpreter.target()
    }

    pub fn select(&mut self, name: &str) -> Result<(), SceneError> {
        if !self.scene.exists(name) {
            return Err(SceneError::NotFound(name.to_string()));
        }
        self.interpreter.set_target(Some(name.to_string()));
        Ok(())
    }

    /// Removes an object and clears the default target if it named it
    pub fn delete(&mut self, name: &str) -> Result<SceneObject, SceneError> {
        let removed = self.scene.remove(name)?;
        self.interpreter.forget(removed.name());
        info!("Deleted \"{}\"", removed.name());
        Ok(removed)
    }

    /// Picks the object under `cursor` and makes it the default target.
    /// Empty space keeps the current target.
    pub fn pick(&mut self, cursor: Vec2, frame: &FrameContext) -> Option<PickHit> {
        let ray = frame.cursor_ray(cursor);
        let hit = pick(&self.scene, &ray)?;

        info!("Picked \"{}\" at distance {:.3}", hit.name, hit.distance);
        self.interpreter.set_target(Some(hit.name.clone()));
        Some(hit)
    }

    /// Imports a glTF file as a mesh named after the file.
    ///
    /// Unlike the `import` command this accepts paths containing spaces.
    pub fn import_mesh(&mut self, path: &Path) -> Result<String, CommandError> {
        self.console.push(LineKind::Input, format!("> import {}", path.display()));

        let result = load_mesh(path).map_err(CommandError::Import).and_then(|mesh| {
            let name = self.scene.unique_name(&mesh_name(path));
            self.scene.insert(SceneObject::mesh(name.clone(), mesh))?;
            Ok(name)
        });

        match &result {
            Ok(name) => {
                info!("Imported {:?} as \"{}\"", path, name);
                self.console.push(LineKind::Output, format!("Imported \"{}\"", name));
            }
            Err(error) => {
                warn!("Import of {:?} failed: {}", path, error);
                self.console.push(LineKind::Error, error.to_string());
            }
        }
        result
    }

    /// Drops the default target if its object no longer exists
    pub fn refresh_target(&mut self) {
        self.interpreter.retain_valid_target(&self.scene);
    }
}
