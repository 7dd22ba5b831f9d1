//! Text command language.
//!
//! A line is split on whitespace; the first token names the command and the
//! rest are handed to its handler. Names are matched case-sensitively and
//! tokens cannot be quoted, so a name containing a space cannot be expressed.

mod args;
mod builtin;

use std::path::{Path, PathBuf};

use crate::error::CommandError;
use crate::scene::SceneRegistry;

pub use builtin::builtin_commands;

/// Handler for one command name.
///
/// Handlers validate every argument before touching the scene and return
/// either a confirmation line or a [`CommandError`]; a rejected invocation
/// leaves the scene and the default target as they were.
pub trait Command {
    fn name(&self) -> &'static str;

    /// Usage line shown by `help <command>` and arity diagnostics
    fn usage(&self) -> &'static str;

    fn summary(&self) -> &'static str;

    fn execute(&self, args: &[&str], ctx: &mut CommandContext<'_>) -> Result<String, CommandError>;
}

/// Everything a handler may read or mutate during one invocation
pub struct CommandContext<'a> {
    pub scene: &'a mut SceneRegistry,
    /// Object name used when a target-taking command omits its target
    pub target: &'a mut Option<String>,
    /// Default file for `save` and `load`
    pub save_path: &'a Path,
    /// Registered commands, in registration order
    pub commands: &'a [Box<dyn Command>],
}

/// Dispatches command lines to registered handlers.
///
/// The only state carried between calls is the default target; it changes
/// through `select`/`deselect` and is cleared when the object it names goes
/// away.
pub struct CommandInterpreter {
    commands: Vec<Box<dyn Command>>,
    target: Option<String>,
    save_path: PathBuf,
}

impl CommandInterpreter {
    /// Interpreter with every built-in command registered
    pub fn new() -> Self {
        let mut interpreter = Self::empty();
        for command in builtin_commands() {
            interpreter.register(command);
        }
        interpreter
    }

    /// Interpreter without any commands
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
            target: None,
            save_path: PathBuf::from("saves/scene.csv"),
        }
    }

    pub fn with_save_path(mut self, save_path: impl Into<PathBuf>) -> Self {
        self.save_path = save_path.into();
        self
    }

    /// Adds a handler; a handler with the same name is replaced in place
    pub fn register(&mut self, command: Box<dyn Command>) {
        match self.commands.iter().position(|c| c.name() == command.name()) {
            Some(slot) => self.commands[slot] = command,
            None => self.commands.push(command),
        }
    }

    pub fn execute(&mut self, line: &str, scene: &mut SceneRegistry) -> Result<String, CommandError> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?;
        let args: Vec<&str> = tokens.collect();

        let command = self
            .commands
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?;

        let mut ctx = CommandContext {
            scene,
            target: &mut self.target,
            save_path: &self.save_path,
            commands: &self.commands,
        };
        command.execute(&args, &mut ctx)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.iter().map(|c| c.name())
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn set_target(&mut self, target: Option<String>) {
        self.target = target;
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Clears the default target if it names `name`
    pub fn forget(&mut self, name: &str) {
        if self.target.as_deref() == Some(name) {
            self.target = None;
        }
    }

    /// Clears the default target if it no longer names a live object
    pub fn retain_valid_target(&mut self, scene: &SceneRegistry) {
        if let Some(name) = &self.target {
            if !scene.exists(name) {
                self.target = None;
            }
        }
    }
}

impl Default for CommandInterpreter {
    fn default() -> Self {
        Self::new()
    }
}
