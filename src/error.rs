//! Error taxonomy for the editor core.
//!
//! Registry errors are returned by value from [`crate::scene::SceneRegistry`];
//! command errors are produced by handlers and rendered as a single console
//! line by the interpreter. Neither ever leaves the scene partially mutated.

/// Failures reported by the scene registry
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Another object already uses this display name
    #[error("name \"{0}\" is already taken by another object")]
    DuplicateName(String),

    /// No object with this display name exists
    #[error("no object named \"{0}\" in the scene")]
    NotFound(String),

    /// Geometry value outside its valid range (radius, scale)
    #[error("{field} must be a normal number greater than zero, got {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// Failures reported by command handlers
#[derive(thiserror::Error, Debug)]
pub enum CommandError {
    #[error("no command given")]
    Empty,

    #[error("unknown command \"{0}\", type \"help\" for the command list")]
    UnknownCommand(String),

    /// Wrong number of arguments; `usage` is the command's usage line
    #[error("wrong number of arguments for \"{command}\", usage: {usage}")]
    Arity {
        command: &'static str,
        usage: &'static str,
    },

    /// A token could not be parsed as the expected value
    #[error("invalid argument \"{token}\" for \"{command}\", expected {expected}")]
    Parse {
        command: &'static str,
        token: String,
        expected: &'static str,
    },

    #[error("no object named \"{0}\" was found")]
    TargetNotFound(String),

    #[error("\"{0}\" needs a target but none is selected, use \"select <name>\" first")]
    NoDefaultTarget(&'static str),

    #[error("invalid value for \"{command}\": {reason}")]
    InvalidValue {
        command: &'static str,
        reason: String,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("mesh import failed: {0:#}")]
    Import(anyhow::Error),

    #[error("scene file error: {0:#}")]
    Persistence(anyhow::Error),
}

impl CommandError {
    pub fn parse(command: &'static str, token: &str, expected: &'static str) -> Self {
        Self::Parse {
            command,
            token: token.to_string(),
            expected,
        }
    }

    pub fn invalid(command: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            command,
            reason: reason.into(),
        }
    }
}
