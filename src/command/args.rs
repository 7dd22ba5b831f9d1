use glam::Vec3;

use super::CommandContext;
use crate::error::CommandError;

/// Parses a finite float
pub fn parse_f32(command: &'static str, token: &str) -> Result<f32, CommandError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::parse(command, token, "a number"))
}

/// Parses exactly three tokens as a vector
pub fn parse_vec3(command: &'static str, tokens: &[&str]) -> Result<Vec3, CommandError> {
    match tokens {
        [x, y, z] => Ok(Vec3::new(
            parse_f32(command, x)?,
            parse_f32(command, y)?,
            parse_f32(command, z)?,
        )),
        _ => Err(CommandError::invalid(command, "expected three numbers")),
    }
}

/// Splits `[target] <values...>` where exactly `values` trailing tokens are
/// required and the target is optional
pub fn split_target<'a>(
    command: &'static str,
    usage: &'static str,
    args: &'a [&'a str],
    values: usize,
) -> Result<(Option<&'a str>, &'a [&'a str]), CommandError> {
    if args.len() == values {
        Ok((None, args))
    } else if args.len() == values + 1 {
        Ok((Some(args[0]), &args[1..]))
    } else {
        Err(CommandError::Arity { command, usage })
    }
}

/// Explicit target if given, the default target otherwise. Either way the
/// object must currently exist.
pub fn resolve_target(
    command: &'static str,
    explicit: Option<&str>,
    ctx: &CommandContext<'_>,
) -> Result<String, CommandError> {
    let name = match explicit {
        Some(name) => name,
        None => ctx
            .target
            .as_deref()
            .ok_or(CommandError::NoDefaultTarget(command))?,
    };

    if ctx.scene.exists(name) {
        Ok(name.to_string())
    } else {
        Err(CommandError::TargetNotFound(name.to_string()))
    }
}
