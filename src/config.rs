//! Editor configuration.
//!
//! Values come from an optional JSON file and are then overridden by
//! command-line flags. Everything that used to be a free-floating global
//! (camera defaults, shader settings, save location) lives here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Settings forwarded to the ray tracing shader every frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Share of the sky color added to every surface hit
    pub ambient_weight: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            ambient_weight: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub camera_position: [f32; 3],
    /// Radians, 0 looks down +Z
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    /// World units per second
    pub camera_speed: f32,
    /// Degrees of rotation per pixel of mouse travel at 45° fov
    pub mouse_sensitivity: f32,
    pub save_path: PathBuf,
    pub console_capacity: usize,
    pub render: RenderSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fov: 45.0,
            camera_position: [0.0, 0.0, 6.0],
            camera_yaw: std::f32::consts::PI,
            camera_pitch: 0.0,
            camera_speed: 5.0,
            mouse_sensitivity: 0.03,
            save_path: PathBuf::from("saves/scene.csv"),
            console_capacity: 500,
            render: RenderSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Config file (if any) with command-line overrides applied
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(scene) = &cli.scene {
            self.save_path = scene.clone();
        }
        if let Some(fov) = cli.fov {
            self.fov = fov;
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "fov": 60.0, "render": { "ambient_weight": 0.5 } }"#).unwrap();

        assert_eq!(config.fov, 60.0);
        assert_eq!(config.render.ambient_weight, 0.5);
        assert_eq!(config.camera_speed, 5.0);
        assert_eq!(config.width, 1280);
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let cli = Cli::parse_from(["scene-editor", "--fov", "30", "--scene", "other.csv"]);
        let mut config = EditorConfig::default();
        config.apply_cli(&cli);

        assert_eq!(config.fov, 30.0);
        assert_eq!(config.save_path, PathBuf::from("other.csv"));
        assert_eq!(config.height, 720);
    }
}
