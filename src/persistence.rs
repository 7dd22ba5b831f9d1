//! Scene files.
//!
//! A scene file is CSV with a header row and one record per sphere, using the
//! columns `Type`, `Name`, `PositionX` ... `Glossiness`. Meshes are not
//! persisted: saving skips them with a warning and loading leaves the meshes
//! already in the scene alone.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use glam::Vec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::scene::{Material, SceneObject, SceneRegistry, Shape, Sphere};

/// Header row, in column order
pub const COLUMNS: [&str; 15] = [
    "Type",
    "Name",
    "PositionX",
    "PositionY",
    "PositionZ",
    "Radius",
    "ColorR",
    "ColorG",
    "ColorB",
    "EmissionColorR",
    "EmissionColorG",
    "EmissionColorB",
    "EmissionStrength",
    "Smoothness",
    "Glossiness",
];

const SPHERE_TYPE: &str = "Sphere";

/// One persisted object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SceneRow {
    #[serde(rename = "Type")]
    pub kind: String,
    pub name: String,
    pub position_x: f32,
    pub position_y: f32,
    pub position_z: f32,
    pub radius: f32,
    pub color_r: f32,
    pub color_g: f32,
    pub color_b: f32,
    pub emission_color_r: f32,
    pub emission_color_g: f32,
    pub emission_color_b: f32,
    pub emission_strength: f32,
    pub smoothness: f32,
    pub glossiness: f32,
}

impl SceneRow {
    pub fn from_sphere(name: &str, sphere: &Sphere) -> Self {
        let material = &sphere.material;
        Self {
            kind: SPHERE_TYPE.to_string(),
            name: name.to_string(),
            position_x: sphere.position.x,
            position_y: sphere.position.y,
            position_z: sphere.position.z,
            radius: sphere.radius(),
            color_r: material.base_color.x,
            color_g: material.base_color.y,
            color_b: material.base_color.z,
            emission_color_r: material.emission_color.x,
            emission_color_g: material.emission_color.y,
            emission_color_b: material.emission_color.z,
            emission_strength: material.emission_strength,
            smoothness: material.smoothness,
            glossiness: material.glossiness,
        }
    }

    pub fn to_sphere(&self) -> Result<Sphere> {
        let material = Material::new(
            Vec3::new(self.color_r, self.color_g, self.color_b),
            Vec3::new(self.emission_color_r, self.emission_color_g, self.emission_color_b),
            self.emission_strength,
            self.smoothness,
            self.glossiness,
        );
        let position = Vec3::new(self.position_x, self.position_y, self.position_z);

        Sphere::new(position, self.radius, material)
            .with_context(|| format!("Invalid sphere \"{}\"", self.name))
    }
}

/// What [`save_scene`] wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveSummary {
    pub spheres: usize,
    pub skipped_meshes: usize,
}

/// Writes every sphere of `scene` to `path`, creating parent directories
pub fn save_scene(scene: &SceneRegistry, path: impl AsRef<Path>) -> Result<SaveSummary> {
    let path = path.as_ref();

    let mut rows = Vec::new();
    let mut skipped_meshes = 0;
    for object in scene.iter() {
        match &object.shape {
            Shape::Sphere(sphere) => rows.push(SceneRow::from_sphere(object.name(), sphere)),
            Shape::Mesh(_) => {
                warn!("Mesh \"{}\" is not saved, meshes cannot be persisted", object.name());
                skipped_meshes += 1;
            }
        }
    }

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(|| format!("Failed to create directory: {:?}", dir))?;
    }

    // The header is written even for an empty scene
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create scene file: {:?}", path))?;
    writer.write_record(COLUMNS).context("Failed to write scene header")?;
    for row in &rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write \"{}\"", row.name))?;
    }
    writer.flush().with_context(|| format!("Failed to write scene file: {:?}", path))?;

    info!("Saved {} spheres to {:?}", rows.len(), path);
    Ok(SaveSummary {
        spheres: rows.len(),
        skipped_meshes,
    })
}

/// Replaces every sphere of `scene` with the spheres stored in `path`.
///
/// Columns are matched by header name. All rows are validated before the
/// scene is touched, so a bad file leaves the scene unchanged. Rows of unknown type are skipped with a warning.
/// Returns the number of spheres loaded.
pub fn load_scene(scene: &mut SceneRegistry, path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();

    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to read scene file: {:?}", path))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to parse scene file: {:?}", path))?
        .clone();
    let type_column = headers
        .iter()
        .position(|h| h == "Type")
        .with_context(|| format!("Scene file {:?} has no Type column", path))?;

    let mut names = HashSet::new();
    let mut loaded = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("Failed to parse scene file: {:?}", path))?;
        let line = record.position().map_or(0, |p| p.line());

        let kind = record.get(type_column).unwrap_or_default();
        if kind != SPHERE_TYPE {
            warn!("Skipping line {} of {:?}: unsupported object type \"{}\"", line, path, kind);
            continue;
        }

        let row: SceneRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Invalid sphere on line {} of {:?}", line, path))?;

        if row.name.is_empty() || row.name.contains(char::is_whitespace) {
            bail!("Invalid object name {:?} in {:?}", row.name, path);
        }
        if !names.insert(row.name.clone()) {
            bail!("Duplicate object name \"{}\" in {:?}", row.name, path);
        }
        if let Ok(existing) = scene.get(&row.name) {
            if !matches!(existing.shape, Shape::Sphere(_)) {
                bail!("\"{}\" in {:?} collides with a {} in the scene", row.name, path, existing.kind());
            }
        }

        loaded.push(SceneObject::sphere(row.name.clone(), row.to_sphere()?));
    }

    scene.remove_where(|object| matches!(object.shape, Shape::Sphere(_)));
    let count = loaded.len();
    for object in loaded {
        scene.insert(object)?;
    }

    info!("Loaded {} spheres from {:?}", count, path);
    Ok(count)
}
