use std::path::Path;

use glam::Vec3;
use scene_editor::command::CommandInterpreter;
use scene_editor::loaders::load_mesh;
use scene_editor::scene::{SceneRegistry, Shape};
use scene_editor::session::EditSession;
use scene_editor::{CommandError, SceneError};
use tempfile::tempdir;

/// One red triangle (0,0,0) (1,0,0) (0,1,0) under a node translated to z = -5
const TRIANGLE_GLTF: &str = r#"{
    "asset": { "version": "2.0" },
    "scene": 0,
    "scenes": [{ "nodes": [0] }],
    "nodes": [{ "mesh": 0, "translation": [0.0, 0.0, -5.0] }],
    "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] }],
    "materials": [{
        "pbrMetallicRoughness": {
            "baseColorFactor": [1.0, 0.0, 0.0, 1.0],
            "roughnessFactor": 0.25,
            "metallicFactor": 0.0
        }
    }],
    "buffers": [{
        "byteLength": 36,
        "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
    }],
    "bufferViews": [{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }],
    "accessors": [{
        "bufferView": 0,
        "componentType": 5126,
        "count": 3,
        "type": "VEC3",
        "min": [0.0, 0.0, 0.0],
        "max": [1.0, 1.0, 0.0]
    }]
}"#;

fn write_gltf(dir: &Path, file_name: &str) -> std::path::PathBuf {
    let path = dir.join(file_name);
    std::fs::write(&path, TRIANGLE_GLTF).unwrap();
    path
}

#[cfg(test)]
mod load_mesh_tests {
    use super::*;

    #[test]
    fn test_node_transform_is_baked() {
        let dir = tempdir().unwrap();
        let mesh = load_mesh(write_gltf(dir.path(), "triangle.gltf")).unwrap();

        assert_eq!(mesh.triangles().len(), 1);
        let triangle = &mesh.triangles()[0];
        assert_eq!(triangle.v0, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(triangle.v1, Vec3::new(1.0, 0.0, -5.0));
        assert_eq!(triangle.v2, Vec3::new(0.0, 1.0, -5.0));
        assert_eq!(mesh.scale(), 1.0);
    }

    #[test]
    fn test_primitive_material_is_converted() {
        let dir = tempdir().unwrap();
        let mesh = load_mesh(write_gltf(dir.path(), "triangle.gltf")).unwrap();

        let material = mesh.triangles()[0].material;
        assert_eq!(material.base_color, Vec3::new(1.0, 0.0, 0.0));
        assert!((material.smoothness - 0.75).abs() < 1e-6);
        assert_eq!(material.glossiness, 0.0);
        assert_eq!(material.emission_strength, 0.0);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.gltf");
        std::fs::write(&path, "{ not gltf").unwrap();

        assert!(load_mesh(&path).is_err());
    }
}

#[cfg(test)]
mod import_command_tests {
    use super::*;

    #[test]
    fn test_import_names_mesh_after_file() {
        let dir = tempdir().unwrap();
        let path = write_gltf(dir.path(), "ramp.gltf");
        let mut interpreter = CommandInterpreter::new();
        let mut scene = SceneRegistry::new();

        let output = interpreter
            .execute(&format!("import {}", path.display()), &mut scene)
            .unwrap();
        assert_eq!(output, "Imported \"ramp\" with 1 triangles");

        interpreter
            .execute(&format!("import {}", path.display()), &mut scene)
            .unwrap();
        assert!(scene.exists("ramp1"));
        assert!(matches!(scene.get("ramp").unwrap().shape, Shape::Mesh(_)));
    }

    #[test]
    fn test_import_with_explicit_name() {
        let dir = tempdir().unwrap();
        let path = write_gltf(dir.path(), "ramp.gltf");
        let mut interpreter = CommandInterpreter::new();
        let mut scene = SceneRegistry::new();

        interpreter
            .execute(&format!("import {} Ramp", path.display()), &mut scene)
            .unwrap();
        assert!(scene.exists("Ramp"));

        let result = interpreter.execute(&format!("import {} Ramp", path.display()), &mut scene);
        assert!(matches!(
            result,
            Err(CommandError::Scene(SceneError::DuplicateName(ref name))) if name == "Ramp"
        ));
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_import_replaces_whitespace_in_file_name() {
        let dir = tempdir().unwrap();
        let path = write_gltf(dir.path(), "my model.gltf");
        let mut session = EditSession::new(dir.path().join("scene.csv"), 100);

        assert_eq!(session.import_mesh(&path).unwrap(), "my_model");
        assert_eq!(session.import_mesh(&path).unwrap(), "my_model1");

        // The generated name must be usable as a command argument
        session.execute("resize my_model 2").unwrap();
        session.execute("delete my_model1").unwrap();
        assert_eq!(session.scene.len(), 1);
    }

    #[test]
    fn test_import_failure_leaves_scene_unchanged() {
        let mut interpreter = CommandInterpreter::new();
        let mut scene = SceneRegistry::new();

        let result = interpreter.execute("import does/not/exist.gltf", &mut scene);
        assert!(matches!(result, Err(CommandError::Import(_))));
        assert!(scene.is_empty());
    }
}
