use glam::Vec3;
use scene_editor::command::CommandInterpreter;
use scene_editor::scene::{Material, Mesh, SceneObject, SceneRegistry, Shape, Triangle};
use scene_editor::{CommandError, SceneError};

fn setup() -> (CommandInterpreter, SceneRegistry) {
    (CommandInterpreter::new(), SceneRegistry::new())
}

fn run(interpreter: &mut CommandInterpreter, scene: &mut SceneRegistry, line: &str) -> String {
    interpreter
        .execute(line, scene)
        .unwrap_or_else(|e| panic!("\"{}\" failed: {}", line, e))
}

fn sphere_radius(scene: &SceneRegistry, name: &str) -> f32 {
    match &scene.get(name).unwrap().shape {
        Shape::Sphere(sphere) => sphere.radius(),
        Shape::Mesh(_) => panic!("{} is not a sphere", name),
    }
}

#[cfg(test)]
mod new_command_tests {
    use super::*;

    #[test]
    fn test_new_sphere_auto_names() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere");
        run(&mut interpreter, &mut scene, "new sphere");
        run(&mut interpreter, &mut scene, "new sphere");

        let names: Vec<_> = scene.iter().map(|o| o.name()).collect();
        assert_eq!(names, vec!["Sphere", "Sphere1", "Sphere2"]);
        assert!(scene.iter().all(|o| o.position() == Vec3::ZERO));
    }

    #[test]
    fn test_new_sphere_fills_lowest_gap() {
        let (mut interpreter, mut scene) = setup();
        for _ in 0..3 {
            run(&mut interpreter, &mut scene, "new sphere");
        }
        scene.remove("Sphere1").unwrap();

        run(&mut interpreter, &mut scene, "new sphere");
        assert!(scene.exists("Sphere1"));
        assert_eq!(scene.len(), 3);
    }

    #[test]
    fn test_new_sphere_with_name_and_position() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo 1 2 3");
        run(&mut interpreter, &mut scene, "new sphere Bar");
        run(&mut interpreter, &mut scene, "new sphere -1 0.5 4");

        assert_eq!(scene.get("Foo").unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.get("Bar").unwrap().position(), Vec3::ZERO);
        assert_eq!(scene.get("Sphere").unwrap().position(), Vec3::new(-1.0, 0.5, 4.0));
        assert_eq!(sphere_radius(&scene, "Foo"), 1.0);
    }

    #[test]
    fn test_new_sphere_rejects_taken_name() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo 1 2 3");

        let result = interpreter.execute("new sphere Foo 4 5 6", &mut scene);
        assert!(matches!(
            result,
            Err(CommandError::Scene(SceneError::DuplicateName(ref name))) if name == "Foo"
        ));
        assert_eq!(scene.get("Foo").unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_new_validation_errors() {
        let (mut interpreter, mut scene) = setup();

        assert!(matches!(interpreter.execute("new", &mut scene), Err(CommandError::Arity { .. })));
        assert!(matches!(interpreter.execute("new cube", &mut scene), Err(CommandError::Parse { .. })));
        // Three tokens are read as a position
        assert!(matches!(
            interpreter.execute("new sphere A 1 2", &mut scene),
            Err(CommandError::Parse { token, .. }) if token == "A"
        ));
        assert!(matches!(
            interpreter.execute("new sphere A 1 2 3 4", &mut scene),
            Err(CommandError::Arity { .. })
        ));
        assert!(matches!(
            interpreter.execute("new sphere A 1 two 3", &mut scene),
            Err(CommandError::Parse { .. })
        ));
        assert!(scene.is_empty(), "Rejected commands must not create objects");
    }
}

#[cfg(test)]
mod target_command_tests {
    use super::*;

    #[test]
    fn test_move_without_selection_fails() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo");

        let result = interpreter.execute("move 1 2 3", &mut scene);
        assert!(matches!(result, Err(CommandError::NoDefaultTarget("move"))));
        assert_eq!(scene.get("Foo").unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn test_move_uses_selection_only() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere A");
        run(&mut interpreter, &mut scene, "new sphere B");
        run(&mut interpreter, &mut scene, "select B");
        run(&mut interpreter, &mut scene, "move 1 2 3");

        assert_eq!(scene.get("B").unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.get("A").unwrap().position(), Vec3::ZERO);
    }

    #[test]
    fn test_move_explicit_target() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo 1 2 3");
        run(&mut interpreter, &mut scene, "move Foo 4 5 6");
        assert_eq!(scene.get("Foo").unwrap().position(), Vec3::new(4.0, 5.0, 6.0));

        assert!(matches!(
            interpreter.execute("move Bar 4 5 6", &mut scene),
            Err(CommandError::TargetNotFound(name)) if name == "Bar"
        ));
        assert!(matches!(
            interpreter.execute("move a Foo 1 2 3", &mut scene),
            Err(CommandError::Arity { .. })
        ));
        assert!(matches!(
            interpreter.execute("move 1 2", &mut scene),
            Err(CommandError::Arity { .. })
        ));
    }

    #[test]
    fn test_move_parse_failure_is_atomic() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo 1 2 3");
        let revision = scene.revision();

        assert!(matches!(
            interpreter.execute("move Foo 7 x 9", &mut scene),
            Err(CommandError::Parse { token, .. }) if token == "x"
        ));
        assert_eq!(scene.get("Foo").unwrap().position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.revision(), revision);
    }

    #[test]
    fn test_move_mesh_translates_vertices() {
        let (mut interpreter, mut scene) = setup();
        let triangle = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 3.0, 0.0),
            Material::default(),
        );
        scene.insert(SceneObject::mesh("Tri", Mesh::new(vec![triangle]))).unwrap();

        run(&mut interpreter, &mut scene, "move Tri 1 1 10");

        match &scene.get("Tri").unwrap().shape {
            Shape::Mesh(mesh) => {
                assert_eq!(mesh.position(), Vec3::new(1.0, 1.0, 10.0));
                assert_eq!(mesh.triangles()[0].v1, Vec3::new(3.0, 0.0, 10.0));
            }
            Shape::Sphere(_) => panic!("expected a mesh"),
        }
    }

    #[test]
    fn test_select_and_deselect() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo");

        assert!(matches!(interpreter.execute("select", &mut scene), Err(CommandError::Arity { .. })));
        assert!(matches!(
            interpreter.execute("select Bar", &mut scene),
            Err(CommandError::TargetNotFound(_))
        ));
        assert_eq!(interpreter.target(), None);

        run(&mut interpreter, &mut scene, "select Foo");
        assert_eq!(interpreter.target(), Some("Foo"));

        run(&mut interpreter, &mut scene, "deselect");
        run(&mut interpreter, &mut scene, "deselect");
        assert_eq!(interpreter.target(), None);
    }

    #[test]
    fn test_delete_clears_default_target() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo");
        run(&mut interpreter, &mut scene, "select Foo");
        run(&mut interpreter, &mut scene, "delete");

        assert!(!scene.exists("Foo"));
        assert_eq!(interpreter.target(), None);
        assert!(matches!(
            interpreter.execute("move 1 2 3", &mut scene),
            Err(CommandError::NoDefaultTarget(_))
        ));
    }

    #[test]
    fn test_delete_other_object_keeps_target() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere A");
        run(&mut interpreter, &mut scene, "new sphere B");
        run(&mut interpreter, &mut scene, "select A");
        run(&mut interpreter, &mut scene, "delete B");

        assert_eq!(interpreter.target(), Some("A"));
    }

    #[test]
    fn test_stale_target_is_dropped() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo");
        run(&mut interpreter, &mut scene, "select Foo");

        // Removed behind the interpreter's back
        scene.remove("Foo").unwrap();
        assert!(matches!(
            interpreter.execute("move 1 2 3", &mut scene),
            Err(CommandError::TargetNotFound(_))
        ));

        interpreter.retain_valid_target(&scene);
        assert_eq!(interpreter.target(), None);
    }

    #[test]
    fn test_duplicate_command() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Sphere2 1 1 1");
        let output = run(&mut interpreter, &mut scene, "duplicate Sphere2");

        assert!(output.contains("\"Sphere\""), "unexpected output: {}", output);
        assert_eq!(scene.get("Sphere").unwrap().position(), Vec3::ONE);
    }

    #[test]
    fn test_resize_validates_before_mutation() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo");
        run(&mut interpreter, &mut scene, "resize Foo 2.5");
        assert_eq!(sphere_radius(&scene, "Foo"), 2.5);

        for line in ["resize Foo 0", "resize Foo -1", "resize Foo big"] {
            assert!(interpreter.execute(line, &mut scene).is_err(), "{} should fail", line);
        }
        assert_eq!(sphere_radius(&scene, "Foo"), 2.5);
    }

    #[test]
    fn test_resize_mesh_to_subnormal_scale_is_rejected() {
        let (mut interpreter, mut scene) = setup();
        let triangle = Triangle::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 3.0, 0.0), Material::default());
        scene.insert(SceneObject::mesh("M", Mesh::new(vec![triangle]))).unwrap();

        assert!(matches!(
            interpreter.execute("resize M 1e-40", &mut scene),
            Err(CommandError::Scene(SceneError::InvalidValue { field: "scale", .. }))
        ));
        run(&mut interpreter, &mut scene, "resize M 1");

        match &scene.get("M").unwrap().shape {
            Shape::Mesh(mesh) => {
                assert_eq!(mesh.scale(), 1.0);
                assert_eq!(mesh.triangles()[0].v1, Vec3::new(3.0, 0.0, 0.0));
                assert!(mesh.triangles().iter().all(|t| t.v0.is_finite() && t.v1.is_finite() && t.v2.is_finite()));
            }
            Shape::Sphere(_) => panic!("expected a mesh"),
        }
    }

    #[test]
    fn test_color_command() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Foo");
        run(&mut interpreter, &mut scene, "select Foo");
        run(&mut interpreter, &mut scene, "color 1 0 0.5");

        match &scene.get("Foo").unwrap().shape {
            Shape::Sphere(sphere) => assert_eq!(sphere.material.base_color, Vec3::new(1.0, 0.0, 0.5)),
            Shape::Mesh(_) => panic!("expected a sphere"),
        }

        assert!(matches!(
            interpreter.execute("color 2 0 0", &mut scene),
            Err(CommandError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_clear_removes_everything() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere A");
        run(&mut interpreter, &mut scene, "new sphere B");
        run(&mut interpreter, &mut scene, "select A");
        run(&mut interpreter, &mut scene, "clear");

        assert!(scene.is_empty());
        assert_eq!(interpreter.target(), None);
    }
}

#[cfg(test)]
mod help_command_tests {
    use super::*;

    #[test]
    fn test_help_lists_commands_in_registration_order() {
        let (mut interpreter, mut scene) = setup();
        let output = run(&mut interpreter, &mut scene, "help");

        let names: Vec<_> = interpreter.command_names().collect();
        assert_eq!(&names[..5], &["select", "deselect", "new", "move", "help"]);
        assert_eq!(output, format!("Commands: {}", names.join(", ")));
    }

    #[test]
    fn test_help_for_single_command() {
        let (mut interpreter, mut scene) = setup();
        let output = run(&mut interpreter, &mut scene, "help move");
        assert!(output.starts_with("move [target] <x> <y> <z>"));

        assert!(matches!(
            interpreter.execute("help fly", &mut scene),
            Err(CommandError::UnknownCommand(name)) if name == "fly"
        ));
        assert!(matches!(
            interpreter.execute("help a b", &mut scene),
            Err(CommandError::Arity { .. })
        ));
    }

    #[test]
    fn test_list_marks_target() {
        let (mut interpreter, mut scene) = setup();
        assert_eq!(run(&mut interpreter, &mut scene, "list"), "The scene is empty");

        run(&mut interpreter, &mut scene, "new sphere A");
        run(&mut interpreter, &mut scene, "new sphere B 1 2 3");
        run(&mut interpreter, &mut scene, "select B");

        let output = run(&mut interpreter, &mut scene, "list");
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "2 objects:");
        assert_eq!(lines[1], "  A (sphere) at (0, 0, 0)");
        assert_eq!(lines[2], "* B (sphere) at (1, 2, 3)");
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use super::*;
    use scene_editor::sync::pack_scene;

    #[test]
    fn test_create_move_remove_pack() {
        let (mut interpreter, mut scene) = setup();
        run(&mut interpreter, &mut scene, "new sphere Keep 9 9 9");
        run(&mut interpreter, &mut scene, "new sphere Foo 1 2 3");
        run(&mut interpreter, &mut scene, "move Foo 4 5 6");
        assert_eq!(scene.get("Foo").unwrap().position(), Vec3::new(4.0, 5.0, 6.0));

        scene.remove("Foo").unwrap();
        assert!(!scene.exists("Foo"));

        let packed = pack_scene(&scene);
        assert_eq!(packed.sphere_bytes().len(), 64);
        assert_eq!(packed.spheres[0].position, [9.0, 9.0, 9.0]);
        assert!(packed.spheres.iter().all(|s| s.position != [4.0, 5.0, 6.0]));
    }
}
