use std::collections::VecDeque;

use egui::{Color32, RichText};
use glam::Vec3;

use crate::camera::{MAX_FOV, MIN_FOV};
use crate::frame::FrameContext;
use crate::scene::{Material, SceneObject, Shape};
use crate::session::{EditSession, LineKind};

const HEADING: Color32 = Color32::from_rgb(74, 158, 255);
const ERROR: Color32 = Color32::from_rgb(255, 100, 100);
const INPUT: Color32 = Color32::from_rgb(150, 150, 255);

/// Editable copy of the selected object's properties
#[derive(Debug, Clone, Copy, PartialEq)]
struct Inspected {
    position: Vec3,
    size: f32,
    material: Material,
}

impl Inspected {
    fn from_object(object: &SceneObject) -> Self {
        // A mesh shows its first triangle's material; edits go to every triangle
        let material = match &object.shape {
            Shape::Sphere(sphere) => sphere.material,
            Shape::Mesh(mesh) => mesh.triangles().first().map(|t| t.material).unwrap_or_default(),
        };

        Self {
            position: object.position(),
            size: object.size(),
            material,
        }
    }
}

/// egui panels of the editor: scene list, inspector, render settings and console
pub struct EditorUi {
    command_line: String,
    /// Submitted command lines, oldest first, at most `history_limit`
    history: VecDeque<String>,
    history_limit: usize,
    history_cursor: Option<usize>,
}

impl EditorUi {
    pub fn new(history_limit: usize) -> Self {
        Self {
            command_line: String::new(),
            history: VecDeque::new(),
            history_limit: history_limit.max(1),
            history_cursor: None,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, session: &mut EditSession, frame: &mut FrameContext, fps: f32) {
        self.scene_panel(ctx, session);
        self.inspector_panel(ctx, session);
        self.settings_panel(ctx, frame, fps);
        self.console_panel(ctx, session);
    }

    fn scene_panel(&mut self, ctx: &egui::Context, session: &mut EditSession) {
        egui::Window::new("Scene")
            .default_pos(egui::pos2(10.0, 10.0))
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.label(RichText::new(format!("{} objects", session.scene.len())).color(HEADING));

                let mut clicked = None;
                egui::ScrollArea::vertical()
                    .id_salt("scene_objects")
                    .max_height(240.0)
                    .show(ui, |ui| {
                        for object in session.scene.iter() {
                            let selected = session.target() == Some(object.name());
                            let label = format!("{} ({})", object.name(), object.kind());
                            if ui.selectable_label(selected, label).clicked() {
                                clicked = Some(object.name().to_string());
                            }
                        }
                    });

                if let Some(name) = clicked {
                    // The name came from the registry this frame
                    let _ = session.select(&name);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("New sphere").clicked() {
                        let _ = session.execute("new sphere");
                    }
                    if ui.button("Deselect").clicked() {
                        let _ = session.execute("deselect");
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        let _ = session.execute("save");
                    }
                    if ui.button("Load").clicked() {
                        let _ = session.execute("load");
                    }
                    if ui.button("Clear").clicked() {
                        let _ = session.execute("clear");
                    }
                });
            });
    }

    fn inspector_panel(&mut self, ctx: &egui::Context, session: &mut EditSession) {
        let Some(name) = session.target().map(str::to_string) else {
            return;
        };
        let Ok(object) = session.scene.get(&name) else {
            return;
        };

        let kind = object.kind();
        let is_sphere = matches!(object.shape, Shape::Sphere(_));
        let original = Inspected::from_object(object);
        let mut edited = original;
        let mut delete = false;
        let mut duplicate = false;

        egui::Window::new("Inspector")
            .default_pos(egui::pos2(10.0, 380.0))
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.label(RichText::new(&name).size(16.0).color(HEADING));
                ui.label(kind);
                ui.separator();

                ui.horizontal(|ui| {
                    ui.label("Position");
                    ui.add(egui::DragValue::new(&mut edited.position.x).speed(0.05).prefix("x "));
                    ui.add(egui::DragValue::new(&mut edited.position.y).speed(0.05).prefix("y "));
                    ui.add(egui::DragValue::new(&mut edited.position.z).speed(0.05).prefix("z "));
                });
                ui.horizontal(|ui| {
                    ui.label(if is_sphere { "Radius" } else { "Scale" });
                    ui.add(
                        egui::DragValue::new(&mut edited.size)
                            .speed(0.01)
                            .range(0.01..=f32::MAX),
                    );
                });

                ui.separator();
                let material = &mut edited.material;
                ui.horizontal(|ui| {
                    ui.label("Color");
                    let mut rgb = material.base_color.to_array();
                    if ui.color_edit_button_rgb(&mut rgb).changed() {
                        material.base_color = Vec3::from_array(rgb);
                    }
                });
                ui.horizontal(|ui| {
                    ui.label("Emission");
                    let mut rgb = material.emission_color.to_array();
                    if ui.color_edit_button_rgb(&mut rgb).changed() {
                        material.emission_color = Vec3::from_array(rgb);
                    }
                });
                ui.add(egui::Slider::new(&mut material.emission_strength, 0.0..=20.0).text("Strength"));
                ui.add(egui::Slider::new(&mut material.smoothness, 0.0..=1.0).text("Smoothness"));
                ui.add(egui::Slider::new(&mut material.glossiness, 0.0..=1.0).text("Glossiness"));

                ui.separator();
                ui.horizontal(|ui| {
                    duplicate = ui.button("Duplicate").clicked();
                    delete = ui.button("Delete").clicked();
                });
            });

        if edited != original {
            apply_edit(session, &name, &original, &edited);
        }
        if duplicate {
            let _ = session.execute(&format!("duplicate {}", name));
        }
        if delete {
            let _ = session.execute(&format!("delete {}", name));
        }
    }

    fn settings_panel(&mut self, ctx: &egui::Context, frame: &mut FrameContext, fps: f32) {
        egui::Window::new("Render")
            .default_pos(egui::pos2(frame.resolution.x as f32 - 260.0, 10.0))
            .default_width(240.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new(format!("{:.0} FPS", fps)).color(HEADING));

                let camera = &mut frame.camera;
                ui.monospace(format!(
                    "Pos: ({:.2}, {:.2}, {:.2})",
                    camera.position.x, camera.position.y, camera.position.z
                ));
                ui.monospace(format!(
                    "Yaw: {:.1}° Pitch: {:.1}°",
                    camera.yaw.to_degrees(),
                    camera.pitch.to_degrees()
                ));
                ui.add(egui::Slider::new(&mut camera.fov, MIN_FOV..=MAX_FOV).text("FOV"));
                ui.add(egui::Slider::new(&mut camera.speed, 0.5..=50.0).text("Speed"));

                ui.separator();
                let settings = &mut frame.settings;
                ui.add(egui::Slider::new(&mut settings.ambient_weight, 0.0..=1.0).text("Ambient"));
            });
    }

    fn console_panel(&mut self, ctx: &egui::Context, session: &mut EditSession) {
        egui::TopBottomPanel::bottom("console")
            .resizable(true)
            .default_height(160.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("console_lines")
                    .stick_to_bottom(true)
                    .auto_shrink([false, true])
                    .max_height(ui.available_height() - 28.0)
                    .show(ui, |ui| {
                        for line in session.console().lines() {
                            let stamp = line.time.format("%H:%M:%S");
                            let text = format!("[{}] {}", stamp, line.text);
                            match line.kind {
                                LineKind::Input => ui.colored_label(INPUT, text),
                                LineKind::Output => ui.monospace(text),
                                LineKind::Error => ui.colored_label(ERROR, text),
                            };
                        }
                    });

                ui.separator();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut self.command_line)
                        .hint_text("type a command, \"help\" lists them")
                        .desired_width(f32::INFINITY)
                        .font(egui::TextStyle::Monospace),
                );

                if response.has_focus() {
                    self.browse_history(ui);
                }

                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    let line = std::mem::take(&mut self.command_line);
                    if !line.trim().is_empty() {
                        let _ = session.execute(&line);
                        self.push_history(line);
                    }
                    response.request_focus();
                }
            });
    }

    fn push_history(&mut self, line: String) {
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(line);
        self.history_cursor = None;
    }

    fn browse_history(&mut self, ui: &egui::Ui) {
        if self.history.is_empty() {
            return;
        }

        let (up, down) = ui.input(|i| (i.key_pressed(egui::Key::ArrowUp), i.key_pressed(egui::Key::ArrowDown)));
        let last = self.history.len() - 1;

        if up {
            let cursor = self.history_cursor.map_or(last, |c| c.saturating_sub(1));
            self.history_cursor = Some(cursor);
            self.command_line = self.history[cursor].clone();
        } else if down {
            match self.history_cursor {
                Some(c) if c < last => {
                    self.history_cursor = Some(c + 1);
                    self.command_line = self.history[c + 1].clone();
                }
                Some(_) => {
                    self.history_cursor = None;
                    self.command_line.clear();
                }
                None => {}
            }
        }
    }
}

/// Writes the changed inspector fields back; untouched fields are left alone
/// so per-triangle mesh materials survive an edit to one property
fn apply_edit(session: &mut EditSession, name: &str, original: &Inspected, edited: &Inspected) {
    let Ok(object) = session.scene.get_mut(name) else {
        return;
    };

    if edited.position != original.position {
        object.move_to(edited.position);
    }
    if edited.size != original.size {
        if let Err(error) = object.set_size(edited.size) {
            log::warn!("Inspector edit of \"{}\" rejected: {}", name, error);
        }
    }

    let (old, new) = (original.material, edited.material);
    if new != old {
        object.edit_materials(|material| {
            if new.base_color != old.base_color {
                material.base_color = new.base_color;
            }
            if new.emission_color != old.emission_color {
                material.emission_color = new.emission_color;
            }
            if new.emission_strength != old.emission_strength {
                material.emission_strength = new.emission_strength;
            }
            if new.smoothness != old.smoothness {
                material.smoothness = new.smoothness;
            }
            if new.glossiness != old.glossiness {
                material.glossiness = new.glossiness;
            }
        });
    }
}
