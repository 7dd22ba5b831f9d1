use glam::{Mat4, Vec2, Vec3};
use winit::event::KeyEvent;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::config::EditorConfig;

pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 90.0;
const PITCH_LIMIT: f32 = 89.9;

#[derive(Default, Clone, Copy, Debug)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fast: bool,
}

impl MovementState {
    const fn to_direction(&self, positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn velocity(&self) -> (f32, f32, f32) {
        (
            self.to_direction(self.forward, self.backward),
            self.to_direction(self.right, self.left),
            self.to_direction(self.up, self.down),
        )
    }
}

/// Free-flying editor camera
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    /// Radians
    pub yaw: f32,
    /// Radians
    pub pitch: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub movement: MovementState,
}

impl Camera {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            position: Vec3::from_array(config.camera_position),
            yaw: config.camera_yaw,
            pitch: config.camera_pitch,
            fov: config.fov.clamp(MIN_FOV, MAX_FOV),
            speed: config.camera_speed,
            sensitivity: config.mouse_sensitivity,
            movement: MovementState::default(),
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn view_inverse(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    pub fn update(&mut self, delta: f32) {
        let (fwd, right_dir, up_dir) = self.movement.velocity();
        let speed = if self.movement.fast {
            self.speed * 2.0
        } else {
            self.speed
        };

        let displacement = self.forward() * fwd + self.right() * right_dir + Vec3::Y * up_dir;
        self.position += displacement * speed * delta;
    }

    /// Mouse-look from a cursor delta in pixels; sensitivity scales with zoom
    pub fn rotate(&mut self, cursor_delta: Vec2) {
        let degrees = cursor_delta * self.sensitivity * (self.fov / 45.0);

        self.yaw -= degrees.x.to_radians();
        self.pitch = (self.pitch - degrees.y.to_radians())
            .clamp(-PITCH_LIMIT.to_radians(), PITCH_LIMIT.to_radians());
    }

    /// Scroll zoom, narrowing the field of view
    pub fn zoom(&mut self, lines: f32) {
        self.fov = (self.fov - lines).clamp(MIN_FOV, MAX_FOV);
    }

    pub fn process_keyboard(&mut self, event: &KeyEvent) {
        let is_pressed = event.state.is_pressed();
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match keycode {
                KeyCode::KeyW => self.movement.forward = is_pressed,
                KeyCode::KeyS => self.movement.backward = is_pressed,
                KeyCode::KeyA => self.movement.left = is_pressed,
                KeyCode::KeyD => self.movement.right = is_pressed,
                KeyCode::Space => self.movement.up = is_pressed,
                KeyCode::ShiftLeft => self.movement.down = is_pressed,
                KeyCode::ControlLeft => self.movement.fast = is_pressed,
                _ => {}
            }
        }
    }

    pub fn stop(&mut self) {
        self.movement = MovementState::default();
    }
}
