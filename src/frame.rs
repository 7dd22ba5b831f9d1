use glam::{UVec2, Vec2};

use crate::camera::Camera;
use crate::config::{EditorConfig, RenderSettings};
use crate::math::Ray;
use crate::picking::camera_ray;
use crate::types::FrameUniform;

/// Frame metadata - carries frame number and timing info
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Infinite iterator that yields frame information
/// Use this in a loop: `for frame in frames { ... }`
pub struct FrameIterator {
    frame_number: u64,
    start_time: std::time::Instant,
    last_frame_time: std::time::Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = std::time::Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = std::time::Instant::now();
        let delta = now.duration_since(self.last_frame_time).as_secs_f32();
        let time = now.duration_since(self.start_time).as_secs_f32();

        let info = FrameInfo::new(self.frame_number, time, delta);

        self.frame_number += 1;
        self.last_frame_time = now;

        Some(info)
    }
}

/// Camera, shader settings and viewport for the frame being built.
///
/// Passed by reference to input handling, picking and the renderer instead
/// of living in globals.
#[derive(Debug, Clone)]
pub struct FrameContext {
    pub camera: Camera,
    pub settings: RenderSettings,
    /// Viewport size in physical pixels
    pub resolution: UVec2,
    pub info: FrameInfo,
}

impl FrameContext {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            camera: Camera::from_config(config),
            settings: config.render,
            resolution: UVec2::new(config.width.max(1), config.height.max(1)),
            info: FrameInfo::default(),
        }
    }

    pub fn begin(&mut self, info: FrameInfo) {
        self.info = info;
        self.camera.update(info.delta);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.resolution = UVec2::new(width.max(1), height.max(1));
    }

    /// Ray the tracer casts through the pixel under `cursor` (origin top-left)
    pub fn cursor_ray(&self, cursor: Vec2) -> Ray {
        camera_ray(
            cursor,
            self.camera.position,
            &self.camera.view_inverse(),
            self.camera.fov,
            self.resolution.as_vec2(),
        )
    }

    pub fn to_uniform(&self) -> FrameUniform {
        FrameUniform {
            view_inverse: self.camera.view_inverse().to_cols_array_2d(),
            camera_position: self.camera.position.to_array(),
            tan_half_fov: (self.camera.fov.to_radians() * 0.5).tan(),
            resolution: self.resolution.as_vec2().to_array(),
            ambient_weight: self.settings.ambient_weight,
            _pad: 0.0,
        }
    }
}
