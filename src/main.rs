use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Window, WindowId},
};

use scene_editor::cli::Cli;
use scene_editor::config::EditorConfig;
use scene_editor::frame::{FrameContext, FrameIterator};
use scene_editor::renderer::Renderer;
use scene_editor::session::EditSession;
use scene_editor::ui::EditorUi;

const FPS_UPDATE_INTERVAL: f32 = 1.0;
/// Scroll distance in pixels that counts as one wheel line
const PIXELS_PER_LINE: f32 = 20.0;

struct App {
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    config: EditorConfig,
    show_ui: bool,
    session: EditSession,
    frame: FrameContext,
    frames: FrameIterator,
    ui: EditorUi,
    cursor: Vec2,
    mouse_look: bool,
    modifiers: ModifiersState,
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
}

impl App {
    fn new(cli: &Cli, config: EditorConfig) -> Self {
        let mut session = EditSession::new(config.save_path.clone(), config.console_capacity);

        if cli.load {
            let _ = session.execute("load");
        }
        for path in &cli.imports {
            let _ = session.import_mesh(path);
        }
        for line in &cli.exec {
            let _ = session.execute(line);
        }

        let ui = EditorUi::new(config.console_capacity);
        Self {
            window: None,
            renderer: None,
            frame: FrameContext::from_config(&config),
            config,
            show_ui: !cli.no_ui,
            session,
            frames: FrameIterator::new(),
            ui,
            cursor: Vec2::ZERO,
            mouse_look: false,
            modifiers: ModifiersState::empty(),
            frame_count: 0,
            fps: 0.0,
            fps_update_timer: 0.0,
        }
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            log::trace!("FPS: {:.1}", self.fps);
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }

    /// Ctrl shortcuts; returns true when the key was handled
    fn handle_shortcut(&mut self, key: KeyCode) -> bool {
        if !self.modifiers.control_key() {
            return false;
        }

        let command = match key {
            KeyCode::KeyS => "save",
            KeyCode::KeyL => "load",
            KeyCode::Delete => "clear",
            _ => return false,
        };
        let _ = self.session.execute(command);
        true
    }

    /// Input has already been applied; UI edits come next, then the scene is
    /// uploaded and drawn
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_none() || self.window.is_none() {
            return;
        }

        let info = self.frames.next().unwrap_or_default();
        self.frame.begin(info);
        self.update_fps(info.delta);

        let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) else {
            return;
        };

        let fps = self.fps;
        let show_ui = self.show_ui;
        let ui_output = renderer.run_ui(window, |ctx| {
            if show_ui {
                self.ui.show(ctx, &mut self.session, &mut self.frame, fps);
            }
        });

        self.session.refresh_target();
        renderer.sync_scene(&self.session.scene);

        match renderer.draw(window, &self.frame.to_uniform(), ui_output) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = renderer.size();
                renderer.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {}", e),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(
            Window::default_attributes()
                .with_title("Scene Editor")
                .with_inner_size(winit::dpi::PhysicalSize::new(self.config.width, self.config.height)),
        ) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(window.clone())) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("Failed to initialize renderer: {:#}", e);
                event_loop.exit();
                return;
            }
        };

        let size = renderer.size();
        self.frame.resize(size.width, size.height);
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui handle the event first
        if let (Some(renderer), Some(window)) = (&mut self.renderer, &self.window) {
            if renderer.handle_event(window, &event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
            WindowEvent::KeyboardInput { event, .. } => {
                let shortcut = match event.physical_key {
                    PhysicalKey::Code(key) if event.state.is_pressed() && !event.repeat => {
                        self.handle_shortcut(key)
                    }
                    _ => false,
                };
                // Releases always reach the camera so no key stays held
                let typing = self.renderer.as_ref().is_some_and(Renderer::wants_keyboard);
                if !shortcut && !(typing && event.state.is_pressed()) {
                    self.frame.camera.process_keyboard(&event);
                }
            }
            WindowEvent::Focused(false) => {
                self.frame.camera.stop();
                self.mouse_look = false;
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let over_ui = self.renderer.as_ref().is_some_and(Renderer::wants_pointer);
                match (button, state) {
                    (MouseButton::Left, ElementState::Pressed) if !over_ui => {
                        if self.session.pick(self.cursor, &self.frame).is_none() {
                            info!("Nothing under the cursor");
                        }
                    }
                    (MouseButton::Right, ElementState::Pressed) if !over_ui => self.mouse_look = true,
                    (MouseButton::Right, ElementState::Released) => self.mouse_look = false,
                    _ => {}
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                self.frame.camera.zoom(lines);
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size);
                    let size = renderer.size();
                    self.frame.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.mouse_look {
                self.frame
                    .camera
                    .rotate(Vec2::new(delta.0 as f32, delta.1 as f32));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = EditorConfig::from_cli(&cli)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(&cli, config);

    info!("Scene Editor - WASD/Space/Shift to fly, hold right mouse to look, click to pick, Escape to quit");
    event_loop.run_app(&mut app)?;

    Ok(())
}
