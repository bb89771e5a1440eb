use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::config::AppConfig;
use crate::math::Mesh;
use crate::renderer::texture::{self, TextureImage};
use crate::renderer::{Camera, GpuState};
use crate::scene::{ScenePreset, SceneDesc};
use crate::ui::{apply_theme, draw_help_overlay};

/// Held movement keys plus mouse motion gathered since the last frame.
#[derive(Debug, Default)]
pub struct InputState {
    forward: bool,
    back: bool,
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    mouse_delta: Vec2,
}

impl InputState {
    /// Returns false for keys that do not move the camera.
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let slot = match key {
            KeyCode::KeyW => &mut self.forward,
            KeyCode::KeyS => &mut self.back,
            KeyCode::KeyA => &mut self.left,
            KeyCode::KeyD => &mut self.right,
            KeyCode::KeyQ => &mut self.up,
            KeyCode::KeyE => &mut self.down,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// (forward, right, up), each in [-1, 1]. Opposing keys cancel.
    pub fn axes(&self) -> (f32, f32, f32) {
        fn axis(positive: bool, negative: bool) -> f32 {
            positive as i8 as f32 - negative as i8 as f32
        }
        (
            axis(self.forward, self.back),
            axis(self.right, self.left),
            axis(self.up, self.down),
        )
    }

    pub fn add_mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta += Vec2::new(dx as f32, dy as f32);
    }

    pub fn take_mouse_delta(&mut self) -> Vec2 {
        std::mem::take(&mut self.mouse_delta)
    }
}

pub fn mouse_button_message(button: MouseButton, state: ElementState) -> &'static str {
    let pressed = state == ElementState::Pressed;
    match (button, pressed) {
        (MouseButton::Left, true) => "Left mouse button pressed",
        (MouseButton::Left, false) => "Left mouse button released",
        (MouseButton::Middle, true) => "Middle mouse button pressed",
        (MouseButton::Middle, false) => "Middle mouse button released",
        (MouseButton::Right, true) => "Right mouse button pressed",
        (MouseButton::Right, false) => "Right mouse button released",
        _ => "Unhandled mouse button event",
    }
}

/// The configured title when set, else the scene's own.
fn window_title(config: &AppConfig, scene: &SceneDesc) -> String {
    config
        .title
        .clone()
        .unwrap_or_else(|| scene.title.to_string())
}

struct App {
    config: AppConfig,
    title: String,
    scene: SceneDesc,
    pending_meshes: Vec<Mesh>,
    pending_textures: Vec<TextureImage>,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    egui_state: Option<egui_winit::State>,
    egui_renderer: Option<egui_wgpu::Renderer>,
    egui_ctx: egui::Context,

    camera: Camera,
    input: InputState,
    last_frame: Instant,

    error: Option<anyhow::Error>,
}

impl App {
    fn new(
        config: AppConfig,
        scene: SceneDesc,
        meshes: Vec<Mesh>,
        textures: Vec<TextureImage>,
    ) -> Self {
        let mut camera = Camera::default();
        camera.set_aspect(config.width as f32, config.height as f32);
        let title = window_title(&config, &scene);

        Self {
            config,
            title,
            scene,
            pending_meshes: meshes,
            pending_textures: textures,

            window: None,
            gpu: None,
            egui_state: None,
            egui_renderer: None,
            egui_ctx: egui::Context::default(),

            camera,
            input: InputState::default(),
            last_frame: Instant::now(),

            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("failed to create window")?,
        );

        let mut gpu = pollster::block_on(GpuState::new(window.clone(), self.config.vsync))?;
        gpu.upload_scene(&self.scene, &self.pending_meshes, &self.pending_textures)?;
        self.pending_meshes.clear();
        self.pending_textures.clear();

        let egui_state = egui_winit::State::new(
            self.egui_ctx.clone(),
            self.egui_ctx.viewport_id(),
            &window,
            Some(window.scale_factor() as f32),
            None,
            Some(2048),
        );

        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.config.format, None, 1, false);

        apply_theme(&self.egui_ctx);
        grab_cursor(&window);

        let size = window.inner_size();
        self.camera.set_aspect(size.width as f32, size.height as f32);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.egui_state = Some(egui_state);
        self.egui_renderer = Some(egui_renderer);
        self.last_frame = Instant::now();

        log::info!("{} ready, {} objects", self.title, self.scene.objects.len());
        Ok(())
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        let (forward, right, up) = self.input.axes();
        self.camera.process_keyboard(forward, right, up, dt);
        self.camera
            .process_mouse_movement(self.input.take_mouse_delta());
    }

    fn render(&mut self) -> anyhow::Result<()> {
        let (Some(window), Some(egui_state)) = (&self.window, &mut self.egui_state) else {
            return Ok(());
        };

        let raw_input = egui_state.take_egui_input(window);

        let title = self.title.as_str();
        let camera = &self.camera;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            draw_help_overlay(ctx, title, camera);
        });

        let Some(gpu) = &mut self.gpu else {
            return Ok(());
        };
        let Some(egui_renderer) = &mut self.egui_renderer else {
            return Ok(());
        };

        egui_state.handle_platform_output(window, full_output.platform_output);

        let Some(output) = gpu.acquire_frame()? else {
            return Ok(());
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.update_globals(&self.camera, &self.scene);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, delta) in full_output.textures_delta.set {
            egui_renderer.update_texture(&gpu.device, &gpu.queue, id, &delta);
        }

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Main Encoder"),
            });

        egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );

        gpu.render_scene(&view, &mut encoder, self.config.clear_color());

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            egui_renderer.render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            egui_renderer.free_texture(&id);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        window.request_redraw();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        let PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        if self.input.set_key(key, pressed) {
            return;
        }

        match key {
            KeyCode::Escape if pressed => event_loop.exit(),
            KeyCode::KeyP if pressed && !event.repeat => {
                self.camera.toggle_projection();
                log::info!("projection: {}", self.camera.projection.label());
            }
            _ => {}
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        if self.error.is_none() {
            self.error = Some(error);
        }
        event_loop.exit();
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));

    if let Err(e) = grabbed {
        log::warn!("could not grab cursor: {e}");
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(egui_state) = &mut self.egui_state {
            if let Some(window) = &self.window {
                let response = egui_state.on_window_event(window, &event);
                if response.consumed {
                    return;
                }
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size);
                    self.camera
                        .set_aspect(size.width as f32, size.height as f32);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),

            WindowEvent::MouseInput { button, state, .. } => {
                log::info!("{}", mouse_button_message(button, state));
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
                };
                self.camera.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = self.render() {
                    self.fail(event_loop, e);
                }
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _: &ActiveEventLoop, _: winit::event::DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.input.add_mouse_motion(delta.0, delta.1);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Builds the scene, generates its geometry, decodes its textures and then
/// runs the window until it is closed. Any startup failure is returned.
pub fn run(preset: ScenePreset, config: AppConfig) -> anyhow::Result<()> {
    let scene = SceneDesc::build(preset).context("invalid scene description")?;

    let meshes: Vec<Mesh> = scene.objects.iter().map(|o| o.shape.mesh()).collect();
    let vertices: usize = meshes.iter().map(Mesh::vertex_count).sum();
    let triangles: usize = meshes.iter().map(Mesh::triangle_count).sum();
    log::info!(
        "generated {} meshes: {vertices} vertices, {triangles} triangles",
        meshes.len()
    );

    let textures = texture::load_all(&config.texture_dir, scene.texture_names())?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, scene, meshes, textures);
    event_loop
        .run_app(&mut app)
        .context("event loop terminated abnormally")?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_keys_cancel() {
        let mut input = InputState::default();
        assert!(input.set_key(KeyCode::KeyW, true));
        assert_eq!(input.axes(), (1.0, 0.0, 0.0));

        input.set_key(KeyCode::KeyS, true);
        assert_eq!(input.axes(), (0.0, 0.0, 0.0));

        input.set_key(KeyCode::KeyW, false);
        assert_eq!(input.axes(), (-1.0, 0.0, 0.0));
    }

    #[test]
    fn q_moves_up_and_e_moves_down() {
        let mut input = InputState::default();
        input.set_key(KeyCode::KeyQ, true);
        assert_eq!(input.axes().2, 1.0);
        input.set_key(KeyCode::KeyQ, false);
        input.set_key(KeyCode::KeyE, true);
        assert_eq!(input.axes().2, -1.0);
    }

    #[test]
    fn strafe_keys_map_to_right_axis() {
        let mut input = InputState::default();
        input.set_key(KeyCode::KeyD, true);
        assert_eq!(input.axes().1, 1.0);
        input.set_key(KeyCode::KeyD, false);
        input.set_key(KeyCode::KeyA, true);
        assert_eq!(input.axes().1, -1.0);
    }

    #[test]
    fn non_movement_keys_are_not_consumed() {
        let mut input = InputState::default();
        assert!(!input.set_key(KeyCode::KeyP, true));
        assert!(!input.set_key(KeyCode::Escape, true));
        assert_eq!(input.axes(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn mouse_motion_accumulates_until_taken() {
        let mut input = InputState::default();
        input.add_mouse_motion(3.0, -1.0);
        input.add_mouse_motion(2.0, 4.0);
        assert_eq!(input.take_mouse_delta(), Vec2::new(5.0, 3.0));
        assert_eq!(input.take_mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn window_title_prefers_config_over_scene() {
        let scene = SceneDesc::build(ScenePreset::Sketch).unwrap();
        assert_eq!(window_title(&AppConfig::default(), &scene), "Solids Sketch");

        let config = AppConfig {
            title: Some("Desk Review".into()),
            ..AppConfig::default()
        };
        assert_eq!(window_title(&config, &scene), "Desk Review");
    }

    #[test]
    fn mouse_button_messages() {
        use ElementState::{Pressed, Released};
        assert_eq!(
            mouse_button_message(MouseButton::Left, Pressed),
            "Left mouse button pressed"
        );
        assert_eq!(
            mouse_button_message(MouseButton::Middle, Released),
            "Middle mouse button released"
        );
        assert_eq!(
            mouse_button_message(MouseButton::Right, Pressed),
            "Right mouse button pressed"
        );
        assert_eq!(
            mouse_button_message(MouseButton::Back, Pressed),
            "Unhandled mouse button event"
        );
    }
}
