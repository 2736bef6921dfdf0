//! Window, event loop and frame driver.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::animation::AnimationDriver;
use crate::error::AppError;
use crate::gpu::{EguiIntegration, GpuPointCloud, GpuState, OrbitCamera};
use crate::panel::{PanelEvent, ParameterPanel};
use crate::params::GalaxyParams;
use crate::scene::{FieldId, SceneComposer};
use crate::textures::{SpriteTexture, DEFAULT_SPRITE_PATH};

/// Level for the initial generation of each field.
const STARTUP_LOG_LEVEL: log::Level = log::Level::Info;
/// Level for panel-driven regeneration, which can fire every frame while a
/// color picker is dragged.
const PANEL_LOG_LEVEL: log::Level = log::Level::Debug;

/// Open the viewer and block until the window closes.
pub fn run(params: GalaxyParams) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(params);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub struct App {
    params: GalaxyParams,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    egui: Option<EguiIntegration>,
    scene: SceneComposer<GpuPointCloud>,
    camera: OrbitCamera,
    animation: AnimationDriver,
    panel: ParameterPanel,
    rng: SmallRng,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    error: Option<AppError>,
}

impl App {
    pub fn new(params: GalaxyParams) -> Self {
        Self {
            params,
            window: None,
            gpu_state: None,
            egui: None,
            scene: SceneComposer::new(),
            camera: OrbitCamera::default(),
            animation: AnimationDriver::new(),
            panel: ParameterPanel::new(),
            rng: SmallRng::from_entropy(),
            mouse_pressed: false,
            last_mouse_pos: None,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title("Galaxy Generator")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let sprite = SpriteTexture::load_or_default(DEFAULT_SPRITE_PATH);
        let gpu_state = pollster::block_on(GpuState::new(window.clone(), &sprite))?;
        let egui = EguiIntegration::new(gpu_state.device(), gpu_state.format(), &window);

        let (width, height) = gpu_state.size();
        self.camera.set_viewport(width, height);

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        self.egui = Some(egui);

        if let Err(e) = self.params.validate() {
            log::warn!("Starting with invalid parameters ({}), clamping", e);
            self.params = self.params.clamped();
        }
        for field in FieldId::ALL {
            self.regenerate(field, STARTUP_LOG_LEVEL);
        }
        Ok(())
    }

    fn regenerate(&mut self, field: FieldId, level: log::Level) {
        let Some(gpu_state) = self.gpu_state.as_mut() else {
            return;
        };
        match self
            .scene
            .regenerate(gpu_state, field, &self.params, &mut self.rng)
        {
            Ok(()) => log::log!(
                level,
                "Generated {} ({} particles)",
                field.label(),
                self.scene.get(field).map_or(0, |r| r.particles())
            ),
            Err(e) => log::error!("Keeping previous {}: {}", field.label(), e),
        }
    }

    fn handle_panel_event(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::Regenerate(field) => self.regenerate(field, PANEL_LOG_LEVEL),
            PanelEvent::Restyle => {
                for field in FieldId::ALL {
                    self.scene.restyle(field, &self.params);
                }
            }
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };

        self.animation.frame(&self.params, &mut self.scene);
        self.camera.update();

        let fps = self.animation.clock().fps();
        let (events, frame) = match self.egui.as_mut() {
            Some(egui) => {
                let panel = &mut self.panel;
                let params = &mut self.params;
                let mut events = Vec::new();
                let frame = egui.run(&window, |ctx| {
                    events = panel.show(ctx, params, fps);
                });
                (events, Some(frame))
            }
            None => (Vec::new(), None),
        };
        // Regenerate before painting so the new clouds show this frame
        for event in events {
            self.handle_panel_event(event);
        }

        let Some(gpu_state) = self.gpu_state.as_mut() else {
            return;
        };
        let ui = self.egui.as_mut().zip(frame);
        match gpu_state.render(&self.scene, &self.camera, ui) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }

        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("{}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (self.egui.as_mut(), self.window.as_ref()) {
            (Some(egui), Some(window)) => egui.on_window_event(window, &event),
            _ => false,
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
                self.camera
                    .set_viewport(physical_size.width, physical_size.height);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    let over_ui = self.egui.as_ref().is_some_and(EguiIntegration::wants_pointer);
                    self.mouse_pressed = state == ElementState::Pressed && !consumed && !over_ui;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        self.camera.rotate(dx, dy);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } if !consumed => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.camera.zoom(scroll * 0.3);
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu_state) = self.gpu_state.as_mut() {
            self.scene.clear(gpu_state);
        }
    }
}
