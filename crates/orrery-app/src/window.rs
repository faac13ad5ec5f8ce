//! Window creation and event handling via winit.
//!
//! Provides [`AppState`] which implements winit's [`ApplicationHandler`] trait,
//! and a [`run`] function to start the event loop. Each `RedrawRequested`
//! runs one simulation tick and one rendered frame, then asks for the next
//! redraw. `]` and `[` double and halve the speedup factor.

use std::sync::Arc;

use orrery_config::Config;
use orrery_input::{MouseState, OrbitControls};
use orrery_render::{
    RenderContext, SceneRenderer, SurfaceError, SurfaceWrapper, init_render_context_blocking,
};
use orrery_scene::{Camera, SceneDescription, SceneGraph};
use orrery_sim::{OrbitLoop, SimulationContext};
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::settings;
use crate::stats::FrameStats;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
        .with_fullscreen(
            config
                .window
                .fullscreen
                .then_some(Fullscreen::Borderless(None)),
        )
}

/// The speedup factor after pressing `key`, if `key` changes it.
fn speedup_for_key(key: KeyCode, current: f64) -> Option<f64> {
    match key {
        KeyCode::BracketRight | KeyCode::Equal => Some(current * 2.0),
        KeyCode::BracketLeft | KeyCode::Minus => Some(current * 0.5),
        _ => None,
    }
}

/// Everything that exists once the window and GPU are up.
struct SceneState {
    graph: SceneGraph,
    camera: Camera,
    controls: OrbitControls,
    simulation: SimulationContext,
    renderer: SceneRenderer,
}

impl SceneState {
    fn build(config: &Config, gpu: &RenderContext, aspect_ratio: f32) -> Result<Self, AppError> {
        let kind = settings::scene_kind(config.scene.kind);
        let description =
            SceneDescription::build(kind, &settings::scene_settings(&config.scene, aspect_ratio));
        let simulation = settings::simulation_context(
            kind,
            settings::simulation_params(&config.simulation),
        )?;

        let mut graph = SceneGraph::new(&description);
        graph.sync(&simulation.snapshot());

        let controls = OrbitControls::from_camera(
            &description.camera,
            description.camera_target,
            settings::controls_settings(&config.camera),
        );
        let renderer = SceneRenderer::new(gpu, &graph, &config.assets.dir);

        info!(
            ?kind,
            bodies = simulation.bodies().len(),
            asset_dir = %config.assets.dir.display(),
            "Scene ready"
        );

        Ok(Self {
            graph,
            camera: description.camera,
            controls,
            simulation,
            renderer,
        })
    }
}

/// Application state: window, GPU context, scene and input.
pub struct AppState {
    pub config: Config,
    pub window: Option<Arc<Window>>,
    pub gpu: Option<RenderContext>,
    /// Cross-platform surface wrapper that normalizes resize/DPI behavior.
    pub surface_wrapper: SurfaceWrapper,
    pub mouse_state: MouseState,
    pub orbit_loop: OrbitLoop,
    frame_stats: FrameStats,
    scene: Option<SceneState>,
}

impl AppState {
    pub fn with_config(config: Config) -> Self {
        let surface_wrapper = SurfaceWrapper::new(config.window.width, config.window.height, 1.0);
        Self {
            config,
            window: None,
            gpu: None,
            surface_wrapper,
            mouse_state: MouseState::new(),
            orbit_loop: OrbitLoop::new(),
            frame_stats: FrameStats::default(),
            scene: None,
        }
    }

    fn apply_resize(&mut self, width: u32, height: u32) {
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(scene) = &mut self.scene {
                scene.camera.set_aspect_ratio(width as f32, height as f32);
                scene.renderer.resize(&gpu.device, width, height);
            }
        }
    }

    fn change_speedup(&mut self, key: KeyCode) {
        let Some(scene) = &mut self.scene else {
            return;
        };
        let current = scene.simulation.params().speedup_factor;
        let Some(next) = speedup_for_key(key, current) else {
            return;
        };
        match scene.simulation.set_speedup_factor(next) {
            Ok(()) => info!(
                speedup = next,
                integration = ?scene.simulation.params().integration,
                "Speedup changed"
            ),
            Err(e) => warn!("Speedup unchanged: {e}"),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(scene)) = (&self.gpu, &mut self.scene) else {
            return;
        };

        // Input moves only the camera; the simulation never sees it.
        scene.controls.update(&self.mouse_state);
        scene.controls.apply(&mut scene.camera);
        self.mouse_state.clear_transients();

        let log_frame_stats = self.config.debug.log_frame_stats;
        let frame_stats = &mut self.frame_stats;
        let SceneState {
            graph,
            camera,
            simulation,
            renderer,
            ..
        } = scene;
        let mut outcome = Ok(());

        self.orbit_loop.tick(
            simulation,
            |_, frame| {
                if log_frame_stats && let Some(report) = frame_stats.record(frame.delta_seconds) {
                    info!(
                        fps = format_args!("{:.1}", report.fps),
                        frame_ms = format_args!("{:.2}", report.average_frame_ms),
                        frames = report.frames,
                        "Frame stats"
                    );
                }
            },
            |context| {
                graph.sync(&context.snapshot());
                outcome = renderer.render(gpu, graph, camera);
            },
        );

        match outcome {
            Ok(()) => {}
            Err(SurfaceError::Lost) => {
                let size = self.surface_wrapper.physical_size();
                warn!("Surface lost, reconfiguring");
                self.apply_resize(size.width, size.height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, shutting down");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => warn!("Surface timeout, skipping frame"),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let scale_factor = window.scale_factor();
        let inner_size = window.inner_size();
        self.surface_wrapper =
            SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
        info!(
            "Surface wrapper initialized: {}x{} (scale: {:.2})",
            inner_size.width, inner_size.height, scale_factor
        );

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let aspect_ratio = self.surface_wrapper.physical_size().aspect_ratio();
        match SceneState::build(&self.config, &gpu, aspect_ratio) {
            Ok(scene) => self.scene = Some(scene),
            Err(e) => {
                error!("Scene setup failed: {e}");
                event_loop.exit();
                return;
            }
        }

        self.gpu = Some(gpu);
        // Time spent on setup is not simulation time.
        self.orbit_loop.resync();
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(resize) = self
                    .surface_wrapper
                    .handle_resize(new_size.width, new_size.height)
                {
                    let (w, h) = (resize.physical.width, resize.physical.height);
                    self.apply_resize(w, h);
                    info!(
                        "Window resized to {}x{} (scale: {:.2})",
                        w, h, resize.scale_factor
                    );
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let Some(new_inner) = self.window.as_ref().map(|w| w.inner_size()) else {
                    return;
                };
                if let Some(resize) = self.surface_wrapper.handle_scale_factor_changed(
                    scale_factor,
                    new_inner.width,
                    new_inner.height,
                ) {
                    let (w, h) = (resize.physical.width, resize.physical.height);
                    self.apply_resize(w, h);
                    info!(
                        "Scale factor changed to {:.2}, resized to {}x{}",
                        scale_factor, w, h
                    );
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && let PhysicalKey::Code(key) = event.physical_key
                {
                    self.change_speedup(key);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_state.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_state.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse_state.on_scroll(delta);
            }
            WindowEvent::CursorEntered { .. } => {
                self.mouse_state.on_cursor_entered();
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_state.on_cursor_left();
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Creates an event loop and runs the application with the given config.
///
/// Blocks until the window is closed.
///
/// # Errors
///
/// Returns [`AppError::EventLoop`] if the event loop cannot be created or
/// fails while running.
#[instrument(skip(config))]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = AppState::with_config(config);
    event_loop.run_app(&mut app)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.title = "Test Orrery".to_string();
        config.window.width = 800;
        config.window.height = 600;

        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Test Orrery");
        assert_eq!(
            attrs.inner_size,
            Some(winit::dpi::Size::Logical(winit::dpi::LogicalSize::new(
                800.0, 600.0
            )))
        );
        assert!(attrs.fullscreen.is_none());
    }

    #[test]
    fn test_fullscreen_is_borderless() {
        let mut config = Config::default();
        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.fullscreen, Some(Fullscreen::Borderless(None)));
    }

    #[test]
    fn test_app_state_starts_without_window() {
        let app = AppState::with_config(Config::default());
        assert!(app.window.is_none());
        assert!(app.gpu.is_none());
        assert!(app.scene.is_none());
        assert_eq!(app.surface_wrapper.physical_size().width, 1280);
        assert_eq!(app.orbit_loop.frame_count(), 0);
    }

    #[test]
    fn test_bracket_keys_scale_speedup() {
        assert_eq!(speedup_for_key(KeyCode::BracketRight, 0.1), Some(0.2));
        assert_eq!(speedup_for_key(KeyCode::Equal, 0.1), Some(0.2));
        assert_eq!(speedup_for_key(KeyCode::BracketLeft, 0.1), Some(0.05));
        assert_eq!(speedup_for_key(KeyCode::Minus, 0.1), Some(0.05));
        assert_eq!(speedup_for_key(KeyCode::KeyW, 0.1), None);
    }

    #[test]
    fn test_speedup_key_without_scene_is_ignored() {
        let mut app = AppState::with_config(Config::default());
        app.change_speedup(KeyCode::BracketRight);
        assert!(app.scene.is_none());
    }
}
