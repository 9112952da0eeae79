//! Desktop application using winit 0.30 `ApplicationHandler`.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use opus_core::{CanvasEngine, CanvasEvent, PointerEvent, PointerPhase, Size, Vec2};
use opus_renderer::Renderer;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, Touch, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::ModifiersState,
    window::{Window, WindowAttributes, WindowId},
};

use crate::input::{self, TouchTracker};
use crate::DesktopConfig;

/// Desktop canvas application.
///
/// Manages the winit window and renderer lifecycle using the
/// `ApplicationHandler` trait introduced in winit 0.30, and owns the
/// canvas engine that all input is routed into.
pub struct OpusDesktopApp {
    config: DesktopConfig,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    engine: CanvasEngine,
    cursor: Option<Vec2>,
    mouse_down: bool,
    touches: TouchTracker,
    modifiers: ModifiersState,
    next_frame: Instant,
    title_status: String,
}

impl OpusDesktopApp {
    /// Create a new desktop application with the given configuration.
    #[must_use]
    pub fn new(config: DesktopConfig) -> Self {
        let engine = CanvasEngine::new(config.engine_config());
        Self {
            config,
            window: None,
            renderer: None,
            engine,
            cursor: None,
            mouse_down: false,
            touches: TouchTracker::default(),
            modifiers: ModifiersState::empty(),
            next_frame: Instant::now(),
            title_status: String::new(),
        }
    }

    /// The canvas engine.
    #[must_use]
    pub fn engine(&self) -> &CanvasEngine {
        &self.engine
    }

    /// Initialize the renderer with the current window.
    fn init_renderer(&mut self, window: Arc<Window>) -> Result<()> {
        let renderer = Renderer::for_window(self.config.renderer.clone(), Arc::clone(&window))?;
        tracing::info!(
            "Renderer initialized successfully ({:?})",
            renderer.active_backend()
        );

        self.set_view_size(window.inner_size());
        self.renderer = Some(renderer);
        self.window = Some(window);
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)] // Window dimensions fit in f32
    fn set_view_size(&mut self, size: PhysicalSize<u32>) {
        self.engine
            .set_view_size(Size::new(size.width as f32, size.height as f32));
    }

    /// Handle window resize.
    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.set_view_size(size);
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(size.width, size.height) {
                tracing::error!("Failed to resize renderer: {e}");
            }
        }
    }

    /// Render the current canvas.
    fn render(&mut self) {
        let frame = self.engine.frame();
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.render(Some(&frame)) {
                tracing::error!("Render error: {e}");
            }
        }
        self.update_title();
    }

    fn update_title(&mut self) {
        let status = self.engine.status().to_string();
        if status == self.title_status {
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&format!("{} | {status}", self.config.title));
        }
        self.title_status = status;
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn dispatch(&mut self, event: &CanvasEvent) {
        tracing::trace!("Canvas event: {event:?}");
        self.engine.handle(event);
        self.request_redraw();
    }

    #[allow(clippy::cast_possible_truncation)] // Physical pixel positions fit in f32
    fn to_view(position: PhysicalPosition<f64>) -> Vec2 {
        Vec2::new(position.x as f32, position.y as f32)
    }

    fn handle_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        if button != MouseButton::Left {
            return;
        }
        let Some(position) = self.cursor else {
            return;
        };
        let phase = match state {
            ElementState::Pressed => {
                self.mouse_down = true;
                PointerPhase::Down
            }
            ElementState::Released => {
                if !self.mouse_down {
                    return;
                }
                self.mouse_down = false;
                PointerPhase::Up
            }
        };
        self.dispatch(&CanvasEvent::Pointer(PointerEvent::new(phase, position, None)));
    }

    fn handle_cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        let position = Self::to_view(position);
        self.cursor = Some(position);
        if self.mouse_down {
            self.dispatch(&CanvasEvent::Pointer(PointerEvent::new(
                PointerPhase::Move,
                position,
                None,
            )));
        }
    }

    #[allow(clippy::cast_possible_truncation)] // Normalized force is in 0..=1
    fn handle_touch(&mut self, touch: Touch) {
        let Some(phase) = self.touches.track(touch.id, touch.phase) else {
            tracing::trace!("Ignoring touch {} while another is drawing", touch.id);
            return;
        };
        let pressure = touch.force.map(|force| force.normalized() as f32);
        let event = PointerEvent::new(phase, Self::to_view(touch.location), pressure);
        self.dispatch(&CanvasEvent::Pointer(event));
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) {
        tracing::debug!(
            "Creating window with size {}x{}",
            self.config.width,
            self.config.height
        );

        let attrs = WindowAttributes::default()
            .with_title(&self.config.title)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                tracing::debug!("Window created successfully");
                let window = Arc::new(window);
                if let Err(e) = self.init_renderer(window) {
                    tracing::error!("Failed to initialize renderer: {e}");
                    event_loop.exit();
                } else {
                    self.request_redraw();
                }
            }
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                event_loop.exit();
            }
        }
    }
}

impl ApplicationHandler for OpusDesktopApp {
    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!("App suspended - dropping surface to free resources");
        if let Some(renderer) = &mut self.renderer {
            renderer.drop_surface();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        tracing::debug!("ApplicationHandler::resumed called");

        // If we have a window but renderer lost its surface, recreate the renderer
        if let Some(window) = self.window.clone() {
            let surface_lost = self
                .renderer
                .as_ref()
                .is_some_and(|renderer| !renderer.has_surface());
            if surface_lost {
                tracing::info!("Recreating renderer after resume");
                self.renderer = None;
                if let Err(e) = self.init_renderer(window) {
                    tracing::error!("Failed to recreate renderer: {e}");
                    event_loop.exit();
                    return;
                }
                self.request_redraw();
            } else {
                tracing::debug!("Window already exists, skipping creation");
            }
            return;
        }

        self.create_window(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                tracing::debug!("Window resized to {}x{}", size.width, size.height);
                self.handle_resize(size);
                self.request_redraw();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                tracing::info!("Scale factor changed to {scale_factor}");
                let new_size = self.window.as_ref().map(|w| w.inner_size());
                if let Some(size) = new_size {
                    self.handle_resize(size);
                }
                self.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = modifiers.state();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed {
                    if let Some(action) =
                        input::shortcut(&event.logical_key, self.modifiers, self.config.template)
                    {
                        self.dispatch(&action);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_moved(position);
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(state, button);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(action) = input::wheel(delta, self.modifiers) {
                    self.dispatch(&action);
                }
            }
            WindowEvent::PinchGesture { delta, .. } => {
                self.dispatch(&input::pinch(delta));
            }
            WindowEvent::Touch(touch) => {
                self.handle_touch(touch);
            }
            WindowEvent::Focused(false) => {
                self.mouse_down = false;
                self.touches.reset();
                self.dispatch(&input::cancel());
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_frame {
            self.request_redraw();
            self.next_frame = now + self.config.renderer.frame_interval();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}
