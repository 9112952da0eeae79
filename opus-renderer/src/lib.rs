//! # Opus Canvas Renderer
//!
//! Immediate-mode stroke renderer built on wgpu. Every frame is redrawn from
//! an engine [`FrameSnapshot`]: no pixels are cached between frames.
//!
//! ## Pipeline
//!
//! ```text
//! FrameSnapshot ──▶ vertex generator ──▶ FramePlan ──▶ RenderBackend
//!                   (CPU, testable)      quad +        ├─ wgpu (GPU)
//!                                        sprites       └─ headless (no GPU)
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod error;
pub mod frame;
#[allow(unsafe_code)] // bytemuck derives
pub mod vertex;

pub use backend::headless::{FrameStats, HeadlessBackend};
pub use backend::RenderBackend;
pub use error::{RenderError, RenderResult};
pub use frame::FramePlan;
pub use vertex::{generate_vertices, point_size, step_count, QuadVertex, StrokeVertex};

use opus_core::{FrameSnapshot, Rgba};

/// Configuration for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Preferred backend.
    pub preferred_backend: BackendType,
    /// Color cleared around the canvas.
    pub clear_color: Rgba,
    /// Wait for vertical sync when presenting.
    pub vsync: bool,
    /// Target frames per second for hosts that drive redraws on a timer.
    pub target_fps: u32,
    /// Sprites the GPU vertex buffer holds before its first regrow.
    pub initial_sprite_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::WebGpu,
            clear_color: Rgba::WORKSPACE,
            vsync: true,
            target_fps: 120,
            initial_sprite_capacity: 64 * 1024,
        }
    }
}

impl RendererConfig {
    /// Interval between redraws at the target frame rate.
    #[must_use]
    pub fn frame_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / f64::from(self.target_fps.max(1)))
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// WebGPU via wgpu.
    WebGpu,
    /// No GPU: frames are planned and counted but not drawn.
    Headless,
}

/// The main renderer interface: plans frames and hands them to a backend.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    plan: FramePlan,
    frame_count: u64,
}

impl Renderer {
    /// Wrap an existing backend.
    #[must_use]
    pub fn with_backend(config: RendererConfig, mut backend: Box<dyn RenderBackend>) -> Self {
        backend.set_clear_color(config.clear_color);
        Self {
            config,
            backend,
            plan: FramePlan::empty(),
            frame_count: 0,
        }
    }

    /// A renderer that needs no GPU.
    #[must_use]
    pub fn headless(config: RendererConfig) -> Self {
        Self::with_backend(config, Box::new(HeadlessBackend::default()))
    }

    /// Create the preferred backend for a window.
    ///
    /// # Errors
    ///
    /// Returns an error if the GPU backend is preferred and cannot be set up.
    #[cfg(all(feature = "gpu", not(target_arch = "wasm32")))]
    pub fn for_window(
        config: RendererConfig,
        window: std::sync::Arc<winit::window::Window>,
    ) -> RenderResult<Self> {
        let backend: Box<dyn RenderBackend> = match config.preferred_backend {
            BackendType::WebGpu => {
                Box::new(backend::wgpu::WgpuBackend::from_window(window, &config)?)
            }
            BackendType::Headless => {
                let size = window.inner_size();
                Box::new(HeadlessBackend::new(size.width, size.height))
            }
        };
        Ok(Self::with_backend(config, backend))
    }

    /// Render a frame. With no snapshot (nothing attached) the surface is
    /// still cleared and presented.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&mut self, frame: Option<&FrameSnapshot>) -> RenderResult<()> {
        match frame {
            Some(frame) => self.plan.fill(frame),
            None => self.plan.clear(),
        }
        self.backend.render(&self.plan)?;
        self.frame_count += 1;
        Ok(())
    }

    /// The plan submitted by the last [`Renderer::render`].
    #[must_use]
    pub fn last_plan(&self) -> &FramePlan {
        &self.plan
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface. Zero sizes are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }

    /// Change the color cleared around the canvas.
    pub fn set_clear_color(&mut self, color: Rgba) {
        self.config.clear_color = color;
        self.backend.set_clear_color(color);
    }

    /// Release the presentation surface.
    pub fn drop_surface(&mut self) {
        self.backend.drop_surface();
    }

    /// Whether a presentation surface is attached.
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.backend.has_surface()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opus_core::{CanvasEngine, Vec2};

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert_eq!(config.clear_color, Rgba::WORKSPACE);
        assert_eq!(config.target_fps, 120);
        assert_eq!(config.frame_interval().as_micros(), 8333);
    }

    #[test]
    fn test_headless_renderer_counts_frames() {
        let mut renderer = Renderer::headless(RendererConfig::default());
        assert_eq!(renderer.active_backend(), BackendType::Headless);

        renderer.render(None).expect("empty frame");
        assert!(renderer.last_plan().is_empty());

        let mut engine = CanvasEngine::default();
        engine.begin_stroke(Vec2::new(100.0, 100.0), 1.0);
        renderer.render(Some(&engine.frame())).expect("frame");

        assert_eq!(renderer.frame_count(), 2);
        assert_eq!(renderer.last_plan().sprite_count(), 1);
        assert!(renderer.last_plan().background.is_some());
    }
}
