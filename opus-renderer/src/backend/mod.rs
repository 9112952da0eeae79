//! Rendering backend implementations.

pub mod headless;
#[cfg(all(feature = "gpu", not(target_arch = "wasm32")))]
pub mod wgpu;

use opus_core::Rgba;

use crate::{BackendType, FramePlan, RenderResult};

/// Trait for rendering backends.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Draw a planned frame and present it.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, plan: &FramePlan) -> RenderResult<()>;

    /// Resize the rendering surface. Zero-sized requests are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Change the color cleared around the canvas.
    fn set_clear_color(&mut self, color: Rgba);

    /// Release the presentation surface (e.g. when the app is suspended).
    fn drop_surface(&mut self) {}

    /// Whether a presentation surface is attached.
    fn has_surface(&self) -> bool {
        true
    }
}
