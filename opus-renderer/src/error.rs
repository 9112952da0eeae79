//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while setting up or driving the renderer.
///
/// Construction failures are fatal: no partially built backend is returned.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No suitable GPU adapter was found.
    #[error("No suitable GPU adapter found")]
    NoAdapter,

    /// GPU device creation failed.
    #[error("GPU initialization failed: {0}")]
    GpuInit(String),

    /// Shader compilation failed.
    #[error("Shader compilation failed: {0}")]
    Shader(String),

    /// Surface/swapchain error.
    #[error("Surface error: {0}")]
    Surface(String),

    /// Rendering a frame failed.
    #[error("Frame render failed: {0}")]
    Frame(String),
}
