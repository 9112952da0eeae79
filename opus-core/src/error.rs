//! Error types for canvas configuration parsing.
//!
//! Interaction operations never fail; these errors only come from turning
//! user-supplied text (CLI flags, settings) into canvas values.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur while parsing canvas settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CanvasError {
    /// Tool name not recognized.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Canvas template name not recognized.
    #[error("Unknown canvas template: {0}")]
    UnknownTemplate(String),

    /// Color string is not `#rrggbb` or `#rrggbbaa`.
    #[error("Invalid color: {0}")]
    InvalidColor(String),
}
