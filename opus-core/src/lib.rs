//! # Opus Canvas Core
//!
//! Stroke model, undo/redo state machine and view transform for the Opus
//! drawing canvas. Nothing here touches the GPU; the renderer consumes the
//! [`FrameSnapshot`]s this crate produces.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               CanvasEngine                  │
//! │   (interaction contract, tool routing)      │
//! ├──────────────────────┬──────────────────────┤
//! │  StrokeDocument      │  ViewTransform       │
//! │  - committed strokes │  - scale / pan       │
//! │  - in-progress       │  - auto-fit          │
//! │  - redo stack        │  - canvas/view/clip  │
//! └──────────────────────┴──────────────────────┘
//!                  │ frame()
//!                  ▼
//!            FrameSnapshot ──▶ renderer
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod document;
pub mod engine;
pub mod error;
pub mod event;
pub mod geometry;
pub mod stroke;
pub mod template;
pub mod tool;
pub mod transform;

pub use color::Rgba;
pub use document::{DocumentPhase, StrokeDocument, StrokeSnapshot, MIN_POINT_SPACING};
pub use engine::{CanvasEngine, EngineConfig, FrameSnapshot, ViewStatus};
pub use error::{CanvasError, CanvasResult};
pub use event::{CanvasEvent, Command, PointerEvent, PointerPhase};
pub use geometry::{Size, Vec2};
pub use stroke::{Stroke, StrokeId, StrokePoint};
pub use template::CanvasTemplate;
pub use tool::{BrushSettings, Tool};
pub use transform::{CanvasTransform, Projection, ViewTransform, MAX_SCALE, MIN_SCALE};

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
