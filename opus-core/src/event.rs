//! Input events for canvas interaction.
//!
//! Platform hosts translate their native input into [`CanvasEvent`]s and
//! hand them to [`crate::CanvasEngine::handle`]. Positions are in view space.

use serde::{Deserialize, Serialize};

use crate::{CanvasTemplate, Size, Tool, Vec2};

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button or pen pressed.
    Down,
    /// Pointer dragged while pressed.
    Move,
    /// Button or pen released.
    Up,
    /// Input interrupted (e.g. palm rejection, focus loss).
    Cancel,
}

/// A pointer (mouse, pen or touch) event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase of this event.
    pub phase: PointerPhase,
    /// Position in view space.
    pub position: Vec2,
    /// Pen pressure, if the device reports one.
    pub pressure: Option<f32>,
}

impl PointerEvent {
    /// Create a pointer event.
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Vec2, pressure: Option<f32>) -> Self {
        Self {
            phase,
            position,
            pressure,
        }
    }

    /// Pressure to record. Devices without pressure (or reporting zero)
    /// draw at full pressure.
    #[must_use]
    pub fn effective_pressure(&self) -> f32 {
        match self.pressure {
            Some(p) if p > 0.0 => p,
            _ => 1.0,
        }
    }
}

/// Keyboard or menu commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "snake_case")]
pub enum Command {
    /// Undo the last stroke.
    Undo,
    /// Redo the last undone stroke.
    Redo,
    /// Restore the default view with auto-fit.
    ResetView,
    /// Discard everything and start a fresh canvas from a template.
    NewCanvas(CanvasTemplate),
}

/// All input the canvas engine accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CanvasEvent {
    /// Pointer input, routed by the active tool.
    Pointer(PointerEvent),

    /// Pan gesture (trackpad scroll, wheel).
    Pan {
        /// View-space delta.
        delta: Vec2,
    },

    /// Pinch or wheel zoom.
    Zoom {
        /// Multiplicative zoom factor (1.0 = no change).
        factor: f32,
    },

    /// Keyboard or menu command.
    Command(Command),

    /// Switch the active tool.
    SelectTool(Tool),

    /// Change the document dimensions.
    ResizeCanvas {
        /// New width, if changing.
        width: Option<f32>,
        /// New height, if changing.
        height: Option<f32>,
    },

    /// The on-screen surface changed size.
    ViewResized(Size),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_pressure_defaults_to_full() {
        let mouse = PointerEvent::new(PointerPhase::Down, Vec2::zero(), None);
        assert!((mouse.effective_pressure() - 1.0).abs() < f32::EPSILON);

        let idle_pen = PointerEvent::new(PointerPhase::Move, Vec2::zero(), Some(0.0));
        assert!((idle_pen.effective_pressure() - 1.0).abs() < f32::EPSILON);

        let pen = PointerEvent::new(PointerPhase::Move, Vec2::zero(), Some(0.4));
        assert!((pen.effective_pressure() - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn test_event_json_shape() {
        let event = CanvasEvent::Command(Command::Undo);
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "Command");
        assert_eq!(json["data"]["command"], "undo");
    }
}
