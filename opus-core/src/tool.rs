//! Tools and brush settings.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, Rgba};

/// The active canvas tool. Decides where pointer input goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    /// Paint with the brush color.
    #[default]
    Brush,
    /// Paint with the canvas background color.
    Eraser,
    /// Sample a color. Handled outside the engine.
    ColorPicker,
    /// Drag to pan the view.
    Pan,
}

impl Tool {
    /// All tools in toolbar order.
    pub const ALL: [Self; 4] = [Self::Brush, Self::Eraser, Self::ColorPicker, Self::Pan];

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Brush => "Brush",
            Self::Eraser => "Eraser",
            Self::ColorPicker => "Color Pick",
            Self::Pan => "Pan",
        }
    }

    /// Whether pointer input with this tool records strokes.
    #[must_use]
    pub const fn draws(self) -> bool {
        matches!(self, Self::Brush | Self::Eraser)
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tool {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brush" => Ok(Self::Brush),
            "eraser" => Ok(Self::Eraser),
            "color_picker" | "colorpicker" | "picker" => Ok(Self::ColorPicker),
            "pan" | "hand" => Ok(Self::Pan),
            _ => Err(CanvasError::UnknownTool(s.to_string())),
        }
    }
}

/// Brush parameters set from the inspector UI.
///
/// Only `size`, `opacity` and `color` affect recorded strokes; `flow` and
/// `hardness` are stored for the UI and not yet used by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushSettings {
    size: f32,
    opacity: f32,
    flow: f32,
    hardness: f32,
    color: Rgba,
}

impl BrushSettings {
    /// Allowed brush size range in canvas units.
    pub const SIZE_RANGE: (f32, f32) = (1.0, 128.0);
    /// Allowed opacity range.
    pub const OPACITY_RANGE: (f32, f32) = (0.1, 1.0);
    /// Allowed flow range.
    pub const FLOW_RANGE: (f32, f32) = (0.1, 1.0);

    /// Brush size in canvas units.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Opacity multiplier applied to the color's alpha.
    #[must_use]
    pub const fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Paint flow.
    #[must_use]
    pub const fn flow(&self) -> f32 {
        self.flow
    }

    /// Edge hardness.
    #[must_use]
    pub const fn hardness(&self) -> f32 {
        self.hardness
    }

    /// Base color, before opacity.
    #[must_use]
    pub const fn color(&self) -> Rgba {
        self.color
    }

    /// Set the brush size (clamped).
    pub fn set_size(&mut self, size: f32) {
        self.size = clamp_to(size, Self::SIZE_RANGE, self.size);
    }

    /// Set the opacity (clamped).
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = clamp_to(opacity, Self::OPACITY_RANGE, self.opacity);
    }

    /// Set the flow (clamped).
    pub fn set_flow(&mut self, flow: f32) {
        self.flow = clamp_to(flow, Self::FLOW_RANGE, self.flow);
    }

    /// Set the hardness (clamped to `0.0..=1.0`).
    pub fn set_hardness(&mut self, hardness: f32) {
        self.hardness = clamp_to(hardness, (0.0, 1.0), self.hardness);
    }

    /// Set the base color.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color.clamped();
    }

    /// The color strokes are recorded with: base color with opacity applied.
    #[must_use]
    pub fn stroke_color(&self) -> Rgba {
        self.color.with_alpha_scaled(self.opacity)
    }
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            size: 12.0,
            opacity: 0.85,
            flow: 0.9,
            hardness: 0.6,
            color: Rgba::BLUE,
        }
    }
}

fn clamp_to(value: f32, (min, max): (f32, f32), fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}
