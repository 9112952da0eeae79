//! Preset canvas sizes offered when starting a new canvas.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CanvasError, Size};

/// A named canvas size preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasTemplate {
    /// 2048 × 2048, 1:1.
    #[default]
    Square,
    /// 1920 × 1080, 16:9.
    Hd,
    /// 3300 × 5100, 11×17 print.
    Poster,
    /// 4096 × 3072, 4:3.
    Concept,
}

impl CanvasTemplate {
    /// All templates in gallery order.
    pub const ALL: [Self; 4] = [Self::Square, Self::Hd, Self::Poster, Self::Concept];

    /// Pixel dimensions.
    #[must_use]
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Square => (2048, 2048),
            Self::Hd => (1920, 1080),
            Self::Poster => (3300, 5100),
            Self::Concept => (4096, 3072),
        }
    }

    /// Canvas size for this template.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Template dimensions fit in f32
    pub fn size(self) -> Size {
        let (width, height) = self.dimensions();
        Size::new(width as f32, height as f32)
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "Square",
            Self::Hd => "HD",
            Self::Poster => "Poster",
            Self::Concept => "Concept",
        }
    }

    /// Short aspect description.
    #[must_use]
    pub const fn aspect(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Hd => "16:9",
            Self::Poster => "11×17",
            Self::Concept => "4:3",
        }
    }
}

impl std::fmt::Display for CanvasTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.dimensions();
        write!(f, "{} ({w} × {h} px)", self.name())
    }
}

impl FromStr for CanvasTemplate {
    type Err = CanvasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CanvasError::UnknownTemplate(s.to_string()))
    }
}
