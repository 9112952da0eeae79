//! 2D math shared by the document, transform and renderer.
//!
//! Vectors come from `ultraviolet`; only [`Size`], which carries the canvas
//! clamping rules, is defined here.

use serde::{Deserialize, Serialize};
pub use ultraviolet::Vec2;
use ultraviolet::Lerp;

/// Distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).mag()
}

/// Point `t` of the way from `a` to `b`.
#[must_use]
pub fn lerp(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a.lerp(b, t)
}

/// Whether both components are finite.
#[must_use]
pub fn is_finite(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// Width and height of a canvas or view, each at least one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSize")]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

#[derive(Deserialize)]
struct RawSize {
    width: f32,
    height: f32,
}

impl From<RawSize> for Size {
    fn from(raw: RawSize) -> Self {
        Self::new(raw.width, raw.height)
    }
}

impl Size {
    /// Smallest allowed extent on either axis.
    pub const MIN_EXTENT: f32 = 1.0;

    /// Create a size, clamping each axis to at least [`Self::MIN_EXTENT`].
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_extent(width),
            height: clamp_extent(height),
        }
    }

    /// Half of the size as a vector (the center offset).
    #[must_use]
    pub fn half(self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Replace either axis, keeping the other. Values are clamped.
    #[must_use]
    pub fn with(self, width: Option<f32>, height: Option<f32>) -> Self {
        Self::new(width.unwrap_or(self.width), height.unwrap_or(self.height))
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(Self::MIN_EXTENT, Self::MIN_EXTENT)
    }
}

/// NaN has no nearest valid value, so it falls to the minimum.
fn clamp_extent(value: f32) -> f32 {
    if value.is_nan() {
        Size::MIN_EXTENT
    } else {
        value.max(Size::MIN_EXTENT)
    }
}
