//! Zoom/pan state and mapping between canvas, view and clip space.
//!
//! ```text
//! canvas space ──(center, scale, translate, re-center)──▶ view space ──▶ clip space
//!  document px                                             surface px      NDC [-1, 1]
//!  top-left origin                                         top-left        bottom-left
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::is_finite;
use crate::{Size, Vec2};

/// Smallest allowed zoom.
pub const MIN_SCALE: f32 = 0.1;
/// Largest allowed zoom.
pub const MAX_SCALE: f32 = 8.0;
/// Auto-fit never zooms in past 100%.
pub const AUTO_FIT_MAX_SCALE: f32 = 1.0;
/// View size change, in pixels, below which auto-fit is not recomputed.
pub const AUTO_FIT_TOLERANCE: f32 = 0.5;

/// Clamp a zoom factor into `MIN_SCALE..=MAX_SCALE`.
#[must_use]
pub fn clamp_scale(scale: f32) -> f32 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Uniform scale plus translation, always replaced as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTransform")]
pub struct CanvasTransform {
    scale: f32,
    translation: Vec2,
}

#[derive(Deserialize)]
struct RawTransform {
    scale: f32,
    translation: Vec2,
}

impl From<RawTransform> for CanvasTransform {
    fn from(raw: RawTransform) -> Self {
        let scale = if raw.scale.is_nan() { 1.0 } else { raw.scale };
        Self::new(scale, raw.translation)
    }
}

impl CanvasTransform {
    /// 100% zoom, no pan.
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        translation: Vec2 { x: 0.0, y: 0.0 },
    };

    /// Create a transform; `scale` is clamped into the allowed range.
    #[must_use]
    pub fn new(scale: f32, translation: Vec2) -> Self {
        Self {
            scale: clamp_scale(scale),
            translation,
        }
    }

    /// Zoom factor.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.scale
    }

    /// Pan offset, applied after scaling.
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        self.translation
    }
}

impl Default for CanvasTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A transform together with the view and canvas sizes it maps between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Zoom and pan.
    pub transform: CanvasTransform,
    /// On-screen surface size.
    pub view_size: Size,
    /// Document size.
    pub canvas_size: Size,
}

impl Projection {
    /// Bundle a transform with the sizes it applies to.
    #[must_use]
    pub const fn new(transform: CanvasTransform, view_size: Size, canvas_size: Size) -> Self {
        Self {
            transform,
            view_size,
            canvas_size,
        }
    }

    /// Map a canvas-space point to view space.
    #[must_use]
    pub fn canvas_to_view(&self, canvas: Vec2) -> Vec2 {
        let centered = canvas - self.canvas_size.half();
        let scaled = centered * self.transform.scale;
        let translated = scaled + self.transform.translation;
        translated + self.view_size.half()
    }

    /// Map a view-space point (e.g. a pointer position) to canvas space.
    #[must_use]
    pub fn view_to_canvas(&self, view: Vec2) -> Vec2 {
        let translated = view - self.view_size.half();
        let scaled = translated - self.transform.translation;
        let centered = scaled * self.transform.scale.recip();
        centered + self.canvas_size.half()
    }

    /// Map a view-space point to clip space. The vertical axis flips.
    #[must_use]
    pub fn view_to_clip(&self, view: Vec2) -> Vec2 {
        let Size { width, height } = self.view_size;
        Vec2::new(
            (view.x / width) * 2.0 - 1.0,
            ((height - view.y) / height) * 2.0 - 1.0,
        )
    }

    /// Map a canvas-space point straight to clip space.
    #[must_use]
    pub fn canvas_to_clip(&self, canvas: Vec2) -> Vec2 {
        self.view_to_clip(self.canvas_to_view(canvas))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FitRecord {
    view_size: Size,
    canvas_size: Size,
}

/// Owns the live canvas transform and the auto-fit policy.
///
/// While auto-fit is enabled, [`ViewTransform::fit_to_view`] scales the
/// canvas to fit the view (never above 100%) and centers it. Any explicit
/// pan or zoom turns auto-fit off until [`ViewTransform::reset`].
#[derive(Debug, Clone)]
pub struct ViewTransform {
    current: CanvasTransform,
    auto_fit: bool,
    last_fit: Option<FitRecord>,
}

impl ViewTransform {
    /// Identity transform with auto-fit enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: CanvasTransform::IDENTITY,
            auto_fit: true,
            last_fit: None,
        }
    }

    /// The transform to render with.
    #[must_use]
    pub const fn current(&self) -> CanvasTransform {
        self.current
    }

    /// Current zoom factor.
    #[must_use]
    pub const fn scale(&self) -> f32 {
        self.current.scale
    }

    /// Current pan offset.
    #[must_use]
    pub const fn translation(&self) -> Vec2 {
        self.current.translation
    }

    /// Whether auto-fit will run on the next frame.
    #[must_use]
    pub const fn is_auto_fit(&self) -> bool {
        self.auto_fit
    }

    /// Set the zoom factor (clamped). Non-finite values are ignored.
    pub fn set_scale(&mut self, scale: f32) {
        self.auto_fit = false;
        if scale.is_nan() {
            return;
        }
        self.current = CanvasTransform::new(scale, self.current.translation);
    }

    /// Set the pan offset. Non-finite offsets are ignored.
    pub fn set_translation(&mut self, translation: Vec2) {
        self.auto_fit = false;
        if !is_finite(translation) {
            return;
        }
        self.current = CanvasTransform::new(self.current.scale, translation);
    }

    /// Pan by a view-space delta.
    pub fn translate_by(&mut self, delta: Vec2) {
        self.set_translation(self.current.translation + delta);
    }

    /// Multiply the zoom factor by `factor` (result clamped).
    pub fn magnify_by(&mut self, factor: f32) {
        if !factor.is_finite() {
            self.auto_fit = false;
            return;
        }
        self.set_scale(self.current.scale * factor);
    }

    /// Back to identity, with auto-fit re-enabled.
    pub fn reset(&mut self) {
        tracing::debug!("View reset, auto-fit enabled");
        *self = Self::new();
    }

    /// Apply the auto-fit policy for the given sizes.
    ///
    /// Does nothing when auto-fit is disabled, or when neither the canvas
    /// nor the view changed (view within [`AUTO_FIT_TOLERANCE`] on both
    /// axes) since the last fit. Returns whether the transform changed.
    pub fn fit_to_view(&mut self, view_size: Size, canvas_size: Size) -> bool {
        if !self.auto_fit {
            return false;
        }

        if let Some(last) = self.last_fit {
            let dw = (last.view_size.width - view_size.width).abs();
            let dh = (last.view_size.height - view_size.height).abs();
            if dw < AUTO_FIT_TOLERANCE
                && dh < AUTO_FIT_TOLERANCE
                && last.canvas_size == canvas_size
            {
                return false;
            }
        }

        let target = (view_size.width / canvas_size.width)
            .min(view_size.height / canvas_size.height)
            .clamp(MIN_SCALE, AUTO_FIT_MAX_SCALE);

        let fitted = CanvasTransform::new(target, Vec2::zero());
        let changed = fitted != self.current;
        self.current = fitted;
        self.last_fit = Some(FitRecord {
            view_size,
            canvas_size,
        });

        if changed {
            tracing::debug!(
                "Auto-fit {}x{} canvas into {}x{} view at scale {target}",
                canvas_size.width,
                canvas_size.height,
                view_size.width,
                view_size.height
            );
        }
        changed
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}
