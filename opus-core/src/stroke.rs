//! Strokes - the recorded brush paths that make up a document.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Rgba, Vec2};

/// Unique identifier for a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrokeId(Uuid);

impl StrokeId {
    /// Create a new unique stroke ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for StrokeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StrokeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single sampled point along a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    /// Position in canvas space.
    pub position: Vec2,
    /// Pen pressure in `0.0..=1.0`.
    pub pressure: f32,
    /// Seconds since the owning document was created.
    pub timestamp: f64,
}

impl StrokePoint {
    /// Create a point, clamping pressure into `0.0..=1.0`.
    ///
    /// A NaN pressure is read as "no pressure data" and becomes full pressure.
    #[must_use]
    pub fn new(position: Vec2, pressure: f32, timestamp: f64) -> Self {
        let pressure = if pressure.is_nan() {
            1.0
        } else {
            pressure.clamp(0.0, 1.0)
        };
        Self {
            position,
            pressure,
            timestamp,
        }
    }
}

/// A brush stroke: an ordered run of points sharing one color and width.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stroke {
    /// Unique identifier.
    pub id: StrokeId,
    points: Vec<StrokePoint>,
    /// Stroke color.
    pub color: Rgba,
    /// Width in canvas units at full pressure.
    pub base_width: f32,
}

impl Stroke {
    /// Smallest allowed base width.
    pub const MIN_WIDTH: f32 = 0.1;

    /// Start a stroke at `first`.
    #[must_use]
    pub fn new(first: StrokePoint, color: Rgba, base_width: f32) -> Self {
        let base_width = if base_width.is_nan() {
            Self::MIN_WIDTH
        } else {
            base_width.max(Self::MIN_WIDTH)
        };
        Self {
            id: StrokeId::new(),
            points: vec![first],
            color: color.clamped(),
            base_width,
        }
    }

    /// Points in drawing order.
    #[must_use]
    pub fn points(&self) -> &[StrokePoint] {
        &self.points
    }

    /// Most recently recorded point.
    #[must_use]
    pub fn last_point(&self) -> Option<&StrokePoint> {
        self.points.last()
    }

    /// Number of recorded points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the stroke has no points. Strokes built with [`Stroke::new`] never are.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub(crate) fn push(&mut self, point: StrokePoint) {
        self.points.push(point);
    }
}
