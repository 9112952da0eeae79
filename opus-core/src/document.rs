//! Stroke document: committed history, the in-progress stroke and undo/redo.
//!
//! The document is a two-state machine (`Idle`, `Drawing`). Every operation
//! is total: a call that does not apply to the current state leaves the
//! document untouched instead of failing.

use std::sync::Arc;
use std::time::Instant;

use crate::geometry::distance;
use crate::{Rgba, Size, Stroke, StrokeId, StrokePoint, Vec2};

/// Minimum distance, in canvas units, between consecutive recorded points.
pub const MIN_POINT_SPACING: f32 = 0.5;

/// Observable phase of the document state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentPhase {
    /// No stroke in progress.
    Idle,
    /// A stroke is being drawn.
    Drawing,
}

#[derive(Debug, Clone, Default)]
enum DrawState {
    #[default]
    Idle,
    Drawing {
        stroke: Stroke,
        /// Redo entries set aside by `begin_stroke`, restored on cancel.
        held_redo: Vec<Arc<Stroke>>,
    },
}

/// An immutable view of the strokes to draw, in chronological order.
///
/// Holds shared references to committed strokes and a private copy of the
/// in-progress stroke, so later document mutation never affects it.
#[derive(Debug, Clone, Default)]
pub struct StrokeSnapshot {
    strokes: Vec<Arc<Stroke>>,
}

impl StrokeSnapshot {
    /// Build a snapshot from strokes in drawing order.
    #[must_use]
    pub fn from_strokes(strokes: impl IntoIterator<Item = Stroke>) -> Self {
        Self {
            strokes: strokes.into_iter().map(Arc::new).collect(),
        }
    }

    /// Iterate over the strokes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().map(AsRef::as_ref)
    }

    /// Number of strokes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of recorded points across all strokes.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|s| s.len()).sum()
    }
}

/// The stroke history of one canvas.
#[derive(Debug, Clone)]
pub struct StrokeDocument {
    strokes: Vec<Arc<Stroke>>,
    redo_stack: Vec<Arc<Stroke>>,
    state: DrawState,
    canvas_size: Size,
    epoch: Instant,
}

impl StrokeDocument {
    /// Create an empty document with the given canvas size.
    #[must_use]
    pub fn new(canvas_size: Size) -> Self {
        Self {
            strokes: Vec::new(),
            redo_stack: Vec::new(),
            state: DrawState::Idle,
            canvas_size,
            epoch: Instant::now(),
        }
    }

    /// Start a new stroke with a single point and return its ID.
    ///
    /// Empties the redo stack; the entries come back if the stroke is
    /// cancelled and are dropped when it is committed. If a stroke is already
    /// in progress nothing changes and the existing stroke's ID is returned.
    pub fn begin_stroke(
        &mut self,
        position: Vec2,
        pressure: f32,
        color: Rgba,
        base_width: f32,
    ) -> StrokeId {
        if let DrawState::Drawing { stroke, .. } = &self.state {
            tracing::trace!("begin_stroke while drawing, keeping stroke {}", stroke.id);
            return stroke.id;
        }

        let first = StrokePoint::new(position, pressure, self.now());
        let stroke = Stroke::new(first, color, base_width);
        let id = stroke.id;
        tracing::debug!("Begin stroke {id} at ({}, {})", position.x, position.y);

        let held_redo = std::mem::take(&mut self.redo_stack);
        self.state = DrawState::Drawing { stroke, held_redo };
        id
    }

    /// Append a point to the in-progress stroke.
    ///
    /// The point is dropped if it lies closer than [`MIN_POINT_SPACING`] to
    /// the last recorded point. Returns whether a point was added.
    pub fn continue_stroke(&mut self, position: Vec2, pressure: f32) -> bool {
        let timestamp = self.now();
        let DrawState::Drawing { stroke, .. } = &mut self.state else {
            return false;
        };

        if let Some(last) = stroke.last_point() {
            if distance(last.position, position) < MIN_POINT_SPACING {
                return false;
            }
        }

        stroke.push(StrokePoint::new(position, pressure, timestamp));
        true
    }

    /// Commit the in-progress stroke to the end of the history.
    pub fn end_stroke(&mut self) {
        if let DrawState::Drawing { stroke, .. } = std::mem::take(&mut self.state) {
            tracing::debug!("Commit stroke {} with {} points", stroke.id, stroke.len());
            self.strokes.push(Arc::new(stroke));
        }
    }

    /// Discard the in-progress stroke and restore the redo stack it emptied.
    pub fn cancel_stroke(&mut self) {
        if let DrawState::Drawing {
            stroke,
            mut held_redo,
        } = std::mem::take(&mut self.state)
        {
            tracing::debug!("Cancel stroke {}", stroke.id);
            // Strokes undone mid-stroke stay on top of the restored entries.
            held_redo.append(&mut self.redo_stack);
            self.redo_stack = held_redo;
        }
    }

    /// Move the newest committed stroke onto the redo stack.
    pub fn undo(&mut self) {
        if let Some(stroke) = self.strokes.pop() {
            tracing::debug!("Undo stroke {}", stroke.id);
            self.redo_stack.push(stroke);
        }
    }

    /// Move the most recently undone stroke back onto the history.
    pub fn redo(&mut self) {
        if let Some(stroke) = self.redo_stack.pop() {
            tracing::debug!("Redo stroke {}", stroke.id);
            self.strokes.push(stroke);
        }
    }

    /// Committed strokes followed by the in-progress stroke, if any.
    #[must_use]
    pub fn snapshot(&self) -> StrokeSnapshot {
        let mut strokes = Vec::with_capacity(self.strokes.len() + 1);
        strokes.extend(self.strokes.iter().cloned());
        if let DrawState::Drawing { stroke, .. } = &self.state {
            strokes.push(Arc::new(stroke.clone()));
        }
        StrokeSnapshot { strokes }
    }

    /// Drop all strokes, the redo stack and any in-progress stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.redo_stack.clear();
        self.state = DrawState::Idle;
    }

    /// Change the canvas size. Each axis is optional and clamped to at least 1.
    pub fn resize(&mut self, width: Option<f32>, height: Option<f32>) {
        self.canvas_size = self.canvas_size.with(width, height);
        tracing::debug!(
            "Canvas resized to {}x{}",
            self.canvas_size.width,
            self.canvas_size.height
        );
    }

    /// Current phase of the state machine.
    #[must_use]
    pub fn phase(&self) -> DocumentPhase {
        match self.state {
            DrawState::Idle => DocumentPhase::Idle,
            DrawState::Drawing { .. } => DocumentPhase::Drawing,
        }
    }

    /// The in-progress stroke, if any.
    #[must_use]
    pub fn current_stroke(&self) -> Option<&Stroke> {
        match &self.state {
            DrawState::Drawing { stroke, .. } => Some(stroke),
            DrawState::Idle => None,
        }
    }

    /// Committed strokes, oldest first.
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().map(AsRef::as_ref)
    }

    /// Number of committed strokes.
    #[must_use]
    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    /// Undone strokes, bottom of the stack first.
    pub fn redo_stack(&self) -> impl Iterator<Item = &Stroke> {
        self.redo_stack.iter().map(AsRef::as_ref)
    }

    /// Whether `undo` would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    /// Whether `redo` would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Canvas dimensions.
    #[must_use]
    pub fn canvas_size(&self) -> Size {
        self.canvas_size
    }

    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

impl Default for StrokeDocument {
    fn default() -> Self {
        Self::new(Size::new(2048.0, 2048.0))
    }
}
