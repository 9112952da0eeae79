//! Frame planning: turns an engine [`FrameSnapshot`] into the draw lists a
//! backend submits.
//!
//! The canvas is redrawn from scratch every frame: one opaque background
//! quad, then every stroke's sprites in history order. There is no cached
//! framebuffer of committed strokes, so the sprite count grows with the
//! whole history.

use opus_core::FrameSnapshot;

use crate::vertex::{append_vertices, background_quad, QuadVertex, StrokeVertex, ViewUniform};

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// View-size uniform.
    pub uniform: ViewUniform,
    /// Canvas background quad, absent for an empty frame.
    pub background: Option<[QuadVertex; 6]>,
    /// Stroke sprites in drawing order.
    pub strokes: Vec<StrokeVertex>,
}

impl Default for FramePlan {
    fn default() -> Self {
        Self::empty()
    }
}

impl FramePlan {
    /// A frame that only clears: nothing is attached to draw.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            uniform: ViewUniform {
                view_size: [1.0, 1.0],
                _padding: [0.0; 2],
            },
            background: None,
            strokes: Vec::new(),
        }
    }

    /// Plan a full frame from a snapshot.
    #[must_use]
    pub fn from_snapshot(frame: &FrameSnapshot) -> Self {
        let mut plan = Self::empty();
        plan.fill(frame);
        plan
    }

    /// Replace this plan's contents with `frame`, reusing the sprite buffer.
    pub fn fill(&mut self, frame: &FrameSnapshot) {
        let projection = &frame.projection;
        self.uniform = ViewUniform::new(projection);
        self.background = Some(background_quad(projection, frame.background));
        self.strokes.clear();
        append_vertices(&mut self.strokes, &frame.strokes, projection);
    }

    /// Drop all content, keeping buffer capacity.
    pub fn clear(&mut self) {
        self.background = None;
        self.strokes.clear();
    }

    /// Whether this frame draws anything besides the clear.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.strokes.is_empty()
    }

    /// Number of stroke sprites.
    #[must_use]
    pub fn sprite_count(&self) -> usize {
        self.strokes.len()
    }
}
