//! Headless fallback backend for machines without a usable GPU.
//!
//! Draws nothing; it records what each frame would have submitted so hosts
//! keep running and tests can inspect the pipeline without a device.

use opus_core::Rgba;

use crate::{BackendType, FramePlan, RenderResult};

use super::RenderBackend;

/// What the last rendered frame submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Background quads drawn (0 or 1).
    pub background_quads: usize,
    /// Stroke sprites drawn.
    pub sprites: usize,
}

/// Renderer that accepts frames without a GPU.
#[derive(Debug)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    clear_color: Rgba,
    frames: u64,
    last_frame: FrameStats,
}

impl HeadlessBackend {
    /// Create a headless backend with a nominal surface size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            clear_color: Rgba::WORKSPACE,
            frames: 0,
            last_frame: FrameStats::default(),
        }
    }

    /// Frames presented so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw counts from the last frame.
    #[must_use]
    pub const fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Current surface size.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Current clear color.
    #[must_use]
    pub const fn clear_color(&self) -> Rgba {
        self.clear_color
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl RenderBackend for HeadlessBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Headless
    }

    fn render(&mut self, plan: &FramePlan) -> RenderResult<()> {
        self.last_frame = FrameStats {
            background_quads: usize::from(plan.background.is_some()),
            sprites: plan.sprite_count(),
        };
        self.frames += 1;
        tracing::trace!(
            "Headless frame {}: {} sprites, viewport {}x{}",
            self.frames,
            self.last_frame.sprites,
            self.width,
            self.height
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.width = width;
        self.height = height;
        tracing::debug!("Headless resized to {}x{}", width, height);
        Ok(())
    }

    fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
    }
}
