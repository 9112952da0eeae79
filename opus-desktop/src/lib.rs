//! # Opus Canvas Desktop
//!
//! Native desktop host for the Opus canvas using winit + wgpu.
//!
//! Window input is translated into engine calls; a timer redraws the canvas
//! at the configured frame rate from a fresh engine snapshot each frame.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p opus-desktop -- --template hd --brush-color "#d0342c"
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `DesktopConfig` - Window, canvas, brush and renderer settings
//! - `OpusDesktopApp` - Main application implementing `ApplicationHandler`
//! - `input` - Keyboard, wheel and pen mapping to canvas events

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod app;
pub mod input;

pub use app::OpusDesktopApp;

use clap::Parser;
use opus_core::{BrushSettings, CanvasTemplate, EngineConfig, Rgba, Size};
use opus_renderer::RendererConfig;

/// Command-line arguments for opus-desktop.
#[derive(Debug, Clone, Parser)]
#[command(name = "opus-desktop")]
#[command(about = "Opus canvas native desktop application")]
#[command(version)]
pub struct CliArgs {
    /// Window width in pixels
    #[arg(long, default_value = "1280", env = "OPUS_WIDTH")]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value = "800", env = "OPUS_HEIGHT")]
    pub height: u32,

    /// Canvas template: square, hd, poster or concept
    #[arg(long, default_value = "square", env = "OPUS_TEMPLATE")]
    pub template: CanvasTemplate,

    /// Canvas width in pixels (overrides the template)
    #[arg(long, env = "OPUS_CANVAS_WIDTH")]
    pub canvas_width: Option<f32>,

    /// Canvas height in pixels (overrides the template)
    #[arg(long, env = "OPUS_CANVAS_HEIGHT")]
    pub canvas_height: Option<f32>,

    /// Brush size in canvas pixels
    #[arg(long, default_value = "12", env = "OPUS_BRUSH_SIZE")]
    pub brush_size: f32,

    /// Brush color as #rrggbb or #rrggbbaa
    #[arg(long, env = "OPUS_BRUSH_COLOR")]
    pub brush_color: Option<Rgba>,

    /// Target frames per second
    #[arg(long, default_value = "120", env = "OPUS_FPS")]
    pub fps: u32,

    /// Present without waiting for vertical sync
    #[arg(long, env = "OPUS_NO_VSYNC")]
    pub no_vsync: bool,
}

/// Desktop application configuration.
#[derive(Debug, Clone)]
pub struct DesktopConfig {
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Window title.
    pub title: String,
    /// Template used for new canvases (Ctrl/Cmd+N).
    pub template: CanvasTemplate,
    /// Initial canvas size.
    pub canvas_size: Size,
    /// Initial brush.
    pub brush: BrushSettings,
    /// Renderer settings.
    pub renderer: RendererConfig,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopConfig {
    /// Create a new desktop configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        let template = CanvasTemplate::default();
        Self {
            width: 1280,
            height: 800,
            title: "Opus Canvas".to_string(),
            template,
            canvas_size: template.size(),
            brush: BrushSettings::default(),
            renderer: RendererConfig::default(),
        }
    }

    /// Engine settings for a window of the configured size.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Window dimensions fit in f32
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            canvas_size: self.canvas_size,
            view_size: Size::new(self.width as f32, self.height as f32),
            brush: self.brush,
            ..EngineConfig::default()
        }
    }
}

impl From<CliArgs> for DesktopConfig {
    fn from(args: CliArgs) -> Self {
        let canvas_size = args
            .template
            .size()
            .with(args.canvas_width, args.canvas_height);

        let mut brush = BrushSettings::default();
        brush.set_size(args.brush_size);
        if let Some(color) = args.brush_color {
            brush.set_color(color);
        }

        Self {
            width: args.width,
            height: args.height,
            title: "Opus Canvas".to_string(),
            template: args.template,
            canvas_size,
            brush,
            renderer: RendererConfig {
                target_fps: args.fps.max(1),
                vsync: !args.no_vsync,
                ..RendererConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::try_parse_from(["opus-desktop"]).expect("parse");
        let config = DesktopConfig::from(args);
        assert_eq!(config.width, 1280);
        assert_eq!(config.canvas_size, Size::new(2048.0, 2048.0));
        assert_eq!(config.renderer.target_fps, 120);
        assert!(config.renderer.vsync);
        assert!((config.brush.size() - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cli_template_and_overrides() {
        let args = CliArgs::try_parse_from([
            "opus-desktop",
            "--template",
            "HD",
            "--canvas-height",
            "0",
            "--brush-color",
            "#ff000080",
            "--brush-size",
            "400",
            "--no-vsync",
        ])
        .expect("parse");
        let config = DesktopConfig::from(args);

        assert_eq!(config.template, CanvasTemplate::Hd);
        assert_eq!(config.canvas_size, Size::new(1920.0, 1.0));
        assert!((config.brush.size() - 128.0).abs() < f32::EPSILON);
        assert!((config.brush.color().r - 1.0).abs() < f32::EPSILON);
        assert!(!config.renderer.vsync);
    }

    #[test]
    fn test_cli_rejects_unknown_template() {
        assert!(CliArgs::try_parse_from(["opus-desktop", "--template", "a4"]).is_err());
    }

    #[test]
    fn test_engine_config_uses_window_size() {
        let config = DesktopConfig::new();
        let engine = config.engine_config();
        assert_eq!(engine.view_size, Size::new(1280.0, 800.0));
        assert_eq!(engine.canvas_size, config.canvas_size);
    }
}
