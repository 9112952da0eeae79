//! # Opus Canvas Desktop
//!
//! Native desktop application for the Opus canvas.

use clap::Parser;
use opus_desktop::{CliArgs, DesktopConfig, OpusDesktopApp};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "opus_desktop=debug,opus_renderer=debug,opus_core=info,wgpu=warn".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Opus Canvas Desktop v{}", opus_core::VERSION);

    // Parse CLI arguments
    let args = CliArgs::parse();
    let config = DesktopConfig::from(args);

    tracing::info!(
        "Window config: {}x{} \"{}\", canvas {}x{}, {} fps",
        config.width,
        config.height,
        config.title,
        config.canvas_size.width,
        config.canvas_size.height,
        config.renderer.target_fps
    );

    // Create application
    tracing::debug!("Creating OpusDesktopApp");
    let mut app = OpusDesktopApp::new(config);

    // Create and run event loop
    tracing::debug!("Creating event loop");
    let event_loop = EventLoop::new()?;
    tracing::debug!("Event loop created, starting run_app");

    let result = event_loop.run_app(&mut app);
    tracing::debug!("run_app returned: {:?}", result);
    result?;

    tracing::info!(
        "Opus Canvas Desktop exited with {} strokes",
        app.engine().document().stroke_count()
    );
    Ok(())
}
