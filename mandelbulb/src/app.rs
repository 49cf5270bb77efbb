//! # Mandelbulb Application Logic
//!
//! Initialises logging, then either hands control to the windowed event loop
//! in [`render::run`] or renders a single frame with a
//! [`render::HeadlessRenderer`] and writes it to disk.

use std::path::Path;

use anyhow::{Context, Result};
use fractal::{prepare_frame, CameraInput};
use render::{probe, HeadlessRenderer, ViewerSettings};
use tracing_subscriber::EnvFilter;

use crate::cli::Args;

/// Run the application for the parsed command line.
///
/// # Errors
///
/// Returns any error from device or pipeline creation, the event loop, or
/// writing the output image.
pub fn run(args: &Args) -> Result<()> {
    init_logging();

    let settings = args.settings();
    tracing::info!(
        width = settings.width,
        height = settings.height,
        variant = %settings.variant,
        camera = ?settings.camera_mode,
        "starting"
    );

    match &args.output {
        Some(path) => render_to_file(&settings, path),
        None => render::run(&settings),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn render_to_file(settings: &ViewerSettings, path: &Path) -> Result<()> {
    let mut headless = pollster::block_on(HeadlessRenderer::new(
        settings.variant,
        settings.width,
        settings.height,
    ))?;
    probe::self_check(headless.device(), headless.queue())?.log();

    let mut camera = settings.camera(settings.width, settings.height);
    let mut input = CameraInput::default();
    let frame = prepare_frame(&mut camera, &mut input, 0.0)
        .context("initial camera position cannot be rendered")?;
    tracing::info!(eye = ?frame.eye, distance = frame.distance, "rendering offscreen frame");

    let image = headless.render(&frame.params)?;
    image
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "frame written");
    Ok(())
}
