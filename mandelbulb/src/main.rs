#![deny(clippy::all, clippy::pedantic)]
//! # Mandelbulb
//!
//! Entry point for the raymarcher binary.
//!
//! Opens a window and raymarches the fractal every frame, or with `--output`
//! renders a single frame offscreen and writes it as PNG.

mod app;
mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    app::run(&args)
}
