//! Interactive GPU fractal viewer.
//!
//! W/A/S/D pan, Up/Down zoom, Escape quits. The overlay in the top-left
//! corner edits the iteration count and base color.

mod app;
mod config;
mod controls;
mod resources;
mod viewport;

use fractal_engine::device::GpuInit;
use fractal_engine::logging::{init_logging, LoggingConfig};
use fractal_engine::window::{Runtime, RuntimeConfig};

use crate::app::FractalApp;
use crate::config::ViewerConfig;

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = ViewerConfig::default();
    let sources = resources::load_shader_sources(&config).inspect_err(|e| log::error!("{e}"))?;

    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: config.initial_size,
    };

    Runtime::run(runtime, GpuInit::default(), FractalApp::new(config, sources))
}
