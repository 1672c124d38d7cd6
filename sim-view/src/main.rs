//! Application entry point for the particle viewer.
//!
//! This binary installs logging, sets up eframe/egui and delegates all
//! interactive logic and rendering to [`Viewer`] from the `viewer` module.

mod canvas;
mod viewer;

use sim_core::config::Demo;
use tracing::info;
use tracing_subscriber::EnvFilter;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// Logging honours `RUST_LOG` and defaults to `info`. The window opens on
/// the signal-driven particle demo; the herd demo is selectable in the UI.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if the initial simulation cannot be built, or eframe fails to
///   create the native window or event loop.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    info!("particle viewer starting");

    let viewer = Viewer::new(Demo::default())?;
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Particle Simulation",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    )?;
    Ok(())
}
