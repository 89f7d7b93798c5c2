//! Engine binary for Gridcraft energy grids.
//!
//! Loads a scenario, places its nodes and ticks the grid at a fixed pace,
//! logging what each tick did.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gridcraft-config.yaml` (or the path in
//!    `GRIDCRAFT_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the grid from the configured placements
//! 4. Run the tick loop
//! 5. Log the result

mod config;
mod error;
mod runner;
mod scenario;

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SimulationConfig;
use crate::error::EngineError;

/// Environment variable overriding the config path.
const CONFIG_ENV: &str = "GRIDCRAFT_CONFIG";

/// Default config path, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "gridcraft-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or describes an
/// invalid grid.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!(
        path = %config_path.display(),
        max_ticks = config.simulation.max_ticks,
        tick_interval_ms = config.simulation.tick_interval_ms,
        placements = config.grid.len(),
        "Configuration loaded"
    );

    // 3. Build the grid.
    let mut world = scenario::build_world(&config.grid).map_err(EngineError::from)?;
    info!(nodes = world.len(), "Grid built");

    // 4. Run.
    let result = runner::run(&mut world, &config.simulation).await;

    // 5. Log results.
    runner::log_run_end(&result);
    info!(
        generator_storage = %world.generator_storage(),
        accumulator_storage = %world.accumulator_storage(),
        "gridcraft-engine shutdown complete"
    );

    Ok(())
}

/// Load the engine configuration.
///
/// A missing file is not an error: the defaults describe an empty grid.
fn load_config() -> Result<(SimulationConfig, PathBuf), EngineError> {
    let path = std::env::var_os(CONFIG_ENV)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, path))
    } else {
        Ok((SimulationConfig::default(), path))
    }
}
