//! Engine binary for the Mercat economic simulation.
//!
//! # Startup Sequence
//!
//! 1. Resolve the config path: first argument, then `MERCAT_CONFIG`, then
//!    `mercat-config.yaml`
//! 2. Load the scenario. Only a missing default file falls back to the
//!    built-in demo; a path named on the command line or in
//!    `MERCAT_CONFIG` must exist
//! 3. Initialize structured logging (tracing); `RUST_LOG` overrides the
//!    configured level
//! 4. Build the region
//! 5. Run the configured number of ticks
//! 6. Report the final summary and the conservation verdict

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use mercat_core::config::ScenarioConfig;
use mercat_core::conservation::ConservationResult;
use mercat_core::engine::{Engine, EngineParams};
use mercat_core::events::{EventLog, NullEventLog, TracingEventLog};
use mercat_core::scenario::build_region;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Default scenario file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "mercat-config.yaml";

/// Environment variable naming the scenario file.
const CONFIG_ENV: &str = "MERCAT_CONFIG";

/// The scenario file to load.
enum ConfigPath {
    /// Named on the command line or in `MERCAT_CONFIG`.
    Explicit(PathBuf),
    /// Nothing was named.
    Default(PathBuf),
}

/// Where the scenario came from.
enum ConfigSource {
    File(PathBuf),
    Demo(PathBuf),
}

fn main() -> ExitCode {
    let path = config_path();
    let (config, source) = match load_config(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("mercat-engine: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("mercat-engine starting");
    match &source {
        ConfigSource::File(path) => info!(path = %path.display(), "Configuration loaded"),
        ConfigSource::Demo(path) => {
            info!(path = %path.display(), "Config file not found, using demo scenario");
        }
    }

    match run(&config) {
        Ok(ConservationResult::Balanced) => ExitCode::SUCCESS,
        Ok(ConservationResult::Anomaly(anomaly)) => {
            error!(%anomaly, "Simulation finished with a wealth anomaly");
            ExitCode::FAILURE
        }
        Err(e) => {
            error!(error = %e, "Simulation failed");
            ExitCode::FAILURE
        }
    }
}

/// Build the region and run every configured tick.
fn run(config: &ScenarioConfig) -> Result<ConservationResult, CliError> {
    let region = build_region(config)?;
    let params = EngineParams::from(&config.simulation);
    info!(
        region = region.name(),
        ticks = config.simulation.ticks,
        wage = %params.wage_per_hour,
        price = %params.price_per_unit,
        events = config.logging.events_enabled,
        "Starting simulation"
    );

    let log: Box<dyn EventLog> = if config.logging.events_enabled {
        Box::new(TracingEventLog::new())
    } else {
        Box::new(NullEventLog)
    };
    let mut engine = Engine::new(region, params, log);
    engine.run_ticks(config.simulation.ticks)?;

    // With events enabled the summary has already gone through the log.
    if !config.logging.events_enabled {
        print!("{}", engine.final_summary());
    }

    let verdict = engine.verify_conservation();
    if verdict.is_balanced() {
        info!(
            ticks = engine.current_tick(),
            total_wealth = %engine.total_wealth(),
            "Wealth conserved"
        );
    }
    Ok(verdict)
}

/// Resolve the scenario path from the command line or the environment.
fn config_path() -> ConfigPath {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map_or_else(
            || ConfigPath::Default(PathBuf::from(DEFAULT_CONFIG_PATH)),
            |named| ConfigPath::Explicit(PathBuf::from(named)),
        )
}

/// Load the scenario. A missing default file loads the demo; a missing
/// explicit file is an error.
fn load_config(path: ConfigPath) -> Result<(ScenarioConfig, ConfigSource), CliError> {
    match path {
        ConfigPath::Default(path) if !path.exists() => {
            Ok((ScenarioConfig::demo(), ConfigSource::Demo(path)))
        }
        ConfigPath::Default(path) | ConfigPath::Explicit(path) => {
            let config = ScenarioConfig::from_file(&path)?;
            Ok((config, ConfigSource::File(path)))
        }
    }
}
