//! Error types for the Mercat engine binary.
//!
//! [`CliError`] wraps every failure mode between reading the scenario file
//! and finishing the last tick.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: mercat_core::config::ConfigError,
    },

    /// The scenario could not be turned into a region.
    #[error("scenario error: {source}")]
    Scenario {
        /// The underlying scenario error.
        #[from]
        source: mercat_core::scenario::ScenarioError,
    },

    /// A tick failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: mercat_core::engine::TickError,
    },
}
