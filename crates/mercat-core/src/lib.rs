//! Scenario loading, tick engine, and run summaries for the Mercat economic
//! simulation.
//!
//! This crate turns a YAML scenario into a populated region and advances it
//! through the tick loop: Staffing, Production, Market, Regeneration,
//! Reset, and Verify.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `mercat-config.yaml` into
//!   strongly-typed structs, plus the built-in demo scenario.
//! - [`scenario`] -- [`build_region`]: validation and name resolution.
//! - [`events`] -- [`EventLog`] trait and its tracing, memory, and null
//!   implementations.
//! - [`conservation`] -- Wealth snapshots and conservation checks.
//! - [`engine`] -- [`Engine`]: the tick loop.
//! - [`summary`] -- [`SimulationSummary`]: the end-of-run report.
//!
//! [`build_region`]: scenario::build_region
//! [`EventLog`]: events::EventLog
//! [`Engine`]: engine::Engine
//! [`SimulationSummary`]: summary::SimulationSummary

pub mod config;
pub mod conservation;
pub mod engine;
pub mod events;
pub mod scenario;
pub mod summary;
