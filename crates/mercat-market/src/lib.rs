//! Need-matching product market for the Mercat economic simulation.
//!
//! After production, every person tries to buy products that address their
//! needs. Money only moves between people and industries, so a market round
//! never changes the region's total wealth.
//!
//! # Modules
//!
//! - [`purchase`] -- A single checked purchase and the [`Purchase`] record.
//! - [`matching`] -- [`run_market`]: breadth-first matching of every
//!   person's needs to every solving industry's products.
//! - [`error`] -- [`MarketError`].

pub mod error;
pub mod matching;
pub mod purchase;

// Re-export primary types at crate root.
pub use error::MarketError;
pub use matching::{FailedAttempts, MarketResult, UNITS_PER_ATTEMPT, run_market};
pub use purchase::{Purchase, execute_purchase};
