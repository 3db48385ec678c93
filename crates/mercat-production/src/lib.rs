//! Production mechanics for the Mercat economic simulation.
//!
//! Everything an industry does in one tick before the market opens:
//! staffing, costing, paying wages, and turning inputs into outputs. The
//! functions here operate on slices borrowed from a region so the tick
//! loop can sequence them and recover from failures per industry.
//!
//! # Modules
//!
//! - [`labor`] -- [`WorkerPool`] and front-of-pool worker allocation.
//! - [`calculator`] -- Pure output and cost computation.
//! - [`wages`] -- All-or-nothing wage settlement and its reversal.
//! - [`consumption`] -- Atomic input draws and output commits.
//! - [`error`] -- [`ProductionError`].

pub mod calculator;
pub mod consumption;
pub mod error;
pub mod labor;
pub mod wages;

// Re-export primary types at crate root.
pub use calculator::{DEFAULT_UNIT_COST, ProductionResult, calculate_production, unit_cost};
pub use consumption::{OutputCommit, ResourceConsumption, commit_output, consume_inputs};
pub use error::ProductionError;
pub use labor::{WorkerPool, allocate_workers};
pub use wages::{LaborPayment, WageSettlement, pay_workers, reverse_wages};
