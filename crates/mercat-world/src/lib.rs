//! Region entity store and resource mechanics for the Mercat simulation.
//!
//! This crate owns the mutable economic state: the [`Region`] aggregate that
//! stores every industry, person, population segment, resource, and problem,
//! plus the primitives that move resource stock up and down.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registration and stock operations.
//! - [`region`] -- [`Region`]: typed registration, lookups, effective need
//!   sets, aggregate wealth, and disjoint mutable borrows via
//!   [`RegionParts`].
//! - [`resource`] -- Exact draws, replenishment, and per-tick regeneration.

pub mod error;
pub mod region;
pub mod resource;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use region::{Region, RegionParts, effective_needs_of};
pub use resource::{Regeneration, draw, regenerate_all, replenish};
