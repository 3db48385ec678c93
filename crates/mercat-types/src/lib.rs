//! Shared type definitions for the Mercat economic simulation.
//!
//! This crate is the single source of truth for the entity model used
//! across the workspace: industries, people, population segments,
//! resources, and problems, plus the typed identifiers that link them.
//!
//! All money, quantities, and hours are [`rust_decimal::Decimal`] so that
//! wealth conservation can be checked with exact equality.
//!
//! # Modules
//!
//! - [`ids`] -- Typed `u64` identifiers and the sequential [`IdAllocator`]
//! - [`structs`] -- Entity structs, their `New*` descriptions, and lookups

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{IdAllocator, IndustryId, PersonId, ProblemId, ResourceId, SegmentId};
pub use structs::{
    Entity, Industry, NewIndustry, NewPerson, NewProblem, NewResource, NewSegment,
    PRODUCTION_HISTORY_CAP, Person, PopulationSegment, Problem, ProductionRecord, Resource, find,
    find_by_name, find_mut,
};
