//! Error types for the `mercat-world` crate.
//!
//! Registration errors surface while a scenario is being assembled, before
//! any tick runs. Quantity errors come from the resource primitives.

use mercat_types::{IndustryId, PersonId, ProblemId, ResourceId, SegmentId};
use rust_decimal::Decimal;

/// Errors that can occur during region and resource operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A problem was not found in the region.
    #[error("problem not found: {0}")]
    ProblemNotFound(ProblemId),

    /// A resource was not found in the region.
    #[error("resource not found: {0}")]
    ResourceNotFound(ResourceId),

    /// A population segment was not found in the region.
    #[error("population segment not found: {0}")]
    SegmentNotFound(SegmentId),

    /// An industry was not found in the region.
    #[error("industry not found: {0}")]
    IndustryNotFound(IndustryId),

    /// A person was not found in the region.
    #[error("person not found: {0}")]
    PersonNotFound(PersonId),

    /// An amount that must be non-negative was negative.
    #[error("{entity}: {field} must not be negative, got {amount}")]
    NegativeAmount {
        /// Name of the entity being registered.
        entity: String,
        /// The offending field.
        field: &'static str,
        /// The invalid amount.
        amount: Decimal,
    },

    /// Attempted to draw more of a resource than is in stock.
    #[error("insufficient {resource}: requested {requested}, available {available}")]
    InsufficientQuantity {
        /// Resource name.
        resource: String,
        /// Quantity requested.
        requested: Decimal,
        /// Quantity in stock.
        available: Decimal,
    },

    /// The ID space for an entity kind is exhausted.
    #[error("no more {0} identifiers available")]
    IdSpaceExhausted(&'static str),

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in world calculation")]
    ArithmeticOverflow,
}
