//! Error types for the `mercat-production` crate.
//!
//! [`ProductionError::InsufficientFunds`] and
//! [`ProductionError::InsufficientResource`] are expected outcomes that the
//! tick loop recovers from per industry. The remaining variants indicate a
//! dangling ID or an arithmetic limit.

use mercat_types::{PersonId, ResourceId};
use rust_decimal::Decimal;

/// Errors that can occur while producing, paying, or consuming.
#[derive(Debug, thiserror::Error)]
pub enum ProductionError {
    /// The industry cannot cover its wage bill.
    #[error("{industry} cannot pay wages: needs {required}, has {available}")]
    InsufficientFunds {
        /// Industry name.
        industry: String,
        /// Total wage bill.
        required: Decimal,
        /// Treasury at the time of the check.
        available: Decimal,
    },

    /// A declared input does not have enough stock.
    #[error(
        "insufficient {resource}: need {required}, have {available} (short by {shortfall})"
    )]
    InsufficientResource {
        /// Resource name.
        resource: String,
        /// Quantity required for the planned output.
        required: Decimal,
        /// Quantity in stock.
        available: Decimal,
        /// `required - available`.
        shortfall: Decimal,
    },

    /// A worker ID did not resolve to a person.
    #[error("person not found: {0}")]
    PersonNotFound(PersonId),

    /// An input or output ID did not resolve to a resource.
    #[error("resource not found: {0}")]
    ResourceNotFound(ResourceId),

    /// A refunded worker no longer holds the wage they were paid.
    #[error("cannot reverse wages: {person} holds {available}, owes {owed}")]
    ReversalFailed {
        /// The worker whose refund failed.
        person: PersonId,
        /// Amount to be refunded.
        owed: Decimal,
        /// The worker's current money.
        available: Decimal,
    },

    /// A stock primitive failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: mercat_world::WorldError,
    },

    /// A wage rate or hour count was negative.
    #[error("invalid {field}: {value}")]
    InvalidAmount {
        /// Which input was rejected.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in production calculation")]
    ArithmeticOverflow,
}
