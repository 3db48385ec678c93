//! Error types for the `mercat-market` crate.

use mercat_types::ResourceId;
use rust_decimal::Decimal;

/// Errors that can occur during a purchase or a market round.
///
/// [`MarketError::OutOfStock`] and [`MarketError::InsufficientFunds`] are
/// ordinary rejections that a market round counts and moves past.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    /// The product has less stock than requested.
    #[error("{product} out of stock: requested {requested}, available {available}")]
    OutOfStock {
        /// Product name.
        product: String,
        /// Quantity requested.
        requested: Decimal,
        /// Quantity in stock.
        available: Decimal,
    },

    /// The buyer cannot afford the purchase.
    #[error("{buyer} cannot afford {cost}, has {available}")]
    InsufficientFunds {
        /// Buyer name.
        buyer: String,
        /// Total price.
        cost: Decimal,
        /// Buyer's money.
        available: Decimal,
    },

    /// The seller does not list the product among its outputs.
    #[error("{industry} does not produce {product}")]
    NotProduced {
        /// Seller name.
        industry: String,
        /// Product name.
        product: String,
    },

    /// Prices and quantities must not be negative.
    #[error("invalid {field}: {value}")]
    InvalidAmount {
        /// Which input was invalid.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A product ID did not resolve.
    #[error("product not found: {0}")]
    ProductNotFound(ResourceId),

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow in market calculation")]
    ArithmeticOverflow,
}

impl MarketError {
    /// Whether this is a stock or funds rejection rather than a fault.
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::OutOfStock { .. } | Self::InsufficientFunds { .. })
    }
}
