//! Stock mechanics for quantity-tracked resources.
//!
//! Resources change in three ways: production adds output
//! ([`replenish`]), consumption removes inputs and sold products
//! ([`draw`]), and regeneration adds a fixed rate back every tick
//! ([`regenerate_all`]). Quantities never go negative.

use mercat_types::{Resource, ResourceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// One resource's regeneration during a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Regeneration {
    /// The regenerated resource.
    pub resource: ResourceId,
    /// Resource name, for reporting.
    pub name: String,
    /// Units added this tick.
    pub added: Decimal,
    /// Stock after regeneration.
    pub quantity_after: Decimal,
    /// Unit label, for reporting.
    pub unit: String,
}

/// Add `amount` to a resource's stock. Returns the new quantity.
///
/// # Errors
///
/// Returns [`WorldError::NegativeAmount`] for a negative amount or
/// [`WorldError::ArithmeticOverflow`] if the sum overflows.
pub fn replenish(resource: &mut Resource, amount: Decimal) -> Result<Decimal, WorldError> {
    if amount < Decimal::ZERO {
        return Err(WorldError::NegativeAmount {
            entity: resource.name.clone(),
            field: "replenish amount",
            amount,
        });
    }
    resource.quantity = resource
        .quantity
        .checked_add(amount)
        .ok_or(WorldError::ArithmeticOverflow)?;
    Ok(resource.quantity)
}

/// Remove exactly `amount` from a resource's stock.
///
/// Unlike a harvest, a draw never takes a partial amount: if the stock
/// cannot cover the request, nothing changes.
///
/// # Errors
///
/// Returns [`WorldError::InsufficientQuantity`] when stock is short.
pub fn draw(resource: &mut Resource, amount: Decimal) -> Result<(), WorldError> {
    if amount < Decimal::ZERO {
        return Err(WorldError::NegativeAmount {
            entity: resource.name.clone(),
            field: "draw amount",
            amount,
        });
    }
    if resource.quantity < amount {
        return Err(WorldError::InsufficientQuantity {
            resource: resource.name.clone(),
            requested: amount,
            available: resource.quantity,
        });
    }
    resource.quantity = resource
        .quantity
        .checked_sub(amount)
        .ok_or(WorldError::ArithmeticOverflow)?;
    Ok(())
}

/// Apply one tick of regeneration to every renewable resource.
///
/// Resources with a zero rate are untouched and do not appear in the
/// result. All new quantities are computed before any is written, so an
/// overflow leaves every resource unchanged.
///
/// # Errors
///
/// Returns [`WorldError::ArithmeticOverflow`] if any sum overflows.
pub fn regenerate_all(resources: &mut [Resource]) -> Result<Vec<Regeneration>, WorldError> {
    let mut planned = Vec::new();
    for (index, resource) in resources.iter().enumerate() {
        if !resource.is_renewable() {
            continue;
        }
        let after = resource
            .quantity
            .checked_add(resource.regeneration_rate)
            .ok_or(WorldError::ArithmeticOverflow)?;
        planned.push((index, after));
    }

    let mut applied = Vec::with_capacity(planned.len());
    for (index, after) in planned {
        let Some(resource) = resources.get_mut(index) else {
            continue;
        };
        resource.quantity = after;
        applied.push(Regeneration {
            resource: resource.id,
            name: resource.name.clone(),
            added: resource.regeneration_rate,
            quantity_after: after,
            unit: resource.unit.clone(),
        });
    }
    Ok(applied)
}
