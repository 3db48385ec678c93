//! Wage settlement between an industry and its allocated workers.
//!
//! Wages are paid before production is committed. Settlement is
//! all-or-nothing: either the industry covers the full bill and every
//! worker is credited, or no money moves. A committed settlement can be
//! undone with [`reverse_wages`] when a later step of the tick fails.

use std::collections::BTreeMap;

use mercat_types::{Industry, IndustryId, Person, PersonId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProductionError;

/// One worker's wage for one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaborPayment {
    /// The paid worker.
    pub person: PersonId,
    /// The paying industry.
    pub industry: IndustryId,
    /// Hours paid for.
    pub hours: Decimal,
    /// Wage per hour.
    pub rate: Decimal,
    /// `hours * rate`.
    pub amount: Decimal,
}

/// A committed wage settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WageSettlement {
    /// The paying industry.
    pub industry: IndustryId,
    /// One payment per worker, in allocation order.
    pub payments: Vec<LaborPayment>,
    /// Sum of all payment amounts.
    pub total: Decimal,
}

/// Index of each referenced person in `people`, with the amount moving to
/// or from them. Duplicate IDs accumulate.
fn plan_transfers(
    people: &[Person],
    payments: &[LaborPayment],
) -> Result<BTreeMap<usize, Decimal>, ProductionError> {
    let mut plan: BTreeMap<usize, Decimal> = BTreeMap::new();
    for payment in payments {
        let index = people
            .iter()
            .position(|p| p.id == payment.person)
            .ok_or(ProductionError::PersonNotFound(payment.person))?;
        let slot = plan.entry(index).or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(payment.amount)
            .ok_or(ProductionError::ArithmeticOverflow)?;
    }
    Ok(plan)
}

/// Pay each worker `hours * rate` out of the industry's treasury.
///
/// Every worker is resolved and every balance computed before anything is
/// written, so on error the industry and all people are unchanged.
///
/// # Errors
///
/// Returns [`ProductionError::InvalidAmount`] for negative hours or rate,
/// [`ProductionError::InsufficientFunds`] when the treasury is smaller than
/// the total bill, [`ProductionError::PersonNotFound`] for an unknown
/// worker, or [`ProductionError::ArithmeticOverflow`].
pub fn pay_workers(
    industry: &mut Industry,
    people: &mut [Person],
    workers: &[PersonId],
    hours: Decimal,
    rate: Decimal,
) -> Result<WageSettlement, ProductionError> {
    if hours < Decimal::ZERO {
        return Err(ProductionError::InvalidAmount { field: "hours", value: hours });
    }
    if rate < Decimal::ZERO {
        return Err(ProductionError::InvalidAmount { field: "wage rate", value: rate });
    }

    let amount = hours
        .checked_mul(rate)
        .ok_or(ProductionError::ArithmeticOverflow)?;

    let payments: Vec<LaborPayment> = workers
        .iter()
        .map(|&person| LaborPayment {
            person,
            industry: industry.id,
            hours,
            rate,
            amount,
        })
        .collect();

    let total = payments
        .iter()
        .try_fold(Decimal::ZERO, |acc, p| acc.checked_add(p.amount))
        .ok_or(ProductionError::ArithmeticOverflow)?;

    let plan = plan_transfers(people, &payments)?;

    if industry.money < total {
        return Err(ProductionError::InsufficientFunds {
            industry: industry.name.clone(),
            required: total,
            available: industry.money,
        });
    }

    let mut credited = Vec::with_capacity(plan.len());
    for (index, credit) in plan {
        let Some(person) = people.get(index) else {
            continue;
        };
        let after = person
            .money
            .checked_add(credit)
            .ok_or(ProductionError::ArithmeticOverflow)?;
        credited.push((index, after));
    }
    let treasury_after = industry
        .money
        .checked_sub(total)
        .ok_or(ProductionError::ArithmeticOverflow)?;

    industry.money = treasury_after;
    for (index, after) in credited {
        if let Some(person) = people.get_mut(index) {
            person.money = after;
        }
    }

    debug!(
        industry = %industry.name,
        workers = payments.len(),
        %total,
        "Wages paid"
    );

    Ok(WageSettlement {
        industry: industry.id,
        payments,
        total,
    })
}

/// Undo a committed settlement: debit each worker and refund the industry.
///
/// All-or-nothing, like [`pay_workers`].
///
/// # Errors
///
/// Returns [`ProductionError::ReversalFailed`] if a worker has since spent
/// the wage, or [`ProductionError::PersonNotFound`] for an unknown worker.
pub fn reverse_wages(
    settlement: &WageSettlement,
    industry: &mut Industry,
    people: &mut [Person],
) -> Result<(), ProductionError> {
    let plan = plan_transfers(people, &settlement.payments)?;

    let mut debited = Vec::with_capacity(plan.len());
    for (index, owed) in plan {
        let Some(person) = people.get(index) else {
            continue;
        };
        if person.money < owed {
            return Err(ProductionError::ReversalFailed {
                person: person.id,
                owed,
                available: person.money,
            });
        }
        let after = person
            .money
            .checked_sub(owed)
            .ok_or(ProductionError::ArithmeticOverflow)?;
        debited.push((index, after));
    }
    let treasury_after = industry
        .money
        .checked_add(settlement.total)
        .ok_or(ProductionError::ArithmeticOverflow)?;

    industry.money = treasury_after;
    for (index, after) in debited {
        if let Some(person) = people.get_mut(index) {
            person.money = after;
        }
    }

    debug!(industry = %industry.name, total = %settlement.total, "Wages reversed");
    Ok(())
}
