//! Wealth conservation checks.
//!
//! Money in a region only ever moves between industries and people: wages
//! flow from industries to workers and purchases flow back. No tick phase
//! creates or destroys money, so for every tick:
//!
//! ```text
//! sum(industry.money) + sum(person.money) == initial total wealth
//! ```
//!
//! Decimal arithmetic makes this an exact equality. A violation produces a
//! [`WealthAnomaly`]. Checks never modify state.

use std::collections::BTreeMap;

use mercat_types::{IndustryId, PersonId};
use mercat_world::Region;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Money held by every industry and person at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthSnapshot {
    /// Treasury of each industry.
    pub industries: BTreeMap<IndustryId, Decimal>,
    /// Money of each person.
    pub people: BTreeMap<PersonId, Decimal>,
    /// Sum of all industry treasuries.
    pub industry_total: Decimal,
    /// Sum of all personal money.
    pub people_total: Decimal,
    /// `industry_total + people_total`.
    pub total: Decimal,
}

impl WealthSnapshot {
    /// Record the money held in `region` right now.
    pub fn capture(region: &Region) -> Self {
        let industries: BTreeMap<IndustryId, Decimal> =
            region.industries().iter().map(|i| (i.id, i.money)).collect();
        let people: BTreeMap<PersonId, Decimal> =
            region.people().iter().map(|p| (p.id, p.money)).collect();
        let industry_total = region.industry_wealth();
        let people_total = region.people_wealth();
        Self {
            industries,
            people,
            industry_total,
            people_total,
            total: industry_total.saturating_add(people_total),
        }
    }

    /// Money an industry held when the snapshot was taken.
    pub fn industry(&self, id: IndustryId) -> Decimal {
        self.industries.get(&id).copied().unwrap_or(Decimal::ZERO)
    }

    /// Money a person held when the snapshot was taken.
    pub fn person(&self, id: PersonId) -> Decimal {
        self.people.get(&id).copied().unwrap_or(Decimal::ZERO)
    }
}

/// A conservation violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WealthAnomaly {
    /// Tick after which the violation was detected.
    pub tick: u64,
    /// Total wealth at the start of the run.
    pub expected: Decimal,
    /// Total wealth now.
    pub actual: Decimal,
    /// `actual - expected`.
    pub difference: Decimal,
    /// Human-readable description.
    pub message: String,
}

impl core::fmt::Display for WealthAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The result of a conservation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConservationResult {
    /// Total wealth matches the starting total.
    Balanced,
    /// Total wealth drifted.
    Anomaly(WealthAnomaly),
}

impl ConservationResult {
    /// Whether the check passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Compare the region's current total wealth against `initial`.
pub fn verify_conservation(tick: u64, initial: &WealthSnapshot, region: &Region) -> ConservationResult {
    let actual = region.total_wealth();
    if actual == initial.total {
        return ConservationResult::Balanced;
    }
    let difference = actual.saturating_sub(initial.total);
    ConservationResult::Anomaly(WealthAnomaly {
        tick,
        expected: initial.total,
        actual,
        difference,
        message: format!(
            "WEALTH_ANOMALY at tick {tick}: expected {}, found {actual} (drift {difference:+})",
            initial.total
        ),
    })
}
