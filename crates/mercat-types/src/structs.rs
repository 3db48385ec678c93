//! Core entity structs for the Mercat economy.
//!
//! Entities never hold references to each other. Cross-entity links are
//! typed IDs resolved against the owning region, which keeps every entity
//! plain data that can be cloned, compared, and serialized.
//!
//! Each entity is created from a single `New*` description value plus the
//! ID the region allocated for it. There are no chained setters.

use std::collections::VecDeque;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{IndustryId, PersonId, ProblemId, ResourceId, SegmentId};

/// Maximum number of production records kept per industry.
///
/// Older records are evicted first.
pub const PRODUCTION_HISTORY_CAP: usize = 10;

// ---------------------------------------------------------------------------
// Entity lookup
// ---------------------------------------------------------------------------

/// An entity stored in a region collection.
pub trait Entity {
    /// The typed identifier of this entity kind.
    type Id: Copy + Eq;

    /// Return this entity's identifier.
    fn id(&self) -> Self::Id;

    /// Return this entity's display name.
    fn name(&self) -> &str;
}

/// Find an entity by ID with a linear scan.
pub fn find<T: Entity>(items: &[T], id: T::Id) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Find an entity by ID with a linear scan, mutably.
pub fn find_mut<T: Entity>(items: &mut [T], id: T::Id) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Find the first entity with the given name.
pub fn find_by_name<'a, T: Entity>(items: &'a [T], name: &str) -> Option<&'a T> {
    items.iter().find(|item| item.name() == name)
}

macro_rules! impl_entity {
    ($ty:ty, $id:ty) => {
        impl Entity for $ty {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id
            }

            fn name(&self) -> &str {
                &self.name
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Problem
// ---------------------------------------------------------------------------

/// Description of a new problem before the region assigns it an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProblem {
    /// Unique name (e.g. "Food").
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// How critical the need is, 0.0 to 1.0.
    pub severity: Decimal,
    /// Share of the population that feels this need, 0.0 to 1.0.
    pub demand: Decimal,
    /// Survival need (food, water) rather than a pleasure.
    pub is_basic_need: bool,
}

/// A modeled population need such as food or healthcare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Region-assigned identifier.
    pub id: ProblemId,
    /// Unique name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// How critical the need is, 0.0 to 1.0.
    pub severity: Decimal,
    /// Share of the population that feels this need, 0.0 to 1.0.
    pub demand: Decimal,
    /// Survival need rather than a pleasure.
    pub is_basic_need: bool,
}

impl Problem {
    /// Build a problem from its description and allocated ID.
    pub fn new(id: ProblemId, desc: NewProblem) -> Self {
        Self {
            id,
            name: desc.name,
            description: desc.description,
            severity: desc.severity,
            demand: desc.demand,
            is_basic_need: desc.is_basic_need,
        }
    }

    /// Replace the demand weight. Called between runs, never mid-tick.
    pub const fn update_demand(&mut self, demand: Decimal) {
        self.demand = demand;
    }
}

impl_entity!(Problem, ProblemId);

// ---------------------------------------------------------------------------
// Population segment
// ---------------------------------------------------------------------------

/// Description of a new population segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSegment {
    /// Segment name (e.g. "Workers").
    pub name: String,
    /// Needs shared by everyone in the segment.
    pub problems: Vec<ProblemId>,
    /// Descriptive head count.
    pub size: u32,
}

/// A named cohort of people sharing a need set.
///
/// `size` is bookkeeping only; the authoritative membership is the
/// `segments` list on each [`Person`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationSegment {
    /// Region-assigned identifier.
    pub id: SegmentId,
    /// Segment name.
    pub name: String,
    /// Needs shared by everyone in the segment.
    pub problems: Vec<ProblemId>,
    /// Descriptive head count.
    pub size: u32,
}

impl PopulationSegment {
    /// Build a segment from its description and allocated ID.
    pub fn new(id: SegmentId, desc: NewSegment) -> Self {
        Self {
            id,
            name: desc.name,
            problems: desc.problems,
            size: desc.size,
        }
    }

    /// Update the descriptive head count.
    pub const fn update_size(&mut self, size: u32) {
        self.size = size;
    }
}

impl_entity!(PopulationSegment, SegmentId);

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// Description of a new resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    /// Resource name (e.g. "Food", "RawMaterial").
    pub name: String,
    /// Unit label (e.g. "kg", "units").
    pub unit: String,
    /// Starting quantity.
    pub quantity: Decimal,
    /// Zero extraction cost (land, water).
    pub is_free: bool,
    /// Units added back every tick.
    pub regeneration_rate: Decimal,
}

impl NewResource {
    /// A product resource that starts empty and never regenerates.
    pub fn product(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            quantity: Decimal::ZERO,
            is_free: false,
            regeneration_rate: Decimal::ZERO,
        }
    }
}

/// A quantity-tracked material. Acts as an input, an output, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Region-assigned identifier.
    pub id: ResourceId,
    /// Resource name.
    pub name: String,
    /// Current stock. Never negative.
    pub quantity: Decimal,
    /// Unit label.
    pub unit: String,
    /// Zero extraction cost.
    pub is_free: bool,
    /// Units added back every tick.
    pub regeneration_rate: Decimal,
}

impl Resource {
    /// Build a resource from its description and allocated ID.
    pub fn new(id: ResourceId, desc: NewResource) -> Self {
        Self {
            id,
            name: desc.name,
            quantity: desc.quantity,
            unit: desc.unit,
            is_free: desc.is_free,
            regeneration_rate: desc.regeneration_rate,
        }
    }

    /// Whether this resource grows back each tick.
    pub fn is_renewable(&self) -> bool {
        self.regeneration_rate > Decimal::ZERO
    }
}

impl_entity!(Resource, ResourceId);

// ---------------------------------------------------------------------------
// Person
// ---------------------------------------------------------------------------

/// Description of a new person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    /// Display name (e.g. "Person-17").
    pub name: String,
    /// Starting money.
    pub money: Decimal,
    /// Labor hours available per tick.
    pub labor_hours: Decimal,
    /// Segments this person belongs to, in priority order.
    pub segments: Vec<SegmentId>,
}

/// An individual who works for industries and buys their products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Region-assigned identifier.
    pub id: PersonId,
    /// Display name.
    pub name: String,
    /// Personal wealth. Never negative.
    pub money: Decimal,
    /// Labor hours left this tick.
    pub labor_hours: Decimal,
    /// Segments this person belongs to.
    pub segments: Vec<SegmentId>,
}

impl Person {
    /// Build a person from its description and allocated ID.
    pub fn new(id: PersonId, desc: NewPerson) -> Self {
        Self {
            id,
            name: desc.name,
            money: desc.money,
            labor_hours: desc.labor_hours,
            segments: desc.segments,
        }
    }

    /// Whether this person is a member of the given segment.
    pub fn belongs_to(&self, segment: SegmentId) -> bool {
        self.segments.contains(&segment)
    }
}

impl_entity!(Person, PersonId);

// ---------------------------------------------------------------------------
// Industry
// ---------------------------------------------------------------------------

/// One tick of committed production, kept for cost analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
    /// Tick in which the output was committed.
    pub tick: u64,
    /// Units added to each output resource.
    pub units_produced: Decimal,
    /// Labor cost plus resource cost.
    pub total_cost: Decimal,
    /// `total_cost / units_produced`, or zero when nothing was produced.
    pub cost_per_unit: Decimal,
    /// Wages paid for the output.
    pub labor_cost: Decimal,
    /// Nominal cost of consumed inputs.
    pub resource_cost: Decimal,
}

/// Description of a new industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIndustry {
    /// Industry name.
    pub name: String,
    /// Workers needed for full capacity.
    pub labor_needed: u32,
    /// Starting treasury.
    pub initial_capital: Decimal,
    /// Problems this industry's products solve.
    pub solved_problems: Vec<ProblemId>,
    /// Resources consumed 1:1 per unit of output.
    pub inputs: Vec<ResourceId>,
    /// Resources produced.
    pub outputs: Vec<ResourceId>,
}

/// A producer converting labor and inputs into products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Industry {
    /// Region-assigned identifier.
    pub id: IndustryId,
    /// Industry name.
    pub name: String,
    /// Workers needed for full capacity.
    pub labor_needed: u32,
    /// Treasury. Never negative.
    pub money: Decimal,
    /// Problems this industry's products solve.
    pub solved_problems: Vec<ProblemId>,
    /// Resources consumed 1:1 per unit of output.
    pub inputs: Vec<ResourceId>,
    /// Resources produced.
    pub outputs: Vec<ResourceId>,
    /// Most recent production records, oldest first.
    history: VecDeque<ProductionRecord>,
}

impl Industry {
    /// Build an industry from its description and allocated ID.
    pub fn new(id: IndustryId, desc: NewIndustry) -> Self {
        Self {
            id,
            name: desc.name,
            labor_needed: desc.labor_needed,
            money: desc.initial_capital,
            solved_problems: desc.solved_problems,
            inputs: desc.inputs,
            outputs: desc.outputs,
            history: VecDeque::with_capacity(PRODUCTION_HISTORY_CAP),
        }
    }

    /// Whether this industry's products solve the given problem.
    pub fn solves_problem(&self, problem: ProblemId) -> bool {
        self.solved_problems.contains(&problem)
    }

    /// Append a production record, evicting the oldest past the cap.
    pub fn record_production(&mut self, record: ProductionRecord) {
        self.history.push_back(record);
        while self.history.len() > PRODUCTION_HISTORY_CAP {
            self.history.pop_front();
        }
    }

    /// Recent production records, oldest first.
    pub const fn production_history(&self) -> &VecDeque<ProductionRecord> {
        &self.history
    }

    /// Mean cost per unit across the retained history, zero when empty.
    pub fn average_cost_per_unit(&self) -> Decimal {
        let count = u64::try_from(self.history.len()).unwrap_or(u64::MAX);
        if count == 0 {
            return Decimal::ZERO;
        }
        let total = self
            .history
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.cost_per_unit));
        total
            .checked_div(Decimal::from(count))
            .unwrap_or(Decimal::ZERO)
    }

    /// Cost per unit of the most recent record, zero when empty.
    pub fn last_cost_per_unit(&self) -> Decimal {
        self.history
            .back()
            .map_or(Decimal::ZERO, |r| r.cost_per_unit)
    }
}

impl_entity!(Industry, IndustryId);

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn industry() -> Industry {
        Industry::new(
            IndustryId(1),
            NewIndustry {
                name: "Agriculture".to_owned(),
                labor_needed: 4,
                initial_capital: dec!(50000),
                solved_problems: vec![ProblemId(1)],
                inputs: vec![ResourceId(1)],
                outputs: vec![ResourceId(2)],
            },
        )
    }

    fn record(tick: u64, cost_per_unit: Decimal) -> ProductionRecord {
        ProductionRecord {
            tick,
            units_produced: dec!(160),
            total_cost: cost_per_unit * dec!(160),
            cost_per_unit,
            labor_cost: Decimal::ZERO,
            resource_cost: Decimal::ZERO,
        }
    }

    #[test]
    fn new_industry_starts_with_capital_and_no_history() {
        let ind = industry();
        assert_eq!(ind.money, dec!(50000));
        assert!(ind.production_history().is_empty());
        assert!(ind.solves_problem(ProblemId(1)));
        assert!(!ind.solves_problem(ProblemId(2)));
    }

    #[test]
    fn history_is_capped_and_evicts_oldest() {
        let mut ind = industry();
        for tick in 1..=12 {
            ind.record_production(record(tick, dec!(41)));
        }
        let history = ind.production_history();
        assert_eq!(history.len(), PRODUCTION_HISTORY_CAP);
        assert_eq!(history.front().map(|r| r.tick), Some(3));
        assert_eq!(history.back().map(|r| r.tick), Some(12));
    }

    #[test]
    fn cost_statistics() {
        let mut ind = industry();
        assert_eq!(ind.average_cost_per_unit(), Decimal::ZERO);
        assert_eq!(ind.last_cost_per_unit(), Decimal::ZERO);

        ind.record_production(record(1, dec!(40)));
        ind.record_production(record(2, dec!(44)));
        assert_eq!(ind.average_cost_per_unit(), dec!(42));
        assert_eq!(ind.last_cost_per_unit(), dec!(44));
    }

    #[test]
    fn lookup_helpers_scan_in_order() {
        let problems = vec![
            Problem::new(
                ProblemId(1),
                NewProblem {
                    name: "Food".to_owned(),
                    description: String::new(),
                    severity: dec!(0.9),
                    demand: dec!(0.5),
                    is_basic_need: true,
                },
            ),
            Problem::new(
                ProblemId(2),
                NewProblem {
                    name: "Food".to_owned(),
                    description: "duplicate name".to_owned(),
                    severity: dec!(0.1),
                    demand: dec!(0.5),
                    is_basic_need: false,
                },
            ),
        ];
        assert_eq!(find(&problems, ProblemId(2)).map(|p| p.severity), Some(dec!(0.1)));
        assert_eq!(find_by_name(&problems, "Food").map(|p| p.id), Some(ProblemId(1)));
        assert!(find(&problems, ProblemId(9)).is_none());
    }

    #[test]
    fn product_resource_starts_empty() {
        let res = Resource::new(ResourceId(5), NewResource::product("Medical", "treatments"));
        assert_eq!(res.quantity, Decimal::ZERO);
        assert!(!res.is_renewable());
        assert!(!res.is_free);
    }
}
