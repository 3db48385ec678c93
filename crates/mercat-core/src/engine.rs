//! Tick engine: the strictly ordered loop that drives a Mercat region.
//!
//! Each tick runs these phases in order:
//!
//! 1. **Staffing** -- build the worker pool once from the workers segment.
//! 2. **Production** -- for each industry in region order: allocate workers,
//!    compute output, pay wages, consume inputs, commit output, and record
//!    history. Wage and stock failures are recovered per industry.
//! 3. **Market** -- every person buys products for their needs at the
//!    configured price.
//! 4. **Regeneration** -- renewable resources grow back.
//!
//! Parameters are validated before anything moves. Once production has
//! started, a failure in the market or regeneration phase is recorded in
//! [`TickSummary::phase_errors`] and the remaining phases still run.
//! 5. **Reset** -- every person's labor hours return to the standard.
//! 6. **Verify** -- the tick counter advances and wealth conservation is
//!    checked against the snapshot taken at construction.
//!
//! The engine is single-threaded and deterministic: the same region and
//! parameters always produce the same ticks.

use std::collections::VecDeque;

use mercat_market::{MarketResult, run_market};
use mercat_production::{
    OutputCommit, ProductionError, ProductionResult, ResourceConsumption, WageSettlement,
    WorkerPool, calculate_production, commit_output, consume_inputs, pay_workers, reverse_wages,
};
use mercat_types::{Industry, IndustryId, Person, PersonId, ProductionRecord};
use mercat_world::{Regeneration, Region, RegionParts, regenerate_all, replenish};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::config::SimulationParams;
use crate::conservation::{ConservationResult, WealthSnapshot, verify_conservation};
use crate::events::EventLog;
use crate::summary::SimulationSummary;

/// Number of market purchases narrated per tick.
const SAMPLE_PURCHASES: usize = 5;

/// Errors that abort a tick.
///
/// Wage and stock shortages are not errors at this level: they are
/// reported per industry in [`IndustryOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The tick counter cannot advance further.
    #[error("tick counter overflow")]
    TickOverflow,

    /// Arithmetic overflow while deriving tick parameters.
    #[error("arithmetic overflow in tick parameters")]
    ArithmeticOverflow,

    /// A run parameter is out of range. Checked before the tick starts.
    #[error("invalid {field}: {value}")]
    InvalidParameter {
        /// Parameter name.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Economic parameters of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineParams {
    /// Wage per worker-hour.
    pub wage_per_hour: Decimal,
    /// Weeks of work in one tick.
    pub weeks_per_tick: u32,
    /// Work hours in one week.
    pub hours_per_week: Decimal,
    /// Fixed market price per unit.
    pub price_per_unit: Decimal,
    /// Labor hours each person is reset to at the end of a tick.
    pub standard_labor_hours: Decimal,
    /// Name of the segment whose members form the labor pool.
    pub workers_segment: String,
}

impl EngineParams {
    /// Parameters with the given wage and tick length; everything else
    /// takes the configuration defaults.
    pub fn new(wage_per_hour: Decimal, weeks_per_tick: u32, hours_per_week: Decimal) -> Self {
        let defaults = SimulationParams::default();
        Self {
            wage_per_hour,
            weeks_per_tick,
            hours_per_week,
            price_per_unit: defaults.price_per_unit,
            standard_labor_hours: defaults.standard_labor_hours,
            workers_segment: defaults.workers_segment,
        }
    }

    /// Reject negative wages, hours, or prices.
    pub fn validate(&self) -> Result<(), TickError> {
        let fields = [
            ("wage_per_hour", self.wage_per_hour),
            ("hours_per_week", self.hours_per_week),
            ("price_per_unit", self.price_per_unit),
            ("standard_labor_hours", self.standard_labor_hours),
        ];
        match fields.into_iter().find(|(_, value)| *value < Decimal::ZERO) {
            Some((field, value)) => Err(TickError::InvalidParameter { field, value }),
            None => Ok(()),
        }
    }

    /// Work hours in one tick: `weeks_per_tick * hours_per_week`.
    pub fn available_hours(&self) -> Result<Decimal, TickError> {
        Decimal::from(self.weeks_per_tick)
            .checked_mul(self.hours_per_week)
            .ok_or(TickError::ArithmeticOverflow)
    }
}

impl Default for EngineParams {
    fn default() -> Self {
        let defaults = SimulationParams::default();
        Self::new(
            defaults.wage_per_hour,
            defaults.weeks_per_tick,
            defaults.hours_per_week,
        )
    }
}

impl From<&SimulationParams> for EngineParams {
    fn from(params: &SimulationParams) -> Self {
        Self {
            wage_per_hour: params.wage_per_hour,
            weeks_per_tick: params.weeks_per_tick,
            hours_per_week: params.hours_per_week,
            price_per_unit: params.price_per_unit,
            standard_labor_hours: params.standard_labor_hours,
            workers_segment: params.workers_segment.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tick reports
// ---------------------------------------------------------------------------

/// What happened to one industry during the production phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndustryOutcome {
    /// The pool was empty when the industry's turn came.
    NoWorkers,

    /// The treasury could not cover the wage bill. Nothing changed.
    InsufficientFunds {
        /// Total wage bill.
        required: Decimal,
        /// Treasury at the time of the check.
        available: Decimal,
    },

    /// An input was short. Wages were reversed; nothing else changed.
    InsufficientResource {
        /// Name of the short input.
        resource: String,
        /// Quantity required.
        required: Decimal,
        /// Quantity in stock.
        available: Decimal,
        /// `required - available`.
        shortfall: Decimal,
    },

    /// An unexpected production error. The industry was skipped.
    Failed {
        /// Error description.
        reason: String,
    },

    /// Production completed.
    Produced {
        /// Output and cost breakdown.
        result: Box<ProductionResult>,
        /// Inputs drawn.
        consumed: Vec<ResourceConsumption>,
        /// Outputs added.
        output: Vec<OutputCommit>,
        /// Wages paid.
        wages: WageSettlement,
    },
}

impl IndustryOutcome {
    /// Whether the industry produced this tick.
    pub const fn is_produced(&self) -> bool {
        matches!(self, Self::Produced { .. })
    }
}

/// One industry's production phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndustryReport {
    /// The industry.
    pub industry: IndustryId,
    /// Industry name.
    pub name: String,
    /// Workers taken from the pool.
    pub allocated: u32,
    /// Result of the phase.
    pub outcome: IndustryOutcome,
}

/// Everything that happened in one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSummary {
    /// The tick number, starting at 1.
    pub tick: u64,
    /// Work hours in the tick.
    pub available_hours: Decimal,
    /// Pool size before production.
    pub workers_available: usize,
    /// Pool size after production.
    pub workers_unassigned: usize,
    /// Per-industry production, in region order.
    pub industries: Vec<IndustryReport>,
    /// Units produced across all industries.
    pub units_produced: Decimal,
    /// Wages paid and kept across all industries.
    pub wages_paid: Decimal,
    /// Market round.
    pub market: MarketResult,
    /// Resources that regenerated.
    pub regeneration: Vec<Regeneration>,
    /// Market or regeneration failures. The tick still completed.
    pub phase_errors: Vec<String>,
    /// Conservation verdict after the tick.
    pub conservation: ConservationResult,
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Owns a region and advances it tick by tick.
#[derive(Debug)]
pub struct Engine<L: EventLog> {
    region: Region,
    params: EngineParams,
    log: L,
    tick: u64,
    initial: WealthSnapshot,
}

impl<L: EventLog> Engine<L> {
    /// Take ownership of `region` and snapshot its wealth. The tick counter
    /// starts at 0.
    pub fn new(region: Region, params: EngineParams, log: L) -> Self {
        let initial = WealthSnapshot::capture(&region);
        info!(
            region = region.name(),
            total_wealth = %initial.total,
            wage = %params.wage_per_hour,
            weeks_per_tick = params.weeks_per_tick,
            "Engine created"
        );
        Self {
            region,
            params,
            log,
            tick: 0,
            initial,
        }
    }

    /// Number of completed ticks.
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// The simulated region.
    pub const fn region(&self) -> &Region {
        &self.region
    }

    /// The run parameters.
    pub const fn params(&self) -> &EngineParams {
        &self.params
    }

    /// The injected event log.
    pub const fn event_log(&self) -> &L {
        &self.log
    }

    /// Retained production records of an industry, oldest first.
    pub fn production_history(&self, id: IndustryId) -> Option<&VecDeque<ProductionRecord>> {
        self.region.industry(id).map(Industry::production_history)
    }

    /// Current total wealth.
    pub fn total_wealth(&self) -> Decimal {
        self.region.total_wealth()
    }

    /// Total wealth at construction.
    pub const fn initial_wealth(&self) -> Decimal {
        self.initial.total
    }

    /// Compare current wealth with the construction snapshot.
    pub fn verify_conservation(&self) -> ConservationResult {
        verify_conservation(self.tick, &self.initial, &self.region)
    }

    /// Read-only summary of the region's current state.
    pub fn final_summary(&self) -> SimulationSummary {
        SimulationSummary::collect(&self.region, &self.initial, self.tick)
    }

    /// Run `count` ticks, then emit the final summary through the event log.
    pub fn run_ticks(&mut self, count: u64) -> Result<Vec<TickSummary>, TickError> {
        let mut summaries = Vec::new();
        for _ in 0..count {
            summaries.push(self.run_tick()?);
        }
        if self.log.is_enabled() {
            let lines = self.final_summary().lines();
            self.log.log_events(&lines);
        }
        Ok(summaries)
    }

    /// Run one tick.
    #[allow(clippy::too_many_lines)]
    pub fn run_tick(&mut self) -> Result<TickSummary, TickError> {
        self.params.validate()?;
        let tick = self.tick.checked_add(1).ok_or(TickError::TickOverflow)?;
        let available_hours = self.params.available_hours()?;
        self.log.log_tick_start(tick);

        // Phase 1: Staffing
        let mut pool = WorkerPool::new(self.region.members_of(&self.params.workers_segment));
        let workers_available = pool.remaining();
        self.narrate(|| vec![format!("Available workers: {workers_available}")]);

        // Phase 2: Production
        let mut industries = Vec::with_capacity(self.region.industries().len());
        for index in 0..self.region.industries().len() {
            let parts = self.region.parts_mut();
            let Some(report) = process_industry(
                parts,
                index,
                &mut pool,
                tick,
                available_hours,
                self.params.wage_per_hour,
            ) else {
                continue;
            };
            if self.log.is_enabled() {
                let lines = industry_lines(&report);
                self.log.log_events(&lines);
            }
            industries.push(report);
        }

        let mut units_produced = Decimal::ZERO;
        let mut wages_paid = Decimal::ZERO;
        for report in &industries {
            if let IndustryOutcome::Produced { result, wages, .. } = &report.outcome {
                units_produced = units_produced.saturating_add(result.units_produced);
                wages_paid = wages_paid.saturating_add(wages.total);
            }
        }
        let workers_unassigned = pool.remaining();
        let producing = industries.iter().filter(|r| r.outcome.is_produced()).count();
        self.narrate(|| {
            vec![
                format!(
                    "Production summary: {producing} of {} industries produced {units_produced:.2} units, ${wages_paid:.2} in wages",
                    industries.len()
                ),
                format!("{workers_unassigned} workers unemployed this tick"),
            ]
        });

        // Phase 3: Market
        let mut phase_errors = Vec::new();
        let market = match run_market(&mut self.region, self.params.price_per_unit) {
            Ok(market) => market,
            Err(e) => {
                error!(tick, error = %e, "Market round failed");
                phase_errors.push(format!("market: {e}"));
                MarketResult::default()
            }
        };
        if self.log.is_enabled() {
            let lines = market_lines(&self.region, &market);
            self.log.log_events(&lines);
        }

        // Phase 4: Regeneration
        let regenerated = regenerate_all(self.region.parts_mut().resources);
        let regeneration = match regenerated {
            Ok(regeneration) => {
                self.narrate(|| regeneration_lines(&regeneration));
                regeneration
            }
            Err(e) => {
                error!(tick, error = %e, "Regeneration failed");
                phase_errors.push(format!("regeneration: {e}"));
                Vec::new()
            }
        };
        if !phase_errors.is_empty() {
            self.narrate(|| phase_errors.iter().map(|e| format!("Phase failed: {e}")).collect());
        }

        // Phase 5: Reset
        let standard = self.params.standard_labor_hours;
        for person in self.region.parts_mut().people.iter_mut() {
            person.labor_hours = standard;
        }

        // Phase 6: Verify
        self.tick = tick;
        let conservation = self.verify_conservation();
        if let ConservationResult::Anomaly(anomaly) = &conservation {
            error!(
                tick,
                expected = %anomaly.expected,
                actual = %anomaly.actual,
                difference = %anomaly.difference,
                "{}",
                anomaly.message
            );
        }

        let total_wealth = self.total_wealth();
        self.narrate(|| vec![format!("Tick {tick} complete: total wealth ${total_wealth:.2}")]);
        info!(
            tick,
            units = %units_produced,
            wages = %wages_paid,
            purchases = market.purchases.len(),
            balanced = conservation.is_balanced(),
            "Tick complete"
        );

        Ok(TickSummary {
            tick,
            available_hours,
            workers_available,
            workers_unassigned,
            industries,
            units_produced,
            wages_paid,
            market,
            regeneration,
            phase_errors,
            conservation,
        })
    }

    /// Log the lines built by `build`, skipping the work when disabled.
    fn narrate(&mut self, build: impl FnOnce() -> Vec<String>) {
        if self.log.is_enabled() {
            let lines = build();
            self.log.log_events(&lines);
        }
    }
}

// ---------------------------------------------------------------------------
// Production phase
// ---------------------------------------------------------------------------

/// Run one industry's production phase. Returns `None` if `index` is out of
/// range.
#[allow(clippy::too_many_lines)]
fn process_industry(
    parts: RegionParts<'_>,
    index: usize,
    pool: &mut WorkerPool,
    tick: u64,
    available_hours: Decimal,
    wage: Decimal,
) -> Option<IndustryReport> {
    let RegionParts {
        industries,
        people,
        resources,
        ..
    } = parts;
    let industry = industries.get_mut(index)?;

    let workers = pool.take_for(industry);
    let allocated = u32::try_from(workers.len()).unwrap_or(u32::MAX);
    let id = industry.id;
    let name = industry.name.clone();
    let report = |outcome: IndustryOutcome| IndustryReport {
        industry: id,
        name: name.clone(),
        allocated,
        outcome,
    };
    if workers.is_empty() {
        debug!(industry = %industry.name, "No workers available");
        return Some(report(IndustryOutcome::NoWorkers));
    }

    let result = match calculate_production(industry, resources, allocated, available_hours, wage)
    {
        Ok(result) => result,
        Err(e) => return Some(report(failed(&industry.name, &e))),
    };

    let wages = match pay_workers(industry, people, &workers, available_hours, wage) {
        Ok(settlement) => settlement,
        Err(ProductionError::InsufficientFunds {
            required,
            available,
            ..
        }) => {
            warn!(industry = %industry.name, %required, %available, "Cannot pay wages");
            return Some(report(IndustryOutcome::InsufficientFunds {
                required,
                available,
            }));
        }
        Err(e) => return Some(report(failed(&industry.name, &e))),
    };

    let consumed = match consume_inputs(industry, resources, result.units_produced) {
        Ok(consumed) => consumed,
        Err(e) => {
            if let Err(reversal) = reverse_wages(&wages, industry, people) {
                return Some(report(failed(&industry.name, &reversal)));
            }
            return Some(report(match e {
                ProductionError::InsufficientResource {
                    resource,
                    required,
                    available,
                    shortfall,
                } => {
                    warn!(industry = %industry.name, %resource, %shortfall, "Resource shortage");
                    IndustryOutcome::InsufficientResource {
                        resource,
                        required,
                        available,
                        shortfall,
                    }
                }
                other => failed(&industry.name, &other),
            }));
        }
    };

    let output = match commit_output(industry, resources, result.units_produced) {
        Ok(output) => output,
        Err(e) => {
            for input in &consumed {
                if let Some(resource) = resources.iter_mut().find(|r| r.id == input.resource) {
                    if let Err(restore) = replenish(resource, input.quantity) {
                        return Some(report(failed(&industry.name, &restore)));
                    }
                }
            }
            if let Err(reversal) = reverse_wages(&wages, industry, people) {
                return Some(report(failed(&industry.name, &reversal)));
            }
            return Some(report(failed(&industry.name, &e)));
        }
    };

    industry.record_production(ProductionRecord {
        tick,
        units_produced: result.units_produced,
        total_cost: result.total_cost,
        cost_per_unit: result.cost_per_unit,
        labor_cost: result.labor_cost,
        resource_cost: result.resource_cost,
    });
    deduct_hours(people, &workers, available_hours);

    debug!(
        industry = %industry.name,
        units = %result.units_produced,
        cost = %result.total_cost,
        "Production complete"
    );

    Some(report(IndustryOutcome::Produced {
        result: Box::new(result),
        consumed,
        output,
        wages,
    }))
}

fn failed(industry: &str, e: &dyn std::error::Error) -> IndustryOutcome {
    warn!(industry, error = %e, "Industry skipped");
    IndustryOutcome::Failed {
        reason: e.to_string(),
    }
}

/// Subtract worked hours from each worker, stopping at zero.
fn deduct_hours(people: &mut [Person], workers: &[PersonId], hours: Decimal) {
    for &worker in workers {
        if let Some(person) = people.iter_mut().find(|p| p.id == worker) {
            person.labor_hours = person.labor_hours.saturating_sub(hours).max(Decimal::ZERO);
        }
    }
}

// ---------------------------------------------------------------------------
// Event text
// ---------------------------------------------------------------------------

fn industry_lines(report: &IndustryReport) -> Vec<String> {
    let mut lines = vec![format!("--- {} ---", report.name)];
    match &report.outcome {
        IndustryOutcome::NoWorkers => lines.push("No workers available".to_owned()),
        IndustryOutcome::InsufficientFunds {
            required,
            available,
        } => {
            lines.push(format!("Allocated {} workers", report.allocated));
            lines.push(format!(
                "Cannot pay wages: needs ${required:.2}, has ${available:.2}"
            ));
        }
        IndustryOutcome::InsufficientResource {
            resource,
            required,
            available,
            shortfall,
        } => {
            lines.push(format!("Allocated {} workers", report.allocated));
            lines.push(format!(
                "Resource shortage: {resource} needs {required:.2}, has {available:.2} (short by {shortfall:.2})"
            ));
            lines.push("Wages reversed, production skipped".to_owned());
        }
        IndustryOutcome::Failed { reason } => {
            lines.push(format!("Production skipped: {reason}"));
        }
        IndustryOutcome::Produced {
            result,
            consumed,
            output,
            wages,
        } => {
            lines.push(format!(
                "Allocated {} workers (needs {})",
                report.allocated, result.labor_needed
            ));
            if result.is_understaffed() {
                lines.push(format!(
                    "Production capacity: {:.1}% ({}/{} workers)",
                    result.capacity_percent(),
                    result.labor_used,
                    result.labor_needed
                ));
            }
            lines.push(format!(
                "Paid ${:.2} in wages to {} workers",
                wages.total,
                wages.payments.len()
            ));
            for input in consumed {
                lines.push(format!(
                    "Consumed {:.2} {} (cost: ${:.2})",
                    input.quantity, input.name, input.cost
                ));
            }
            for product in output {
                lines.push(format!("Produced {:.2} {}", product.added, product.name));
            }
            lines.push(format!(
                "Total cost: ${:.2} (Labor: ${:.2}, Resources: ${:.2}, Per unit: ${:.2})",
                result.total_cost, result.labor_cost, result.resource_cost, result.cost_per_unit
            ));
        }
    }
    lines
}

fn market_lines(region: &Region, market: &MarketResult) -> Vec<String> {
    let mut lines = vec![
        "--- Market ---".to_owned(),
        format!("Total spent: ${:.2}", market.total_spent),
        format!("Purchases made: {}", market.purchases.len()),
        format!("Industry revenue: ${:.2}", market.total_revenue),
        format!(
            "People satisfied: {}, unsatisfied: {}",
            market.people_satisfied, market.people_unsatisfied
        ),
    ];
    if market.failed_attempts.total() > 0 {
        lines.push(format!(
            "Failed attempts: {} out of stock, {} insufficient funds",
            market.failed_attempts.out_of_stock, market.failed_attempts.insufficient_funds
        ));
    }
    for purchase in market.purchases.iter().take(SAMPLE_PURCHASES) {
        let product = region.resource(purchase.product).map_or("?", |r| r.name.as_str());
        let problem = region.problem(purchase.problem).map_or("?", |p| p.name.as_str());
        lines.push(format!(
            "Person {} bought {} {product} for ${:.2} (solving {problem})",
            purchase.person, purchase.quantity, purchase.total_cost
        ));
    }
    lines
}

fn regeneration_lines(regeneration: &[Regeneration]) -> Vec<String> {
    let mut lines = vec!["--- Regeneration ---".to_owned()];
    if regeneration.is_empty() {
        lines.push("No renewable resources".to_owned());
    }
    for r in regeneration {
        lines.push(format!(
            "{} regenerated +{} {} (total: {:.2})",
            r.name, r.added, r.unit, r.quantity_after
        ));
    }
    lines
}
