//! Scenario builder: turns a [`ScenarioConfig`] into a populated [`Region`].
//!
//! Validation fails fast, before any entity is registered:
//!
//! - the region needs a name, at least one problem, and at least one
//!   industry;
//! - the population must be non-empty and segment percentages must sum to
//!   1.0 within 0.01.
//!
//! Name references are then resolved while registering. Unknown problems
//! and unknown industry inputs are errors. Unknown industry outputs are
//! created as empty product resources measured in `units`.
//!
//! Each segment receives `floor(total_size * percentage)` people, named
//! `Person-1`, `Person-2`, ... across all segments in declaration order.

use mercat_types::{
    NewIndustry, NewPerson, NewProblem, NewResource, NewSegment, ProblemId, ResourceId,
};
use mercat_world::{Region, WorldError};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::info;

use crate::config::{ScenarioConfig, SegmentConfig};

/// Unit label for products created implicitly from industry outputs.
pub const DEFAULT_PRODUCT_UNIT: &str = "units";

/// Allowed deviation of the segment percentage sum from 1.0.
const PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Errors that can occur while building a region from configuration.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The region has no name.
    #[error("region name is required")]
    MissingRegionName,

    /// No problems were defined.
    #[error("at least one problem is required")]
    NoProblems,

    /// No industries were defined.
    #[error("at least one industry is required")]
    NoIndustries,

    /// The population is empty.
    #[error("population size must be positive")]
    EmptyPopulation,

    /// Segment percentages do not sum to 1.0.
    #[error("population segment percentages must sum to 1.0, got {0}")]
    PercentageSum(Decimal),

    /// An industry or segment references a problem that was not defined.
    #[error("{owner} references unknown problem: {problem}")]
    UnknownProblem {
        /// The referencing industry or segment.
        owner: String,
        /// The missing problem name.
        problem: String,
    },

    /// An industry references an input resource that was not defined.
    #[error("industry {industry} references unknown input resource: {resource}")]
    UnknownInput {
        /// The referencing industry.
        industry: String,
        /// The missing resource name.
        resource: String,
    },

    /// A simulation parameter is negative.
    #[error("simulation {field} must not be negative, got {value}")]
    InvalidParameter {
        /// Parameter name.
        field: &'static str,
        /// The rejected value.
        value: Decimal,
    },

    /// A segment's head count does not fit in `u32`.
    #[error("segment {0} is too large")]
    SegmentTooLarge(String),

    /// Registering an entity failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Build a region from configuration.
///
/// # Errors
///
/// Returns a [`ScenarioError`] describing the first problem found.
pub fn build_region(config: &ScenarioConfig) -> Result<Region, ScenarioError> {
    validate(config)?;

    let mut region =
        Region::new(config.region.name.clone(), config.region.description.clone());

    for problem in &config.problems {
        region.add_problem(NewProblem {
            name: problem.name.clone(),
            description: problem.description.clone(),
            severity: problem.severity,
            demand: problem.demand,
            is_basic_need: problem.basic_need,
        })?;
    }

    for resource in &config.resources {
        region.add_resource(NewResource {
            name: resource.name.clone(),
            unit: resource.unit.clone(),
            quantity: resource.initial_quantity,
            is_free: resource.is_free,
            regeneration_rate: resource.regeneration_rate,
        })?;
    }

    for industry in &config.industries {
        let solved_problems = resolve_problems(&region, &industry.name, &industry.solves_problems)?;

        let mut inputs = Vec::with_capacity(industry.input_resources.len());
        for name in &industry.input_resources {
            let id = region
                .resource_by_name(name)
                .map(|r| r.id)
                .ok_or_else(|| ScenarioError::UnknownInput {
                    industry: industry.name.clone(),
                    resource: name.clone(),
                })?;
            inputs.push(id);
        }

        let mut outputs: Vec<ResourceId> = Vec::with_capacity(industry.output_resources.len());
        for name in &industry.output_resources {
            let existing = region.resource_by_name(name).map(|r| r.id);
            let id = match existing {
                Some(id) => id,
                None => {
                    region.add_resource(NewResource::product(name.clone(), DEFAULT_PRODUCT_UNIT))?
                }
            };
            outputs.push(id);
        }

        region.add_industry(NewIndustry {
            name: industry.name.clone(),
            labor_needed: industry.labor_needed,
            initial_capital: industry.initial_capital,
            solved_problems,
            inputs,
            outputs,
        })?;
    }

    let mut person_number: u64 = 0;
    for segment in &config.population.segments {
        let count = head_count(config.population.total_size, segment)?;
        let problems = resolve_problems(&region, &segment.name, &segment.has_problems)?;
        let segment_id = region.add_segment(NewSegment {
            name: segment.name.clone(),
            problems,
            size: count,
        })?;

        for _ in 0..count {
            person_number = person_number.saturating_add(1);
            region.add_person(NewPerson {
                name: format!("Person-{person_number}"),
                money: segment.initial_money,
                labor_hours: segment.labor_hours,
                segments: vec![segment_id],
            })?;
        }
    }

    info!(
        region = region.name(),
        industries = region.industries().len(),
        people = region.people().len(),
        segments = region.segments().len(),
        resources = region.resources().len(),
        "Region built"
    );

    Ok(region)
}

fn validate(config: &ScenarioConfig) -> Result<(), ScenarioError> {
    if config.region.name.trim().is_empty() {
        return Err(ScenarioError::MissingRegionName);
    }
    if config.problems.is_empty() {
        return Err(ScenarioError::NoProblems);
    }
    if config.industries.is_empty() {
        return Err(ScenarioError::NoIndustries);
    }
    if config.population.total_size == 0 {
        return Err(ScenarioError::EmptyPopulation);
    }

    let sim = &config.simulation;
    for (field, value) in [
        ("wage_per_hour", sim.wage_per_hour),
        ("hours_per_week", sim.hours_per_week),
        ("price_per_unit", sim.price_per_unit),
        ("standard_labor_hours", sim.standard_labor_hours),
    ] {
        if value < Decimal::ZERO {
            return Err(ScenarioError::InvalidParameter { field, value });
        }
    }

    let total = config
        .population
        .segments
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.percentage));
    let deviation = total.saturating_sub(Decimal::ONE).abs();
    if deviation > PERCENTAGE_TOLERANCE {
        return Err(ScenarioError::PercentageSum(total));
    }
    Ok(())
}

fn resolve_problems(
    region: &Region,
    owner: &str,
    names: &[String],
) -> Result<Vec<ProblemId>, ScenarioError> {
    names
        .iter()
        .map(|name| {
            region
                .problem_by_name(name)
                .map(|p| p.id)
                .ok_or_else(|| ScenarioError::UnknownProblem {
                    owner: owner.to_owned(),
                    problem: name.clone(),
                })
        })
        .collect()
}

/// `floor(total_size * percentage)`, clamped at zero.
fn head_count(total_size: u32, segment: &SegmentConfig) -> Result<u32, ScenarioError> {
    let exact = Decimal::from(total_size)
        .checked_mul(segment.percentage)
        .ok_or_else(|| ScenarioError::SegmentTooLarge(segment.name.clone()))?;
    if exact <= Decimal::ZERO {
        return Ok(0);
    }
    exact
        .floor()
        .to_u32()
        .ok_or_else(|| ScenarioError::SegmentTooLarge(segment.name.clone()))
}
