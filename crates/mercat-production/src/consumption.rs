//! Input consumption and output commits for confirmed production.
//!
//! One unit of output consumes one unit of each declared input. An input
//! declared twice is consumed twice, and its requirement is checked as the
//! sum of both declarations.
//!
//! Consumption is check-all then consume-all: if any input is short,
//! nothing is drawn.

use std::collections::BTreeMap;

use mercat_types::{Industry, Resource, ResourceId, find};
use mercat_world::{draw, replenish};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::unit_cost;
use crate::error::ProductionError;

/// One declared input drawn for production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConsumption {
    /// The consumed resource.
    pub resource: ResourceId,
    /// Resource name, for reporting.
    pub name: String,
    /// Quantity drawn.
    pub quantity: Decimal,
    /// Nominal cost: zero for free resources.
    pub cost: Decimal,
}

/// Output added to one product resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCommit {
    /// The product resource.
    pub resource: ResourceId,
    /// Product name, for reporting.
    pub name: String,
    /// Units added.
    pub added: Decimal,
    /// Unit label.
    pub unit: String,
}

/// Draw `units` of every input the industry declares.
///
/// # Errors
///
/// Returns [`ProductionError::InsufficientResource`] naming the first short
/// input (in declaration order), or [`ProductionError::ResourceNotFound`].
/// Either way every resource quantity is unchanged.
pub fn consume_inputs(
    industry: &Industry,
    resources: &mut [Resource],
    units: Decimal,
) -> Result<Vec<ResourceConsumption>, ProductionError> {
    let mut required: BTreeMap<ResourceId, Decimal> = BTreeMap::new();
    for &input in &industry.inputs {
        let slot = required.entry(input).or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(units)
            .ok_or(ProductionError::ArithmeticOverflow)?;
    }

    for &input in &industry.inputs {
        let resource = find(resources, input).ok_or(ProductionError::ResourceNotFound(input))?;
        let needed = required.get(&input).copied().unwrap_or(units);
        if resource.quantity < needed {
            return Err(ProductionError::InsufficientResource {
                resource: resource.name.clone(),
                required: needed,
                available: resource.quantity,
                shortfall: needed
                    .checked_sub(resource.quantity)
                    .ok_or(ProductionError::ArithmeticOverflow)?,
            });
        }
    }

    let mut consumed = Vec::with_capacity(industry.inputs.len());
    for &input in &industry.inputs {
        let Some(resource) = resources.iter_mut().find(|r| r.id == input) else {
            continue;
        };
        draw(resource, units)?;
        let cost = units
            .checked_mul(unit_cost(resource))
            .ok_or(ProductionError::ArithmeticOverflow)?;
        consumed.push(ResourceConsumption {
            resource: input,
            name: resource.name.clone(),
            quantity: units,
            cost,
        });
    }

    debug!(industry = %industry.name, inputs = consumed.len(), %units, "Inputs consumed");
    Ok(consumed)
}

/// Add `units` to every output the industry declares.
///
/// # Errors
///
/// Returns [`ProductionError::ResourceNotFound`] for an unknown output or
/// [`ProductionError::ArithmeticOverflow`]. Outputs are resolved and sums
/// checked before any stock changes.
pub fn commit_output(
    industry: &Industry,
    resources: &mut [Resource],
    units: Decimal,
) -> Result<Vec<OutputCommit>, ProductionError> {
    let mut added: BTreeMap<ResourceId, Decimal> = BTreeMap::new();
    for &output in &industry.outputs {
        let resource = find(resources, output).ok_or(ProductionError::ResourceNotFound(output))?;
        let slot = added.entry(output).or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(units)
            .ok_or(ProductionError::ArithmeticOverflow)?;
        if resource.quantity.checked_add(*slot).is_none() {
            return Err(ProductionError::ArithmeticOverflow);
        }
    }

    let mut commits = Vec::with_capacity(industry.outputs.len());
    for &output in &industry.outputs {
        let Some(resource) = resources.iter_mut().find(|r| r.id == output) else {
            continue;
        };
        replenish(resource, units)?;
        commits.push(OutputCommit {
            resource: output,
            name: resource.name.clone(),
            added: units,
            unit: resource.unit.clone(),
        });
    }
    Ok(commits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mercat_types::{IndustryId, NewIndustry, NewResource};
    use rust_decimal_macros::dec;

    use super::*;

    fn resource(id: u64, quantity: Decimal, is_free: bool) -> Resource {
        Resource::new(
            ResourceId(id),
            NewResource {
                name: format!("R{id}"),
                unit: "kg".to_owned(),
                quantity,
                is_free,
                regeneration_rate: Decimal::ZERO,
            },
        )
    }

    fn industry(inputs: Vec<ResourceId>, outputs: Vec<ResourceId>) -> Industry {
        Industry::new(
            IndustryId(1),
            NewIndustry {
                name: "Mill".to_owned(),
                labor_needed: 1,
                initial_capital: dec!(100),
                solved_problems: Vec::new(),
                inputs,
                outputs,
            },
        )
    }

    #[test]
    fn consumption_draws_each_input() {
        let mut resources = vec![resource(1, dec!(100), false), resource(2, dec!(50), true)];
        let ind = industry(vec![ResourceId(1), ResourceId(2)], Vec::new());

        let consumed = consume_inputs(&ind, &mut resources, dec!(20)).unwrap();

        assert_eq!(consumed.len(), 2);
        assert_eq!(consumed.first().map(|c| c.cost), Some(dec!(20)));
        assert_eq!(consumed.get(1).map(|c| c.cost), Some(Decimal::ZERO));
        assert_eq!(resources.first().map(|r| r.quantity), Some(dec!(80)));
        assert_eq!(resources.get(1).map(|r| r.quantity), Some(dec!(30)));
    }

    #[test]
    fn shortage_leaves_stock_untouched() {
        let mut resources = vec![resource(1, dec!(100), false), resource(2, dec!(5), false)];
        let ind = industry(vec![ResourceId(1), ResourceId(2)], Vec::new());

        let result = consume_inputs(&ind, &mut resources, dec!(10));

        assert!(matches!(
            result,
            Err(ProductionError::InsufficientResource { ref resource, required, available, shortfall })
                if resource == "R2"
                    && required == dec!(10)
                    && available == dec!(5)
                    && shortfall == dec!(5)
        ));
        assert_eq!(resources.first().map(|r| r.quantity), Some(dec!(100)));
        assert_eq!(resources.get(1).map(|r| r.quantity), Some(dec!(5)));
    }

    #[test]
    fn duplicated_input_is_checked_in_aggregate() {
        let mut resources = vec![resource(1, dec!(15), false)];
        let ind = industry(vec![ResourceId(1), ResourceId(1)], Vec::new());

        let result = consume_inputs(&ind, &mut resources, dec!(10));

        assert!(matches!(
            result,
            Err(ProductionError::InsufficientResource { required, .. }) if required == dec!(20)
        ));
        assert_eq!(resources.first().map(|r| r.quantity), Some(dec!(15)));
    }

    #[test]
    fn no_inputs_consumes_nothing() {
        let mut resources = vec![resource(1, dec!(1), false)];
        let ind = industry(Vec::new(), vec![ResourceId(1)]);
        assert!(consume_inputs(&ind, &mut resources, dec!(160)).unwrap().is_empty());
        assert_eq!(resources.first().map(|r| r.quantity), Some(dec!(1)));
    }

    #[test]
    fn output_is_added_to_every_product() {
        let mut resources = vec![resource(1, Decimal::ZERO, false), resource(2, dec!(3), false)];
        let ind = industry(Vec::new(), vec![ResourceId(1), ResourceId(2)]);

        let commits = commit_output(&ind, &mut resources, dec!(16)).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(resources.first().map(|r| r.quantity), Some(dec!(16)));
        assert_eq!(resources.get(1).map(|r| r.quantity), Some(dec!(19)));
    }

    #[test]
    fn unknown_output_commits_nothing() {
        let mut resources = vec![resource(1, Decimal::ZERO, false)];
        let ind = industry(Vec::new(), vec![ResourceId(1), ResourceId(4)]);

        let result = commit_output(&ind, &mut resources, dec!(16));

        assert!(matches!(result, Err(ProductionError::ResourceNotFound(ResourceId(4)))));
        assert_eq!(resources.first().map(|r| r.quantity), Some(Decimal::ZERO));
    }
}
