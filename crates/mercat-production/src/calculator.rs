//! Production costing.
//!
//! Output scales linearly with staffing: an industry at half its labor need
//! produces half the units it would at full capacity. One unit of output
//! consumes one unit of every declared input.
//!
//! ```text
//! labor_used    = min(allocated, labor_needed)
//! capacity      = labor_used / labor_needed          (0 if labor_needed == 0)
//! units         = capacity * available_hours
//! labor_cost    = labor_used * wage_rate * available_hours
//! resource_cost = sum(units * unit_cost(input))
//! cost_per_unit = (labor_cost + resource_cost) / units   (0 if units == 0)
//! ```

use mercat_types::{Industry, Resource, find};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProductionError;

/// Nominal cost of one unit of a non-free input.
pub const DEFAULT_UNIT_COST: Decimal = Decimal::ONE;

/// Cost of one unit of `resource`: zero when free.
pub const fn unit_cost(resource: &Resource) -> Decimal {
    if resource.is_free {
        Decimal::ZERO
    } else {
        DEFAULT_UNIT_COST
    }
}

/// Planned output and cost for one industry in one tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionResult {
    /// Units added to each output resource if the plan is committed.
    pub units_produced: Decimal,
    /// Workers counted toward capacity.
    pub labor_used: u32,
    /// Workers needed for full capacity.
    pub labor_needed: u32,
    /// Wages owed for the tick.
    pub labor_cost: Decimal,
    /// Nominal cost of the inputs consumed.
    pub resource_cost: Decimal,
    /// `labor_cost + resource_cost`.
    pub total_cost: Decimal,
    /// `total_cost / units_produced`, or zero.
    pub cost_per_unit: Decimal,
}

impl ProductionResult {
    /// Staffing as a percentage of need, zero when nothing is needed.
    pub fn capacity_percent(&self) -> Decimal {
        if self.labor_needed == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.labor_used)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|v| v.checked_div(Decimal::from(self.labor_needed)))
            .unwrap_or(Decimal::ZERO)
    }

    /// Whether the industry ran below its labor need.
    pub const fn is_understaffed(&self) -> bool {
        self.labor_used < self.labor_needed
    }
}

/// Compute the output and cost of running `industry` with `allocated`
/// workers for `available_hours`.
///
/// Pure: nothing is paid, consumed, or recorded.
///
/// # Errors
///
/// Returns [`ProductionError::ResourceNotFound`] if an input does not
/// resolve in `resources`, or [`ProductionError::ArithmeticOverflow`].
pub fn calculate_production(
    industry: &Industry,
    resources: &[Resource],
    allocated: u32,
    available_hours: Decimal,
    wage_rate: Decimal,
) -> Result<ProductionResult, ProductionError> {
    let labor_used = allocated.min(industry.labor_needed);

    let capacity = if industry.labor_needed == 0 {
        Decimal::ZERO
    } else {
        Decimal::from(labor_used)
            .checked_div(Decimal::from(industry.labor_needed))
            .ok_or(ProductionError::ArithmeticOverflow)?
    };

    let units_produced = capacity
        .checked_mul(available_hours)
        .ok_or(ProductionError::ArithmeticOverflow)?;

    let labor_cost = Decimal::from(labor_used)
        .checked_mul(wage_rate)
        .and_then(|v| v.checked_mul(available_hours))
        .ok_or(ProductionError::ArithmeticOverflow)?;

    let mut resource_cost = Decimal::ZERO;
    for &input in &industry.inputs {
        let resource = find(resources, input).ok_or(ProductionError::ResourceNotFound(input))?;
        let cost = units_produced
            .checked_mul(unit_cost(resource))
            .ok_or(ProductionError::ArithmeticOverflow)?;
        resource_cost = resource_cost
            .checked_add(cost)
            .ok_or(ProductionError::ArithmeticOverflow)?;
    }

    let total_cost = labor_cost
        .checked_add(resource_cost)
        .ok_or(ProductionError::ArithmeticOverflow)?;

    let cost_per_unit = if units_produced > Decimal::ZERO {
        total_cost
            .checked_div(units_produced)
            .ok_or(ProductionError::ArithmeticOverflow)?
    } else {
        Decimal::ZERO
    };

    Ok(ProductionResult {
        units_produced,
        labor_used,
        labor_needed: industry.labor_needed,
        labor_cost,
        resource_cost,
        total_cost,
        cost_per_unit,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mercat_types::{IndustryId, NewIndustry, NewResource, ResourceId};
    use rust_decimal_macros::dec;

    use super::*;

    fn industry(labor_needed: u32, inputs: Vec<ResourceId>) -> Industry {
        Industry::new(
            IndustryId(1),
            NewIndustry {
                name: "Test".to_owned(),
                labor_needed,
                initial_capital: dec!(10000),
                solved_problems: Vec::new(),
                inputs,
                outputs: Vec::new(),
            },
        )
    }

    fn resource(id: u64, is_free: bool) -> Resource {
        Resource::new(
            ResourceId(id),
            NewResource {
                name: format!("R{id}"),
                unit: "units".to_owned(),
                quantity: dec!(1000),
                is_free,
                regeneration_rate: Decimal::ZERO,
            },
        )
    }

    #[test]
    fn half_staffed_industry_produces_half() {
        let ind = industry(10, Vec::new());
        let result = calculate_production(&ind, &[], 5, dec!(40), dec!(10)).unwrap();

        assert_eq!(result.labor_used, 5);
        assert_eq!(result.units_produced, dec!(20));
        assert_eq!(result.labor_cost, dec!(2000));
        assert_eq!(result.resource_cost, Decimal::ZERO);
        assert_eq!(result.cost_per_unit, dec!(100));
        assert_eq!(result.capacity_percent(), dec!(50));
        assert!(result.is_understaffed());
    }

    #[test]
    fn full_capacity_produces_available_hours() {
        let ind = industry(4, Vec::new());
        let result = calculate_production(&ind, &[], 4, dec!(160), dec!(10)).unwrap();
        assert_eq!(result.units_produced, dec!(160));
        assert!(!result.is_understaffed());
    }

    #[test]
    fn excess_labor_is_not_counted() {
        let ind = industry(2, Vec::new());
        let result = calculate_production(&ind, &[], 7, dec!(40), dec!(10)).unwrap();
        assert_eq!(result.labor_used, 2);
        assert_eq!(result.units_produced, dec!(40));
    }

    #[test]
    fn zero_need_produces_nothing() {
        let ind = industry(0, Vec::new());
        let result = calculate_production(&ind, &[], 3, dec!(40), dec!(10)).unwrap();
        assert_eq!(result.units_produced, Decimal::ZERO);
        assert_eq!(result.cost_per_unit, Decimal::ZERO);
        assert_eq!(result.capacity_percent(), Decimal::ZERO);
    }

    #[test]
    fn free_inputs_cost_nothing() {
        let resources = vec![resource(1, true), resource(2, false)];
        let ind = industry(4, vec![ResourceId(1), ResourceId(2)]);
        let result = calculate_production(&ind, &resources, 4, dec!(160), dec!(10)).unwrap();

        assert_eq!(result.resource_cost, dec!(160));
        assert_eq!(result.labor_cost, dec!(6400));
        assert_eq!(result.total_cost, dec!(6560));
        assert_eq!(result.cost_per_unit, dec!(41));
    }

    #[test]
    fn unknown_input_is_reported() {
        let ind = industry(1, vec![ResourceId(9)]);
        let result = calculate_production(&ind, &[], 1, dec!(40), dec!(10));
        assert!(matches!(
            result,
            Err(ProductionError::ResourceNotFound(ResourceId(9)))
        ));
    }
}
