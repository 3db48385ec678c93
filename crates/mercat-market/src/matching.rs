//! Need-driven matching of people to the industries that solve their needs.
//!
//! Matching is breadth-first. For each person in region order, for each
//! need in their effective need set, for each industry that solves that
//! need, and for each of that industry's products, the person tries to buy
//! one unit at the market price. A person can therefore make several
//! purchases for the same need in a single round.
//!
//! An industry solves a need when one of its solved problems has the same
//! name as the need, matching the name-based deduplication of need sets.

use mercat_types::{Entity, PersonId, Problem, ProblemId, find};
use mercat_world::{Region, effective_needs_of};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::MarketError;
use crate::purchase::{Purchase, execute_purchase};

/// Units bought per matching attempt.
pub const UNITS_PER_ATTEMPT: Decimal = Decimal::ONE;

/// Purchase attempts that were rejected, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAttempts {
    /// Attempts rejected because the product had no stock.
    pub out_of_stock: u64,
    /// Attempts rejected because the buyer could not pay.
    pub insufficient_funds: u64,
}

impl FailedAttempts {
    /// All rejected attempts.
    pub const fn total(&self) -> u64 {
        self.out_of_stock.saturating_add(self.insufficient_funds)
    }
}

/// The outcome of one market round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketResult {
    /// Every purchase, in execution order.
    pub purchases: Vec<Purchase>,
    /// Money spent by people.
    pub total_spent: Decimal,
    /// Money received by industries. Always equal to `total_spent`.
    pub total_revenue: Decimal,
    /// People with at least one purchase.
    pub people_satisfied: u64,
    /// People with no purchase.
    pub people_unsatisfied: u64,
    /// Rejected attempts.
    pub failed_attempts: FailedAttempts,
}

/// Whether `industry_problems` contains a problem named like `need`.
fn solves_need(industry_problems: &[ProblemId], need: &Problem, problems: &[Problem]) -> bool {
    industry_problems
        .iter()
        .filter_map(|&id| find(problems, id))
        .any(|p| p.name() == need.name())
}

/// Run one market round at the given unit price.
///
/// # Errors
///
/// Returns [`MarketError::InvalidAmount`] for a negative price,
/// [`MarketError::ProductNotFound`] if an industry lists an unknown output,
/// or [`MarketError::ArithmeticOverflow`]. Stock and funds rejections are
/// counted in [`MarketResult::failed_attempts`], not returned.
pub fn run_market(region: &mut Region, price: Decimal) -> Result<MarketResult, MarketError> {
    if price < Decimal::ZERO {
        return Err(MarketError::InvalidAmount {
            field: "market price",
            value: price,
        });
    }

    let parts = region.parts_mut();
    let mut result = MarketResult::default();

    for person_index in 0..parts.people.len() {
        let Some(person) = parts.people.get(person_index) else {
            continue;
        };
        let person_id: PersonId = person.id;
        let needs = effective_needs_of(person, parts.segments, parts.problems);
        let mut bought_any = false;

        for need_id in needs {
            let Some(need) = find(parts.problems, need_id) else {
                continue;
            };

            for industry_index in 0..parts.industries.len() {
                let Some(industry) = parts.industries.get(industry_index) else {
                    continue;
                };
                if !solves_need(&industry.solved_problems, need, parts.problems) {
                    continue;
                }
                let outputs = industry.outputs.clone();

                for product_id in outputs {
                    let (Some(person), Some(industry)) = (
                        parts.people.get_mut(person_index),
                        parts.industries.get_mut(industry_index),
                    ) else {
                        continue;
                    };
                    let product = parts
                        .resources
                        .iter_mut()
                        .find(|r| r.id == product_id)
                        .ok_or(MarketError::ProductNotFound(product_id))?;

                    match execute_purchase(person, industry, product, UNITS_PER_ATTEMPT, price) {
                        Ok(cost) => {
                            trace!(
                                person = %person.name,
                                industry = %industry.name,
                                product = %product.name,
                                %cost,
                                "Purchase"
                            );
                            result.total_spent = result
                                .total_spent
                                .checked_add(cost)
                                .ok_or(MarketError::ArithmeticOverflow)?;
                            result.total_revenue = result
                                .total_revenue
                                .checked_add(cost)
                                .ok_or(MarketError::ArithmeticOverflow)?;
                            result.purchases.push(Purchase {
                                person: person_id,
                                industry: industry.id,
                                product: product_id,
                                problem: need_id,
                                quantity: UNITS_PER_ATTEMPT,
                                unit_price: price,
                                total_cost: cost,
                            });
                            bought_any = true;
                        }
                        Err(MarketError::OutOfStock { .. }) => {
                            result.failed_attempts.out_of_stock =
                                result.failed_attempts.out_of_stock.saturating_add(1);
                        }
                        Err(MarketError::InsufficientFunds { .. }) => {
                            result.failed_attempts.insufficient_funds =
                                result.failed_attempts.insufficient_funds.saturating_add(1);
                        }
                        Err(e) => return Err(e),
                    }
                }
            }
        }

        if bought_any {
            result.people_satisfied = result.people_satisfied.saturating_add(1);
        } else {
            result.people_unsatisfied = result.people_unsatisfied.saturating_add(1);
        }
    }

    debug!(
        purchases = result.purchases.len(),
        spent = %result.total_spent,
        satisfied = result.people_satisfied,
        unsatisfied = result.people_unsatisfied,
        out_of_stock = result.failed_attempts.out_of_stock,
        insufficient_funds = result.failed_attempts.insufficient_funds,
        "Market round complete"
    );

    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mercat_types::{NewIndustry, NewPerson, NewProblem, NewResource, NewSegment};
    use rust_decimal_macros::dec;

    use super::*;

    fn problem(name: &str) -> NewProblem {
        NewProblem {
            name: name.to_owned(),
            description: String::new(),
            severity: dec!(0.8),
            demand: dec!(0.7),
            is_basic_need: true,
        }
    }

    /// One need, `industries` industries solving it, each with `products`
    /// outputs stocked at `stock`, and `people` buyers with `money` each.
    fn market(industries: usize, products: usize, stock: Decimal, people: usize, money: Decimal) -> Region {
        let mut region = Region::new("Market", "");
        let food = region.add_problem(problem("Food")).unwrap();
        let segment = region
            .add_segment(NewSegment {
                name: "General".to_owned(),
                problems: vec![food],
                size: 0,
            })
            .unwrap();
        for i in 0..industries {
            let mut outputs = Vec::new();
            for p in 0..products {
                let mut desc = NewResource::product(format!("Food-{i}-{p}"), "kg");
                desc.quantity = stock;
                outputs.push(region.add_resource(desc).unwrap());
            }
            region
                .add_industry(NewIndustry {
                    name: format!("Farm-{i}"),
                    labor_needed: 1,
                    initial_capital: Decimal::ZERO,
                    solved_problems: vec![food],
                    inputs: Vec::new(),
                    outputs,
                })
                .unwrap();
        }
        for n in 0..people {
            region
                .add_person(NewPerson {
                    name: format!("Person-{n}"),
                    money,
                    labor_hours: dec!(8),
                    segments: vec![segment],
                })
                .unwrap();
        }
        region
    }

    #[test]
    fn single_unit_sells_once() {
        let mut region = market(1, 1, dec!(1), 2, dec!(100));

        let result = run_market(&mut region, dec!(50)).unwrap();

        assert_eq!(result.purchases.len(), 1);
        assert_eq!(result.people_satisfied, 1);
        assert_eq!(result.people_unsatisfied, 1);
        assert_eq!(result.failed_attempts.out_of_stock, 1);
        assert_eq!(region.people().first().map(|p| p.money), Some(dec!(50)));
        assert_eq!(region.industry_wealth(), dec!(50));
    }

    #[test]
    fn matching_is_breadth_first() {
        let mut region = market(2, 2, dec!(10), 1, dec!(1000));

        let result = run_market(&mut region, dec!(50)).unwrap();

        assert_eq!(result.purchases.len(), 4);
        assert_eq!(result.total_spent, dec!(200));
        assert!(region.resources().iter().all(|r| r.quantity == dec!(9)));
        let products: Vec<u64> = result.purchases.iter().map(|p| p.product.into_inner()).collect();
        assert_eq!(products, vec![1, 2, 3, 4]);
    }

    #[test]
    fn buyers_stop_when_money_runs_out() {
        let mut region = market(1, 3, dec!(10), 1, dec!(100));

        let result = run_market(&mut region, dec!(50)).unwrap();

        assert_eq!(result.purchases.len(), 2);
        assert_eq!(result.failed_attempts.insufficient_funds, 1);
        assert_eq!(region.people_wealth(), Decimal::ZERO);
    }

    #[test]
    fn market_conserves_money() {
        let mut region = market(2, 1, dec!(3), 5, dec!(75));
        let before = region.total_wealth();

        let result = run_market(&mut region, dec!(50)).unwrap();

        assert_eq!(result.total_spent, result.total_revenue);
        assert_eq!(region.total_wealth(), before);
        assert!(region.people().iter().all(|p| p.money >= Decimal::ZERO));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut region = market(1, 1, dec!(1), 1, dec!(100));
        assert!(matches!(
            run_market(&mut region, dec!(-1)),
            Err(MarketError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn people_without_needs_are_unsatisfied() {
        let mut region = market(1, 1, dec!(5), 0, dec!(100));
        region
            .add_person(NewPerson {
                name: "Hermit".to_owned(),
                money: dec!(100),
                labor_hours: dec!(8),
                segments: Vec::new(),
            })
            .unwrap();

        let result = run_market(&mut region, dec!(50)).unwrap();

        assert!(result.purchases.is_empty());
        assert_eq!(result.people_unsatisfied, 1);
    }
}
