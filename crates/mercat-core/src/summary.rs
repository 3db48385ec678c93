//! End-of-run summary.
//!
//! A read-only view of the region after a run, set against the wealth
//! snapshot taken when the engine was created.

use core::fmt;

use mercat_types::find;
use mercat_world::Region;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::conservation::WealthSnapshot;

/// Number of people listed individually in a summary.
pub const PEOPLE_SHOWN: usize = 5;

/// Stock of one product at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductStock {
    /// Product name.
    pub name: String,
    /// Units in stock.
    pub quantity: Decimal,
    /// Unit label.
    pub unit: String,
}

/// One industry at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustrySummary {
    /// Industry name.
    pub name: String,
    /// Current treasury.
    pub money: Decimal,
    /// Treasury at engine creation.
    pub starting_money: Decimal,
    /// `money - starting_money`.
    pub change: Decimal,
    /// Stock of each output.
    pub products: Vec<ProductStock>,
    /// Retained production records.
    pub history_len: usize,
    /// Mean cost per unit over the retained records.
    pub average_cost_per_unit: Decimal,
    /// Cost per unit of the most recent record.
    pub last_cost_per_unit: Decimal,
}

/// One person at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    /// Person name.
    pub name: String,
    /// Current money.
    pub money: Decimal,
    /// Money at engine creation.
    pub starting_money: Decimal,
    /// `money - starting_money`.
    pub change: Decimal,
}

/// One resource at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    /// Resource name.
    pub name: String,
    /// Current stock.
    pub quantity: Decimal,
    /// Unit label.
    pub unit: String,
    /// Zero extraction cost.
    pub is_free: bool,
    /// Units added back every tick.
    pub regeneration_rate: Decimal,
}

/// The final state of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Region name.
    pub region: String,
    /// Ticks completed.
    pub ticks: u64,
    /// Every industry, in region order.
    pub industries: Vec<IndustrySummary>,
    /// The first [`PEOPLE_SHOWN`] people, in region order.
    pub people: Vec<PersonSummary>,
    /// Total head count.
    pub people_total: usize,
    /// Current total wealth.
    pub total_wealth: Decimal,
    /// Total wealth at engine creation.
    pub initial_wealth: Decimal,
    /// `total_wealth - initial_wealth`.
    pub wealth_change: Decimal,
    /// Every resource, in region order.
    pub resources: Vec<ResourceSummary>,
}

impl SimulationSummary {
    /// Summarize `region` against the starting snapshot.
    pub fn collect(region: &Region, initial: &WealthSnapshot, ticks: u64) -> Self {
        let industries = region
            .industries()
            .iter()
            .map(|industry| {
                let starting_money = initial.industry(industry.id);
                IndustrySummary {
                    name: industry.name.clone(),
                    money: industry.money,
                    starting_money,
                    change: industry.money.saturating_sub(starting_money),
                    products: industry
                        .outputs
                        .iter()
                        .filter_map(|&id| find(region.resources(), id))
                        .map(|r| ProductStock {
                            name: r.name.clone(),
                            quantity: r.quantity,
                            unit: r.unit.clone(),
                        })
                        .collect(),
                    history_len: industry.production_history().len(),
                    average_cost_per_unit: industry.average_cost_per_unit(),
                    last_cost_per_unit: industry.last_cost_per_unit(),
                }
            })
            .collect();

        let people = region
            .people()
            .iter()
            .take(PEOPLE_SHOWN)
            .map(|person| {
                let starting_money = initial.person(person.id);
                PersonSummary {
                    name: person.name.clone(),
                    money: person.money,
                    starting_money,
                    change: person.money.saturating_sub(starting_money),
                }
            })
            .collect();

        let resources = region
            .resources()
            .iter()
            .map(|r| ResourceSummary {
                name: r.name.clone(),
                quantity: r.quantity,
                unit: r.unit.clone(),
                is_free: r.is_free,
                regeneration_rate: r.regeneration_rate,
            })
            .collect();

        let total_wealth = region.total_wealth();
        Self {
            region: region.name().to_owned(),
            ticks,
            industries,
            people,
            people_total: region.people().len(),
            total_wealth,
            initial_wealth: initial.total,
            wealth_change: total_wealth.saturating_sub(initial.total),
            resources,
        }
    }

    /// The summary as printable lines.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("FINAL SIMULATION SUMMARY: {} after {} ticks", self.region, self.ticks),
            "INDUSTRIES:".to_owned(),
        ];

        for industry in &self.industries {
            lines.push(format!("  {}:", industry.name));
            lines.push(format!(
                "    Money: ${:.2} (Start: ${:.2}, Change: {:+.2})",
                industry.money, industry.starting_money, industry.change
            ));
            lines.push("    Products:".to_owned());
            for product in &industry.products {
                lines.push(format!(
                    "      - {}: {:.2} {}",
                    product.name, product.quantity, product.unit
                ));
            }
            if industry.history_len > 0 {
                lines.push(format!("    Production History: {} records", industry.history_len));
                lines.push(format!(
                    "      Average cost/unit: ${:.2}",
                    industry.average_cost_per_unit
                ));
                lines.push(format!("      Last cost/unit: ${:.2}", industry.last_cost_per_unit));
            }
        }

        lines.push(format!("PEOPLE (showing first {PEOPLE_SHOWN}):"));
        for person in &self.people {
            lines.push(format!(
                "  {}: ${:.2} (Start: ${:.2}, Change: {:+.2})",
                person.name, person.money, person.starting_money, person.change
            ));
        }
        let hidden = self.people_total.saturating_sub(self.people.len());
        if hidden > 0 {
            lines.push(format!("  ... and {hidden} more"));
        }

        lines.push(format!(
            "TOTAL WEALTH: ${:.2} (Start: ${:.2}, Change: {:+.2})",
            self.total_wealth, self.initial_wealth, self.wealth_change
        ));

        lines.push("RESOURCES:".to_owned());
        for resource in &self.resources {
            let mut status = String::new();
            if resource.is_free {
                status.push_str(" (free resource)");
            }
            if resource.regeneration_rate > Decimal::ZERO {
                status.push_str(&format!(" (regenerates +{}/tick)", resource.regeneration_rate));
            }
            lines.push(format!(
                "  {}: {:.2} {}{status}",
                resource.name, resource.quantity, resource.unit
            ));
        }
        lines
    }
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
