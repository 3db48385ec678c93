//! Whole-engine properties of the tick loop.
//!
//! Every test builds a region through the scenario builder and runs the
//! full tick loop, then checks a property that must hold no matter how the
//! individual phases behaved.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::missing_panics_doc)]

use mercat_core::config::{IndustryConfig, ResourceConfig, ScenarioConfig};
use mercat_core::engine::{Engine, EngineParams, IndustryOutcome, TickError};
use mercat_core::events::{MemoryEventLog, NullEventLog};
use mercat_core::scenario::build_region;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn demo_engine() -> Engine<MemoryEventLog> {
    let config = ScenarioConfig::demo();
    let region = build_region(&config).unwrap();
    Engine::new(region, EngineParams::from(&config.simulation), MemoryEventLog::new())
}

#[test]
fn wealth_is_conserved_every_tick() {
    let mut engine = demo_engine();
    let initial = engine.initial_wealth();
    assert_eq!(initial, dec!(180000));

    for summary in engine.run_ticks(6).unwrap() {
        assert!(summary.conservation.is_balanced(), "tick {}", summary.tick);
    }
    assert_eq!(engine.total_wealth(), initial);
    assert!(engine.verify_conservation().is_balanced());
}

#[test]
fn nothing_goes_negative() {
    let mut engine = demo_engine();
    engine.run_ticks(10).unwrap();

    let region = engine.region();
    assert!(region.resources().iter().all(|r| r.quantity >= Decimal::ZERO));
    assert!(region.industries().iter().all(|i| i.money >= Decimal::ZERO));
    assert!(region.people().iter().all(|p| p.money >= Decimal::ZERO));
}

#[test]
fn bad_params_are_rejected_before_the_first_tick() {
    let config = ScenarioConfig::demo();
    let base = EngineParams::from(&config.simulation);
    let cases = [
        EngineParams {
            price_per_unit: dec!(-1),
            ..base.clone()
        },
        EngineParams {
            wage_per_hour: dec!(-10),
            ..base
        },
    ];

    for params in cases {
        let region = build_region(&config).unwrap();
        let mut engine = Engine::new(region, params, MemoryEventLog::new());

        let result = engine.run_tick();
        assert!(matches!(result, Err(TickError::InvalidParameter { .. })));
        assert_eq!(engine.current_tick(), 0);
        assert_eq!(engine.total_wealth(), engine.initial_wealth());

        let region = engine.region();
        let food = region.industry_by_name("Agriculture Industry").unwrap();
        assert_eq!(food.money, dec!(50000));
        assert!(food.production_history().is_empty());
        assert!(region.people().iter().all(|p| p.labor_hours == dec!(8)));
        assert!(region.people().iter().all(|p| p.money >= Decimal::ZERO));
    }
}

#[test]
fn allocation_never_exceeds_need_or_pool() {
    let mut config = ScenarioConfig::demo();
    // 12 workers for 4 + 10 seats.
    config.population.total_size = 60;
    let region = build_region(&config).unwrap();
    let mut engine = Engine::new(region, EngineParams::from(&config.simulation), NullEventLog);

    let summary = engine.run_tick().unwrap();
    assert_eq!(summary.workers_available, 12);

    let mut pool = summary.workers_available;
    for report in &summary.industries {
        let need = engine.region().industry(report.industry).unwrap().labor_needed;
        let allocated = usize::try_from(report.allocated).unwrap();
        assert!(report.allocated <= need);
        assert!(allocated <= pool);
        pool = pool.saturating_sub(allocated);
    }
    assert_eq!(summary.industries[0].allocated, 4);
    assert_eq!(summary.industries[1].allocated, 8);
    assert_eq!(summary.workers_unassigned, 0);
}

#[test]
fn full_staffing_produces_available_hours() {
    let mut engine = demo_engine();
    let summary = engine.run_tick().unwrap();

    assert_eq!(summary.available_hours, dec!(160));
    for report in &summary.industries {
        let IndustryOutcome::Produced { result, .. } = &report.outcome else {
            continue;
        };
        assert_eq!(result.units_produced, dec!(160));
        assert!(!result.is_understaffed());
    }
    assert_eq!(summary.workers_unassigned, 186);
    assert!(engine.event_log().contains("186 workers unemployed this tick"));
}

#[test]
fn market_buys_every_product_of_every_solving_industry() {
    let mut engine = demo_engine();
    let summary = engine.run_tick().unwrap();

    // Food: 160 kg. Healthcare: 160 visits and 160 treatments. The first
    // buyers each take one unit of every product addressing their needs.
    let first = engine.region().people()[0].id;
    let bought: Vec<_> = summary
        .market
        .purchases
        .iter()
        .filter(|p| p.person == first)
        .collect();
    assert_eq!(bought.len(), 3);

    let health = engine.region().industry_by_name("Health Industry").unwrap().id;
    let wellness = engine.region().resource_by_name("Wellness").unwrap().id;
    let medical = engine.region().resource_by_name("Medical").unwrap().id;
    assert!(bought.iter().any(|p| p.industry == health && p.product == wellness));
    assert!(bought.iter().any(|p| p.industry == health && p.product == medical));

    assert_eq!(summary.market.total_spent, summary.market.total_revenue);
}

#[test]
fn identical_runs_are_identical() {
    let mut first = demo_engine();
    let mut second = demo_engine();

    let a = first.run_ticks(4).unwrap();
    let b = second.run_ticks(4).unwrap();

    assert_eq!(a, b);
    assert_eq!(first.event_log().events(), second.event_log().events());
    assert_eq!(first.final_summary(), second.final_summary());
}

#[test]
fn labor_hours_reset_after_tick() {
    let mut engine = demo_engine();
    engine.run_tick().unwrap();
    assert!(
        engine
            .region()
            .people()
            .iter()
            .all(|p| p.labor_hours == dec!(8))
    );
}

#[test]
fn unfunded_industry_still_takes_its_workers() {
    let mut config = ScenarioConfig::demo();
    config.industries[1].initial_capital = dec!(100);
    let region = build_region(&config).unwrap();
    let mut engine = Engine::new(region, EngineParams::from(&config.simulation), NullEventLog);

    let summary = engine.run_tick().unwrap();
    assert!(matches!(
        summary.industries[1].outcome,
        IndustryOutcome::InsufficientFunds { .. }
    ));
    // Workers were taken from the pool even though the industry skipped.
    assert_eq!(summary.industries[1].allocated, 10);
    assert_eq!(summary.workers_unassigned, 186);
    assert!(summary.conservation.is_balanced());
}

#[test]
fn depleted_input_stops_later_industries() {
    let mut config = ScenarioConfig::demo();
    config.resources[0] = ResourceConfig::stock("RawMaterial", "units", dec!(200));
    let region = build_region(&config).unwrap();
    let mut engine = Engine::new(region, EngineParams::from(&config.simulation), MemoryEventLog::new());

    let summary = engine.run_tick().unwrap();
    assert!(summary.industries[0].outcome.is_produced());
    assert!(matches!(
        &summary.industries[1].outcome,
        IndustryOutcome::InsufficientResource { resource, shortfall, .. }
            if resource == "RawMaterial" && *shortfall == dec!(120)
    ));
    assert_eq!(
        engine.region().resource_by_name("RawMaterial").map(|r| r.quantity),
        Some(dec!(40))
    );
    assert!(engine.event_log().contains("Resource shortage: RawMaterial"));
    assert!(summary.conservation.is_balanced());
}

#[test]
fn renewable_inputs_regenerate() {
    let mut config = ScenarioConfig::demo();
    config.resources.push(ResourceConfig {
        name: "Water".to_owned(),
        unit: "liters".to_owned(),
        initial_quantity: dec!(1000),
        is_free: true,
        regeneration_rate: dec!(100),
    });
    config.industries.push(IndustryConfig {
        name: "Bottling".to_owned(),
        solves_problems: vec!["Food".to_owned()],
        input_resources: vec!["Water".to_owned()],
        output_resources: vec!["Bottles".to_owned()],
        labor_needed: 2,
        initial_capital: dec!(20000),
    });
    let region = build_region(&config).unwrap();
    let mut engine = Engine::new(region, EngineParams::from(&config.simulation), MemoryEventLog::new());

    let summary = engine.run_tick().unwrap();
    assert_eq!(summary.regeneration.len(), 1);
    // 1000 - 160 + 100
    assert_eq!(
        engine.region().resource_by_name("Water").map(|r| r.quantity),
        Some(dec!(940))
    );
    // Free inputs cost nothing.
    let bottling = engine.region().industry_by_name("Bottling").unwrap();
    let record = bottling.production_history().back().unwrap();
    assert_eq!(record.resource_cost, Decimal::ZERO);
    assert!(engine.event_log().contains("Water regenerated +100 liters"));
}

#[test]
fn summary_serializes() {
    let mut engine = demo_engine();
    engine.run_ticks(2).unwrap();
    let summary = engine.final_summary();

    assert_eq!(summary.ticks, 2);
    assert_eq!(summary.people.len(), 5);
    assert_eq!(summary.people_total, 1000);
    assert_eq!(summary.wealth_change, Decimal::ZERO);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["region"], "Mumbai");
    assert_eq!(json["industries"].as_array().map(Vec::len), Some(2));
}
