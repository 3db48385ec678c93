//! YAML scenario loading end to end.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use mercat_core::config::ScenarioConfig;
use mercat_core::engine::{Engine, EngineParams};
use mercat_core::events::MemoryEventLog;
use mercat_core::scenario::{ScenarioError, build_region};
use rust_decimal_macros::dec;

/// The configuration file shipped at the repository root.
const SHIPPED_CONFIG: &str = include_str!("../../../mercat-config.yaml");

#[test]
fn shipped_config_is_the_demo() {
    let config = ScenarioConfig::parse(SHIPPED_CONFIG).unwrap();
    assert_eq!(config, ScenarioConfig::demo());
}

#[test]
fn minimal_yaml_runs() {
    let yaml = r#"
region:
  name: "Hamlet"
problems:
  - name: "Bread"
industries:
  - name: "Bakery"
    solves_problems: ["Bread"]
    output_resources: ["Loaves"]
    labor_needed: 2
    initial_capital: 5000
population:
  total_size: 10
  segments:
    - name: "Workers"
      percentage: 1.0
      has_problems: ["Bread"]
      initial_money: 100
simulation:
  weeks_per_tick: 1
  ticks: 2
"#;
    let config = ScenarioConfig::parse(yaml).unwrap();
    let region = build_region(&config).unwrap();
    assert_eq!(region.resource_by_name("Loaves").map(|r| r.unit.as_str()), Some("units"));

    let mut engine = Engine::new(
        region,
        EngineParams::from(&config.simulation),
        MemoryEventLog::new(),
    );
    let summaries = engine.run_ticks(config.simulation.ticks).unwrap();

    assert_eq!(summaries.len(), 2);
    // 2 workers, 40 hours at $10.
    assert_eq!(summaries[0].wages_paid, dec!(800));
    assert_eq!(summaries[0].units_produced, dec!(40));
    // Everyone has money for one loaf per need each tick.
    assert_eq!(summaries[0].market.people_satisfied, 10);
    assert!(engine.verify_conservation().is_balanced());
    assert!(engine.event_log().contains("Person #1 bought 1 Loaves for $50.00 (solving Bread)"));
}

#[test]
fn yaml_with_unknown_problem_fails_to_build() {
    let yaml = r#"
region:
  name: "Nowhere"
problems:
  - name: "Thirst"
industries:
  - name: "Well"
    solves_problems: ["Hunger"]
population:
  total_size: 1
  segments:
    - name: "Everyone"
      percentage: 1.0
"#;
    let config = ScenarioConfig::parse(yaml).unwrap();
    assert!(matches!(
        build_region(&config),
        Err(ScenarioError::UnknownProblem { ref owner, ref problem })
            if owner == "Well" && problem == "Hunger"
    ));
}
