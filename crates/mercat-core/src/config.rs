//! Configuration loading and typed config structures for Mercat.
//!
//! A configuration file (`mercat-config.yaml` by default) describes one
//! scenario: the region, its problems, resources, industries, and
//! population, plus the simulation and logging parameters used to run it.
//! Every field has a default, so a partial file is valid YAML config; the
//! scenario builder decides whether it describes a runnable region.
//!
//! [`ScenarioConfig::demo`] returns the built-in Mumbai scenario used when
//! no file is present.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level scenario configuration.
///
/// Mirrors the structure of `mercat-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Region name and description.
    #[serde(default)]
    pub region: RegionInfo,

    /// Needs felt by the population.
    #[serde(default)]
    pub problems: Vec<ProblemConfig>,

    /// Raw materials and pre-declared products.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,

    /// Producers.
    #[serde(default)]
    pub industries: Vec<IndustryConfig>,

    /// Population size and segment split.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Tick timing, wage, and price parameters.
    #[serde(default)]
    pub simulation: SimulationParams,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScenarioConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// The built-in demonstration scenario.
    ///
    /// Mumbai: food and healthcare needs, one raw material, an agriculture
    /// industry and a health industry, and 1000 people of whom a fifth are
    /// workers.
    pub fn demo() -> Self {
        let both_needs = vec!["Food".to_owned(), "Healthcare".to_owned()];
        Self {
            region: RegionInfo {
                name: "Mumbai".to_owned(),
                description: "Coastal metro with food and healthcare demand".to_owned(),
            },
            problems: vec![
                ProblemConfig {
                    name: "Food".to_owned(),
                    description: "Need for sustenance".to_owned(),
                    severity: Decimal::new(9, 1),
                    demand: Decimal::new(99, 2),
                    basic_need: true,
                },
                ProblemConfig {
                    name: "Healthcare".to_owned(),
                    description: "Need for medical services".to_owned(),
                    severity: Decimal::new(8, 1),
                    demand: Decimal::new(1, 1),
                    basic_need: true,
                },
            ],
            resources: vec![
                ResourceConfig::stock("RawMaterial", "units", Decimal::new(10_000, 0)),
                ResourceConfig::stock("Food", "kg", Decimal::ZERO),
                ResourceConfig::stock("Wellness", "visits", Decimal::ZERO),
                ResourceConfig::stock("Medical", "treatments", Decimal::ZERO),
            ],
            industries: vec![
                IndustryConfig {
                    name: "Agriculture Industry".to_owned(),
                    solves_problems: vec!["Food".to_owned()],
                    input_resources: vec!["RawMaterial".to_owned()],
                    output_resources: vec!["Food".to_owned()],
                    labor_needed: 4,
                    initial_capital: Decimal::new(50_000, 0),
                },
                IndustryConfig {
                    name: "Health Industry".to_owned(),
                    solves_problems: vec!["Healthcare".to_owned()],
                    input_resources: vec!["RawMaterial".to_owned()],
                    output_resources: vec!["Wellness".to_owned(), "Medical".to_owned()],
                    labor_needed: 10,
                    initial_capital: Decimal::new(80_000, 0),
                },
            ],
            population: PopulationConfig {
                total_size: 1000,
                segments: vec![
                    SegmentConfig {
                        name: "Workers".to_owned(),
                        percentage: Decimal::new(2, 1),
                        has_problems: both_needs.clone(),
                        initial_money: Decimal::new(50, 0),
                        labor_hours: Decimal::new(8, 0),
                    },
                    SegmentConfig {
                        name: "General Population".to_owned(),
                        percentage: Decimal::new(8, 1),
                        has_problems: both_needs,
                        initial_money: Decimal::new(50, 0),
                        labor_hours: Decimal::new(8, 0),
                    },
                ],
            },
            simulation: SimulationParams::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Region identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegionInfo {
    /// Region name. Required by the scenario builder.
    #[serde(default)]
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// A problem (need) definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProblemConfig {
    /// Problem name, referenced by industries and segments.
    pub name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// How critical the need is, 0.0 to 1.0.
    #[serde(default = "default_weight")]
    pub severity: Decimal,

    /// Share of the population feeling the need, 0.0 to 1.0.
    #[serde(default = "default_weight")]
    pub demand: Decimal,

    /// Survival need rather than a pleasure.
    #[serde(default)]
    pub basic_need: bool,
}

/// A resource definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceConfig {
    /// Resource name, referenced by industries.
    pub name: String,

    /// Unit label.
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Starting stock.
    #[serde(default)]
    pub initial_quantity: Decimal,

    /// Zero extraction cost.
    #[serde(default)]
    pub is_free: bool,

    /// Units added back every tick.
    #[serde(default)]
    pub regeneration_rate: Decimal,
}

impl ResourceConfig {
    /// A non-free, non-renewable resource with the given stock.
    pub fn stock(name: &str, unit: &str, quantity: Decimal) -> Self {
        Self {
            name: name.to_owned(),
            unit: unit.to_owned(),
            initial_quantity: quantity,
            is_free: false,
            regeneration_rate: Decimal::ZERO,
        }
    }
}

/// An industry definition. References are by name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndustryConfig {
    /// Industry name.
    pub name: String,

    /// Problems this industry's products solve.
    #[serde(default)]
    pub solves_problems: Vec<String>,

    /// Resources consumed per unit of output. Must already exist.
    #[serde(default)]
    pub input_resources: Vec<String>,

    /// Products. Unknown names are created as empty product resources.
    #[serde(default)]
    pub output_resources: Vec<String>,

    /// Workers needed for full capacity.
    #[serde(default)]
    pub labor_needed: u32,

    /// Starting treasury.
    #[serde(default)]
    pub initial_capital: Decimal,
}

/// Population size and segmentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Total number of people across all segments.
    #[serde(default)]
    pub total_size: u32,

    /// Segments. Percentages must sum to 1.0.
    #[serde(default)]
    pub segments: Vec<SegmentConfig>,
}

/// A population segment definition.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SegmentConfig {
    /// Segment name.
    pub name: String,

    /// Share of `total_size`, 0.0 to 1.0.
    #[serde(default)]
    pub percentage: Decimal,

    /// Needs shared by the segment.
    #[serde(default)]
    pub has_problems: Vec<String>,

    /// Starting money per person.
    #[serde(default)]
    pub initial_money: Decimal,

    /// Labor hours per person per tick.
    #[serde(default = "default_labor_hours")]
    pub labor_hours: Decimal,
}

/// Simulation run parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationParams {
    /// Number of ticks the binary runs.
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Weeks of work in one tick.
    #[serde(default = "default_weeks_per_tick")]
    pub weeks_per_tick: u32,

    /// Work hours in one week.
    #[serde(default = "default_hours_per_week")]
    pub hours_per_week: Decimal,

    /// Wage per worker-hour.
    #[serde(default = "default_wage_per_hour")]
    pub wage_per_hour: Decimal,

    /// Fixed market price per unit.
    #[serde(default = "default_price_per_unit")]
    pub price_per_unit: Decimal,

    /// Labor hours each person is reset to at the end of a tick.
    #[serde(default = "default_labor_hours")]
    pub standard_labor_hours: Decimal,

    /// Name of the segment whose members form the labor pool.
    #[serde(default = "default_workers_segment")]
    pub workers_segment: String,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            weeks_per_tick: default_weeks_per_tick(),
            hours_per_week: default_hours_per_week(),
            wage_per_hour: default_wage_per_hour(),
            price_per_unit: default_price_per_unit(),
            standard_labor_hours: default_labor_hours(),
            workers_segment: default_workers_segment(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether per-tick event lines are emitted.
    #[serde(default = "default_events_enabled")]
    pub events_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            events_enabled: default_events_enabled(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_weight() -> Decimal {
    Decimal::from_parts(5, 0, 0, false, 1)
}

fn default_unit() -> String {
    "units".to_owned()
}

const fn default_labor_hours() -> Decimal {
    Decimal::from_parts(8, 0, 0, false, 0)
}

const fn default_ticks() -> u64 {
    3
}

const fn default_weeks_per_tick() -> u32 {
    4
}

const fn default_hours_per_week() -> Decimal {
    Decimal::from_parts(40, 0, 0, false, 0)
}

const fn default_wage_per_hour() -> Decimal {
    Decimal::from_parts(10, 0, 0, false, 0)
}

const fn default_price_per_unit() -> Decimal {
    Decimal::from_parts(50, 0, 0, false, 0)
}

fn default_workers_segment() -> String {
    "Workers".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_events_enabled() -> bool {
    true
}
