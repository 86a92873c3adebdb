//! Resolved scenario configuration
//!
//! A [`ScenarioConfig`] is built once, validated, and then only read. Presets,
//! custom scenario files and command-line overrides all funnel through the
//! [`ScenarioBuilder`], which applies them in precedence order (CLI > file >
//! preset defaults) and validates the result in [`ScenarioBuilder::build`].

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::cohort::CohortBehaviorModel;
use crate::scenario::correlation::CorrelationTargets;
use crate::scenario::error::{ScenarioValidationError, ValidationResult};
use crate::scenario::kind::{ScenarioKind, ScenarioProfile};
use crate::scenario::presets::{find_preset, CUSTOM_SCENARIO, DEFAULT_SCENARIO};
use crate::simulation::GenerationError;
use crate::types::{Category, CliArgs, ConfigError, ScenarioDuration};

/// Default customer population
pub const DEFAULT_CUSTOMERS: usize = 15_000;
/// Default catalogue size
pub const DEFAULT_PRODUCT_COUNT: usize = 2_500;
/// Default baseline order rate per hour
pub const DEFAULT_ORDERS_PER_HOUR: f64 = 800.0;
/// Default duration of a custom scenario
pub const DEFAULT_DURATION: &str = "1d";

/// Calendar days that must exist on both sides of the scenario window
const CALENDAR_MARGIN_DAYS: i64 = 800;

/// Population and rate settings of a scenario
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeSettings {
    /// Number of customers
    pub customers: usize,
    /// Number of products
    pub product_count: usize,
    /// Baseline orders per hour
    pub orders_per_hour: f64,
    /// Baseline orders per day, when the rate was given per day
    pub orders_per_day: Option<f64>,
    /// Focus category set directly rather than through the kind
    pub focus_category: Option<Category>,
}

impl VolumeSettings {
    /// Effective baseline orders per hour (a per-day rate wins)
    pub fn hourly_rate(&self) -> f64 {
        match self.orders_per_day {
            Some(per_day) => per_day / 24.0,
            None => self.orders_per_hour,
        }
    }
}

/// Complete, validated parameter set for one generation run
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    name: String,
    start: DateTime<Utc>,
    duration: ScenarioDuration,
    intensity: f64,
    kind: ScenarioKind,
    volume: VolumeSettings,
    correlations: CorrelationTargets,
    seed: u64,
}

impl ScenarioConfig {
    /// Scenario name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First instant of the scenario window
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// End of the scenario window (exclusive)
    pub fn end(&self) -> DateTime<Utc> {
        // checked when the scenario is built
        self.start.checked_add_signed(self.duration.as_chrono()).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Scenario duration
    pub fn duration(&self) -> ScenarioDuration {
        self.duration
    }

    /// Number of whole hours in the scenario
    pub fn total_hours(&self) -> usize {
        self.duration.total_hours()
    }

    /// Start of scenario-relative hour `hour`
    pub fn hour_start(&self, hour: usize) -> DateTime<Utc> {
        match i64::try_from(hour.min(self.total_hours())) {
            Ok(hour) => self.start.checked_add_signed(Duration::hours(hour)).unwrap_or(DateTime::<Utc>::MAX_UTC),
            Err(_) => self.end(),
        }
    }

    /// Overall intensity multiplier
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Scenario kind with its overrides
    pub fn kind(&self) -> &ScenarioKind {
        &self.kind
    }

    /// Per-kind behavior
    pub fn profile(&self) -> &dyn ScenarioProfile {
        self.kind.profile()
    }

    /// Population and rate settings
    pub fn volume(&self) -> &VolumeSettings {
        &self.volume
    }

    /// Focus category of the product catalogue
    pub fn focus_category(&self) -> Option<Category> {
        self.volume.focus_category.or_else(|| self.profile().focus_category())
    }

    /// Correlation targets
    pub fn correlations(&self) -> &CorrelationTargets {
        &self.correlations
    }

    /// Master random seed
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Scenario in the custom-file format
    pub fn to_scenario_file(&self) -> Result<ScenarioFile, ConfigError> {
        Ok(ScenarioFile {
            name: self.name.clone(),
            kind: self.kind.tag().to_string(),
            duration: Some(self.duration.to_string()),
            intensity_multiplier: Some(self.intensity),
            start: Some(self.start),
            seed: Some(self.seed),
            overrides: Some(self.kind.overrides_json()?),
            customers: Some(self.volume.customers),
            product_count: Some(self.volume.product_count),
            orders_per_hour: self.volume.orders_per_day.is_none().then_some(self.volume.orders_per_hour),
            orders_per_day: self.volume.orders_per_day,
            category: self.volume.focus_category,
            correlations: Some(self.correlations),
        })
    }

    /// Scenario as pretty-printed JSON in the custom-file format
    pub fn print_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.to_scenario_file()?)?)
    }
}

/// Custom scenario file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    /// Scenario name used in output file names
    pub name: String,
    /// Scenario kind tag
    pub kind: String,
    /// Duration expression (default `1d`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Overall intensity multiplier (default 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity_multiplier: Option<f64>,
    /// Start time (default: the current hour)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Random seed (default: random)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Kind-specific overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<serde_json::Value>,
    /// Customer population
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customers: Option<usize>,
    /// Catalogue size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_count: Option<usize>,
    /// Baseline orders per hour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders_per_hour: Option<f64>,
    /// Baseline orders per day (wins over `orders_per_hour`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orders_per_day: Option<f64>,
    /// Focus product category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Correlation targets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlations: Option<CorrelationTargets>,
}

impl ScenarioFile {
    /// Load a scenario file (JSON)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let content = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => Err(ConfigError::UnsupportedFormat("no extension".to_string())),
        }
    }

    /// Save the scenario file as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Builder that resolves presets, files and overrides into a [`ScenarioConfig`]
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    kind: ScenarioKind,
    duration: String,
    intensity: f64,
    start: Option<DateTime<Utc>>,
    seed: Option<u64>,
    customers: Option<usize>,
    product_count: Option<usize>,
    orders_per_hour: Option<f64>,
    orders_per_day: Option<f64>,
    category: Option<Category>,
    discount_percent: Option<f64>,
    correlations: CorrelationTargets,
}

impl ScenarioBuilder {
    /// Start from a kind with default run parameters
    pub fn new(name: impl Into<String>, kind: ScenarioKind) -> Self {
        Self {
            name: name.into(),
            kind,
            duration: DEFAULT_DURATION.to_string(),
            intensity: 1.0,
            start: None,
            seed: None,
            customers: None,
            product_count: None,
            orders_per_hour: None,
            orders_per_day: None,
            category: None,
            discount_percent: None,
            correlations: CorrelationTargets::default(),
        }
    }

    /// Start from a built-in preset
    pub fn preset(name: &str) -> ValidationResult<Self> {
        let preset =
            find_preset(name).ok_or_else(|| ScenarioValidationError::UnknownScenario(name.to_string()))?;
        let kind = ScenarioKind::from_tag(preset.name, None)?;
        let mut builder = Self::new(preset.name, kind).duration(preset.duration).intensity(preset.intensity);
        builder.orders_per_hour = preset.orders_per_hour;
        builder.orders_per_day = preset.orders_per_day;
        builder.customers = preset.customers;
        Ok(builder)
    }

    /// Start from a parsed custom scenario file
    pub fn from_scenario_file(file: ScenarioFile) -> ValidationResult<Self> {
        let kind = ScenarioKind::from_tag(&file.kind, file.overrides.as_ref())?;
        let mut builder = Self::new(file.name, kind);
        if let Some(duration) = file.duration {
            builder.duration = duration;
        }
        if let Some(intensity) = file.intensity_multiplier {
            builder.intensity = intensity;
        }
        builder.start = file.start;
        builder.seed = file.seed;
        builder.customers = file.customers;
        builder.product_count = file.product_count;
        builder.orders_per_hour = file.orders_per_hour;
        builder.orders_per_day = file.orders_per_day;
        builder.category = file.category;
        if let Some(correlations) = file.correlations {
            builder.correlations = correlations;
        }
        Ok(builder)
    }

    /// Resolve the scenario named on the command line and apply CLI overrides
    pub fn from_cli(args: &CliArgs) -> Result<Self, GenerationError> {
        let scenario = args.scenario.as_deref().unwrap_or(DEFAULT_SCENARIO);

        let builder = match &args.config {
            Some(path) => {
                if scenario != CUSTOM_SCENARIO && args.scenario.is_some() {
                    debug!("Scenario file {} takes precedence over preset '{}'", path, scenario);
                }
                info!("Loading scenario file {}", path);
                Self::from_scenario_file(ScenarioFile::from_file(path)?)?
            }
            None if scenario.eq_ignore_ascii_case(CUSTOM_SCENARIO) => {
                return Err(ConfigError::MissingScenarioFile.into());
            }
            None => Self::preset(scenario)?,
        };

        Ok(builder.apply_cli_overrides(args)?)
    }

    /// Apply command-line overrides (CLI takes precedence)
    pub fn apply_cli_overrides(mut self, args: &CliArgs) -> ValidationResult<Self> {
        if let Some(value) = &args.duration {
            self.duration = value.clone();
        }
        if let Some(value) = args.intensity {
            self.intensity = value;
        }
        if let Some(value) = args.discount {
            self.discount_percent = Some(value);
        }
        if let Some(value) = &args.category {
            let category: Category = value.parse().map_err(ScenarioValidationError::InvalidCategory)?;
            self.category = Some(category);
        }
        if let Some(value) = args.customers {
            self.customers = Some(value);
        }
        if let Some(value) = args.orders_per_day {
            self.orders_per_day = Some(value);
        }
        if let Some(value) = args.orders_per_hour {
            self.orders_per_hour = Some(value);
            // an explicit hourly rate replaces a preset's daily rate
            if args.orders_per_day.is_none() {
                self.orders_per_day = None;
            }
        }
        if let Some(value) = args.products {
            self.product_count = Some(value);
        }
        if let Some(value) = args.seed {
            self.seed = Some(value);
        }
        if let Some(value) = &args.start {
            let start = DateTime::parse_from_rfc3339(value)
                .map_err(|_| ScenarioValidationError::InvalidStart(value.clone()))?;
            self.start = Some(start.with_timezone(&Utc));
        }
        Ok(self)
    }

    /// Set the duration expression
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = duration.into();
        self
    }

    /// Set the overall intensity multiplier
    pub fn intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    /// Set the start time
    pub fn start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the customer population
    pub fn customers(mut self, customers: usize) -> Self {
        self.customers = Some(customers);
        self
    }

    /// Set the catalogue size
    pub fn product_count(mut self, product_count: usize) -> Self {
        self.product_count = Some(product_count);
        self
    }

    /// Set the baseline hourly order rate (clears a daily rate)
    pub fn orders_per_hour(mut self, rate: f64) -> Self {
        self.orders_per_hour = Some(rate);
        self.orders_per_day = None;
        self
    }

    /// Set the baseline daily order rate
    pub fn orders_per_day(mut self, rate: f64) -> Self {
        self.orders_per_day = Some(rate);
        self
    }

    /// Set the focus category
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Set the discount percentage of discount-driven kinds
    pub fn discount_percent(mut self, percent: f64) -> Self {
        self.discount_percent = Some(percent);
        self
    }

    /// Replace the correlation targets
    pub fn correlations(mut self, correlations: CorrelationTargets) -> Self {
        self.correlations = correlations;
        self
    }

    /// Validate and freeze the scenario
    pub fn build(self) -> ValidationResult<ScenarioConfig> {
        let mut kind = self.kind;

        let duration: ScenarioDuration = self.duration.parse()?;

        if !self.intensity.is_finite() || self.intensity <= 0.0 {
            return Err(ScenarioValidationError::InvalidIntensity(self.intensity));
        }

        if let Some(percent) = self.discount_percent {
            if !kind.apply_discount(percent) {
                warn!("Scenario kind '{}' has no discount; ignoring discount override", kind.tag());
            }
        }

        let mut focus_category = None;
        if let Some(category) = self.category {
            if !kind.apply_category(category) {
                focus_category = Some(category);
            }
        }

        kind.profile().validate()?;
        kind.profile().validate_window(duration.total_hours())?;
        self.correlations.validate()?;
        CohortBehaviorModel::adjusted(&kind.profile().cohort_adjustment())?;

        let customers = self.customers.unwrap_or(DEFAULT_CUSTOMERS);
        if customers == 0 {
            return Err(ScenarioValidationError::ZeroCount("customers".to_string()));
        }
        let product_count = self.product_count.unwrap_or(DEFAULT_PRODUCT_COUNT);
        if product_count == 0 {
            return Err(ScenarioValidationError::ZeroCount("product_count".to_string()));
        }
        let orders_per_hour = self.orders_per_hour.unwrap_or(DEFAULT_ORDERS_PER_HOUR);
        for (field, rate) in [("orders_per_hour", Some(orders_per_hour)), ("orders_per_day", self.orders_per_day)] {
            if let Some(rate) = rate {
                if !rate.is_finite() || rate <= 0.0 {
                    return Err(ScenarioValidationError::out_of_range(field, rate, "> 0"));
                }
            }
        }

        let seed = self.seed.unwrap_or_else(rand::random);
        let start = self.start.unwrap_or_else(current_hour);
        // signup history before the window and deliveries or refunds after it
        let margin = Duration::days(CALENDAR_MARGIN_DAYS);
        let fits = start
            .checked_sub_signed(margin)
            .and(start.checked_add_signed(duration.as_chrono()))
            .and_then(|end| end.checked_add_signed(margin))
            .is_some();
        if !fits {
            return Err(ScenarioValidationError::WindowOverflow {
                start: start.to_rfc3339(),
                duration: duration.to_string(),
            });
        }

        let config = ScenarioConfig {
            name: self.name,
            start,
            duration,
            intensity: self.intensity,
            kind,
            volume: VolumeSettings {
                customers,
                product_count,
                orders_per_hour,
                orders_per_day: self.orders_per_day,
                focus_category,
            },
            correlations: self.correlations,
            seed,
        };

        info!(
            "Resolved scenario '{}' ({}): {} from {}, intensity {}, seed {}",
            config.name,
            config.kind.tag(),
            config.duration,
            config.start,
            config.intensity,
            config.seed
        );
        Ok(config)
    }
}

fn current_hour() -> DateTime<Utc> {
    let now = Utc::now();
    now.duration_trunc(Duration::hours(1)).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DurationParseError;
    use chrono::TimeZone;
    use clap::Parser;

    #[test]
    fn test_preset_defaults() {
        let config = ScenarioBuilder::preset("baseline").unwrap().seed(1).build().unwrap();
        assert_eq!(config.total_hours(), 30 * 24);
        assert_eq!(config.volume().customers, 10_000);
        assert!((config.volume().hourly_rate() - 2500.0 / 24.0).abs() < 1e-9);
        assert_eq!(config.kind().tag(), "baseline");
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(
            ScenarioBuilder::preset("black_friday"),
            Err(ScenarioValidationError::UnknownScenario(_))
        ));
    }

    #[test]
    fn test_bad_duration_unit_fails_build() {
        let err = ScenarioBuilder::preset("baseline").unwrap().duration("3w").build().unwrap_err();
        assert!(matches!(
            err,
            ScenarioValidationError::InvalidDuration(DurationParseError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn test_non_positive_intensity_fails_build() {
        let err = ScenarioBuilder::preset("baseline").unwrap().intensity(0.0).build().unwrap_err();
        assert_eq!(err, ScenarioValidationError::InvalidIntensity(0.0));
    }

    #[test]
    fn test_cli_overrides_take_precedence() {
        let args = CliArgs::try_parse_from([
            "ecom-synth",
            "flash_sale",
            "--duration",
            "2h",
            "--discount",
            "40",
            "--category",
            "beauty",
            "--seed",
            "9",
            "--start",
            "2024-11-29T00:00:00Z",
        ])
        .unwrap();
        let config = ScenarioBuilder::from_cli(&args).unwrap().build().unwrap();
        assert_eq!(config.total_hours(), 2);
        assert_eq!(config.seed(), 9);
        assert_eq!(config.start(), Utc.with_ymd_and_hms(2024, 11, 29, 0, 0, 0).unwrap());
        assert_eq!(config.focus_category(), Some(Category::Beauty));
        match config.kind() {
            ScenarioKind::FlashSale(o) => assert_eq!(o.discount_percent, 40.0),
            other => panic!("unexpected kind {:?}", other),
        }
    }

    #[test]
    fn test_orders_per_hour_replaces_preset_daily_rate() {
        let args =
            CliArgs::try_parse_from(["ecom-synth", "baseline", "--orders-per-hour", "50"]).unwrap();
        let config = ScenarioBuilder::from_cli(&args).unwrap().build().unwrap();
        assert_eq!(config.volume().hourly_rate(), 50.0);
    }

    #[test]
    fn test_custom_without_file_is_an_error() {
        let args = CliArgs::try_parse_from(["ecom-synth", "custom"]).unwrap();
        assert!(matches!(
            ScenarioBuilder::from_cli(&args),
            Err(GenerationError::Config(ConfigError::MissingScenarioFile))
        ));
    }

    #[test]
    fn test_scenario_file_requires_name_and_kind() {
        let missing_kind = serde_json::from_str::<ScenarioFile>(r#"{ "name": "x" }"#);
        assert!(missing_kind.unwrap_err().to_string().contains("kind"));
        let unknown_field =
            serde_json::from_str::<ScenarioFile>(r#"{ "name": "x", "kind": "baseline", "speed": 3 }"#);
        assert!(unknown_field.is_err());
    }

    #[test]
    fn test_print_config_round_trips() {
        let config = ScenarioBuilder::preset("payment_outage").unwrap().seed(5).build().unwrap();
        let json = config.print_json().unwrap();
        let file: ScenarioFile = serde_json::from_str(&json).unwrap();
        let rebuilt = ScenarioBuilder::from_scenario_file(file).unwrap().build().unwrap();
        assert_eq!(rebuilt.kind(), config.kind());
        assert_eq!(rebuilt.start(), config.start());
        assert_eq!(rebuilt.seed(), 5);
        assert_eq!(rebuilt.duration(), config.duration());
    }

    #[test]
    fn test_oversized_duration_is_rejected() {
        let result = ScenarioBuilder::preset("baseline").unwrap().duration("5000000m").build();
        assert!(matches!(
            result,
            Err(ScenarioValidationError::InvalidDuration(DurationParseError::TooLong(_)))
        ));
    }

    #[test]
    fn test_window_past_calendar_end_is_rejected() {
        let result = ScenarioBuilder::preset("baseline")
            .unwrap()
            .start(Utc.with_ymd_and_hms(262_143, 12, 1, 0, 0, 0).unwrap())
            .duration("2m")
            .build();
        assert!(matches!(result, Err(ScenarioValidationError::WindowOverflow { .. })));
    }

    #[test]
    fn test_windows_must_start_inside_the_run() {
        let short_outage = ScenarioBuilder::preset("payment_outage").unwrap().duration("1h").build();
        assert!(matches!(
            short_outage,
            Err(ScenarioValidationError::WindowOutsideRun { hour: 1, last: 0, .. })
        ));

        let file: ScenarioFile = serde_json::from_str(
            r#"{"name": "late", "kind": "payment_outage", "duration": "8h",
                "overrides": {"outage_start_hour": 18446744073709551615}}"#,
        )
        .unwrap();
        let late = ScenarioBuilder::from_scenario_file(file).unwrap().build();
        assert!(matches!(late, Err(ScenarioValidationError::WindowOutsideRun { .. })));

        let file: ScenarioFile = serde_json::from_str(
            r#"{"name": "slow", "kind": "returns_wave", "overrides": {"max_extra_processing_days": 4294967295}}"#,
        )
        .unwrap();
        let slow = ScenarioBuilder::from_scenario_file(file).unwrap().build();
        assert!(matches!(slow, Err(ScenarioValidationError::OutOfRange { .. })));

        let disruption = ScenarioBuilder::preset("supply_disruption").unwrap().duration("1d").build();
        assert!(matches!(disruption, Err(ScenarioValidationError::WindowOutsideRun { hour: 24, .. })));
        assert!(ScenarioBuilder::preset("supply_disruption").unwrap().duration("2d").seed(1).build().is_ok());
    }
}
