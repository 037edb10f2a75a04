//! Plant Configuration - every model coefficient as an operator-tunable TOML value
//!
//! Each struct implements `Default` with calibrated values for a heavy-mineral
//! sands spiral circuit, so the calculator runs with no config file present.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults::MIN_SIZE_SENSITIVITY;
use crate::pipeline::ProcessModel;
use crate::types::{AxisBounds, OperatingInputs, SearchSpace, SearchStrategy};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SPIRAL_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "plant_config.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one spiral plant.
///
/// Load with `PlantConfig::load()` which searches:
/// 1. `$SPIRAL_CONFIG` env var
/// 2. `./plant_config.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantConfig {
    /// Plant identification
    #[serde(default)]
    pub plant: PlantInfo,

    /// Default operating point (dashboard slider positions)
    #[serde(default)]
    pub inputs: OperatingDefaults,

    /// Recovery model calibration
    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Mass balance / grade calibration
    #[serde(default)]
    pub mass_balance: MassBalanceConfig,

    /// Operating cost coefficients
    #[serde(default)]
    pub costs: CostConfig,

    /// Concentrate pricing
    #[serde(default)]
    pub market: MarketConfig,

    /// Optimizer search space and strategy
    #[serde(default)]
    pub search: SearchConfig,

    /// Price sensitivity range
    #[serde(default)]
    pub sensitivity: SensitivityConfig,

    /// Profit surface resolution
    #[serde(default)]
    pub heatmap: HeatmapConfig,

    /// KPI targets
    #[serde(default)]
    pub kpi: KpiTargets,

    /// Mineral suite for the per-mineral breakdown
    #[serde(default = "default_minerals")]
    pub minerals: Vec<MineralConfig>,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            plant: PlantInfo::default(),
            inputs: OperatingDefaults::default(),
            recovery: RecoveryConfig::default(),
            mass_balance: MassBalanceConfig::default(),
            costs: CostConfig::default(),
            market: MarketConfig::default(),
            search: SearchConfig::default(),
            sensitivity: SensitivityConfig::default(),
            heatmap: HeatmapConfig::default(),
            kpi: KpiTargets::default(),
            minerals: default_minerals(),
        }
    }
}

impl PlantConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SPIRAL_CONFIG` environment variable
    /// 2. `./plant_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), plant = %config.plant.name, "Loaded plant config from SPIRAL_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SPIRAL_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SPIRAL_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(plant = %config.plant.name, "Loaded plant config from ./plant_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./plant_config.toml, using defaults");
                }
            }
        }

        info!("No plant_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document. Unknown keys only warn.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Save config to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        info!(path = %path.display(), "Plant config saved");
        Ok(())
    }

    /// Process model coefficients bundled for the pipeline.
    pub fn model(&self) -> ProcessModel {
        ProcessModel {
            recovery: self.recovery,
            mass_balance: self.mass_balance,
            costs: self.costs,
            market: self.market,
        }
    }

    /// Default operating point as pipeline inputs (unvalidated).
    pub fn operating_inputs(&self) -> OperatingInputs {
        OperatingInputs {
            feed_rate_tph: self.inputs.feed_rate_tph,
            solids_percent: self.inputs.solids_percent,
            d80_um: self.inputs.d80_um,
            splitter_position: self.inputs.splitter_position,
        }
    }

    /// Optimizer search space at the given feed size.
    pub fn search_space(&self, d80_um: f64) -> SearchSpace {
        SearchSpace {
            feed_rate_tph: self.search.feed_rate_tph,
            solids_percent: self.search.solids_percent,
            splitter_position: self.search.splitter_position,
            d80_um,
        }
    }

    /// Validate all coefficients for internal consistency.
    ///
    /// Rules:
    /// - Fractions (recoveries, grades, penalties) must lie in their unit ranges
    /// - Search axes must have min <= max and a positive step
    /// - The default operating point must itself be a valid input
    /// - Every numeric value must be finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let r = &self.recovery;
        if !(r.base_recovery > 0.0 && r.base_recovery <= 1.0) {
            errors.push(format!(
                "recovery.base_recovery ({:.3}) must be in (0, 1]",
                r.base_recovery
            ));
        }
        if !(r.size_sensitivity >= MIN_SIZE_SENSITIVITY) {
            errors.push(format!(
                "recovery.size_sensitivity ({:e}) must be >= {MIN_SIZE_SENSITIVITY}",
                r.size_sensitivity
            ));
        }
        if !(r.max_solids_penalty > 0.0 && r.max_solids_penalty <= 1.0) {
            errors.push(format!(
                "recovery.max_solids_penalty ({:.3}) must be in (0, 1]",
                r.max_solids_penalty
            ));
        }

        let mb = &self.mass_balance;
        let peak_grade = mb.ore_grade * (1.0 + mb.enrichment_ratio);
        if peak_grade > 1.0 {
            errors.push(format!(
                "mass_balance: ore_grade x (1 + enrichment_ratio) = {peak_grade:.3} exceeds 1.0"
            ));
        }

        if let Err(e) = self.operating_inputs().validate() {
            errors.push(format!("inputs: {e}"));
        }

        Self::check_axis(&self.search.feed_rate_tph, "search.feed_rate_tph", &mut errors);
        Self::check_axis(&self.search.solids_percent, "search.solids_percent", &mut errors);
        Self::check_axis(
            &self.search.splitter_position,
            "search.splitter_position",
            &mut errors,
        );
        if self.search.iteration_budget == Some(0) {
            errors.push("search.iteration_budget must be > 0 when set".to_string());
        }

        let s = &self.sensitivity;
        if s.max_multiplier < s.min_multiplier {
            errors.push(format!(
                "sensitivity.max_multiplier ({:.2}) must be >= min_multiplier ({:.2})",
                s.max_multiplier, s.min_multiplier
            ));
        }
        if s.step <= 0.0 {
            errors.push("sensitivity.step must be > 0".to_string());
        }

        if self.heatmap.feed_rate_points == 0 || self.heatmap.splitter_points == 0 {
            errors.push("heatmap resolution must be at least 1 point per axis".to_string());
        }

        // Physical range validation
        let (range_errors, range_warnings) = super::validation::validate_physical_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // Reject NaN/Inf anywhere in the tree
        if let Ok(value) = toml::Value::try_from(self) {
            for key in super::validation::non_finite_keys(&value, "") {
                errors.push(format!("{key} must be a finite number"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_axis(axis: &AxisBounds, name: &str, errors: &mut Vec<String>) {
        if !axis.min.is_finite() || !axis.max.is_finite() || !axis.step.is_finite() {
            // reported by the non-finite sweep
            return;
        }
        if axis.min > axis.max {
            errors.push(format!(
                "{name}: min ({:.3}) must be <= max ({:.3})",
                axis.min, axis.max
            ));
        }
        if axis.step <= 0.0 {
            errors.push(format!("{name}: step ({:.3}) must be > 0", axis.step));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),

    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Plant Info
// ============================================================================

/// Identification metadata; appears in logs and reports only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantInfo {
    #[serde(default = "default_plant_name")]
    pub name: String,

    /// Site / lease name
    #[serde(default)]
    pub site: String,
}

fn default_plant_name() -> String {
    "SPIRAL-01".to_string()
}

impl Default for PlantInfo {
    fn default() -> Self {
        Self {
            name: default_plant_name(),
            site: String::new(),
        }
    }
}

// ============================================================================
// Operating Defaults
// ============================================================================

/// Operating point used when the caller does not override it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingDefaults {
    #[serde(default = "default_feed_rate")]
    pub feed_rate_tph: f64,
    #[serde(default = "default_solids")]
    pub solids_percent: f64,
    #[serde(default = "default_d80")]
    pub d80_um: f64,
    #[serde(default = "default_splitter")]
    pub splitter_position: f64,
}

fn default_feed_rate() -> f64 { 300.0 }
fn default_solids() -> f64 { 30.0 }
fn default_d80() -> f64 { 150.0 }
fn default_splitter() -> f64 { 0.5 }

impl Default for OperatingDefaults {
    fn default() -> Self {
        Self {
            feed_rate_tph: default_feed_rate(),
            solids_percent: default_solids(),
            d80_um: default_d80(),
            splitter_position: default_splitter(),
        }
    }
}

// ============================================================================
// Recovery Config
// ============================================================================

/// Calibration of the size factor and dense-slurry penalty curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Recovery at the optimum size and below the viscosity threshold (0–1).
    #[serde(default = "default_base_recovery")]
    pub base_recovery: f64,

    /// Feed d80 at which the spiral separates best (µm).
    #[serde(default = "default_reference_d80")]
    pub reference_d80_um: f64,

    /// Width of the size bell in natural-log units of d80/reference.
    /// Smaller values punish off-size feed harder.
    #[serde(default = "default_size_sensitivity")]
    pub size_sensitivity: f64,

    /// Solids percentage above which flow in the trough is disrupted.
    #[serde(default = "default_viscosity_threshold")]
    pub viscosity_threshold_percent: f64,

    /// Penalty approached as solids tend to 100% (0–1).
    #[serde(default = "default_max_solids_penalty")]
    pub max_solids_penalty: f64,
}

fn default_base_recovery() -> f64 { 0.70 }
fn default_reference_d80() -> f64 { 150.0 }
fn default_size_sensitivity() -> f64 { 0.9 }
fn default_viscosity_threshold() -> f64 { 35.0 }
fn default_max_solids_penalty() -> f64 { 0.6 }

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            base_recovery: default_base_recovery(),
            reference_d80_um: default_reference_d80(),
            size_sensitivity: default_size_sensitivity(),
            viscosity_threshold_percent: default_viscosity_threshold(),
            max_solids_penalty: default_max_solids_penalty(),
        }
    }
}

// ============================================================================
// Mass Balance Config
// ============================================================================

/// Grade model constants.
///
/// grade = ore_grade × (1 + enrichment_ratio × (1 − mass_pull))
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassBalanceConfig {
    /// Valuable mineral fraction of the feed solids.
    #[serde(default = "default_ore_grade")]
    pub ore_grade: f64,

    /// Upgrade achieved as mass pull tends to zero. 0 = no upgrading.
    #[serde(default = "default_enrichment_ratio")]
    pub enrichment_ratio: f64,
}

fn default_ore_grade() -> f64 { 0.03 }
fn default_enrichment_ratio() -> f64 { 4.0 }

impl Default for MassBalanceConfig {
    fn default() -> Self {
        Self {
            ore_grade: default_ore_grade(),
            enrichment_ratio: default_enrichment_ratio(),
        }
    }
}

// ============================================================================
// Cost Config
// ============================================================================

/// Hourly operating cost sheet. Currency is whatever the prices are quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    #[serde(default = "default_labour")]
    pub labour_per_hr: f64,

    /// Fixed electrical draw of pumps and ancillaries (kW).
    #[serde(default = "default_installed_power")]
    pub installed_power_kw: f64,

    /// Additional energy per tonne of slurry feed (kWh/t).
    #[serde(default = "default_specific_energy")]
    pub specific_energy_kwh_per_t: f64,

    #[serde(default = "default_electricity")]
    pub electricity_per_kwh: f64,

    #[serde(default = "default_water")]
    pub water_per_hr: f64,

    #[serde(default = "default_maintenance")]
    pub maintenance_per_hr: f64,

    #[serde(default = "default_lease_tax")]
    pub lease_tax_per_hr: f64,

    /// Mining and haulage per tonne of dry feed solids.
    #[serde(default = "default_mining")]
    pub mining_per_t: f64,
}

fn default_labour() -> f64 { 120.0 }
fn default_installed_power() -> f64 { 150.0 }
fn default_specific_energy() -> f64 { 0.5 }
fn default_electricity() -> f64 { 0.12 }
fn default_water() -> f64 { 15.0 }
fn default_maintenance() -> f64 { 40.0 }
fn default_lease_tax() -> f64 { 25.0 }
fn default_mining() -> f64 { 8.0 }

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            labour_per_hr: default_labour(),
            installed_power_kw: default_installed_power(),
            specific_energy_kwh_per_t: default_specific_energy(),
            electricity_per_kwh: default_electricity(),
            water_per_hr: default_water(),
            maintenance_per_hr: default_maintenance(),
            lease_tax_per_hr: default_lease_tax(),
            mining_per_t: default_mining(),
        }
    }
}

// ============================================================================
// Market Config
// ============================================================================

/// Price paid per tonne of contained valuable mineral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    #[serde(default = "default_price")]
    pub price_per_t: f64,
}

fn default_price() -> f64 { 500.0 }

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            price_per_t: default_price(),
        }
    }
}

impl MarketConfig {
    /// Copy of this market with the price scaled by `multiplier`.
    pub fn scaled(&self, multiplier: f64) -> Self {
        Self {
            price_per_t: self.price_per_t * multiplier,
        }
    }
}

// ============================================================================
// Search Config
// ============================================================================

/// Optimizer bounds and resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_feed_rate_axis")]
    pub feed_rate_tph: AxisBounds,

    #[serde(default = "default_solids_axis")]
    pub solids_percent: AxisBounds,

    #[serde(default = "default_splitter_axis")]
    pub splitter_position: AxisBounds,

    #[serde(default)]
    pub strategy: SearchStrategy,

    /// When set, overrides the axis steps with an even split of this many
    /// total evaluations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_budget: Option<usize>,

    /// Fan the exhaustive scan out over the rayon pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_feed_rate_axis() -> AxisBounds { AxisBounds::new(100.0, 500.0, 25.0) }
fn default_solids_axis() -> AxisBounds { AxisBounds::new(10.0, 50.0, 2.5) }
fn default_splitter_axis() -> AxisBounds { AxisBounds::new(0.0, 1.0, 0.05) }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            feed_rate_tph: default_feed_rate_axis(),
            solids_percent: default_solids_axis(),
            splitter_position: default_splitter_axis(),
            strategy: SearchStrategy::default(),
            iteration_budget: None,
            parallel: false,
        }
    }
}

// ============================================================================
// Sensitivity Config
// ============================================================================

/// Price multiplier sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityConfig {
    #[serde(default = "default_min_multiplier")]
    pub min_multiplier: f64,
    #[serde(default = "default_max_multiplier")]
    pub max_multiplier: f64,
    #[serde(default = "default_multiplier_step")]
    pub step: f64,
}

fn default_min_multiplier() -> f64 { 0.5 }
fn default_max_multiplier() -> f64 { 1.5 }
fn default_multiplier_step() -> f64 { 0.1 }

impl Default for SensitivityConfig {
    fn default() -> Self {
        Self {
            min_multiplier: default_min_multiplier(),
            max_multiplier: default_max_multiplier(),
            step: default_multiplier_step(),
        }
    }
}

// ============================================================================
// Heatmap Config
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapConfig {
    #[serde(default = "default_heatmap_points")]
    pub feed_rate_points: usize,
    #[serde(default = "default_heatmap_points")]
    pub splitter_points: usize,
}

fn default_heatmap_points() -> usize { 10 }

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            feed_rate_points: default_heatmap_points(),
            splitter_points: default_heatmap_points(),
        }
    }
}

// ============================================================================
// KPI Targets
// ============================================================================

/// Operator targets checked by the KPI evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiTargets {
    #[serde(default = "default_target_margin")]
    pub target_margin_percent: f64,
    #[serde(default = "default_target_throughput")]
    pub target_throughput_tph: f64,
    #[serde(default = "default_target_profit")]
    pub target_profit_per_hr: f64,
}

fn default_target_margin() -> f64 { 25.0 }
fn default_target_throughput() -> f64 { 300.0 }
fn default_target_profit() -> f64 { 500.0 }

impl Default for KpiTargets {
    fn default() -> Self {
        Self {
            target_margin_percent: default_target_margin(),
            target_throughput_tph: default_target_throughput(),
            target_profit_per_hr: default_target_profit(),
        }
    }
}

// ============================================================================
// Mineral Suite
// ============================================================================

/// One payable mineral of a polymetallic feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralConfig {
    pub name: String,
    /// Mass fraction of the feed solids (gold at 0.8 g/t is 0.8e-6)
    pub feed_grade: f64,
    /// Recovery at optimum size and dilution (0–1)
    pub base_recovery: f64,
    /// Price per tonne of contained mineral
    pub price_per_t: f64,
}

impl MineralConfig {
    fn new(name: &str, feed_grade: f64, base_recovery: f64, price_per_t: f64) -> Self {
        Self {
            name: name.to_string(),
            feed_grade,
            base_recovery,
            price_per_t,
        }
    }
}

/// Heavy-mineral sands suite with a minor free-gold credit.
fn default_minerals() -> Vec<MineralConfig> {
    vec![
        MineralConfig::new("Gold", 0.8e-6, 0.65, 80_000_000.0),
        MineralConfig::new("Magnetite", 0.06, 0.70, 100.0),
        MineralConfig::new("Ilmenite", 0.015, 0.60, 250.0),
        MineralConfig::new("Rutile", 0.003, 0.55, 800.0),
        MineralConfig::new("Monazite", 0.0015, 0.50, 1500.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = PlantConfig::default();
        assert!(config.validate().is_ok(), "Default config must always validate");
    }

    #[test]
    fn empty_toml_produces_defaults() {
        let config: PlantConfig = toml::from_str("").expect("empty TOML should parse");
        assert_eq!(config, PlantConfig::default());
        assert_eq!(config.recovery.reference_d80_um, 150.0);
        assert_eq!(config.costs.mining_per_t, 8.0);
        assert_eq!(config.minerals.len(), 5);
    }

    #[test]
    fn partial_toml_override() {
        let toml_str = r#"
[plant]
name = "Attock-2"

[recovery]
base_recovery = 0.8

[search.feed_rate_tph]
min = 200.0
max = 400.0
step = 50.0
"#;
        let config = PlantConfig::from_toml_str(toml_str).expect("partial TOML should load");
        assert_eq!(config.plant.name, "Attock-2");
        assert_eq!(config.recovery.base_recovery, 0.8);
        assert_eq!(config.search.feed_rate_tph, AxisBounds::new(200.0, 400.0, 50.0));
        // untouched values keep defaults
        assert_eq!(config.recovery.viscosity_threshold_percent, 35.0);
        assert_eq!(config.search.solids_percent, default_solids_axis());
    }

    #[test]
    fn explicit_mineral_list_replaces_default_suite() {
        let toml_str = r#"
[[minerals]]
name = "Zircon"
feed_grade = 0.01
base_recovery = 0.6
price_per_t = 1800.0
"#;
        let config = PlantConfig::from_toml_str(toml_str).expect("mineral list should load");
        assert_eq!(config.minerals.len(), 1);
        assert_eq!(config.minerals[0].name, "Zircon");
    }

    #[test]
    fn validation_catches_inverted_search_axis() {
        let mut config = PlantConfig::default();
        config.search.solids_percent = AxisBounds::new(40.0, 20.0, 1.0);
        let result = config.validate();
        assert!(result.is_err(), "min > max should fail validation");
        if let Err(ConfigError::Validation(errors)) = result {
            assert!(errors.iter().any(|e| e.contains("search.solids_percent")));
        }
    }

    #[test]
    fn validation_catches_zero_step_and_budget() {
        let mut config = PlantConfig::default();
        config.search.splitter_position.step = 0.0;
        config.search.iteration_budget = Some(0);
        let Err(ConfigError::Validation(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert!(errors.iter().any(|e| e.contains("search.splitter_position")));
        assert!(errors.iter().any(|e| e.contains("iteration_budget")));
    }

    #[test]
    fn validation_catches_grade_above_unity() {
        let mut config = PlantConfig::default();
        config.mass_balance.ore_grade = 0.3;
        config.mass_balance.enrichment_ratio = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_catches_invalid_default_inputs() {
        let mut config = PlantConfig::default();
        config.inputs.solids_percent = 100.0;
        let Err(ConfigError::Validation(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert!(errors.iter().any(|e| e.contains("solids_percent")));
    }

    #[test]
    fn validation_rejects_nan() {
        let mut config = PlantConfig::default();
        config.costs.water_per_hr = f64::NAN;
        let Err(ConfigError::Validation(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert!(errors.iter().any(|e| e.contains("costs.water_per_hr")));
    }

    #[test]
    fn validation_rejects_tiny_size_sensitivity() {
        let mut config = PlantConfig::default();
        config.recovery.size_sensitivity = 1e-200;
        let Err(ConfigError::Validation(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert!(errors.iter().any(|e| e.contains("recovery.size_sensitivity")));

        config.recovery.size_sensitivity = MIN_SIZE_SENSITIVITY;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_round_trip_preserves_config() {
        let mut config = PlantConfig::default();
        config.search.iteration_budget = Some(1000);
        config.search.strategy = SearchStrategy::Greedy;
        let text = config.to_toml().expect("serialize");
        let back = PlantConfig::from_toml_str(&text).expect("reload");
        assert_eq!(back, config);
    }

    #[test]
    fn market_scaling_is_linear() {
        let market = MarketConfig { price_per_t: 400.0 };
        assert_eq!(market.scaled(2.0).price_per_t, 800.0);
        assert_eq!(market.scaled(0.0).price_per_t, 0.0);
    }
}
