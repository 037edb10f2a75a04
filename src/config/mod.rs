//! Plant Configuration Module
//!
//! Provides per-plant configuration loaded from TOML files, replacing all
//! hardcoded model coefficients with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `SPIRAL_CONFIG` environment variable (path to TOML file)
//! 2. `plant_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Configuration is plain data passed into each calculation; there is no
//! global instance, so tests can run different economic scenarios side by side.
//!
//! ```ignore
//! let config = PlantConfig::load();
//! let output = config.model().evaluate_checked(&config.operating_inputs())?;
//! ```

mod plant_config;
pub mod defaults;
pub mod validation;

pub use plant_config::*;
