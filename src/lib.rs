//! Spiral Twin: spiral concentrator process calculator
//!
//! Deterministic model of a spiral gravity-separation plant, from slurry
//! feed to hourly profit, plus search and what-if tools around it.
//!
//! ## Architecture
//!
//! - **Physics Engine**: recovery, mass balance and per-mineral breakdown
//! - **Economics**: hourly OPEX, revenue, profit and KPI checks
//! - **Pipeline**: `ProcessModel` chaining the stages for one operating point
//! - **Optimization**: grid search, price sensitivity and profit surface
//! - **Report**: JSON snapshot of every analysis for one operating point

pub mod config;
pub mod economics;
pub mod optimization;
pub mod physics_engine;
pub mod pipeline;
pub mod report;
pub mod types;

// Re-export configuration
pub use config::{ConfigError, PlantConfig};

// Re-export the evaluation entry point
pub use pipeline::ProcessModel;

// Re-export commonly used types
pub use types::{
    AxisBounds, EconomicResult, KpiReport, MassBalanceResult, MineralAssay, OperatingInputs,
    OptimizationResult, PipelineOutput, ProcessError, ProfitSurface, RecoveryResult,
    SearchSpace, SearchStrategy, SensitivityCurve, SensitivityPoint,
};

// Re-export search and what-if tools
pub use optimization::{analyze_sensitivity, price_multipliers, profit_surface, ProcessOptimizer};

pub use report::ReportSnapshot;
