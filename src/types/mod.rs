//! Shared data structures for the spiral concentrator model
//!
//! - OperatingInputs: one plant operating point
//! - RecoveryResult, MassBalanceResult, EconomicResult: per-stage outputs
//! - PipelineOutput: all stages for one point
//! - OptimizationResult, SensitivityCurve, ProfitSurface: search and what-if outputs
//! - ProcessError: the error every fallible model call returns

mod economics;
mod error;
mod optimization;
mod process;

pub use economics::*;
pub use error::*;
pub use optimization::*;
pub use process::*;
