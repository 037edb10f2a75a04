//! Evaluation Pipeline
//!
//! ```text
//! OperatingInputs ─► Recovery ─► Mass Balance ─► Economics ─► profit
//! ```
//!
//! `ProcessModel` carries the immutable coefficients for one pass. The
//! optimizer, sensitivity analyzer and profit surface all drive the same
//! `evaluate` call, so every number they report is reproducible by hand from
//! a single operating point.

use serde::{Deserialize, Serialize};

use crate::config::{CostConfig, MarketConfig, MassBalanceConfig, RecoveryConfig};
use crate::economics::compute_economics;
use crate::physics_engine::{compute_mass_balance, compute_recovery};
use crate::types::{OperatingInputs, PipelineOutput, ProcessError};

/// Model coefficients for one evaluation pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessModel {
    pub recovery: RecoveryConfig,
    pub mass_balance: MassBalanceConfig,
    pub costs: CostConfig,
    pub market: MarketConfig,
}

impl ProcessModel {
    /// Run the full pipeline on a pre-validated operating point.
    pub fn evaluate(&self, inputs: &OperatingInputs) -> PipelineOutput {
        let recovery = compute_recovery(inputs, &self.recovery);
        let mass_balance = compute_mass_balance(inputs, &recovery, &self.mass_balance);
        let economics = compute_economics(&mass_balance, &self.costs, &self.market);

        PipelineOutput {
            inputs: *inputs,
            recovery,
            mass_balance,
            economics,
        }
    }

    /// Validate the operating point, then run the pipeline.
    pub fn evaluate_checked(&self, inputs: &OperatingInputs) -> Result<PipelineOutput, ProcessError> {
        inputs.validate()?;
        Ok(self.evaluate(inputs))
    }

    /// Same model with the market price scaled by `multiplier`.
    pub fn with_price_multiplier(&self, multiplier: f64) -> Self {
        Self {
            market: self.market.scaled(multiplier),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_point() -> OperatingInputs {
        OperatingInputs::new(100.0, 30.0, 150.0, 0.5).unwrap()
    }

    #[test]
    fn reference_point_is_unpenalized() {
        let model = ProcessModel::default();
        let out = model.evaluate(&reference_point());
        assert_eq!(out.recovery.recovery_fraction, model.recovery.base_recovery);
    }

    #[test]
    fn evaluate_checked_rejects_invalid_inputs() {
        let model = ProcessModel::default();
        let bad = OperatingInputs {
            solids_percent: 0.0,
            ..reference_point()
        };
        assert!(matches!(
            model.evaluate_checked(&bad),
            Err(ProcessError::InvalidInput { field: "solids_percent", .. })
        ));
    }

    #[test]
    fn doubling_price_doubles_revenue_only() {
        let model = ProcessModel::default();
        let base = model.evaluate(&reference_point()).economics;
        let doubled = model.with_price_multiplier(2.0).evaluate(&reference_point()).economics;

        assert_eq!(doubled.revenue, 2.0 * base.revenue);
        assert_eq!(doubled.opex, base.opex);
        assert!((doubled.profit - (base.profit + base.revenue)).abs() < 1e-9);
    }

    #[test]
    fn output_echoes_inputs() {
        let model = ProcessModel::default();
        let inputs = reference_point();
        assert_eq!(model.evaluate(&inputs).inputs, inputs);
    }
}
