//! Operating point and per-stage results of the process pipeline

use serde::{Deserialize, Serialize};

use super::{EconomicResult, ProcessError};

// ============================================================================
// Operating Inputs
// ============================================================================

/// Plant operating point evaluated by the pipeline.
///
/// Fields are public so callers can build points freely, but the pipeline
/// entry points only accept values that pass [`OperatingInputs::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingInputs {
    /// Slurry feed rate (t/h)
    pub feed_rate_tph: f64,
    /// Solids content of the slurry by mass (%), exclusive (0, 100)
    pub solids_percent: f64,
    /// Feed particle size, 80% passing (µm)
    pub d80_um: f64,
    /// Splitter setting, 0 = everything to tailings, 1 = fully open
    pub splitter_position: f64,
}

impl OperatingInputs {
    /// Build a validated operating point.
    pub fn new(
        feed_rate_tph: f64,
        solids_percent: f64,
        d80_um: f64,
        splitter_position: f64,
    ) -> Result<Self, ProcessError> {
        let inputs = Self {
            feed_rate_tph,
            solids_percent,
            d80_um,
            splitter_position,
        };
        inputs.validate()?;
        Ok(inputs)
    }

    /// Check every field against its physical domain.
    pub fn validate(&self) -> Result<(), ProcessError> {
        if !self.feed_rate_tph.is_finite() || self.feed_rate_tph <= 0.0 {
            return Err(ProcessError::InvalidInput {
                field: "feed_rate_tph",
                value: self.feed_rate_tph,
                reason: "must be a positive finite rate",
            });
        }
        if !self.solids_percent.is_finite()
            || self.solids_percent <= 0.0
            || self.solids_percent >= 100.0
        {
            return Err(ProcessError::InvalidInput {
                field: "solids_percent",
                value: self.solids_percent,
                reason: "must be in (0, 100)",
            });
        }
        if !self.d80_um.is_finite() || self.d80_um <= 0.0 {
            return Err(ProcessError::InvalidInput {
                field: "d80_um",
                value: self.d80_um,
                reason: "must be a positive finite particle size",
            });
        }
        if !self.splitter_position.is_finite() || !(0.0..=1.0).contains(&self.splitter_position) {
            return Err(ProcessError::InvalidInput {
                field: "splitter_position",
                value: self.splitter_position,
                reason: "must be in [0, 1]",
            });
        }
        Ok(())
    }
}

// ============================================================================
// Stage Results
// ============================================================================

/// Output of the recovery model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryResult {
    /// Fraction of valuable mineral reporting to concentrate, 0.0–1.0
    pub recovery_fraction: f64,
    /// Particle size multiplier, 1.0 at the reference d80
    pub size_factor: f64,
    /// Dense-slurry penalty, 0.0 at or below the viscosity threshold
    pub solids_penalty: f64,
}

/// Output of the mass balance engine. All flows in t/h of dry solids
/// except `feed_rate_tph`, which is the slurry rate it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassBalanceResult {
    pub feed_rate_tph: f64,
    pub feed_mass_tph: f64,
    pub concentrate_mass_tph: f64,
    pub tailings_mass_tph: f64,
    /// Concentrate mass as a fraction of feed solids
    pub mass_pull: f64,
    /// Valuable mineral fraction in the concentrate
    pub grade: f64,
}

/// One full pass through recovery, mass balance and economics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub inputs: OperatingInputs,
    pub recovery: RecoveryResult,
    pub mass_balance: MassBalanceResult,
    pub economics: EconomicResult,
}

impl PipelineOutput {
    pub fn profit(&self) -> f64 {
        self.economics.profit
    }
}
