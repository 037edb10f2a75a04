//! Recovery model for spiral gravity separation
//!
//! Two empirical adjustments on top of a calibrated base recovery:
//! - Size factor: log-normal bell centred on the reference d80
//! - Solids penalty: linear loss above the viscosity threshold
//!
//! recovery = base × size_factor × (1 − solids_penalty), clamped to [0, 1]

use crate::config::RecoveryConfig;
use crate::types::{OperatingInputs, RecoveryResult};

/// Compute recovery for a pre-validated operating point.
pub fn compute_recovery(inputs: &OperatingInputs, cfg: &RecoveryConfig) -> RecoveryResult {
    let size_factor = size_factor(inputs.d80_um, cfg);
    let solids_penalty = solids_penalty(inputs.solids_percent, cfg);
    let recovery_fraction =
        (cfg.base_recovery * size_factor * (1.0 - solids_penalty)).clamp(0.0, 1.0);

    RecoveryResult {
        recovery_fraction,
        size_factor,
        solids_penalty,
    }
}

/// Particle size multiplier in (0, 1].
///
/// Formula: exp(−ln(d80 / d_ref)² / (2σ²))
///
/// Equal to 1 at the reference size and strictly decreasing as d80 moves
/// away in either direction. Working in log space makes "twice too coarse"
/// and "twice too fine" cost the same, matching how spirals lose slimes and
/// coarse middlings symmetrically on a sieve-series scale.
pub fn size_factor(d80_um: f64, cfg: &RecoveryConfig) -> f64 {
    if d80_um <= 0.0 || cfg.reference_d80_um <= 0.0 {
        return 0.0;
    }
    let log_ratio = (d80_um / cfg.reference_d80_um).ln();
    if log_ratio == 0.0 {
        return 1.0;
    }
    let sigma = cfg.size_sensitivity;
    (-(log_ratio * log_ratio) / (2.0 * sigma * sigma)).exp()
}

/// Dense-slurry penalty in [0, max_solids_penalty).
///
/// Zero at or below the viscosity threshold; above it the penalty grows
/// linearly, reaching `max_solids_penalty` at 100% solids.
pub fn solids_penalty(solids_percent: f64, cfg: &RecoveryConfig) -> f64 {
    let threshold = cfg.viscosity_threshold_percent;
    if solids_percent <= threshold {
        return 0.0;
    }
    let excess = (solids_percent - threshold) / (100.0 - threshold);
    cfg.max_solids_penalty * excess.clamp(0.0, 1.0)
}
