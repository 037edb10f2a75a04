//! Two-product mass balance around the spiral splitter
//!
//! No losses are modelled: every tonne of feed solids leaves as either
//! concentrate or tailings.

use crate::config::MassBalanceConfig;
use crate::types::{MassBalanceResult, OperatingInputs, RecoveryResult};

/// Fraction of recovered mass the splitter diverts to concentrate.
///
/// 0 sends everything to tailings, 1 takes all recovered mass.
pub fn splitter_efficiency(splitter_position: f64) -> f64 {
    splitter_position.clamp(0.0, 1.0)
}

/// Dry solids in the feed slurry (t/h).
pub fn feed_mass(inputs: &OperatingInputs) -> f64 {
    inputs.feed_rate_tph * inputs.solids_percent / 100.0
}

/// Split feed solids into concentrate and tailings and estimate grade.
pub fn compute_mass_balance(
    inputs: &OperatingInputs,
    recovery: &RecoveryResult,
    cfg: &MassBalanceConfig,
) -> MassBalanceResult {
    let feed_mass_tph = feed_mass(inputs);
    let concentrate_mass_tph =
        feed_mass_tph * recovery.recovery_fraction * splitter_efficiency(inputs.splitter_position);
    let tailings_mass_tph = feed_mass_tph - concentrate_mass_tph;

    let mass_pull = if feed_mass_tph > 0.0 {
        concentrate_mass_tph / feed_mass_tph
    } else {
        0.0
    };

    MassBalanceResult {
        feed_rate_tph: inputs.feed_rate_tph,
        feed_mass_tph,
        concentrate_mass_tph,
        tailings_mass_tph,
        mass_pull,
        grade: concentrate_grade(mass_pull, cfg),
    }
}

/// Concentrate grade as a linear function of mass pull.
///
/// Formula: ore_grade × (1 + enrichment_ratio × (1 − mass_pull))
///
/// A tight cut upgrades most; pulling all the feed returns the ore grade.
pub fn concentrate_grade(mass_pull: f64, cfg: &MassBalanceConfig) -> f64 {
    let pull = mass_pull.clamp(0.0, 1.0);
    (cfg.ore_grade * (1.0 + cfg.enrichment_ratio * (1.0 - pull))).max(0.0)
}
