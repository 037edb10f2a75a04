//! Per-mineral breakdown for a polymetallic feed
//!
//! Each mineral sees the same size and dilution penalties as the bulk stream
//! but carries its own feed grade, base recovery and price. The breakdown
//! splits the pipeline's figures rather than pricing minerals on its own:
//! contained mass is allocated by recovered feed grade, revenue by recovered
//! value, so the suite always sums to the bulk result.

use crate::config::MineralConfig;
use crate::types::{MineralAssay, PipelineOutput};

/// Recovery, contained mass, grade and revenue for each configured mineral.
///
/// Sum of `mineral_mass_tph` equals concentrate × grade and sum of
/// `revenue_per_hr` equals `economics.revenue`. A suite with no recovered
/// value falls back to mass weights for revenue; one with no recovered mass
/// reports zeros.
pub fn mineral_breakdown(
    output: &PipelineOutput,
    minerals: &[MineralConfig],
) -> Vec<MineralAssay> {
    let recovery = &output.recovery;
    let mb = &output.mass_balance;
    let penalty_factor = recovery.size_factor * (1.0 - recovery.solids_penalty);
    let contained_tph = mb.concentrate_mass_tph * mb.grade;
    let revenue = output.economics.revenue;

    let recoveries: Vec<f64> = minerals
        .iter()
        .map(|m| (m.base_recovery * penalty_factor).clamp(0.0, 1.0))
        .collect();
    let mass_weights: Vec<f64> = minerals
        .iter()
        .zip(&recoveries)
        .map(|(m, r)| m.feed_grade * r)
        .collect();
    let value_weights: Vec<f64> = minerals
        .iter()
        .zip(&mass_weights)
        .map(|(m, w)| w * m.price_per_t)
        .collect();

    let mass_shares = normalise(&mass_weights);
    let revenue_shares = if value_weights.iter().sum::<f64>() > 0.0 {
        normalise(&value_weights)
    } else {
        mass_shares.clone()
    };

    minerals
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let mineral_mass_tph = contained_tph * mass_shares[i];
            let concentrate_grade = if mb.concentrate_mass_tph > 0.0 {
                mineral_mass_tph / mb.concentrate_mass_tph
            } else {
                0.0
            };
            let revenue_share = if revenue > 0.0 { revenue_shares[i] } else { 0.0 };
            MineralAssay {
                name: m.name.clone(),
                recovery_fraction: recoveries[i],
                mineral_mass_tph,
                concentrate_grade,
                revenue_per_hr: revenue * revenue_share,
                revenue_share,
            }
        })
        .collect()
}

/// Weights scaled to sum to 1; all zeros when there is nothing to share.
fn normalise(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 {
        weights.iter().map(|w| w / total).collect()
    } else {
        vec![0.0; weights.len()]
    }
}
