//! Profit surface over feed rate × splitter position
//!
//! Solids and d80 are held at the base operating point. The surface is for
//! display: it samples evenly between the search bounds and ignores steps.

use crate::config::defaults::MAX_HEATMAP_POINTS;
use crate::config::HeatmapConfig;
use crate::pipeline::ProcessModel;
use crate::types::{AxisBounds, OperatingInputs, ProcessError, ProfitSurface};

use super::grid::linspace;

/// Profit at every (feed rate, splitter) pair; rows follow feed rate.
pub fn profit_surface(
    model: &ProcessModel,
    base: &OperatingInputs,
    feed_rate: &AxisBounds,
    splitter: &AxisBounds,
    resolution: &HeatmapConfig,
) -> Result<ProfitSurface, ProcessError> {
    base.validate()?;
    let cells = resolution
        .feed_rate_points
        .checked_mul(resolution.splitter_points)
        .filter(|&n| n <= MAX_HEATMAP_POINTS);
    if cells.is_none() {
        return Err(ProcessError::config(format!(
            "heatmap resolution {}x{} exceeds {MAX_HEATMAP_POINTS} cells",
            resolution.feed_rate_points, resolution.splitter_points
        )));
    }

    let feed_rates = linspace(
        "feed_rate_tph",
        feed_rate.min,
        feed_rate.max,
        resolution.feed_rate_points,
    )?;
    let splitter_positions = linspace(
        "splitter_position",
        splitter.min,
        splitter.max,
        resolution.splitter_points,
    )?;

    let mut profit = Vec::with_capacity(feed_rates.len());
    for &f in &feed_rates {
        let mut row = Vec::with_capacity(splitter_positions.len());
        for &s in &splitter_positions {
            let point = OperatingInputs {
                feed_rate_tph: f,
                splitter_position: s,
                ..*base
            };
            row.push(model.evaluate_checked(&point)?.profit());
        }
        profit.push(row);
    }

    Ok(ProfitSurface {
        feed_rates,
        splitter_positions,
        profit,
    })
}
