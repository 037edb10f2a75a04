//! Price sensitivity sweep
//!
//! Re-runs the pipeline at one operating point with the market price scaled
//! by each multiplier. Physical results do not depend on price, so revenue
//! scales exactly and profit moves along a straight line.

use tracing::debug;

use crate::pipeline::ProcessModel;
use crate::types::{
    AxisBounds, OperatingInputs, ProcessError, SensitivityCurve, SensitivityPoint,
};

use super::grid::axis_values;

/// Evaluate profit at `base_inputs` for each price multiplier, in order.
///
/// Multipliers must be finite, non-negative and non-decreasing.
pub fn analyze_sensitivity(
    model: &ProcessModel,
    base_inputs: &OperatingInputs,
    multipliers: &[f64],
) -> Result<SensitivityCurve, ProcessError> {
    base_inputs.validate()?;
    check_multipliers(multipliers)?;

    let base = model.evaluate(base_inputs).economics;
    let points: Vec<SensitivityPoint> = multipliers
        .iter()
        .map(|&m| {
            let econ = model.with_price_multiplier(m).evaluate(base_inputs).economics;
            SensitivityPoint {
                price_multiplier: m,
                revenue: econ.revenue,
                profit: econ.profit,
            }
        })
        .collect();

    let breakeven_multiplier = (base.revenue > 0.0).then(|| base.opex / base.revenue);
    debug!(
        points = points.len(),
        breakeven = ?breakeven_multiplier,
        "Sensitivity sweep complete"
    );

    Ok(SensitivityCurve {
        points,
        breakeven_multiplier,
    })
}

/// Stepped multipliers from `min` to `max` inclusive.
pub fn price_multipliers(min: f64, max: f64, step: f64) -> Result<Vec<f64>, ProcessError> {
    if min < 0.0 {
        return Err(ProcessError::config(format!(
            "price multiplier min ({min}) must be >= 0"
        )));
    }
    axis_values("price_multiplier", &AxisBounds::new(min, max, step))
}

fn check_multipliers(multipliers: &[f64]) -> Result<(), ProcessError> {
    if let Some(&m) = multipliers.iter().find(|m| !m.is_finite() || **m < 0.0) {
        return Err(ProcessError::config(format!(
            "price multiplier {m} must be finite and >= 0"
        )));
    }
    if let Some(w) = multipliers.windows(2).find(|w| w[1] < w[0]) {
        return Err(ProcessError::config(format!(
            "price multipliers must be non-decreasing ({} follows {})",
            w[1], w[0]
        )));
    }
    Ok(())
}
