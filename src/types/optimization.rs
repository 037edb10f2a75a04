//! Optimization, sensitivity and profit surface types

use serde::{Deserialize, Serialize};

use super::{OperatingInputs, PipelineOutput};

/// Bounds and discretization step for one search axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
    /// Spacing between grid points; must be > 0
    pub step: f64,
}

impl AxisBounds {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }
}

/// Bounded input space explored by the optimizer.
///
/// d80 is not a control variable at the spiral; it is held fixed for the
/// whole search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchSpace {
    pub feed_rate_tph: AxisBounds,
    pub solids_percent: AxisBounds,
    pub splitter_position: AxisBounds,
    pub d80_um: f64,
}

/// How the optimizer walks the discretized grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Evaluate every grid point
    #[default]
    Exhaustive,
    /// Coordinate ascent from the grid centre over ±1 neighbours
    Greedy,
}

impl std::fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchStrategy::Exhaustive => write!(f, "exhaustive"),
            SearchStrategy::Greedy => write!(f, "greedy"),
        }
    }
}

impl std::str::FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exhaustive" => Ok(SearchStrategy::Exhaustive),
            "greedy" => Ok(SearchStrategy::Greedy),
            other => Err(format!("unknown search strategy '{other}' (expected exhaustive or greedy)")),
        }
    }
}

/// Most profitable operating point found by a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_inputs: OperatingInputs,
    pub best_profit: f64,
    /// Full pipeline output at the winning point
    pub best_output: PipelineOutput,
    /// Distinct grid points evaluated
    pub candidates_evaluated: usize,
    pub strategy: SearchStrategy,
}

/// Profit at one price multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub price_multiplier: f64,
    pub revenue: f64,
    pub profit: f64,
}

/// Profit response to market price, in the order the multipliers were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityCurve {
    pub points: Vec<SensitivityPoint>,
    /// Multiplier at which profit reaches zero; `None` when the base point
    /// earns no revenue
    pub breakeven_multiplier: Option<f64>,
}

/// Profit over a feed rate × splitter grid at fixed solids and d80.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSurface {
    pub feed_rates: Vec<f64>,
    pub splitter_positions: Vec<f64>,
    /// `profit[i][j]` is the profit at `feed_rates[i]`, `splitter_positions[j]`
    pub profit: Vec<Vec<f64>>,
}

impl ProfitSurface {
    /// Grid cell with the highest profit as (feed rate, splitter, profit).
    pub fn peak(&self) -> Option<(f64, f64, f64)> {
        let mut best: Option<(f64, f64, f64)> = None;
        for (i, row) in self.profit.iter().enumerate() {
            for (j, &p) in row.iter().enumerate() {
                if best.map_or(true, |(_, _, b)| p > b) {
                    best = Some((self.feed_rates[i], self.splitter_positions[j], p));
                }
            }
        }
        best
    }
}
