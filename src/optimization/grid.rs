//! Discretized search grid
//!
//! Axis values ascend from `min`; the flattened index runs feed rate (outer),
//! solids, splitter (inner), which is the traversal order used for ties.

use crate::config::defaults::{GRID_STEP_TOLERANCE, MAX_GRID_POINTS};
use crate::types::{AxisBounds, OperatingInputs, ProcessError, SearchSpace};

/// Stepped values from `min` to `max` inclusive.
///
/// The final value is always `max`, even when the step does not divide the
/// range evenly.
pub fn axis_values(name: &str, axis: &AxisBounds) -> Result<Vec<f64>, ProcessError> {
    check_bounds(name, axis.min, axis.max)?;
    if !axis.step.is_finite() || axis.step <= 0.0 {
        return Err(ProcessError::config(format!(
            "{name}: step ({}) must be a positive finite number",
            axis.step
        )));
    }

    let span = axis.max - axis.min;
    let intervals = (span / axis.step + GRID_STEP_TOLERANCE).floor();
    if intervals + 1.0 > MAX_GRID_POINTS as f64 {
        return Err(ProcessError::config(format!(
            "{name}: step {} over [{}, {}] gives too many points",
            axis.step, axis.min, axis.max
        )));
    }

    let count = intervals as usize + 1;
    let mut values: Vec<f64> = (0..count)
        .map(|i| (axis.min + i as f64 * axis.step).min(axis.max))
        .collect();
    if let Some(&last) = values.last() {
        if last < axis.max - GRID_STEP_TOLERANCE * axis.step {
            values.push(axis.max);
        }
    }
    Ok(values)
}

/// `count` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(name: &str, min: f64, max: f64, count: usize) -> Result<Vec<f64>, ProcessError> {
    check_bounds(name, min, max)?;
    match count {
        0 => Err(ProcessError::config(format!("{name}: need at least one point"))),
        1 => Ok(vec![min]),
        n => {
            let last = (n - 1) as f64;
            let mut values: Vec<f64> = (0..n)
                .map(|i| min + (max - min) * i as f64 / last)
                .collect();
            values[n - 1] = max;
            Ok(values)
        }
    }
}

fn check_bounds(name: &str, min: f64, max: f64) -> Result<(), ProcessError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ProcessError::config(format!(
            "{name}: bounds must be finite (got min={min}, max={max})"
        )));
    }
    if min > max {
        return Err(ProcessError::config(format!(
            "{name}: min ({min}) must be <= max ({max})"
        )));
    }
    Ok(())
}

/// Largest k with k³ <= budget.
fn points_per_axis(budget: usize) -> usize {
    let mut k = 1usize;
    while (k + 1).saturating_pow(3) <= budget {
        k += 1;
    }
    k
}

/// Every candidate operating point of a search space.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchGrid {
    pub feed_rates: Vec<f64>,
    pub solids: Vec<f64>,
    pub splitters: Vec<f64>,
    pub d80_um: f64,
}

impl SearchGrid {
    /// Discretize by the configured step sizes.
    pub fn from_steps(space: &SearchSpace) -> Result<Self, ProcessError> {
        Self::check_domain(space)?;
        let grid = Self {
            feed_rates: axis_values("feed_rate_tph", &space.feed_rate_tph)?,
            solids: axis_values("solids_percent", &space.solids_percent)?,
            splitters: axis_values("splitter_position", &space.splitter_position)?,
            d80_um: space.d80_um,
        };
        grid.check_size()?;
        Ok(grid)
    }

    /// Discretize so the whole grid spends at most `budget` evaluations,
    /// split evenly across the three axes. Steps are ignored.
    pub fn from_budget(space: &SearchSpace, budget: usize) -> Result<Self, ProcessError> {
        if budget == 0 {
            return Err(ProcessError::config("iteration_budget must be > 0"));
        }
        Self::check_domain(space)?;
        let k = points_per_axis(budget);
        let points = |name: &str, axis: &AxisBounds| {
            // a degenerate axis only ever has one distinct value
            let n = if axis.min == axis.max { 1 } else { k };
            linspace(name, axis.min, axis.max, n)
        };
        let grid = Self {
            feed_rates: points("feed_rate_tph", &space.feed_rate_tph)?,
            solids: points("solids_percent", &space.solids_percent)?,
            splitters: points("splitter_position", &space.splitter_position)?,
            d80_um: space.d80_um,
        };
        grid.check_size()?;
        Ok(grid)
    }

    /// Pick the discretization: budget when given, steps otherwise.
    pub fn build(space: &SearchSpace, budget: Option<usize>) -> Result<Self, ProcessError> {
        match budget {
            Some(b) => Self::from_budget(space, b),
            None => Self::from_steps(space),
        }
    }

    pub fn len(&self) -> usize {
        self.feed_rates.len() * self.solids.len() * self.splitters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Axis sizes as (feed rate, solids, splitter).
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.feed_rates.len(), self.solids.len(), self.splitters.len())
    }

    /// Flattened traversal index of an axis-index triple.
    pub fn index_of(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.solids.len() + j) * self.splitters.len() + k
    }

    /// Axis-index triple of a flattened traversal index.
    pub fn coords_of(&self, index: usize) -> (usize, usize, usize) {
        let k = index % self.splitters.len();
        let rest = index / self.splitters.len();
        (rest / self.solids.len(), rest % self.solids.len(), k)
    }

    /// Operating point at a flattened traversal index.
    pub fn point(&self, index: usize) -> OperatingInputs {
        let (i, j, k) = self.coords_of(index);
        OperatingInputs {
            feed_rate_tph: self.feed_rates[i],
            solids_percent: self.solids[j],
            d80_um: self.d80_um,
            splitter_position: self.splitters[k],
        }
    }

    /// All points in traversal order.
    pub fn points(&self) -> impl Iterator<Item = OperatingInputs> + '_ {
        (0..self.len()).map(move |idx| self.point(idx))
    }

    fn check_domain(space: &SearchSpace) -> Result<(), ProcessError> {
        let f = &space.feed_rate_tph;
        let s = &space.solids_percent;
        let p = &space.splitter_position;
        check_bounds("feed_rate_tph", f.min, f.max)?;
        check_bounds("solids_percent", s.min, s.max)?;
        check_bounds("splitter_position", p.min, p.max)?;

        if f.min <= 0.0 {
            return Err(ProcessError::config(format!(
                "feed_rate_tph: min ({}) must be > 0",
                f.min
            )));
        }
        if s.min <= 0.0 || s.max >= 100.0 {
            return Err(ProcessError::config(format!(
                "solids_percent: [{}, {}] must lie inside (0, 100)",
                s.min, s.max
            )));
        }
        if p.min < 0.0 || p.max > 1.0 {
            return Err(ProcessError::config(format!(
                "splitter_position: [{}, {}] must lie inside [0, 1]",
                p.min, p.max
            )));
        }
        if !space.d80_um.is_finite() || space.d80_um <= 0.0 {
            return Err(ProcessError::config(format!(
                "d80_um ({}) must be a positive finite size",
                space.d80_um
            )));
        }
        Ok(())
    }

    fn check_size(&self) -> Result<(), ProcessError> {
        let total = self
            .feed_rates
            .len()
            .checked_mul(self.solids.len())
            .and_then(|n| n.checked_mul(self.splitters.len()));
        match total {
            Some(n) if n <= MAX_GRID_POINTS => Ok(()),
            _ => Err(ProcessError::config(format!(
                "search grid {}x{}x{} exceeds {MAX_GRID_POINTS} points",
                self.feed_rates.len(),
                self.solids.len(),
                self.splitters.len()
            ))),
        }
    }
}
