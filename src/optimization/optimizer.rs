//! ProcessOptimizer: profit-maximizing search over the operating grid

use std::collections::HashMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::defaults::GREEDY_MAX_MOVES;
use crate::config::PlantConfig;
use crate::pipeline::ProcessModel;
use crate::types::{
    OptimizationResult, PipelineOutput, ProcessError, SearchSpace, SearchStrategy,
};

use super::grid::SearchGrid;

/// Searches a bounded grid of operating points for the highest profit.
///
/// Ties go to the point met first in traversal order (feed rate outermost,
/// splitter innermost), so results are reproducible run to run and match
/// between the sequential and parallel scans.
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptimizer {
    model: ProcessModel,
    strategy: SearchStrategy,
    parallel: bool,
    iteration_budget: Option<usize>,
}

impl ProcessOptimizer {
    /// Exhaustive, sequential, step-driven optimizer for `model`.
    pub fn new(model: ProcessModel) -> Self {
        Self {
            model,
            strategy: SearchStrategy::Exhaustive,
            parallel: false,
            iteration_budget: None,
        }
    }

    /// Optimizer configured from the `[search]` section.
    pub fn from_config(config: &PlantConfig) -> Self {
        Self {
            model: config.model(),
            strategy: config.search.strategy,
            parallel: config.search.parallel,
            iteration_budget: config.search.iteration_budget,
        }
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_iteration_budget(mut self, budget: Option<usize>) -> Self {
        self.iteration_budget = budget;
        self
    }

    pub fn model(&self) -> &ProcessModel {
        &self.model
    }

    /// Find the most profitable operating point in `space`.
    pub fn optimize(&self, space: &SearchSpace) -> Result<OptimizationResult, ProcessError> {
        let grid = SearchGrid::build(space, self.iteration_budget)?;
        let (nf, ns, np) = grid.shape();
        info!(
            strategy = %self.strategy,
            parallel = self.parallel,
            grid = %format!("{nf}x{ns}x{np}"),
            d80_um = grid.d80_um,
            "Starting optimization"
        );

        let (best, evaluated) = match self.strategy {
            SearchStrategy::Exhaustive if self.parallel => (self.scan_parallel(&grid)?, grid.len()),
            SearchStrategy::Exhaustive => (self.scan(&grid)?, grid.len()),
            SearchStrategy::Greedy => self.climb(&grid)?,
        };

        info!(
            feed_rate_tph = best.inputs.feed_rate_tph,
            solids_percent = best.inputs.solids_percent,
            splitter_position = best.inputs.splitter_position,
            profit = best.profit(),
            evaluated,
            "Optimization complete"
        );

        Ok(OptimizationResult {
            best_inputs: best.inputs,
            best_profit: best.profit(),
            best_output: best,
            candidates_evaluated: evaluated,
            strategy: self.strategy,
        })
    }

    // ========================================================================
    // Exhaustive
    // ========================================================================

    fn scan(&self, grid: &SearchGrid) -> Result<PipelineOutput, ProcessError> {
        let mut best: Option<PipelineOutput> = None;
        for point in grid.points() {
            let out = self.model.evaluate(&point);
            // strict: the earlier point keeps a tie
            if best.as_ref().map_or(true, |b| out.profit() > b.profit()) {
                best = Some(out);
            }
        }
        best.ok_or_else(|| ProcessError::config("search grid is empty"))
    }

    fn scan_parallel(&self, grid: &SearchGrid) -> Result<PipelineOutput, ProcessError> {
        (0..grid.len())
            .into_par_iter()
            .map(|idx| (idx, self.model.evaluate(&grid.point(idx))))
            .reduce_with(pick_better)
            .map(|(_, out)| out)
            .ok_or_else(|| ProcessError::config("search grid is empty"))
    }

    // ========================================================================
    // Greedy
    // ========================================================================

    /// Coordinate ascent from the grid centre. Each round evaluates the ±1
    /// neighbours on every axis and moves to the best one if it strictly
    /// improves profit.
    fn climb(&self, grid: &SearchGrid) -> Result<(PipelineOutput, usize), ProcessError> {
        if grid.is_empty() {
            return Err(ProcessError::config("search grid is empty"));
        }
        let (nf, ns, np) = grid.shape();
        let mut seen: HashMap<usize, PipelineOutput> = HashMap::new();
        let mut eval = |idx: usize| -> PipelineOutput {
            *seen
                .entry(idx)
                .or_insert_with(|| self.model.evaluate(&grid.point(idx)))
        };

        let mut at = ((nf - 1) / 2, (ns - 1) / 2, (np - 1) / 2);
        let mut current = eval(grid.index_of(at.0, at.1, at.2));

        for moves in 0..GREEDY_MAX_MOVES {
            let mut candidates = neighbours(at, (nf, ns, np));
            candidates.sort_by_key(|&(i, j, k)| grid.index_of(i, j, k));

            let mut step: Option<((usize, usize, usize), PipelineOutput)> = None;
            for n in candidates {
                let out = eval(grid.index_of(n.0, n.1, n.2));
                if step.as_ref().map_or(true, |(_, b)| out.profit() > b.profit()) {
                    step = Some((n, out));
                }
            }

            match step {
                Some((n, out)) if out.profit() > current.profit() => {
                    debug!(moves, profit = out.profit(), "Greedy step to {:?}", n);
                    at = n;
                    current = out;
                }
                _ => break,
            }
        }

        Ok((current, seen.len()))
    }
}

/// Higher profit wins; equal profit goes to the lower traversal index.
fn pick_better(
    a: (usize, PipelineOutput),
    b: (usize, PipelineOutput),
) -> (usize, PipelineOutput) {
    let (pa, pb) = (a.1.profit(), b.1.profit());
    if pb > pa || (pb == pa && b.0 < a.0) {
        b
    } else {
        a
    }
}

fn neighbours(
    at: (usize, usize, usize),
    shape: (usize, usize, usize),
) -> Vec<(usize, usize, usize)> {
    let (i, j, k) = at;
    let (nf, ns, np) = shape;
    let mut out = Vec::with_capacity(6);
    if i > 0 {
        out.push((i - 1, j, k));
    }
    if i + 1 < nf {
        out.push((i + 1, j, k));
    }
    if j > 0 {
        out.push((i, j - 1, k));
    }
    if j + 1 < ns {
        out.push((i, j + 1, k));
    }
    if k > 0 {
        out.push((i, j, k - 1));
    }
    if k + 1 < np {
        out.push((i, j, k + 1));
    }
    out
}
