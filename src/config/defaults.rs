//! System-wide default constants.
//!
//! Numbers that are not plant calibration (those live in `PlantConfig`) but
//! still need a single home.

// ============================================================================
// Search Grid
// ============================================================================

/// Slack when deciding whether a stepped axis value has reached its maximum.
///
/// Relative to the step, so 0.1/0.05 style steps land exactly on the bound.
pub const GRID_STEP_TOLERANCE: f64 = 1e-9;

/// Largest grid the optimizer will accept (points across all axes).
///
/// 5 million evaluations is a few seconds single-threaded.
pub const MAX_GRID_POINTS: usize = 5_000_000;

/// Hard stop for greedy coordinate ascent moves.
pub const GREEDY_MAX_MOVES: usize = 10_000;

/// Largest profit surface (feed rate points × splitter points).
pub const MAX_HEATMAP_POINTS: usize = 1_000_000;

/// Surfaces above this many cells are allowed but logged as unusual.
pub const LARGE_HEATMAP_POINTS: usize = 40_000;

// ============================================================================
// Calibration Bounds
// ============================================================================

/// Smallest accepted `recovery.size_sensitivity` (log-space σ).
pub const MIN_SIZE_SENSITIVITY: f64 = 1e-3;

// ============================================================================
// Output
// ============================================================================

/// Default file name for `report` when `--output` is not given.
pub const DEFAULT_REPORT_FILE: &str = "spiral_report.json";
