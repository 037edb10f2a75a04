//! Operating Point Optimization
//!
//! Searches the bounded feed rate × solids × splitter box for the most
//! profitable setting, then answers "what if" questions around it.
//! Entirely deterministic: the same config always yields the same answer.
//!
//! ## Tools
//! - `ProcessOptimizer` - exhaustive (optionally rayon-parallel) or greedy grid search
//! - `analyze_sensitivity()` - profit response to market price
//! - `profit_surface()` - feed rate × splitter profit heatmap

pub mod grid;
mod heatmap;
mod optimizer;
mod sensitivity;

pub use grid::SearchGrid;
pub use heatmap::profit_surface;
pub use optimizer::ProcessOptimizer;
pub use sensitivity::{analyze_sensitivity, price_multipliers};
