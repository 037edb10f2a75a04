//! Physics Engine Module
//!
//! Closed-form empirical models for a spiral concentrator.
//! All math here is deterministic; no fitting or learning at run time.
//!
//! ## Stages
//! - `compute_recovery()` - size factor and solids penalty on base recovery
//! - `compute_mass_balance()` - concentrate/tailings split and grade
//! - `mineral_breakdown()` - bulk mass and revenue allocated per mineral

pub mod mass_balance;
pub mod minerals;
pub mod recovery;

pub use mass_balance::{
    compute_mass_balance, concentrate_grade, feed_mass, splitter_efficiency,
};
pub use minerals::mineral_breakdown;
pub use recovery::{compute_recovery, size_factor, solids_penalty};
