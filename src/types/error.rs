//! Errors raised by the process core.
//!
//! Both variants are deterministic and input-driven: they are surfaced to the
//! caller immediately and never retried.

use thiserror::Error;

/// Rejection of an operating point or of a search/sensitivity configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    /// An operating input lies outside its physical domain.
    #[error("Invalid input: {field} = {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Search bounds, step sizes, budgets or price multipliers are malformed.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl ProcessError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}
