//! Economic outputs, KPI checks and per-mineral breakdown

use serde::{Deserialize, Serialize};

/// Hourly operating cost split by driver ($/h).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OpexBreakdown {
    pub labour: f64,
    pub power: f64,
    pub mining: f64,
    pub water: f64,
    pub maintenance: f64,
    pub lease_tax: f64,
}

impl OpexBreakdown {
    /// Sum of all cost lines.
    pub fn total(&self) -> f64 {
        self.labour + self.power + self.mining + self.water + self.maintenance + self.lease_tax
    }
}

/// Output of the economic model ($/h).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EconomicResult {
    pub opex: f64,
    pub revenue: f64,
    /// Revenue minus OPEX; negative for an unprofitable operating point
    pub profit: f64,
    pub opex_breakdown: OpexBreakdown,
}

/// Unit economics and pass/fail against operator targets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    /// OPEX per tonne of slurry feed ($/t)
    pub cost_per_ton: f64,
    /// Profit per tonne of slurry feed ($/t)
    pub profit_per_ton: f64,
    /// Profit as a percentage of revenue, 0 when there is no revenue
    pub margin_percent: f64,
    pub throughput_ok: bool,
    pub margin_ok: bool,
    pub profit_ok: bool,
}

impl KpiReport {
    /// True when every target is met.
    pub fn all_ok(&self) -> bool {
        self.throughput_ok && self.margin_ok && self.profit_ok
    }
}

/// One mineral's slice of the bulk concentrate and its revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineralAssay {
    pub name: String,
    pub recovery_fraction: f64,
    /// Share of the contained mineral in concentrate (t/h)
    pub mineral_mass_tph: f64,
    /// Mineral fraction of the bulk concentrate
    pub concentrate_grade: f64,
    pub revenue_per_hr: f64,
    /// Share of `EconomicResult::revenue`, 0.0–1.0
    pub revenue_share: f64,
}
