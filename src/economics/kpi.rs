//! Unit economics and KPI target checks

use crate::config::KpiTargets;
use crate::types::{EconomicResult, KpiReport, OperatingInputs};

/// Derive cost/t, profit/t and margin, and check them against targets.
///
/// Per-tonne figures are against slurry feed rate; margin is 0 when the
/// point earns no revenue.
pub fn evaluate_kpis(
    inputs: &OperatingInputs,
    economics: &EconomicResult,
    targets: &KpiTargets,
) -> KpiReport {
    let (cost_per_ton, profit_per_ton) = if inputs.feed_rate_tph > 0.0 {
        (
            economics.opex / inputs.feed_rate_tph,
            economics.profit / inputs.feed_rate_tph,
        )
    } else {
        (0.0, 0.0)
    };

    let margin_percent = if economics.revenue > 0.0 {
        economics.profit / economics.revenue * 100.0
    } else {
        0.0
    };

    KpiReport {
        cost_per_ton,
        profit_per_ton,
        margin_percent,
        throughput_ok: inputs.feed_rate_tph >= targets.target_throughput_tph,
        margin_ok: margin_percent >= targets.target_margin_percent,
        profit_ok: economics.profit >= targets.target_profit_per_hr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OpexBreakdown;

    fn economics(revenue: f64, opex: f64) -> EconomicResult {
        EconomicResult {
            opex,
            revenue,
            profit: revenue - opex,
            opex_breakdown: OpexBreakdown::default(),
        }
    }

    fn inputs(feed_rate: f64) -> OperatingInputs {
        OperatingInputs {
            feed_rate_tph: feed_rate,
            solids_percent: 30.0,
            d80_um: 150.0,
            splitter_position: 0.5,
        }
    }

    #[test]
    fn unit_economics_per_tonne() {
        let kpi = evaluate_kpis(&inputs(200.0), &economics(3000.0, 1000.0), &KpiTargets::default());
        assert!((kpi.cost_per_ton - 5.0).abs() < 1e-12);
        assert!((kpi.profit_per_ton - 10.0).abs() < 1e-12);
        assert!((kpi.margin_percent - 66.666_666_666).abs() < 1e-6);
    }

    #[test]
    fn targets_checked_independently() {
        let targets = KpiTargets {
            target_margin_percent: 25.0,
            target_throughput_tph: 300.0,
            target_profit_per_hr: 5000.0,
        };
        let kpi = evaluate_kpis(&inputs(250.0), &economics(3000.0, 1000.0), &targets);
        assert!(!kpi.throughput_ok);
        assert!(kpi.margin_ok);
        assert!(!kpi.profit_ok);
        assert!(!kpi.all_ok());

        let kpi = evaluate_kpis(&inputs(300.0), &economics(8000.0, 1000.0), &targets);
        assert!(kpi.all_ok());
    }

    #[test]
    fn no_revenue_means_zero_margin() {
        let kpi = evaluate_kpis(&inputs(300.0), &economics(0.0, 900.0), &KpiTargets::default());
        assert_eq!(kpi.margin_percent, 0.0);
        assert!(!kpi.margin_ok);
        assert!(kpi.profit_per_ton < 0.0);
    }
}
