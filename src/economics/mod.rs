//! Economic Model
//!
//! Hourly OPEX, revenue and profit for one mass balance. Costs are
//! price-independent, so revenue is the only term that moves with the market.

mod kpi;

pub use kpi::evaluate_kpis;

use crate::config::{CostConfig, MarketConfig};
use crate::types::{EconomicResult, MassBalanceResult, OpexBreakdown};

/// Compute OPEX, revenue and profit ($/h).
///
/// - Power is affine in slurry feed rate (fixed draw + specific energy)
/// - Mining is linear in dry feed solids
/// - Labour, water, maintenance and lease/tax are fixed hourly charges
///
/// Profit is not clamped; a negative value flags an unprofitable point.
pub fn compute_economics(
    mass_balance: &MassBalanceResult,
    costs: &CostConfig,
    market: &MarketConfig,
) -> EconomicResult {
    let opex_breakdown = OpexBreakdown {
        labour: costs.labour_per_hr,
        power: power_cost(mass_balance.feed_rate_tph, costs),
        mining: costs.mining_per_t * mass_balance.feed_mass_tph,
        water: costs.water_per_hr,
        maintenance: costs.maintenance_per_hr,
        lease_tax: costs.lease_tax_per_hr,
    };
    let opex = opex_breakdown.total();

    // contained mineral (t/h) × price
    let revenue = mass_balance.concentrate_mass_tph * mass_balance.grade * market.price_per_t;

    EconomicResult {
        opex,
        revenue,
        profit: revenue - opex,
        opex_breakdown,
    }
}

/// Electricity cost for the given slurry feed rate ($/h).
pub fn power_cost(feed_rate_tph: f64, costs: &CostConfig) -> f64 {
    let kw = costs.installed_power_kw + costs.specific_energy_kwh_per_t * feed_rate_tph;
    kw * costs.electricity_per_kwh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mass_balance() -> MassBalanceResult {
        MassBalanceResult {
            feed_rate_tph: 300.0,
            feed_mass_tph: 90.0,
            concentrate_mass_tph: 31.5,
            tailings_mass_tph: 58.5,
            mass_pull: 0.35,
            grade: 0.108,
        }
    }

    #[test]
    fn opex_matches_cost_sheet() {
        let costs = CostConfig::default();
        let econ = compute_economics(&mass_balance(), &costs, &MarketConfig::default());
        // 120 labour + (150 kW + 0.5 × 300) × 0.12 + 8 × 90 + 15 + 40 + 25
        assert!((econ.opex - 956.0).abs() < 1e-9, "opex = {}", econ.opex);
        assert!((econ.opex_breakdown.power - 36.0).abs() < 1e-9);
        assert!((econ.opex_breakdown.mining - 720.0).abs() < 1e-9);
    }

    #[test]
    fn revenue_is_contained_mineral_times_price() {
        let market = MarketConfig { price_per_t: 500.0 };
        let econ = compute_economics(&mass_balance(), &CostConfig::default(), &market);
        assert!((econ.revenue - 31.5 * 0.108 * 500.0).abs() < 1e-9);
        assert!((econ.profit - (econ.revenue - econ.opex)).abs() < 1e-12);
    }

    #[test]
    fn profit_may_be_negative() {
        let market = MarketConfig { price_per_t: 1.0 };
        let econ = compute_economics(&mass_balance(), &CostConfig::default(), &market);
        assert!(econ.profit < 0.0);
    }

    #[test]
    fn power_cost_is_affine_in_feed_rate() {
        let costs = CostConfig::default();
        let p0 = power_cost(0.0, &costs);
        let p1 = power_cost(100.0, &costs);
        let p2 = power_cost(200.0, &costs);
        assert!((p0 - 18.0).abs() < 1e-9);
        assert!(((p2 - p1) - (p1 - p0)).abs() < 1e-9);
    }

    #[test]
    fn opex_does_not_depend_on_price() {
        let costs = CostConfig::default();
        let cheap = compute_economics(&mass_balance(), &costs, &MarketConfig { price_per_t: 10.0 });
        let dear = compute_economics(&mass_balance(), &costs, &MarketConfig { price_per_t: 1e4 });
        assert_eq!(cheap.opex, dear.opex);
    }
}
