//! Pipeline Regression Tests
//!
//! Property sweeps over the valid operating envelope plus the reference
//! examples the model is calibrated against. Sampling uses a fixed seed so
//! failures reproduce.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use spiral_twin::config::{PlantConfig, RecoveryConfig};
use spiral_twin::optimization::SearchGrid;
use spiral_twin::physics_engine::{compute_recovery, mineral_breakdown};
use spiral_twin::{
    analyze_sensitivity, price_multipliers, AxisBounds, OperatingInputs, ProcessError,
    ProcessModel, ProcessOptimizer, SearchSpace, SearchStrategy,
};

const SEED: u64 = 0x5912_a1;
const SAMPLES: usize = 2_000;

/// Random operating point inside the valid input domain.
fn sample_inputs(rng: &mut StdRng) -> OperatingInputs {
    OperatingInputs {
        feed_rate_tph: rng.gen_range(1.0..1_000.0),
        solids_percent: rng.gen_range(0.5..99.5),
        d80_um: rng.gen_range(5.0..5_000.0),
        splitter_position: rng.gen_range(0.0..=1.0),
    }
}

fn search_space() -> SearchSpace {
    SearchSpace {
        feed_rate_tph: AxisBounds::new(100.0, 500.0, 50.0),
        solids_percent: AxisBounds::new(10.0, 50.0, 5.0),
        splitter_position: AxisBounds::new(0.0, 1.0, 0.1),
        d80_um: 150.0,
    }
}

// ============================================================================
// Envelope Properties
// ============================================================================

#[test]
fn recovery_stays_in_unit_interval() {
    let model = ProcessModel::default();
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..SAMPLES {
        let inputs = sample_inputs(&mut rng);
        let out = model.evaluate_checked(&inputs).unwrap();
        let r = out.recovery.recovery_fraction;
        assert!((0.0..=1.0).contains(&r), "recovery {r} at {inputs:?}");
    }
}

#[test]
fn mass_is_conserved_everywhere() {
    let model = ProcessModel::default();
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    for _ in 0..SAMPLES {
        let inputs = sample_inputs(&mut rng);
        let mb = model.evaluate(&inputs).mass_balance;
        let residual = mb.concentrate_mass_tph + mb.tailings_mass_tph - mb.feed_mass_tph;
        assert!(
            residual.abs() <= 1e-9 * mb.feed_mass_tph.max(1.0),
            "residual {residual} at {inputs:?}"
        );
        assert!(mb.concentrate_mass_tph >= 0.0);
        assert!(mb.tailings_mass_tph >= 0.0);
    }
}

#[test]
fn profit_is_revenue_minus_opex() {
    let model = ProcessModel::default();
    let mut rng = StdRng::seed_from_u64(SEED + 2);
    for _ in 0..SAMPLES {
        let econ = model.evaluate(&sample_inputs(&mut rng)).economics;
        assert!(econ.opex.is_finite() && econ.revenue.is_finite());
        assert!((econ.profit - (econ.revenue - econ.opex)).abs() < 1e-9);
        assert!((econ.opex - econ.opex_breakdown.total()).abs() < 1e-9);
    }
}

#[test]
fn recovery_peaks_at_reference_size() {
    let cfg = RecoveryConfig::default();
    let at = |d80: f64| {
        let inputs = OperatingInputs::new(200.0, 25.0, d80, 0.5).unwrap();
        compute_recovery(&inputs, &cfg).recovery_fraction
    };
    let peak = at(cfg.reference_d80_um);

    let mut finer = cfg.reference_d80_um;
    let mut coarser = cfg.reference_d80_um;
    let (mut last_fine, mut last_coarse) = (peak, peak);
    for _ in 0..20 {
        finer *= 0.85;
        coarser *= 1.15;
        let (f, c) = (at(finer), at(coarser));
        assert!(f < last_fine, "not decreasing below reference at {finer}");
        assert!(c < last_coarse, "not decreasing above reference at {coarser}");
        last_fine = f;
        last_coarse = c;
    }
}

#[test]
fn solids_above_threshold_cut_recovery() {
    let cfg = RecoveryConfig::default();
    let at = |solids: f64| {
        let inputs = OperatingInputs::new(200.0, solids, 150.0, 0.5).unwrap();
        compute_recovery(&inputs, &cfg).recovery_fraction
    };
    let threshold = cfg.viscosity_threshold_percent;
    assert_eq!(at(threshold * 0.5), at(threshold));

    let mut last = at(threshold);
    let mut s = threshold + 1.0;
    while s < 100.0 {
        let r = at(s);
        assert!(r < last, "recovery did not fall at {s}% solids");
        last = r;
        s += 4.0;
    }
}

// ============================================================================
// Reference Examples
// ============================================================================

#[test]
fn reference_point_recovers_base_recovery() {
    let config = PlantConfig::default();
    let inputs = OperatingInputs::new(100.0, 30.0, 150.0, 0.5).unwrap();
    let out = config.model().evaluate(&inputs);
    assert_eq!(out.recovery.recovery_fraction, config.recovery.base_recovery);
}

#[test]
fn default_point_economics() {
    let config = PlantConfig::default();
    let out = config.model().evaluate(&config.operating_inputs());
    // 300 t/h at 30% solids: 90 t/h dry, 31.5 t/h concentrate at 10.8%
    assert!((out.mass_balance.feed_mass_tph - 90.0).abs() < 1e-9);
    assert!((out.mass_balance.concentrate_mass_tph - 31.5).abs() < 1e-9);
    assert!((out.mass_balance.grade - 0.108).abs() < 1e-12);
    assert!((out.economics.revenue - 1701.0).abs() < 1e-6);
    assert!((out.economics.opex - 956.0).abs() < 1e-9);
}

#[test]
fn mineral_suite_sums_to_bulk_everywhere() {
    let config = PlantConfig::default();
    let model = config.model();
    let mut rng = StdRng::seed_from_u64(SEED + 5);
    for _ in 0..SAMPLES {
        let inputs = sample_inputs(&mut rng);
        let out = model.evaluate(&inputs);
        let assays = mineral_breakdown(&out, &config.minerals);

        let revenue: f64 = assays.iter().map(|a| a.revenue_per_hr).sum();
        let mass: f64 = assays.iter().map(|a| a.mineral_mass_tph).sum();
        let contained = out.mass_balance.concentrate_mass_tph * out.mass_balance.grade;
        assert!(
            (revenue - out.economics.revenue).abs() <= 1e-9 * out.economics.revenue.max(1.0),
            "revenue {revenue} vs {} at {inputs:?}",
            out.economics.revenue
        );
        assert!((mass - contained).abs() <= 1e-12 * contained.max(1.0));
    }
}

#[test]
fn doubling_price_doubles_revenue() {
    let config = PlantConfig::default();
    let inputs = config.operating_inputs();
    let mut doubled = config.clone();
    doubled.market.price_per_t *= 2.0;

    let base = config.model().evaluate(&inputs).economics;
    let high = doubled.model().evaluate(&inputs).economics;
    assert_eq!(high.revenue, 2.0 * base.revenue);
    assert_eq!(high.opex, base.opex);
    assert!((high.profit - (base.profit + base.revenue)).abs() < 1e-9);
}

#[test]
fn out_of_domain_inputs_name_the_field() {
    let model = ProcessModel::default();
    let base = PlantConfig::default().operating_inputs();
    let cases = [
        (OperatingInputs { feed_rate_tph: 0.0, ..base }, "feed_rate_tph"),
        (OperatingInputs { solids_percent: 100.0, ..base }, "solids_percent"),
        (OperatingInputs { d80_um: -3.0, ..base }, "d80_um"),
        (OperatingInputs { splitter_position: 1.01, ..base }, "splitter_position"),
        (OperatingInputs { feed_rate_tph: f64::NAN, ..base }, "feed_rate_tph"),
    ];
    for (inputs, expected) in cases {
        match model.evaluate_checked(&inputs) {
            Err(ProcessError::InvalidInput { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected InvalidInput for {expected}, got {other:?}"),
        }
    }
}

// ============================================================================
// Optimizer and Sensitivity
// ============================================================================

#[test]
fn optimizer_dominates_every_candidate() {
    let model = ProcessModel::default();
    let space = search_space();
    let result = ProcessOptimizer::new(model).optimize(&space).unwrap();
    let grid = SearchGrid::from_steps(&space).unwrap();
    for p in grid.points() {
        assert!(result.best_profit >= model.evaluate(&p).profit(), "beaten by {p:?}");
    }
}

#[test]
fn parallel_scan_agrees_on_random_price_curves() {
    let mut rng = StdRng::seed_from_u64(SEED + 3);
    for _ in 0..5 {
        let mut config = PlantConfig::default();
        config.market.price_per_t = rng.gen_range(50.0..1_500.0);
        config.mass_balance.enrichment_ratio = rng.gen_range(0.0..8.0);
        let model = config.model();

        let seq = ProcessOptimizer::new(model).optimize(&search_space()).unwrap();
        let par = ProcessOptimizer::new(model)
            .with_parallel(true)
            .optimize(&search_space())
            .unwrap();
        assert_eq!(seq.best_inputs, par.best_inputs);
        assert_eq!(seq.best_profit, par.best_profit);
    }
}

#[test]
fn greedy_never_beats_exhaustive() {
    let model = ProcessModel::default();
    let full = ProcessOptimizer::new(model).optimize(&search_space()).unwrap();
    let greedy = ProcessOptimizer::new(model)
        .with_strategy(SearchStrategy::Greedy)
        .optimize(&search_space())
        .unwrap();
    assert!(greedy.best_profit <= full.best_profit);
    assert_eq!(greedy.strategy, SearchStrategy::Greedy);
}

#[test]
fn optimizer_from_config_honours_budget() {
    let mut config = PlantConfig::default();
    config.search.iteration_budget = Some(1_000);
    let result = ProcessOptimizer::from_config(&config)
        .optimize(&config.search_space(150.0))
        .unwrap();
    assert_eq!(result.candidates_evaluated, 1_000);
}

#[test]
fn sensitivity_is_monotone_across_envelope() {
    let model = ProcessModel::default();
    let multipliers = price_multipliers(0.0, 3.0, 0.25).unwrap();
    let mut rng = StdRng::seed_from_u64(SEED + 4);
    for _ in 0..200 {
        let inputs = sample_inputs(&mut rng);
        let curve = analyze_sensitivity(&model, &inputs, &multipliers).unwrap();
        assert!(curve.points.windows(2).all(|w| w[1].profit >= w[0].profit));
    }
}
