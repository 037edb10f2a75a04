//! Plant report snapshot
//!
//! One JSON document capturing everything an operator looks at for a given
//! operating point: the evaluation, KPI status, mineral suite, the optimum
//! within the configured search box, the price sweep and the profit surface.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlantConfig;
use crate::economics::evaluate_kpis;
use crate::optimization::{
    analyze_sensitivity, price_multipliers, profit_surface, ProcessOptimizer,
};
use crate::physics_engine::mineral_breakdown;
use crate::types::{
    KpiReport, MineralAssay, OperatingInputs, OptimizationResult, PipelineOutput, ProcessError,
    ProfitSurface, SensitivityCurve,
};

/// Full analysis of one operating point under one plant configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    pub plant: String,
    pub site: String,
    pub generated_at: DateTime<Utc>,
    pub output: PipelineOutput,
    pub kpis: KpiReport,
    pub minerals: Vec<MineralAssay>,
    pub optimum: OptimizationResult,
    /// Profit lost by running at `output` instead of the optimum ($/h)
    pub profit_gap: f64,
    pub sensitivity: SensitivityCurve,
    pub profit_surface: ProfitSurface,
}

impl ReportSnapshot {
    /// Run every analysis for `inputs` under `config`.
    pub fn capture(config: &PlantConfig, inputs: &OperatingInputs) -> Result<Self, ProcessError> {
        let model = config.model();
        let output = model.evaluate_checked(inputs)?;
        let kpis = evaluate_kpis(inputs, &output.economics, &config.kpi);
        let minerals = mineral_breakdown(&output, &config.minerals);

        let space = config.search_space(inputs.d80_um);
        let optimum = ProcessOptimizer::from_config(config).optimize(&space)?;

        let s = &config.sensitivity;
        let multipliers = price_multipliers(s.min_multiplier, s.max_multiplier, s.step)?;
        let sensitivity = analyze_sensitivity(&model, inputs, &multipliers)?;

        let profit_surface = profit_surface(
            &model,
            inputs,
            &space.feed_rate_tph,
            &space.splitter_position,
            &config.heatmap,
        )?;

        Ok(Self {
            plant: config.plant.name.clone(),
            site: config.plant.site.clone(),
            generated_at: Utc::now(),
            profit_gap: optimum.best_profit - output.profit(),
            output,
            kpis,
            minerals,
            optimum,
            sensitivity,
            profit_surface,
        })
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)?;
        info!("Report saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AxisBounds;

    fn small_config() -> PlantConfig {
        let mut config = PlantConfig::default();
        config.search.feed_rate_tph = AxisBounds::new(100.0, 500.0, 100.0);
        config.search.solids_percent = AxisBounds::new(10.0, 50.0, 10.0);
        config.search.splitter_position = AxisBounds::new(0.0, 1.0, 0.25);
        config
    }

    #[test]
    fn snapshot_collects_every_section() {
        let config = small_config();
        let inputs = config.operating_inputs();
        let snap = ReportSnapshot::capture(&config, &inputs).unwrap();

        assert_eq!(snap.plant, config.plant.name);
        assert_eq!(snap.output.inputs, inputs);
        assert_eq!(snap.minerals.len(), config.minerals.len());
        assert_eq!(snap.optimum.candidates_evaluated, 5 * 5 * 5);
        assert_eq!(snap.sensitivity.points.len(), 11);
        assert_eq!(snap.profit_surface.profit.len(), config.heatmap.feed_rate_points);
        // the default operating point lies on this grid
        assert!(snap.profit_gap >= 0.0);
    }

    #[test]
    fn mineral_suite_agrees_with_reported_revenue() {
        let config = small_config();
        let snap = ReportSnapshot::capture(&config, &config.operating_inputs()).unwrap();
        let mb = &snap.output.mass_balance;

        let revenue: f64 = snap.minerals.iter().map(|m| m.revenue_per_hr).sum();
        let mass: f64 = snap.minerals.iter().map(|m| m.mineral_mass_tph).sum();
        assert!((revenue - snap.output.economics.revenue).abs() < 1e-9);
        assert!((mass - mb.concentrate_mass_tph * mb.grade).abs() < 1e-12);
    }

    #[test]
    fn invalid_inputs_fail_before_any_search() {
        let config = small_config();
        let bad = OperatingInputs {
            splitter_position: 1.5,
            ..config.operating_inputs()
        };
        assert!(matches!(
            ReportSnapshot::capture(&config, &bad),
            Err(ProcessError::InvalidInput { field: "splitter_position", .. })
        ));
    }

    #[test]
    fn saved_report_parses_back() {
        let config = small_config();
        let snap = ReportSnapshot::capture(&config, &config.operating_inputs()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        snap.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: ReportSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back.plant, snap.plant);
        assert_eq!(back.optimum.best_inputs, snap.optimum.best_inputs);
    }
}
