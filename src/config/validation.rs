//! Config validation: unknown-key detection with Levenshtein suggestions,
//! physical range checks and a non-finite sweep.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use crate::config::defaults::{LARGE_HEATMAP_POINTS, MAX_HEATMAP_POINTS};
use crate::types::AxisBounds;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for PlantConfig.
///
/// Maintained by hand to match the struct hierarchy in plant_config.rs.
/// Entries of the `[[minerals]]` array are walked as `minerals.<field>`.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [plant]
        "plant",
        "plant.name",
        "plant.site",
        // [inputs]
        "inputs",
        "inputs.feed_rate_tph",
        "inputs.solids_percent",
        "inputs.d80_um",
        "inputs.splitter_position",
        // [recovery]
        "recovery",
        "recovery.base_recovery",
        "recovery.reference_d80_um",
        "recovery.size_sensitivity",
        "recovery.viscosity_threshold_percent",
        "recovery.max_solids_penalty",
        // [mass_balance]
        "mass_balance",
        "mass_balance.ore_grade",
        "mass_balance.enrichment_ratio",
        // [costs]
        "costs",
        "costs.labour_per_hr",
        "costs.installed_power_kw",
        "costs.specific_energy_kwh_per_t",
        "costs.electricity_per_kwh",
        "costs.water_per_hr",
        "costs.maintenance_per_hr",
        "costs.lease_tax_per_hr",
        "costs.mining_per_t",
        // [market]
        "market",
        "market.price_per_t",
        // [search]
        "search",
        "search.strategy",
        "search.iteration_budget",
        "search.parallel",
        "search.feed_rate_tph",
        "search.feed_rate_tph.min",
        "search.feed_rate_tph.max",
        "search.feed_rate_tph.step",
        "search.solids_percent",
        "search.solids_percent.min",
        "search.solids_percent.max",
        "search.solids_percent.step",
        "search.splitter_position",
        "search.splitter_position.min",
        "search.splitter_position.max",
        "search.splitter_position.step",
        // [sensitivity]
        "sensitivity",
        "sensitivity.min_multiplier",
        "sensitivity.max_multiplier",
        "sensitivity.step",
        // [heatmap]
        "heatmap",
        "heatmap.feed_rate_points",
        "heatmap.splitter_points",
        // [kpi]
        "kpi",
        "kpi.target_margin_percent",
        "kpi.target_throughput_tph",
        "kpi.target_profit_per_hr",
        // [[minerals]]
        "minerals",
        "minerals.name",
        "minerals.feed_grade",
        "minerals.base_recovery",
        "minerals.price_per_t",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`. Arrays of tables contribute their element keys
/// under the array's own path.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            match v {
                toml::Value::Table(_) => keys.extend(walk_toml_keys(v, &path)),
                toml::Value::Array(items) => {
                    for item in items.iter().filter(|i| i.is_table()) {
                        for nested in walk_toml_keys(item, &path) {
                            if !keys.contains(&nested) {
                                keys.push(nested);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
    keys
}

/// Dotted paths of every NaN or infinite float in the tree.
///
/// Array elements are addressed as `name[i]`.
pub fn non_finite_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut found = Vec::new();
    match value {
        toml::Value::Float(f) if !f.is_finite() => found.push(prefix.to_string()),
        toml::Value::Table(table) => {
            for (k, v) in table {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                found.extend(non_finite_keys(v, &path));
            }
        }
        toml::Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                found.extend(non_finite_keys(v, &format!("{prefix}[{i}]")));
            }
        }
        _ => {}
    }
    found
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties go to the alphabetically first key so suggestions are stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut candidates: Vec<&str> = known.iter().copied().collect();
    candidates.sort_unstable();

    let mut best: Option<(&str, usize)> = None;
    for k in candidates {
        let dist = levenshtein(unknown, k);
        if dist <= 3 && best.map_or(true, |(_, best_dist)| dist < best_dist) {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Validate physical ranges on a parsed PlantConfig.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent use of the config; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(
    config: &super::PlantConfig,
) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Recovery curve anchors
    let r = &config.recovery;
    if r.reference_d80_um <= 0.0 {
        errors.push(format!(
            "recovery.reference_d80_um = {:.1} must be > 0",
            r.reference_d80_um
        ));
    } else if !(30.0..=3000.0).contains(&r.reference_d80_um) {
        // Spirals treat roughly 30 µm - 3 mm; outside that the curve is fiction
        warnings.push(range_warning(
            "recovery.reference_d80_um",
            format!(
                "reference_d80_um = {:.1} is outside the typical spiral range (30-3000 µm)",
                r.reference_d80_um
            ),
        ));
    }
    if !(0.0..100.0).contains(&r.viscosity_threshold_percent) {
        errors.push(format!(
            "recovery.viscosity_threshold_percent = {:.1} must be in [0, 100)",
            r.viscosity_threshold_percent
        ));
    } else if !(15.0..=50.0).contains(&r.viscosity_threshold_percent) {
        warnings.push(range_warning(
            "recovery.viscosity_threshold_percent",
            format!(
                "viscosity_threshold_percent = {:.1} is outside the typical range (15-50%)",
                r.viscosity_threshold_percent
            ),
        ));
    }

    // Grade model
    let mb = &config.mass_balance;
    if !(mb.ore_grade > 0.0 && mb.ore_grade <= 1.0) {
        errors.push(format!(
            "mass_balance.ore_grade = {:.4} must be in (0, 1]",
            mb.ore_grade
        ));
    }
    if mb.enrichment_ratio < 0.0 {
        errors.push(format!(
            "mass_balance.enrichment_ratio = {:.2} cannot be negative",
            mb.enrichment_ratio
        ));
    }

    // Costs and prices cannot be negative
    let c = &config.costs;
    let cost_lines = [
        ("costs.labour_per_hr", c.labour_per_hr),
        ("costs.installed_power_kw", c.installed_power_kw),
        ("costs.specific_energy_kwh_per_t", c.specific_energy_kwh_per_t),
        ("costs.electricity_per_kwh", c.electricity_per_kwh),
        ("costs.water_per_hr", c.water_per_hr),
        ("costs.maintenance_per_hr", c.maintenance_per_hr),
        ("costs.lease_tax_per_hr", c.lease_tax_per_hr),
        ("costs.mining_per_t", c.mining_per_t),
        ("market.price_per_t", config.market.price_per_t),
    ];
    for (name, value) in cost_lines {
        if value < 0.0 {
            errors.push(format!("{name} = {value:.3} cannot be negative"));
        }
    }

    // Search axes must stay inside the operating input domain
    let s = &config.search;
    if s.feed_rate_tph.min <= 0.0 {
        errors.push(format!(
            "search.feed_rate_tph.min = {:.1} must be > 0",
            s.feed_rate_tph.min
        ));
    }
    if s.solids_percent.min <= 0.0 || s.solids_percent.max >= 100.0 {
        errors.push(format!(
            "search.solids_percent [{:.1}, {:.1}] must lie inside (0, 100)",
            s.solids_percent.min, s.solids_percent.max
        ));
    }
    if s.splitter_position.min < 0.0 || s.splitter_position.max > 1.0 {
        errors.push(format!(
            "search.splitter_position [{:.2}, {:.2}] must lie inside [0, 1]",
            s.splitter_position.min, s.splitter_position.max
        ));
    }

    if config.sensitivity.min_multiplier < 0.0 {
        errors.push(format!(
            "sensitivity.min_multiplier = {:.2} cannot be negative",
            config.sensitivity.min_multiplier
        ));
    }

    // Mineral suite
    let mut total_feed_grade = 0.0;
    for (i, m) in config.minerals.iter().enumerate() {
        if m.name.trim().is_empty() {
            errors.push(format!("minerals[{i}].name cannot be empty"));
        }
        if !(0.0..=1.0).contains(&m.feed_grade) {
            errors.push(format!(
                "minerals[{i}] ({}): feed_grade = {} must be in [0, 1]",
                m.name, m.feed_grade
            ));
        }
        if !(0.0..=1.0).contains(&m.base_recovery) {
            errors.push(format!(
                "minerals[{i}] ({}): base_recovery = {} must be in [0, 1]",
                m.name, m.base_recovery
            ));
        }
        if m.price_per_t < 0.0 {
            errors.push(format!(
                "minerals[{i}] ({}): price_per_t cannot be negative",
                m.name
            ));
        }
        total_feed_grade += m.feed_grade;
    }
    if total_feed_grade > 1.0 {
        errors.push(format!(
            "minerals: feed grades sum to {total_feed_grade:.3}, more than the whole feed"
        ));
    }

    // Default operating point outside the search box is legal but odd
    let inputs = &config.inputs;
    let checks: [(&str, f64, &AxisBounds); 3] = [
        ("inputs.feed_rate_tph", inputs.feed_rate_tph, &s.feed_rate_tph),
        ("inputs.solids_percent", inputs.solids_percent, &s.solids_percent),
        ("inputs.splitter_position", inputs.splitter_position, &s.splitter_position),
    ];
    for (name, value, axis) in checks {
        if value < axis.min || value > axis.max {
            warnings.push(range_warning(
                name,
                format!(
                    "{name} = {value:.2} lies outside the search range [{:.2}, {:.2}]",
                    axis.min, axis.max
                ),
            ));
        }
    }

    let h = &config.heatmap;
    match h.feed_rate_points.checked_mul(h.splitter_points) {
        Some(cells) if cells <= LARGE_HEATMAP_POINTS => {}
        Some(cells) if cells <= MAX_HEATMAP_POINTS => {
            warnings.push(range_warning(
                "heatmap",
                format!(
                    "heatmap resolution {}x{} is unusually large",
                    h.feed_rate_points, h.splitter_points
                ),
            ));
        }
        _ => errors.push(format!(
            "heatmap resolution {}x{} exceeds {MAX_HEATMAP_POINTS} cells",
            h.feed_rate_points, h.splitter_points
        )),
    }

    (errors, warnings)
}

fn range_warning(field: &str, message: String) -> ValidationWarning {
    ValidationWarning {
        field: field.to_string(),
        message,
        suggestion: None,
    }
}

// ============================================================================
// Tests
// ============================================================================
