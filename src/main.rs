//! Spiral Twin - spiral concentrator process calculator
//!
//! Evaluates, optimizes and stress-tests a spiral gravity-separation plant
//! from a TOML plant configuration. Results are printed as JSON on stdout;
//! logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate the configured default operating point
//! spiral-twin evaluate
//!
//! # Evaluate a what-if point
//! spiral-twin evaluate --feed-rate 400 --solids 35 --splitter 0.8
//!
//! # Find the most profitable point with a greedy search
//! spiral-twin --config plant_config.toml optimize --strategy greedy
//!
//! # Full report to a file
//! spiral-twin report --output reports/today.json
//! ```
//!
//! # Environment Variables
//!
//! - `SPIRAL_CONFIG`: Path to the plant config (default: ./plant_config.toml)
//! - `SPIRAL_LOG_JSON`: Emit logs as JSON lines
//! - `RUST_LOG`: Logging level (default: info)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use spiral_twin::config::defaults::DEFAULT_REPORT_FILE;
use spiral_twin::config::PlantConfig;
use spiral_twin::economics::evaluate_kpis;
use spiral_twin::physics_engine::mineral_breakdown;
use spiral_twin::{
    analyze_sensitivity, price_multipliers, profit_surface, KpiReport, MineralAssay,
    OperatingInputs, PipelineOutput, ProcessOptimizer, ReportSnapshot, SearchStrategy,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "spiral-twin")]
#[command(about = "Spiral concentrator process calculator")]
#[command(version)]
struct CliArgs {
    /// Plant config TOML (overrides SPIRAL_CONFIG and ./plant_config.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true, env = "SPIRAL_LOG_JSON")]
    log_json: bool,

    #[command(flatten)]
    point: PointOverrides,

    #[command(subcommand)]
    command: Command,
}

/// Operating point and market overrides applied on top of the config.
#[derive(Args, Debug, Default)]
struct PointOverrides {
    /// Slurry feed rate (t/h)
    #[arg(long, global = true)]
    feed_rate: Option<f64>,

    /// Solids by mass (%)
    #[arg(long, global = true)]
    solids: Option<f64>,

    /// Feed d80 (µm)
    #[arg(long, global = true)]
    d80: Option<f64>,

    /// Splitter position (0-1)
    #[arg(long, global = true)]
    splitter: Option<f64>,

    /// Market price per tonne of contained mineral
    #[arg(long, global = true)]
    price: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline once at the operating point
    Evaluate,

    /// Search the configured box for the most profitable operating point
    Optimize {
        /// exhaustive or greedy
        #[arg(long)]
        strategy: Option<SearchStrategy>,
        /// Scan the grid on all cores
        #[arg(long)]
        parallel: bool,
        /// Total evaluations, split evenly across the three axes
        #[arg(long)]
        budget: Option<usize>,
    },

    /// Profit response to market price at the operating point
    Sensitivity {
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
        #[arg(long)]
        step: Option<f64>,
    },

    /// Feed rate x splitter profit grid at the operating point's solids and d80
    Heatmap {
        #[arg(long)]
        feed_points: Option<usize>,
        #[arg(long)]
        splitter_points: Option<usize>,
    },

    /// Write a full JSON report snapshot
    Report {
        #[arg(short, long, default_value = DEFAULT_REPORT_FILE)]
        output: PathBuf,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Also write it to this file
        #[arg(long, value_name = "PATH")]
        write: Option<PathBuf>,
    },
}

// ============================================================================
// Output Views
// ============================================================================

#[derive(Serialize)]
struct EvaluateView {
    output: PipelineOutput,
    kpis: KpiReport,
    minerals: Vec<MineralAssay>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

fn load_config(args: &CliArgs) -> Result<PlantConfig> {
    let mut config = match &args.config {
        Some(path) => PlantConfig::load_from_file(path)
            .with_context(|| format!("Failed to load plant config {}", path.display()))?,
        None => PlantConfig::load(),
    };

    let p = &args.point;
    if let Some(v) = p.feed_rate {
        config.inputs.feed_rate_tph = v;
    }
    if let Some(v) = p.solids {
        config.inputs.solids_percent = v;
    }
    if let Some(v) = p.d80 {
        config.inputs.d80_um = v;
    }
    if let Some(v) = p.splitter {
        config.inputs.splitter_position = v;
    }
    if let Some(v) = p.price {
        config.market.price_per_t = v;
    }
    config.validate().context("Invalid command-line overrides")?;
    Ok(config)
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let mut config = load_config(&args)?;
    let inputs: OperatingInputs = config.operating_inputs();
    let model = config.model();
    info!(plant = %config.plant.name, "Plant config ready");

    match args.command {
        Command::Evaluate => {
            let output = model.evaluate_checked(&inputs)?;
            let kpis = evaluate_kpis(&inputs, &output.economics, &config.kpi);
            let minerals = mineral_breakdown(&output, &config.minerals);
            print_json(&EvaluateView {
                output,
                kpis,
                minerals,
            })?;
        }

        Command::Optimize {
            strategy,
            parallel,
            budget,
        } => {
            let mut optimizer = ProcessOptimizer::from_config(&config);
            if let Some(s) = strategy {
                optimizer = optimizer.with_strategy(s);
            }
            if parallel {
                optimizer = optimizer.with_parallel(true);
            }
            if budget.is_some() {
                optimizer = optimizer.with_iteration_budget(budget);
            }
            let result = optimizer
                .optimize(&config.search_space(inputs.d80_um))
                .context("Optimization failed")?;
            print_json(&result)?;
        }

        Command::Sensitivity { min, max, step } => {
            let s = &config.sensitivity;
            let multipliers = price_multipliers(
                min.unwrap_or(s.min_multiplier),
                max.unwrap_or(s.max_multiplier),
                step.unwrap_or(s.step),
            )?;
            let curve = analyze_sensitivity(&model, &inputs, &multipliers)?;
            print_json(&curve)?;
        }

        Command::Heatmap {
            feed_points,
            splitter_points,
        } => {
            if let Some(n) = feed_points {
                config.heatmap.feed_rate_points = n;
            }
            if let Some(n) = splitter_points {
                config.heatmap.splitter_points = n;
            }
            let surface = profit_surface(
                &model,
                &inputs,
                &config.search.feed_rate_tph,
                &config.search.splitter_position,
                &config.heatmap,
            )?;
            if let Some((feed, splitter, profit)) = surface.peak() {
                info!(feed, splitter, profit, "Profit surface peak");
            }
            print_json(&surface)?;
        }

        Command::Report { output } => {
            let snapshot = ReportSnapshot::capture(&config, &inputs)?;
            snapshot
                .save(&output)
                .with_context(|| format!("Failed to write report {}", output.display()))?;
            print_json(&snapshot)?;
        }

        Command::Config { write } => {
            print!("{}", config.to_toml()?);
            if let Some(path) = write {
                config.save_to_file(&path)?;
            }
        }
    }

    Ok(())
}
