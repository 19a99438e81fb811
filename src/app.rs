//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - runs the analysis pipeline
//! - prints reports and writes optional exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{AnalyzeArgs, Command, DataArgs, DemoArgs, SimulateArgs};
use crate::domain::{AnalysisConfig, ColumnMapping, SimulationRequest};
use crate::error::AppError;

pub mod pipeline;
pub mod session;

/// Entry point for the `pe` binary.
pub fn run() -> Result<(), AppError> {
    // A missing .env is normal.
    dotenvy::dotenv().ok();

    let cli = crate::cli::Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Simulate(args) => handle_simulate(args),
        Command::Demo(args) => handle_demo(args),
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore a second init (tests or embedding callers may have installed one).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let csv_path = crate::cli::picker::resolve_csv_path(args.data.file.as_deref())?;
    let config = analysis_config_from_args(&args, csv_path);
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_load_report(&run.load, &config.columns));
    println!(
        "{}",
        crate::report::format_summary(&run.summary, &run.estimation.results, run.correlation)
    );
    println!("{}", crate::report::format_results_table(&run.estimation.results, config.top_n));
    println!("{}", crate::report::format_opportunities(&run.estimation.results));

    let warnings = crate::report::format_warnings(&run.estimation.warnings);
    if !warnings.is_empty() {
        println!("{warnings}");
    }
    if let Some(sim) = &run.simulation {
        println!("{}", crate::report::format_simulation(sim));
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::export::write_results_csv(path, &run.estimation.results)?;
        eprintln!("Results written to {}", path.display());
    }
    if let Some(path) = &config.export_summary {
        crate::io::summary::write_summary_json(path, &run, &config)?;
        eprintln!("Summary written to {}", path.display());
    }

    Ok(())
}

fn handle_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let csv_path = crate::cli::picker::resolve_csv_path(args.data.file.as_deref())?;
    let mut config = base_config(&args.data, csv_path);
    config.simulation = Some(SimulationRequest {
        category: args.category.clone(),
        price_change_pct: args.price_change / 100.0,
    });

    let run = pipeline::run_analysis(&config)?;
    if let Some(sim) = &run.simulation {
        println!("{}", crate::report::format_simulation(sim));
    }
    Ok(())
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let sample_config = crate::data::SampleConfig {
        categories: args.categories,
        rows_per_category: args.rows_per_category,
        seed: args.seed,
        noise_sigma: args.noise,
        ..crate::data::SampleConfig::default()
    };
    let sample = crate::data::write_sample_csv(&args.out, &sample_config)?;
    eprintln!("Synthetic dataset written to {}", args.out.display());

    let mut config = AnalysisConfig::new(&args.out);
    config.min_observations = args.min_obs;
    let run = pipeline::run_analysis(&config)?;

    println!("{}", crate::report::format_load_report(&run.load, &config.columns));
    println!(
        "{}",
        crate::report::format_summary(&run.summary, &run.estimation.results, run.correlation)
    );
    println!("{}", crate::report::format_results_table(&run.estimation.results, 0));
    println!("{}", crate::report::format_recovery(&sample.elasticities, &run.estimation.results));
    Ok(())
}

fn base_config(data: &DataArgs, csv_path: std::path::PathBuf) -> AnalysisConfig {
    AnalysisConfig {
        columns: ColumnMapping::new(&data.price_col, &data.sales_col, &data.category_col),
        min_observations: data.min_obs,
        ..AnalysisConfig::new(csv_path)
    }
}

/// Convert parsed `analyze` flags into the pipeline's config.
///
/// `--price-change` is a percent on the command line and a fraction in the core.
pub fn analysis_config_from_args(args: &AnalyzeArgs, csv_path: std::path::PathBuf) -> AnalysisConfig {
    AnalysisConfig {
        simulation: args.simulate.as_ref().map(|category| SimulationRequest {
            category: category.clone(),
            price_change_pct: args.price_change / 100.0,
        }),
        top_n: args.top,
        export_results: args.export.clone(),
        export_summary: args.export_summary.clone(),
        ..base_config(&args.data, csv_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    #[test]
    fn analyze_flags_map_to_config() {
        let cli = Cli::try_parse_from([
            "pe",
            "analyze",
            "-f",
            "data.csv",
            "--price-col",
            "price",
            "--min-obs",
            "4",
            "--simulate",
            "Dairy",
            "--price-change",
            "-10",
            "--top",
            "5",
        ])
        .unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };

        let config = analysis_config_from_args(&args, "data.csv".into());
        assert_eq!(config.columns.price, "price");
        assert_eq!(config.columns.sales, crate::domain::DEFAULT_SALES_COLUMN);
        assert_eq!(config.min_observations, 4);
        assert_eq!(config.top_n, 5);
        let sim = config.simulation.unwrap();
        assert_eq!(sim.category, "Dairy");
        assert!((sim.price_change_pct + 0.10).abs() < 1e-12);
    }

    #[test]
    fn no_simulation_without_flag() {
        let cli = Cli::try_parse_from(["pe", "analyze", "-f", "data.csv"]).unwrap();
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let config = analysis_config_from_args(&args, "data.csv".into());
        assert!(config.simulation.is_none());
        assert!(config.export_results.is_none());
    }
}
