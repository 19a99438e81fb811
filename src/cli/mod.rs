//! Command-line parsing for the price elasticity analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimation/reporting code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::TypedValueParser};

use crate::domain::{
    DEFAULT_CATEGORY_COLUMN, DEFAULT_MIN_OBSERVATIONS, DEFAULT_PRICE_COLUMN, DEFAULT_SALES_COLUMN,
};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pe", version, about = "Price Elasticity Analyzer (log-log OLS per category)")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate per-category elasticities, print the report, and optionally export.
    Analyze(AnalyzeArgs),
    /// Project the quantity/revenue effect of a price change for one category.
    Simulate(SimulateArgs),
    /// Generate a synthetic dataset with known elasticities and analyze it.
    Demo(DemoArgs),
}

/// Input file, column mapping and grouping threshold.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// CSV file to analyze. If omitted, pick one interactively.
    #[arg(short = 'f', long = "file", value_name = "CSV")]
    pub file: Option<PathBuf>,

    /// Price column name.
    #[arg(long = "price-col", env = "PE_PRICE_COLUMN", default_value = DEFAULT_PRICE_COLUMN)]
    pub price_col: String,

    /// Sales column name.
    #[arg(long = "sales-col", env = "PE_SALES_COLUMN", default_value = DEFAULT_SALES_COLUMN)]
    pub sales_col: String,

    /// Category column name.
    #[arg(long = "category-col", env = "PE_CATEGORY_COLUMN", default_value = DEFAULT_CATEGORY_COLUMN)]
    pub category_col: String,

    /// Minimum valid rows a category needs to be estimated.
    #[arg(
        long = "min-obs",
        env = "PE_MIN_OBSERVATIONS",
        default_value_t = DEFAULT_MIN_OBSERVATIONS,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
    )]
    pub min_obs: usize,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Also simulate a price change for this category.
    #[arg(long, value_name = "CATEGORY")]
    pub simulate: Option<String>,

    /// Price change in percent used with `--simulate` (5.0 = +5%).
    #[arg(long = "price-change", default_value_t = 5.0, allow_negative_numbers = true)]
    pub price_change: f64,

    /// Show only the top-N rows of the results table (0 = all).
    #[arg(long, default_value_t = 0)]
    pub top: usize,

    /// Export per-category results to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export a JSON summary of the run.
    #[arg(long = "export-summary")]
    pub export_summary: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Category to simulate.
    #[arg(short = 'c', long)]
    pub category: String,

    /// Price change in percent (5.0 = +5%, -10 = -10%).
    #[arg(long = "price-change", default_value_t = 5.0, allow_negative_numbers = true)]
    pub price_change: f64,
}

#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Where to write the generated CSV.
    #[arg(long, default_value = "synthetic_retail.csv")]
    pub out: PathBuf,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of categories to generate.
    #[arg(long, default_value_t = 8)]
    pub categories: usize,

    /// Rows generated per category.
    #[arg(long = "rows-per-category", default_value_t = 60)]
    pub rows_per_category: usize,

    /// Standard deviation of the log-sales noise.
    #[arg(long, default_value_t = 0.15)]
    pub noise: f64,

    /// Minimum valid rows a category needs to be estimated.
    #[arg(
        long = "min-obs",
        default_value_t = DEFAULT_MIN_OBSERVATIONS,
        value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize)
    )]
    pub min_obs: usize,
}
