//! Shared "analysis pipeline" logic used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV load -> clean -> per-category estimation -> classification -> summary -> simulation
//!
//! The CLI can then focus on presentation (printing and exports).

use tracing::info;

use crate::app::session::Session;
use crate::domain::{AnalysisConfig, LoadReport, SimulationResult, SummaryStats};
use crate::error::AppError;
use crate::fit::Estimation;

/// All computed outputs of a single `pe analyze` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub load: LoadReport,
    pub estimation: Estimation,
    pub summary: SummaryStats,
    pub correlation: Option<f64>,
    /// Present when a simulation was requested and the category exists.
    pub simulation: Option<SimulationResult>,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let mut session = Session::new();

    // 1) Load and clean.
    let load = session.load_path(&config.csv_path, &config.columns)?.clone();
    if load.cleaned_size == 0 {
        return Err(AppError::new(
            3,
            format!(
                "No valid rows remain after cleaning ({} read, all removed).",
                load.original_size
            ),
        ));
    }

    // 2) Estimate and classify.
    let estimation = session.estimate(config.min_observations)?.clone();

    // 3) Whole-table reductions.
    let summary = session.summary()?;
    let correlation = session.correlation()?;

    // 4) Optional what-if.
    let simulation = match &config.simulation {
        Some(req) => {
            let sim = session.simulate(&req.category, req.price_change_pct)?;
            if sim.is_none() {
                return Err(AppError::new(
                    2,
                    format!(
                        "Category '{}' is not in the results (unknown, or fewer than {} valid rows).",
                        req.category, config.min_observations
                    ),
                ));
            }
            sim
        }
        None => None,
    };

    info!(
        categories = summary.total_categories,
        skipped = estimation.warnings.len(),
        "analysis complete"
    );

    Ok(RunOutput {
        load,
        estimation,
        summary,
        correlation,
        simulation,
    })
}
