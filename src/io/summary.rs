//! Write the analysis summary JSON.
//!
//! The summary JSON is the portable record of one run:
//! - run metadata (tool, timestamp, column mapping, minimum observations)
//! - load/cleaning report
//! - summary statistics, regime distribution and dataset correlation
//! - every result row plus the categories skipped during fitting

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{
    AnalysisConfig, ColumnMapping, DemandType, FitWarning, LoadReport, ResultSet, SummaryStats,
};
use crate::error::AppError;
use crate::report::demand_distribution;

#[derive(Debug, Clone, Serialize)]
pub struct SummaryFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub columns: ColumnMapping,
    pub min_observations: usize,
    pub load: LoadReport,
    pub summary: SummaryStats,
    /// `null` when not computable.
    pub price_sales_correlation: Option<f64>,
    pub demand_distribution: Vec<RegimeCount>,
    pub results: ResultSet,
    pub skipped: Vec<FitWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegimeCount {
    pub demand_type: DemandType,
    pub categories: usize,
}

impl SummaryFile {
    pub fn from_run(run: &RunOutput, config: &AnalysisConfig) -> Self {
        let results = &run.estimation.results;
        Self {
            tool: "pe".to_string(),
            generated_at: Utc::now(),
            columns: config.columns.clone(),
            min_observations: config.min_observations,
            load: run.load.clone(),
            summary: run.summary.clone(),
            price_sales_correlation: run.correlation,
            demand_distribution: demand_distribution(results)
                .into_iter()
                .map(|(demand_type, categories)| RegimeCount { demand_type, categories })
                .collect(),
            results: results.clone(),
            skipped: run.estimation.warnings.clone(),
        }
    }
}

/// Write a summary JSON file.
pub fn write_summary_json(path: &Path, run: &RunOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display())))?;

    let summary = SummaryFile::from_run(run, config);
    serde_json::to_writer_pretty(file, &summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::run_analysis;
    use crate::data::sample::{SampleConfig, write_sample_csv};

    #[test]
    fn summary_json_contains_run_sections() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("retail.csv");
        write_sample_csv(&csv_path, &SampleConfig::default()).unwrap();

        let config = AnalysisConfig::new(&csv_path);
        let run = run_analysis(&config).unwrap();

        let json_path = dir.path().join("summary.json");
        write_summary_json(&json_path, &run, &config).unwrap();

        let text = std::fs::read_to_string(&json_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["tool"], "pe");
        assert_eq!(value["min_observations"], 10);
        assert_eq!(value["columns"]["price"], "Item_MRP");
        assert!(value["generated_at"].is_string());
        let results = value["results"].as_array().unwrap();
        assert_eq!(results.len(), run.estimation.results.len());
        assert!(results[0]["can_increase_price"].is_string());
        assert_eq!(
            value["summary"]["total_categories"].as_u64().unwrap() as usize,
            run.summary.total_categories
        );
    }
}
