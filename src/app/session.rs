//! Caller-owned analysis session.
//!
//! A session walks through `Unloaded → Loaded → Estimated`:
//!
//! - `load` replaces any previous dataset and discards earlier results
//! - `estimate` requires a loaded dataset and replaces any earlier results
//! - `simulate` / `summary` only read the current results
//!
//! The core functions it calls are stateless; the session only owns the data
//! between interactive steps. Independent sessions share nothing.

use std::io::Read;
use std::path::Path;

use crate::domain::{ColumnMapping, Dataset, LoadReport, SimulationResult, SummaryStats};
use crate::error::AppError;
use crate::fit::{Estimation, estimate};
use crate::io::ingest;
use crate::report::{correlation, summarize};
use crate::simulate::simulate;

#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Unloaded,
    Loaded {
        dataset: Dataset,
        report: LoadReport,
    },
    Estimated {
        dataset: Dataset,
        report: LoadReport,
        estimation: Estimation,
        min_observations: usize,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Load a CSV file, replacing any previous dataset and results.
    pub fn load_path(&mut self, path: &Path, columns: &ColumnMapping) -> Result<&LoadReport, AppError> {
        let (dataset, report) = ingest::load_path(path, columns)?;
        self.state = SessionState::Loaded { dataset, report };
        self.require_load_report()
    }

    /// Load from any CSV reader, replacing any previous dataset and results.
    pub fn load<R: Read>(&mut self, source: R, columns: &ColumnMapping) -> Result<&LoadReport, AppError> {
        let (dataset, report) = ingest::load(source, columns)?;
        self.state = SessionState::Loaded { dataset, report };
        self.require_load_report()
    }

    /// Estimate elasticities on the loaded dataset.
    pub fn estimate(&mut self, min_observations: usize) -> Result<&Estimation, AppError> {
        if min_observations == 0 {
            return Err(AppError::new(2, "Minimum observations must be at least 1."));
        }

        let (dataset, report) = match std::mem::take(&mut self.state) {
            SessionState::Unloaded => {
                return Err(AppError::new(2, "No dataset loaded; load a CSV before estimating."));
            }
            SessionState::Loaded { dataset, report } => (dataset, report),
            SessionState::Estimated { dataset, report, .. } => (dataset, report),
        };

        let estimation = estimate(&dataset, min_observations);
        self.state = SessionState::Estimated {
            dataset,
            report,
            estimation,
            min_observations,
        };

        self.require_estimation()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match &self.state {
            SessionState::Unloaded => None,
            SessionState::Loaded { dataset, .. } | SessionState::Estimated { dataset, .. } => Some(dataset),
        }
    }

    pub fn load_report(&self) -> Option<&LoadReport> {
        match &self.state {
            SessionState::Unloaded => None,
            SessionState::Loaded { report, .. } | SessionState::Estimated { report, .. } => Some(report),
        }
    }

    pub fn estimation(&self) -> Option<&Estimation> {
        match &self.state {
            SessionState::Estimated { estimation, .. } => Some(estimation),
            _ => None,
        }
    }

    /// Simulate a fractional price change; `Ok(None)` when the category is unknown.
    pub fn simulate(&self, category: &str, price_change_pct: f64) -> Result<Option<SimulationResult>, AppError> {
        let estimation = self.require_estimation()?;
        Ok(simulate(&estimation.results, category, price_change_pct))
    }

    pub fn summary(&self) -> Result<SummaryStats, AppError> {
        Ok(summarize(&self.require_estimation()?.results))
    }

    /// Dataset-wide price/sales correlation; `Ok(None)` when not computable.
    pub fn correlation(&self) -> Result<Option<f64>, AppError> {
        let dataset = self
            .dataset()
            .ok_or_else(|| AppError::new(2, "No dataset loaded."))?;
        Ok(correlation(dataset))
    }

    fn require_load_report(&self) -> Result<&LoadReport, AppError> {
        self.load_report()
            .ok_or_else(|| AppError::new(2, "No dataset loaded."))
    }

    fn require_estimation(&self) -> Result<&Estimation, AppError> {
        self.estimation()
            .ok_or_else(|| AppError::new(2, "No results yet; run the estimation first."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Item_MRP,Item_Outlet_Sales,Item_Type
10,100,A
20,70,A
30,58,A
40,50,A
15,30,B
";

    #[test]
    fn rejects_estimate_before_load() {
        let mut session = Session::new();
        let err = session.estimate(3).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(matches!(session.state(), SessionState::Unloaded));
        assert!(session.summary().is_err());
    }

    #[test]
    fn walks_through_states() {
        let mut session = Session::new();
        let report = session.load(CSV.as_bytes(), &ColumnMapping::default()).unwrap();
        assert_eq!(report.cleaned_size, 5);
        assert!(matches!(session.state(), SessionState::Loaded { .. }));
        assert!(session.simulate("A", 0.05).is_err());

        let est = session.estimate(3).unwrap();
        assert_eq!(est.results.len(), 1);
        assert!(matches!(session.state(), SessionState::Estimated { min_observations: 3, .. }));

        assert!(session.simulate("A", 0.05).unwrap().is_some());
        assert!(session.simulate("B", 0.05).unwrap().is_none());
        assert_eq!(session.summary().unwrap().total_categories, 1);
        assert!(session.correlation().unwrap().is_some());
    }

    #[test]
    fn reload_discards_previous_results() {
        let mut session = Session::new();
        session.load(CSV.as_bytes(), &ColumnMapping::default()).unwrap();
        session.estimate(3).unwrap();
        assert!(session.estimation().is_some());

        session.load(CSV.as_bytes(), &ColumnMapping::default()).unwrap();
        assert!(session.estimation().is_none());
        assert!(session.dataset().is_some());
    }

    #[test]
    fn re_estimate_replaces_results() {
        let mut session = Session::new();
        session.load(CSV.as_bytes(), &ColumnMapping::default()).unwrap();
        assert_eq!(session.estimate(3).unwrap().results.len(), 1);
        assert_eq!(session.estimate(10).unwrap().results.len(), 0);
        assert_eq!(session.summary().unwrap().total_categories, 0);
    }

    #[test]
    fn failed_load_is_reported() {
        let mut session = Session::new();
        let err = session
            .load("a,b,c\n1,2,3\n".as_bytes(), &ColumnMapping::default())
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("Item_MRP"));
    }
}
