//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration (`ColumnMapping`, `AnalysisConfig`)
//! - cleaned observations (`Record`, `Dataset`, `LoadReport`)
//! - estimation outputs (`CategoryResult`, `DemandType`, `FitWarning`)
//! - derived views (`SimulationResult`, `SummaryStats`)

pub mod types;

pub use types::*;
