//! `price-elasticity` library crate.
//!
//! The binary (`pe`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the estimator, simulator and reports are reusable from other front ends

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod models;
pub mod report;
pub mod simulate;
