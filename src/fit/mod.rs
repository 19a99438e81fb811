//! Elasticity estimation orchestration.
//!
//! Responsibilities:
//!
//! - group the cleaned dataset by category
//! - fit one log-log regression per eligible category
//! - collect classified result rows and per-category fit warnings

pub mod estimator;

pub use estimator::*;
