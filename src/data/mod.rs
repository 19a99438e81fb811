//! Data sources other than user-supplied CSV files.
//!
//! - `sample`: seeded synthetic retail datasets with known elasticities

pub mod sample;

pub use sample::{SampleConfig, SampleData, generate_sample, write_sample_csv};
