//! Input/output helpers.
//!
//! - CSV ingest + cleaning (`ingest`)
//! - result exports to CSV, and re-reading them (`export`)
//! - analysis summary JSON (`summary`)

pub mod export;
pub mod ingest;
pub mod summary;

pub use export::*;
pub use ingest::*;
pub use summary::*;
