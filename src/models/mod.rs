//! Demand models applied on top of the fitted elasticities.
//!
//! Models are implemented as small, pure functions so that estimation and
//! reporting code can stay generic.

pub mod demand;

pub use demand::*;
