//! Demand-regime classification.
//!
//! Two independent rules are applied to each estimated elasticity:
//!
//! - `classify` buckets the *magnitude* `|e|` into a `DemandType`
//! - `can_increase_price` compares the *signed* value against 1
//!
//! The two rules disagree for large negative elasticities (e.g. `-3.0` is
//! "Highly Elastic" yet "can increase price").

use crate::domain::{CategoryResult, DemandType};

/// Lower bound of the inelastic band on `|e|`.
pub const INELASTIC_FLOOR: f64 = 0.5;
/// Unit elasticity.
pub const UNIT: f64 = 1.0;
/// Lower bound of the highly elastic band on `|e|`.
pub const HIGHLY_ELASTIC_FLOOR: f64 = 1.5;

/// Map an elasticity to its demand regime by magnitude.
///
/// `UnitElastic` requires exact equality with 1.0, so continuous estimates
/// essentially never land there. NaN falls through to `HighlyElastic`.
pub fn classify(elasticity: f64) -> DemandType {
    let e = elasticity.abs();
    if e < INELASTIC_FLOOR {
        DemandType::HighlyInelastic
    } else if e < UNIT {
        DemandType::Inelastic
    } else if e == UNIT {
        DemandType::UnitElastic
    } else if e > UNIT && e < HIGHLY_ELASTIC_FLOOR {
        DemandType::Elastic
    } else {
        DemandType::HighlyElastic
    }
}

/// Pricing recommendation on the signed elasticity: anything not above 1.
///
/// NaN is not above 1, so it yields `true`.
pub fn can_increase_price(elasticity: f64) -> bool {
    !(elasticity > UNIT)
}

/// Fill the derived columns of a result row from its elasticity.
pub fn apply_classification(row: &mut CategoryResult) {
    row.demand_type = classify(row.elasticity);
    row.can_increase_price = can_increase_price(row.elasticity);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_bands() {
        assert_eq!(classify(0.3), DemandType::HighlyInelastic);
        assert_eq!(classify(0.7), DemandType::Inelastic);
        assert_eq!(classify(1.0), DemandType::UnitElastic);
        assert_eq!(classify(1.2), DemandType::Elastic);
        assert_eq!(classify(2.0), DemandType::HighlyElastic);
    }

    #[test]
    fn classify_uses_magnitude() {
        assert_eq!(classify(-1.2), DemandType::Elastic);
        assert_eq!(classify(-0.2), DemandType::HighlyInelastic);
        assert_eq!(classify(-1.0), DemandType::UnitElastic);
    }

    #[test]
    fn classify_band_edges() {
        assert_eq!(classify(0.5), DemandType::Inelastic);
        assert_eq!(classify(1.5), DemandType::HighlyElastic);
        assert_eq!(classify(1.0 + 1e-12), DemandType::Elastic);
        assert_eq!(classify(f64::NAN), DemandType::HighlyElastic);
    }

    #[test]
    fn can_increase_price_is_signed() {
        assert!(can_increase_price(0.8));
        assert!(can_increase_price(1.0));
        assert!(!can_increase_price(1.5));
        assert!(can_increase_price(-3.0));
    }

    #[test]
    fn nan_elasticity_is_not_above_unit() {
        assert!(can_increase_price(f64::NAN));
        assert_eq!(classify(f64::NAN), DemandType::HighlyElastic);
    }
}
