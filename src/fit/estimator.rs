//! Per-category elasticity estimation.
//!
//! For every category with enough observations we fit
//!
//! ```text
//! ln(sales) = β0 + β1 · ln(price) + ε
//! ```
//!
//! and report `β1` as the price elasticity together with its p-value, the fit's
//! R² and a few descriptive aggregates of the raw prices/sales.
//!
//! A category whose regression cannot be computed is skipped and reported as a
//! `FitWarning`; it never aborts the run.

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::domain::{CategoryResult, Dataset, DemandType, FitWarning, Record, ResultSet};
use crate::error::FitError;
use crate::math::{fit_simple, mean, median};
use crate::models::apply_classification;

/// Output of a single estimation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Estimation {
    pub results: ResultSet,
    /// Categories that met `min_observations` but could not be fitted.
    pub warnings: Vec<FitWarning>,
}

/// Records grouped by category, in order of first appearance.
#[derive(Debug)]
pub struct CategoryGroups<'a> {
    groups: Vec<(&'a str, Vec<&'a Record>)>,
}

impl<'a> CategoryGroups<'a> {
    /// Build the grouping in one pass over the dataset.
    ///
    /// Records with an empty category label are left out.
    pub fn build(dataset: &'a Dataset) -> Self {
        let mut index: HashMap<&'a str, usize> = HashMap::new();
        let mut groups: Vec<(&'a str, Vec<&'a Record>)> = Vec::new();

        for record in dataset.records() {
            let label = record.category.as_str();
            if label.is_empty() {
                continue;
            }
            let slot = *index.entry(label).or_insert_with(|| {
                groups.push((label, Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(record);
        }

        Self { groups }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &[&'a Record])> {
        self.groups.iter().map(|(label, recs)| (*label, recs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Estimate elasticities for every category with at least `min_observations` records.
pub fn estimate(dataset: &Dataset, min_observations: usize) -> Estimation {
    let groups = CategoryGroups::build(dataset);

    let mut rows = Vec::new();
    let mut warnings = Vec::new();

    for (category, records) in groups.iter() {
        if records.len() < min_observations {
            debug!(category, n = records.len(), min_observations, "below minimum observations");
            continue;
        }

        match fit_category(category, records) {
            Ok(row) => rows.push(row),
            Err(err) => {
                warn!(category, n = records.len(), error = %err, "regression failed; skipping category");
                warnings.push(FitWarning {
                    category: category.to_string(),
                    num_products: records.len(),
                    reason: err.to_string(),
                });
            }
        }
    }

    let results = ResultSet::from_rows(rows);
    info!(
        groups = groups.len(),
        estimated = results.len(),
        skipped = warnings.len(),
        "elasticity estimation complete"
    );

    Estimation { results, warnings }
}

/// Fit the log-log regression for one category and build its classified result row.
pub fn fit_category(category: &str, records: &[&Record]) -> Result<CategoryResult, FitError> {
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    let sales: Vec<f64> = records.iter().map(|r| r.sales).collect();

    let log_price: Vec<f64> = prices.iter().map(|p| p.ln()).collect();
    let log_sales: Vec<f64> = sales.iter().map(|s| s.ln()).collect();

    let fit = fit_simple(&log_price, &log_sales)?;

    let avg_price = mean(&prices).ok_or(FitError::NonFinite)?;
    let median_price = median(&prices).ok_or(FitError::NonFinite)?;
    let total_sales: f64 = sales.iter().sum();

    let mut row = CategoryResult {
        category: category.to_string(),
        elasticity: fit.slope,
        p_value: fit.slope_p_value,
        r_squared: fit.r_squared,
        avg_price,
        median_price,
        total_sales,
        num_products: records.len(),
        demand_type: DemandType::HighlyElastic,
        can_increase_price: false,
    };
    apply_classification(&mut row);
    Ok(row)
}
