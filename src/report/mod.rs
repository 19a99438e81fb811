//! Reporting utilities: whole-table summaries, pricing views, and formatted output.

pub mod format;

pub use format::*;

use crate::domain::{CategoryResult, Dataset, DemandType, ResultSet, SummaryStats};
use crate::math::{mean, pearson};

/// Significance level used to count "significant" elasticities.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Summarize a result set. Every mean/percentage is 0 for an empty set.
pub fn summarize(results: &ResultSet) -> SummaryStats {
    let rows = results.rows();
    let total_categories = rows.len();
    if total_categories == 0 {
        return SummaryStats::default();
    }

    let inelastic_categories = rows.iter().filter(|r| r.elasticity < 1.0).count();
    let significant_results = rows.iter().filter(|r| r.p_value < SIGNIFICANCE_LEVEL).count();

    let elasticities: Vec<f64> = rows.iter().map(|r| r.elasticity).collect();
    let r_squared: Vec<f64> = rows.iter().map(|r| r.r_squared).collect();

    SummaryStats {
        total_categories,
        inelastic_categories,
        elastic_categories: total_categories - inelastic_categories,
        inelastic_pct: inelastic_categories as f64 / total_categories as f64 * 100.0,
        avg_elasticity: mean(&elasticities).unwrap_or(0.0),
        significant_results,
        avg_r_squared: mean(&r_squared).unwrap_or(0.0),
    }
}

/// Pearson correlation between raw price and sales over the whole dataset.
///
/// `None` means not computable (fewer than two records or zero variance).
pub fn correlation(dataset: &Dataset) -> Option<f64> {
    let prices: Vec<f64> = dataset.records().iter().map(|r| r.price).collect();
    let sales: Vec<f64> = dataset.records().iter().map(|r| r.sales).collect();
    pearson(&prices, &sales)
}

/// Category count per demand regime, in regime order, omitting empty regimes.
pub fn demand_distribution(results: &ResultSet) -> Vec<(DemandType, usize)> {
    DemandType::ALL
        .iter()
        .map(|&kind| {
            let n = results.rows().iter().filter(|r| r.demand_type == kind).count();
            (kind, n)
        })
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Inelastic categories (`e < 1`), highest average price first.
pub fn pricing_opportunities(results: &ResultSet) -> Vec<CategoryResult> {
    let mut rows: Vec<CategoryResult> = results
        .rows()
        .iter()
        .filter(|r| r.elasticity < 1.0)
        .cloned()
        .collect();
    rows.sort_by(|a, b| b.avg_price.partial_cmp(&a.avg_price).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

/// The first pricing opportunity, if any.
pub fn top_opportunity(results: &ResultSet) -> Option<CategoryResult> {
    pricing_opportunities(results).into_iter().next()
}

/// Elastic categories (`e > 1`), least elastic first.
pub fn price_sensitive(results: &ResultSet) -> Vec<CategoryResult> {
    let mut rows: Vec<CategoryResult> = results
        .rows()
        .iter()
        .filter(|r| r.elasticity > 1.0)
        .cloned()
        .collect();
    rows.sort_by(|a, b| a.elasticity.partial_cmp(&b.elasticity).unwrap_or(std::cmp::Ordering::Equal));
    rows
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{CategoryResult, ResultSet};
    use crate::models::{can_increase_price, classify};

    pub fn row(category: &str, elasticity: f64, p_value: f64, r_squared: f64, avg_price: f64) -> CategoryResult {
        CategoryResult {
            category: category.to_string(),
            elasticity,
            p_value,
            r_squared,
            avg_price,
            median_price: avg_price,
            total_sales: avg_price * 100.0,
            num_products: 12,
            demand_type: classify(elasticity),
            can_increase_price: can_increase_price(elasticity),
        }
    }

    pub fn sample_results() -> ResultSet {
        ResultSet::from_rows(vec![
            row("Dairy", 0.3, 0.01, 0.40, 150.0),
            row("Snacks", 1.7, 0.20, 0.10, 80.0),
            row("Meat", 0.8, 0.03, 0.30, 210.0),
            row("Breads", 1.2, 0.04, 0.20, 60.0),
        ])
    }
}
