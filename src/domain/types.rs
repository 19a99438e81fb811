//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during estimation
//! - exported to CSV/JSON
//! - re-read later for comparisons

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default source column for prices (retail export convention).
pub const DEFAULT_PRICE_COLUMN: &str = "Item_MRP";
/// Default source column for sales.
pub const DEFAULT_SALES_COLUMN: &str = "Item_Outlet_Sales";
/// Default source column for the product category.
pub const DEFAULT_CATEGORY_COLUMN: &str = "Item_Type";
/// Default minimum number of observations per category.
pub const DEFAULT_MIN_OBSERVATIONS: usize = 10;

/// Which source columns map to the canonical `price`, `sales` and `category` fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub price: String,
    pub sales: String,
    pub category: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            price: DEFAULT_PRICE_COLUMN.to_string(),
            sales: DEFAULT_SALES_COLUMN.to_string(),
            category: DEFAULT_CATEGORY_COLUMN.to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn new(price: impl Into<String>, sales: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            sales: sales.into(),
            category: category.into(),
        }
    }
}

/// A single cleaned observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub price: f64,
    pub sales: f64,
    pub category: String,
}

/// The cleaned dataset.
///
/// Invariant: every record has a finite `price > 0` and `sales > 0`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset, keeping only records that satisfy the positivity invariant.
    pub fn from_records(records: Vec<Record>) -> Self {
        let records = records
            .into_iter()
            .filter(|r| is_valid_positive(r.price) && is_valid_positive(r.sales))
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub(crate) fn is_valid_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// What happened while cleaning the source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub original_size: usize,
    pub cleaned_size: usize,
    pub removed_records: usize,
    /// Share of rows removed, in percent (0–100).
    pub removal_pct: f64,
    /// Rows dropped because price or sales was missing/unparseable.
    pub missing_values: usize,
    /// Rows dropped because price or sales was `<= 0`.
    pub non_positive: usize,
}

impl LoadReport {
    pub fn new(original_size: usize, cleaned_size: usize, missing_values: usize, non_positive: usize) -> Self {
        let removed_records = original_size.saturating_sub(cleaned_size);
        let removal_pct = if original_size > 0 {
            removed_records as f64 / original_size as f64 * 100.0
        } else {
            0.0
        };
        Self {
            original_size,
            cleaned_size,
            removed_records,
            removal_pct,
            missing_values,
            non_positive,
        }
    }
}

/// Demand regime by elasticity magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DemandType {
    #[serde(rename = "Highly Inelastic")]
    HighlyInelastic,
    #[serde(rename = "Inelastic")]
    Inelastic,
    #[serde(rename = "Unit Elastic")]
    UnitElastic,
    #[serde(rename = "Elastic")]
    Elastic,
    #[serde(rename = "Highly Elastic")]
    HighlyElastic,
}

impl DemandType {
    pub const ALL: [DemandType; 5] = [
        DemandType::HighlyInelastic,
        DemandType::Inelastic,
        DemandType::UnitElastic,
        DemandType::Elastic,
        DemandType::HighlyElastic,
    ];

    /// Human-readable label for reports and exports.
    pub fn display_name(self) -> &'static str {
        match self {
            DemandType::HighlyInelastic => "Highly Inelastic",
            DemandType::Inelastic => "Inelastic",
            DemandType::UnitElastic => "Unit Elastic",
            DemandType::Elastic => "Elastic",
            DemandType::HighlyElastic => "Highly Elastic",
        }
    }
}

impl std::fmt::Display for DemandType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the result set.
///
/// Field order is the export column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub category: String,
    pub elasticity: f64,
    pub p_value: f64,
    pub r_squared: f64,
    pub avg_price: f64,
    pub median_price: f64,
    pub total_sales: f64,
    pub num_products: usize,
    pub demand_type: DemandType,
    #[serde(with = "yes_no")]
    pub can_increase_price: bool,
}

/// Estimated categories, sorted by elasticity (descending).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    rows: Vec<CategoryResult>,
}

impl ResultSet {
    /// Wrap rows, stably sorting them by elasticity (descending).
    pub fn from_rows(mut rows: Vec<CategoryResult>) -> Self {
        rows.sort_by(|a, b| {
            b.elasticity
                .partial_cmp(&a.elasticity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { rows }
    }

    pub fn rows(&self) -> &[CategoryResult] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact-match lookup by category label.
    pub fn get(&self, category: &str) -> Option<&CategoryResult> {
        self.rows.iter().find(|r| r.category == category)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.category.as_str())
    }
}

/// `true`/`false` as `Yes`/`No`, matching the exported table.
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        let s = String::deserialize(deserializer)?;
        match s.trim() {
            v if v.eq_ignore_ascii_case("yes") => Ok(true),
            v if v.eq_ignore_ascii_case("no") => Ok(false),
            other => Err(D::Error::custom(format!("expected Yes/No, got '{other}'"))),
        }
    }
}

/// A category skipped during estimation and the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitWarning {
    pub category: String,
    pub num_products: usize,
    pub reason: String,
}

/// Projected outcome of a price change for one category.
///
/// All `*_pct` fields are fractions (`0.05` = 5%).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub category: String,
    pub current_price: f64,
    pub new_price: f64,
    pub elasticity: f64,
    pub price_change_pct: f64,
    pub quantity_change_pct: f64,
    pub revenue_change_pct: f64,
    pub estimated_revenue_impact: f64,
    pub current_total_sales: f64,
}

impl SimulationResult {
    pub fn improves_revenue(&self) -> bool {
        self.revenue_change_pct > 0.0
    }
}

/// Whole-table summary of a result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub total_categories: usize,
    pub inelastic_categories: usize,
    pub elastic_categories: usize,
    /// Share of inelastic categories, in percent (0–100).
    pub inelastic_pct: f64,
    pub avg_elasticity: f64,
    pub significant_results: usize,
    pub avg_r_squared: f64,
}

/// A proposed price change to simulate after estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub category: String,
    /// Fractional price change (`0.05` = +5%).
    pub price_change_pct: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus env/defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub columns: ColumnMapping,
    pub min_observations: usize,
    pub simulation: Option<SimulationRequest>,
    /// Rows shown in the results table (0 = all).
    pub top_n: usize,
    pub export_results: Option<PathBuf>,
    pub export_summary: Option<PathBuf>,
}

impl AnalysisConfig {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            columns: ColumnMapping::default(),
            min_observations: DEFAULT_MIN_OBSERVATIONS,
            simulation: None,
            top_n: 0,
            export_results: None,
            export_summary: None,
        }
    }
}
