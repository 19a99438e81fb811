//! Synthetic retail dataset generation with known elasticities.
//!
//! Each category gets a true elasticity `e` and rows are drawn from a
//! constant-elasticity demand curve with log-normal noise:
//!
//! ```text
//! sales = base · price^e · exp(σ·z),   z ~ N(0, 1)
//! ```
//!
//! Prices are log-uniform over `[price_min, price_max]`. A small share of rows
//! is deliberately corrupted (blank price, zero sales) so the cleaner has work
//! to do. Output is fully determined by the seed.

use std::fs::File;
use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DEFAULT_CATEGORY_COLUMN, DEFAULT_PRICE_COLUMN, DEFAULT_SALES_COLUMN};
use crate::error::AppError;

/// Category labels used for generated data (cycled with a suffix beyond the list).
const CATEGORY_NAMES: [&str; 16] = [
    "Fruits and Vegetables",
    "Snack Foods",
    "Household",
    "Frozen Foods",
    "Dairy",
    "Canned",
    "Baking Goods",
    "Health and Hygiene",
    "Soft Drinks",
    "Meat",
    "Breads",
    "Hard Drinks",
    "Others",
    "Starchy Foods",
    "Breakfast",
    "Seafood",
];

/// Range the true per-category elasticities are drawn from.
const ELASTICITY_RANGE: (f64, f64) = (-2.2, 1.8);

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub categories: usize,
    pub rows_per_category: usize,
    pub seed: u64,
    /// Standard deviation of the log-sales noise.
    pub noise_sigma: f64,
    pub price_min: f64,
    pub price_max: f64,
    /// Probability that a row is written with an invalid price or sales value.
    pub dirty_prob: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            categories: 8,
            rows_per_category: 60,
            seed: 42,
            noise_sigma: 0.15,
            price_min: 30.0,
            price_max: 270.0,
            dirty_prob: 0.02,
        }
    }
}

/// One generated row. `None` marks a deliberately blank cell.
#[derive(Debug, Clone)]
pub struct SampleRow {
    pub id: String,
    pub price: Option<f64>,
    pub sales: Option<f64>,
    pub category: String,
}

#[derive(Debug, Clone)]
pub struct SampleData {
    pub rows: Vec<SampleRow>,
    /// True elasticity per category, in generation order.
    pub elasticities: Vec<(String, f64)>,
}

pub fn generate_sample(config: &SampleConfig) -> Result<SampleData, AppError> {
    if config.categories == 0 || config.rows_per_category == 0 {
        return Err(AppError::new(2, "Sample needs at least one category and one row per category."));
    }
    if !(config.price_min.is_finite() && config.price_max.is_finite() && config.price_min > 0.0)
        || config.price_max <= config.price_min
    {
        return Err(AppError::new(2, "Invalid price range for sample generation."));
    }
    if !(0.0..1.0).contains(&config.dirty_prob) {
        return Err(AppError::new(2, "Invalid dirty-row probability (must be in [0, 1))."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_sigma)
        .map_err(|e| AppError::new(2, format!("Noise distribution error: {e}")))?;

    let ln_min = config.price_min.ln();
    let ln_max = config.price_max.ln();

    let mut rows = Vec::with_capacity(config.categories * config.rows_per_category);
    let mut elasticities = Vec::with_capacity(config.categories);

    for c in 0..config.categories {
        let name = category_name(c);
        let e = rng.gen_range(ELASTICITY_RANGE.0..ELASTICITY_RANGE.1);
        let base = rng.gen_range(500.0..5_000.0);
        elasticities.push((name.clone(), e));

        for i in 0..config.rows_per_category {
            let price = rng.gen_range(ln_min..ln_max).exp();
            // Normalize by the range floor so the base level stays interpretable.
            let sales = base * (price / config.price_min).powf(e) * noise.sample(&mut rng).exp();

            let (price, sales) = if rng.gen_bool(config.dirty_prob) {
                corrupt(&mut rng, price, sales)
            } else {
                (Some(price), Some(sales))
            };

            rows.push(SampleRow {
                id: format!("C{:02}-{:04}", c + 1, i + 1),
                price,
                sales,
                category: name.clone(),
            });
        }
    }

    Ok(SampleData { rows, elasticities })
}

/// Write a generated sample using the default retail column names.
pub fn write_sample_csv(path: &Path, config: &SampleConfig) -> Result<SampleData, AppError> {
    let sample = generate_sample(config)?;

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create sample CSV '{}': {e}", path.display())))?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "Item_Identifier",
        DEFAULT_PRICE_COLUMN,
        DEFAULT_SALES_COLUMN,
        DEFAULT_CATEGORY_COLUMN,
    ])
    .map_err(|e| AppError::new(2, format!("Failed to write sample CSV header: {e}")))?;

    for row in &sample.rows {
        let price = row.price.map(|v| format!("{v:.4}")).unwrap_or_default();
        let sales = row.sales.map(|v| format!("{v:.4}")).unwrap_or_default();
        wtr.write_record([row.id.as_str(), price.as_str(), sales.as_str(), row.category.as_str()])
            .map_err(|e| AppError::new(2, format!("Failed to write sample CSV row: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush sample CSV: {e}")))?;

    Ok(sample)
}

fn category_name(idx: usize) -> String {
    let base = CATEGORY_NAMES[idx % CATEGORY_NAMES.len()];
    match idx / CATEGORY_NAMES.len() {
        0 => base.to_string(),
        round => format!("{base} {}", round + 1),
    }
}

fn corrupt(rng: &mut StdRng, price: f64, sales: f64) -> (Option<f64>, Option<f64>) {
    match rng.gen_range(0..3) {
        0 => (None, Some(sales)),
        1 => (Some(price), Some(0.0)),
        _ => (Some(-price), Some(sales)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ColumnMapping, Dataset, Record};
    use crate::fit::estimate;
    use crate::io::load_path;

    fn clean_dataset(sample: &SampleData) -> Dataset {
        Dataset::from_records(
            sample
                .rows
                .iter()
                .filter_map(|r| {
                    Some(Record {
                        price: r.price?,
                        sales: r.sales?,
                        category: r.category.clone(),
                    })
                })
                .collect(),
        )
    }

    #[test]
    fn deterministic_for_seed() {
        let config = SampleConfig::default();
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        assert_eq!(a.elasticities, b.elasticities);
        assert_eq!(a.rows.len(), config.categories * config.rows_per_category);
        assert_eq!(a.rows[17].price, b.rows[17].price);
    }

    #[test]
    fn estimator_recovers_true_elasticities() {
        let config = SampleConfig {
            categories: 5,
            rows_per_category: 200,
            noise_sigma: 0.1,
            dirty_prob: 0.0,
            ..SampleConfig::default()
        };
        let sample = generate_sample(&config).unwrap();
        let est = estimate(&clean_dataset(&sample), 10);

        assert_eq!(est.results.len(), 5);
        for (name, e) in &sample.elasticities {
            let row = est.results.get(name).unwrap();
            assert!(
                (row.elasticity - e).abs() < 0.1,
                "{name}: estimated {} vs true {e}",
                row.elasticity
            );
            assert!(row.r_squared > 0.5 || e.abs() < 0.3);
        }
    }

    #[test]
    fn written_csv_loads_and_cleans() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        let config = SampleConfig {
            dirty_prob: 0.1,
            ..SampleConfig::default()
        };
        let sample = write_sample_csv(&path, &config).unwrap();

        let (ds, report) = load_path(&path, &ColumnMapping::default()).unwrap();
        let dirty = sample
            .rows
            .iter()
            .filter(|r| !matches!((r.price, r.sales), (Some(p), Some(s)) if p > 0.0 && s > 0.0))
            .count();
        assert_eq!(report.original_size, sample.rows.len());
        assert_eq!(report.removed_records, dirty);
        assert_eq!(ds.len(), sample.rows.len() - dirty);
    }

    #[test]
    fn rejects_bad_config() {
        let config = SampleConfig {
            price_min: 10.0,
            price_max: 5.0,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&config).is_err());
        assert!(generate_sample(&SampleConfig { categories: 0, ..SampleConfig::default() }).is_err());
    }

    #[test]
    fn category_names_stay_unique() {
        let names: Vec<String> = (0..40).map(category_name).collect();
        let mut dedup = names.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), names.len());
    }
}
