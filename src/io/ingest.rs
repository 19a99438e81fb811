//! CSV ingest and cleaning.
//!
//! This module turns a retail export into a clean `Dataset` of
//! `(price, sales, category)` records that are safe to fit.
//!
//! Design goals:
//! - **Strict schema** for the three mapped columns (all missing names are reported at once)
//! - **Row-level cleaning** (drop bad rows, but count what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no estimation logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{ColumnMapping, Dataset, LoadReport, Record, is_valid_positive};
use crate::error::LoadError;

/// Resolved column indices for the three canonical fields.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    price: usize,
    sales: usize,
    category: usize,
}

/// Why a row was dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
enum RowVerdict {
    Keep { price: f64, sales: f64 },
    Missing,
    NonPositive,
}

/// Open `path` and load it with [`load`].
pub fn load_path(path: &Path, mapping: &ColumnMapping) -> Result<(Dataset, LoadReport), LoadError> {
    let file = File::open(path)
        .map_err(|e| LoadError::source_read(format!("failed to open '{}': {e}", path.display())))?;
    load(file, mapping)
}

/// Read a CSV source, map the configured columns to `price`/`sales`/`category`,
/// and drop rows with missing or non-positive price/sales.
pub fn load<R: Read>(source: R, mapping: &ColumnMapping) -> Result<(Dataset, LoadReport), LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::source_read(format!("failed to read CSV headers: {e}")))?
        .clone();
    if headers.is_empty() {
        return Err(LoadError::source_read("no columns to parse (empty source)"));
    }

    let columns = resolve_columns(&headers, mapping)?;

    let mut records = Vec::new();
    let mut original_size = 0usize;
    let mut missing_values = 0usize;
    let mut non_positive = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;

        let record = result.map_err(|e| LoadError::SourceRead {
            line: Some(line),
            message: format!("CSV parse error: {e}"),
        })?;
        original_size += 1;

        let price = parse_opt_f64(get_optional(&record, columns.price));
        let sales = parse_opt_f64(get_optional(&record, columns.sales));

        let (price, sales) = match verdict(price, sales) {
            RowVerdict::Keep { price, sales } => (price, sales),
            RowVerdict::Missing => {
                debug!(line, "dropping row: missing price or sales");
                missing_values += 1;
                continue;
            }
            RowVerdict::NonPositive => {
                debug!(line, "dropping row: non-positive price or sales");
                non_positive += 1;
                continue;
            }
        };

        let category = get_optional(&record, columns.category).unwrap_or("").to_string();
        records.push(Record { price, sales, category });
    }

    let dataset = Dataset::from_records(records);
    let report = LoadReport::new(original_size, dataset.len(), missing_values, non_positive);

    info!(
        original = report.original_size,
        cleaned = report.cleaned_size,
        removed = report.removed_records,
        removal_pct = report.removal_pct,
        "dataset loaded"
    );

    Ok((dataset, report))
}

fn verdict(price: Option<f64>, sales: Option<f64>) -> RowVerdict {
    match (price, sales) {
        (Some(price), Some(sales)) if is_valid_positive(price) && is_valid_positive(sales) => {
            RowVerdict::Keep { price, sales }
        }
        (Some(_), Some(_)) => RowVerdict::NonPositive,
        _ => RowVerdict::Missing,
    }
}

fn resolve_columns(headers: &StringRecord, mapping: &ColumnMapping) -> Result<ColumnIndex, LoadError> {
    let header_map = build_header_map(headers);

    let price = find_column(&header_map, &mapping.price);
    let sales = find_column(&header_map, &mapping.sales);
    let category = find_column(&header_map, &mapping.category);

    match (price, sales, category) {
        (Some(price), Some(sales), Some(category)) => Ok(ColumnIndex { price, sales, category }),
        _ => {
            let missing = [
                (price, &mapping.price),
                (sales, &mapping.sales),
                (category, &mapping.category),
            ]
            .into_iter()
            .filter(|(idx, _)| idx.is_none())
            .map(|(_, name)| name.clone())
            .collect();
            Err(LoadError::SchemaMismatch { missing })
        }
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicate header names.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

/// Exact match on the trimmed, BOM-stripped header name.
fn find_column(header_map: &HashMap<String, usize>, name: &str) -> Option<usize> {
    header_map.get(&normalize_header_name(name)).copied()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    name.trim().trim_start_matches('\u{feff}').trim().to_string()
}

fn get_optional(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_opt_f64(s: Option<&str>) -> Option<f64> {
    let s = s?;
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
