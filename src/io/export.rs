//! Export the result set to CSV (and read it back).
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.
//! Column order:
//!
//! ```text
//! category,elasticity,p_value,r_squared,avg_price,median_price,total_sales,num_products,demand_type,can_increase_price
//! ```
//!
//! `demand_type` is written as its display label and `can_increase_price` as `Yes`/`No`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::domain::{CategoryResult, ResultSet};
use crate::error::AppError;

/// Write the result set to a CSV file.
pub fn write_results_csv(path: &Path, results: &ResultSet) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, results)
}

/// Write the result set as CSV to any writer.
pub fn write_results<W: Write>(writer: W, results: &ResultSet) -> Result<(), AppError> {
    let mut wtr = csv::Writer::from_writer(writer);

    if results.is_empty() {
        // `serialize` derives the header from the first row; emit it explicitly.
        wtr.write_record(RESULT_COLUMNS)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;
    }

    for row in results.rows() {
        wtr.serialize(row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    wtr.flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Read a previously exported result CSV.
pub fn read_results_csv(path: &Path) -> Result<ResultSet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open results CSV '{}': {e}", path.display())))?;
    read_results(file)
}

/// Read exported results from any reader, preserving row order.
pub fn read_results<R: Read>(reader: R) -> Result<ResultSet, AppError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = Vec::new();
    for (idx, row) in rdr.deserialize::<CategoryResult>().enumerate() {
        let row = row.map_err(|e| AppError::new(2, format!("Invalid results CSV row {}: {e}", idx + 2)))?;
        rows.push(row);
    }
    Ok(ResultSet::from_rows(rows))
}

/// Export header, in column order.
pub const RESULT_COLUMNS: [&str; 10] = [
    "category",
    "elasticity",
    "p_value",
    "r_squared",
    "avg_price",
    "median_price",
    "total_sales",
    "num_products",
    "demand_type",
    "can_increase_price",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::test_support::sample_results;

    #[test]
    fn header_matches_column_order() {
        let mut buf = Vec::new();
        write_results(&mut buf, &sample_results()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, RESULT_COLUMNS.join(","));
        assert!(text.contains("Highly Elastic"));
        assert!(text.contains(",Yes"));
        assert!(text.contains(",No"));
    }

    #[test]
    fn empty_result_set_still_has_header() {
        let mut buf = Vec::new();
        write_results(&mut buf, &ResultSet::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.trim_end(), RESULT_COLUMNS.join(","));
        assert!(read_results(text.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn export_then_reparse_preserves_values() {
        let original = sample_results();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        write_results_csv(&path, &original).unwrap();
        let back = read_results_csv(&path).unwrap();

        assert_eq!(back.len(), original.len());
        for (a, b) in original.rows().iter().zip(back.rows()) {
            assert_eq!(a.category, b.category);
            assert!((a.elasticity - b.elasticity).abs() < 1e-12);
            assert!((a.p_value - b.p_value).abs() < 1e-12);
            assert!((a.r_squared - b.r_squared).abs() < 1e-12);
            assert!((a.avg_price - b.avg_price).abs() < 1e-9);
            assert!((a.median_price - b.median_price).abs() < 1e-9);
            assert!((a.total_sales - b.total_sales).abs() < 1e-9);
            assert_eq!(a.num_products, b.num_products);
            assert_eq!(a.demand_type, b.demand_type);
            assert_eq!(a.can_increase_price, b.can_increase_price);
        }
    }

    #[test]
    fn rejects_unknown_flag_value() {
        let text = format!("{}\nA,0.5,0.1,0.2,10,10,100,12,Inelastic,maybe\n", RESULT_COLUMNS.join(","));
        assert!(read_results(text.as_bytes()).is_err());
    }
}
