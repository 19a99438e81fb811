//! Error types.
//!
//! - `AppError` is the process-level error: a message plus the exit code the
//!   `pe` binary returns.
//! - `LoadError` and `FitError` are typed domain errors raised by the loader and
//!   the estimator.

use thiserror::Error;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Structural failures while loading a dataset. Both are fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// One or more of the mapped columns is absent from the source header.
    #[error("Missing required column(s): {}", format_missing(.missing))]
    SchemaMismatch { missing: Vec<String> },

    /// The source could not be opened or is malformed at the CSV level.
    #[error("Failed to read source{}: {message}", format_line(.line))]
    SourceRead { line: Option<usize>, message: String },
}

impl LoadError {
    pub fn source_read(message: impl Into<String>) -> Self {
        LoadError::SourceRead {
            line: None,
            message: message.into(),
        }
    }
}

fn format_line(line: &Option<usize>) -> String {
    line.map(|l| format!(" (line {l})")).unwrap_or_default()
}

fn format_missing(missing: &[String]) -> String {
    missing
        .iter()
        .map(|m| format!("`{m}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        AppError::new(2, err.to_string())
    }
}

/// Why a single category's regression could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FitError {
    #[error("degenerate design: {0}")]
    Degenerate(String),

    #[error("not enough observations for inference: n={n}, need at least 3")]
    NoResidualDof { n: usize },

    #[error("non-finite regression output")]
    NonFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_names_every_missing_column() {
        let err = LoadError::SchemaMismatch {
            missing: vec!["Item_MRP".to_string(), "Item_Type".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required column(s): `Item_MRP`, `Item_Type`"
        );
    }

    #[test]
    fn load_errors_map_to_input_exit_code() {
        let err: AppError = LoadError::SourceRead {
            line: Some(7),
            message: "invalid UTF-8".to_string(),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.message(), "Failed to read source (line 7): invalid UTF-8");
    }
}
