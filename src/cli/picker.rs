//! Interactive CSV picker.
//!
//! This is kept separate from clap parsing:
//! - clap handles structured flags/subcommands
//! - the picker covers "run `pe analyze` without `-f` and choose a CSV"
//!
//! The picker lists `*.csv` files in the current working directory.
//! Prompts go to stderr so stdout only carries the report.

use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Return the validated `-f` path, or ask the user to pick one.
///
/// Without a terminal on stdin there is nobody to ask, so a missing `-f` is an error.
pub fn resolve_csv_path(file: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Some(path) = file {
        return validate_csv_path(path);
    }
    if !io::stdin().is_terminal() {
        return Err(AppError::new(
            2,
            "No CSV file given. Provide one with `pe analyze -f <file.csv>`.",
        ));
    }
    let files = discover_csv_files(Path::new("."));
    let stdin = io::stdin();
    prompt_for_csv_path(&files, &mut stdin.lock(), &mut io::stderr())
}

/// Prompt for a selection among `files`.
///
/// Behavior:
/// - list discovered `*.csv` files
/// - accept either a number (from the list) or an explicit path
/// - `q` cancels
pub fn prompt_for_csv_path<R: BufRead, W: Write>(
    files: &[PathBuf],
    input: &mut R,
    out: &mut W,
) -> Result<PathBuf, AppError> {
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv files found. Provide one with `pe analyze -f <file.csv>`.",
        ));
    }

    let write_err = |e: io::Error| AppError::new(2, format!("Failed to write prompt: {e}"));

    writeln!(out, "Found {} CSV file(s):", files.len()).map_err(write_err)?;
    for (idx, path) in files.iter().enumerate() {
        writeln!(out, "{:>3}) {}", idx + 1, pretty_path(path)).map_err(write_err)?;
    }

    loop {
        write!(out, "Select a file by number (1-{}) or type a path (q to quit): ", files.len())
            .map_err(write_err)?;
        out.flush().map_err(write_err)?;

        let mut line = String::new();
        let bytes = input
            .read_line(&mut line)
            .map_err(|e| AppError::new(2, format!("Failed to read input: {e}")))?;

        if bytes == 0 {
            return Err(AppError::new(
                2,
                "No input received. Provide a CSV path with `pe analyze -f <file.csv>`.",
            ));
        }

        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            return Err(AppError::new(2, "Canceled."));
        }

        if let Ok(choice) = line.parse::<usize>() {
            if (1..=files.len()).contains(&choice) {
                return validate_csv_path(&files[choice - 1]);
            }
            writeln!(out, "Invalid choice: {choice}. Enter a number between 1 and {}.", files.len())
                .map_err(write_err)?;
            continue;
        }

        match validate_csv_path(Path::new(line)) {
            Ok(path) => return Ok(path),
            Err(err) => writeln!(out, "{err}").map_err(write_err)?,
        }
    }
}

/// Validate the provided path points to a `.csv` file.
pub fn validate_csv_path(path: &Path) -> Result<PathBuf, AppError> {
    if !path.exists() {
        return Err(AppError::new(2, format!("CSV file not found: {}", path.display())));
    }
    if path.is_dir() {
        return Err(AppError::new(
            2,
            format!("Expected a file, got a directory: {}", path.display()),
        ));
    }
    if !has_csv_extension(path) {
        return Err(AppError::new(
            2,
            format!("Expected a .csv file (got: {}). Use -f to pass a CSV path.", path.display()),
        ));
    }

    Ok(path.to_path_buf())
}

/// List `*.csv` files directly inside `dir`, sorted by name.
pub fn discover_csv_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut out: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .map(|entry| entry.path())
        .filter(|path| has_csv_extension(path))
        .collect();
    out.sort_by_key(|p| pretty_path(p));
    out
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn pretty_path(path: &Path) -> String {
    let stripped = path.strip_prefix("./").unwrap_or(path);
    stripped.display().to_string()
}
