//! CSV Import
//!
//! Reads sets from CSV files with `movement`, `volume` and `intensity`
//! columns (any order, matched case-insensitively by header name).
//! Rows that fail to parse or validate are reported, not imported.

use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::sets::NewSet;

/// Most row errors kept in a result
const MAX_REPORTED_ERRORS: usize = 100;

/// Import errors that abort the whole file
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Result of a CSV import
#[derive(Debug, Default)]
pub struct CsvImportResult {
    /// Valid sets, in file order
    pub sets: Vec<NewSet>,
    pub rows_processed: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct Columns {
    movement: usize,
    volume: usize,
    intensity: usize,
}

impl Columns {
    fn detect(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(ImportError::MissingColumn(name))
        };

        Ok(Self {
            movement: find("movement")?,
            volume: find("volume")?,
            intensity: find("intensity")?,
        })
    }
}

/// Import sets from a CSV file
pub fn import_path(path: &Path) -> Result<CsvImportResult, ImportError> {
    let file = std::fs::File::open(path)?;
    import_reader(file)
}

/// Import sets from CSV text
pub fn import_str(csv_data: &str) -> Result<CsvImportResult, ImportError> {
    import_reader(csv_data.as_bytes())
}

/// Import sets from any CSV source with a header row
pub fn import_reader<R: Read>(source: R) -> Result<CsvImportResult, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns = Columns::detect(reader.headers()?)?;
    let mut result = CsvImportResult::default();

    for (line_num, record) in reader.records().enumerate() {
        // Header is line 1
        let line = line_num + 2;

        let parsed = record
            .map_err(|e| e.to_string())
            .and_then(|record| parse_row(&record, columns));

        match parsed {
            Ok(set) => {
                result.sets.push(set);
                result.rows_processed += 1;
            }
            Err(e) => {
                result.errors.push(format!("Line {}: {}", line, e));
                result.rows_failed += 1;
            }
        }
    }

    if result.errors.len() > MAX_REPORTED_ERRORS {
        let total = result.errors.len();
        result.errors.truncate(MAX_REPORTED_ERRORS);
        result
            .errors
            .push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
    }

    tracing::debug!(
        imported = result.rows_processed,
        failed = result.rows_failed,
        "Parsed set CSV"
    );

    Ok(result)
}

fn parse_row(record: &csv::StringRecord, columns: Columns) -> Result<NewSet, String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| format!("missing {}", name))
    };

    let number = |idx: usize, name: &str| -> Result<f64, String> {
        let raw = field(idx, name)?;
        raw.parse::<f64>()
            .map_err(|_| format!("{} '{}' is not a number", name, raw))
    };

    let set = NewSet::new(
        field(columns.movement, "movement")?,
        number(columns.volume, "volume")?,
        number(columns.intensity, "intensity")?,
    );

    set.validate().map_err(|e| e.to_string())?;
    Ok(set)
}
