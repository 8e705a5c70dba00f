//! CSV loader for batches of salary inputs.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter.
//!
//! | Column                        | Required | Type    | Default    |
//! |-------------------------------|----------|---------|------------|
//! | `gross_salary`                | yes      | decimal |            |
//! | `other_non_taxable_allowance` | no       | decimal | `0`        |
//! | `insurance_mode`              | no       | string  | `ON_GROSS` |
//! | `insurance_salary`            | no       | decimal | `0`        |
//! | `dependents`                  | no       | integer | `0`        |
//! | `region`                      | no       | string  | `I`        |
//!
//! `insurance_mode` accepts `ON_GROSS`/`gross` or `FIXED_AMOUNT`/`fixed`;
//! `region` accepts `I`..`IV` or `1`..`4`.
//!
//! ```csv
//! gross_salary,dependents,region,insurance_mode,insurance_salary
//! 20000000,0,I,,
//! 50000000,1,2,FIXED_AMOUNT,5000000
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use salary_core::{InsuranceMode, Region, TaxInput};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct CsvRow {
    gross_salary: Decimal,
    other_non_taxable_allowance: Option<Decimal>,
    insurance_mode: Option<String>,
    insurance_salary: Option<Decimal>,
    dependents: Option<u32>,
    region: Option<String>,
}

/// Errors that can occur while loading salary inputs.
#[derive(Debug, Error)]
pub enum InputLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// `row` is 1-based, header excluded.
    #[error("unrecognised region '{value}' on row {row}")]
    InvalidRegion { value: String, row: usize },

    #[error("unrecognised insurance mode '{value}' on row {row}")]
    InvalidInsuranceMode { value: String, row: usize },
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<TaxInput, InputLoadError> {
    let region = match row.region.filter(|r| !r.trim().is_empty()) {
        Some(value) => Region::parse(&value).ok_or(InputLoadError::InvalidRegion {
            value,
            row: row_number,
        })?,
        None => Region::default(),
    };

    let insurance_mode = match row.insurance_mode.filter(|m| !m.trim().is_empty()) {
        Some(value) => {
            InsuranceMode::parse(&value).ok_or(InputLoadError::InvalidInsuranceMode {
                value,
                row: row_number,
            })?
        }
        None => InsuranceMode::default(),
    };

    Ok(TaxInput {
        gross_salary: row.gross_salary,
        other_non_taxable_allowance: row.other_non_taxable_allowance.unwrap_or_default(),
        insurance_mode,
        insurance_salary: row.insurance_salary.unwrap_or_default(),
        dependents: row.dependents.unwrap_or_default(),
        region,
    })
}

/// Parse CSV text and return the inputs in file order.
///
/// # Errors
///
/// * [`InputLoadError::Parse`] if the CSV is structurally invalid or a field
///   cannot be deserialised.
/// * [`InputLoadError::InvalidRegion`] / [`InputLoadError::InvalidInsuranceMode`]
///   for unrecognised codes.
pub fn load_from_str(input: &str) -> Result<Vec<TaxInput>, InputLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Read a file from disk and delegate to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<TaxInput>, InputLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| InputLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}
