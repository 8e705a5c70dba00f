use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use salary_core::{BracketTable, BracketTableError, TaxBracket};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Validated bracket tables keyed by table name.
pub type BracketTables = BTreeMap<String, BracketTable>;

/// Errors that can occur when loading tax bracket data.
#[derive(Debug, Error)]
pub enum TaxBracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid bracket table '{table}': {source}")]
    InvalidTable {
        table: String,
        #[source]
        source: BracketTableError,
    },
}

impl From<csv::Error> for TaxBracketLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxBracketLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket CSV file.
///
/// - `table`: name the policy file refers to (e.g. `reform_2027`)
/// - `min`: exclusive lower bound of the tier
/// - `max`: inclusive upper bound (empty for the unbounded top tier)
/// - `rate`: marginal rate as a decimal (e.g. `0.05` for 5%)
/// - `deduction`: quick-deduction constant (empty, or column absent, to derive it)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBracketRecord {
    pub table: String,
    pub min: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub deduction: Option<Decimal>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for progressive bracket tables stored as CSV.
///
/// One file may hold several tables; rows are grouped by the `table` column.
pub struct TaxBracketLoader;

impl TaxBracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<TaxBracketRecord>, TaxBracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into validated tables.
    ///
    /// Each table's rows are sorted by `min`. Missing quick deductions are
    /// derived from the schedule; deductions that are present must agree
    /// with the derived value, otherwise the table is rejected.
    pub fn into_tables(
        records: &[TaxBracketRecord]
    ) -> Result<BracketTables, TaxBracketLoaderError> {
        let mut groups: BTreeMap<String, Vec<&TaxBracketRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(record.table.clone()).or_default().push(record);
        }

        let mut tables = BracketTables::new();
        for (table, mut rows) in groups {
            rows.sort_by(|a, b| a.min.cmp(&b.min));

            let mut brackets: Vec<TaxBracket> = rows
                .iter()
                .map(|r| TaxBracket::new(r.min, r.max, r.rate, Decimal::ZERO))
                .collect();
            let derived = BracketTable::quick_deductions(&brackets);
            for ((bracket, row), derived) in brackets.iter_mut().zip(&rows).zip(derived) {
                bracket.deduction = row.deduction.unwrap_or(derived);
            }

            let validated = BracketTable::new(brackets).map_err(|source| {
                TaxBracketLoaderError::InvalidTable {
                    table: table.clone(),
                    source,
                }
            })?;
            debug!(table = %table, tiers = validated.brackets().len(), "bracket table loaded");
            tables.insert(table, validated);
        }

        Ok(tables)
    }

    /// Parse and validate in one step.
    pub fn load<R: Read>(reader: R) -> Result<BracketTables, TaxBracketLoaderError> {
        let records = Self::parse(reader)?;
        Self::into_tables(&records)
    }
}
