//! Policy sets described in TOML.
//!
//! ```toml
//! [[policies]]
//! id = "current"
//! name = "Current"
//! base_salary = 2340000
//! personal_deduction = 11000000
//! dependent_deduction = 4400000
//! bracket_table = "current"
//!
//! [policies.regional_min_salary]
//! I = 4960000
//! II = 4410000
//! III = 3860000
//! IV = 3250000
//! ```
//!
//! A policy takes its brackets from exactly one of:
//! * `bracket_table`: a built-in table (`current`, `jul_2026`) or one loaded
//!   from a bracket CSV;
//! * inline `tax_brackets = [{ min = 0, max = 5000000, rate = 0.05, deduction = 0 }, ...]`;
//! * neither, in which case the current 7-tier table applies.

use rust_decimal::Decimal;
use salary_core::schedules::builtin_bracket_table;
use salary_core::{
    PolicyDefinition, PolicyError, PolicySet, RegionalMinSalary, TaxBracket, TaxPolicy,
};
use serde::Deserialize;
use thiserror::Error;

use crate::loader::BracketTables;

#[derive(Debug, Error)]
pub enum PolicyFileError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("policy '{policy}' refers to unknown bracket table '{table}'")]
    UnknownBracketTable { policy: String, table: String },

    #[error("policy '{policy}' sets both bracket_table and tax_brackets")]
    ConflictingBrackets { policy: String },

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyFile {
    pub policies: Vec<PolicyEntry>,
}

/// One `[[policies]]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sub_label: Option<String>,
    pub base_salary: Decimal,
    pub personal_deduction: Decimal,
    pub dependent_deduction: Decimal,
    pub regional_min_salary: RegionalMinSalary,
    #[serde(default)]
    pub bracket_table: Option<String>,
    #[serde(default)]
    pub tax_brackets: Option<Vec<TaxBracket>>,
}

impl PolicyEntry {
    /// Resolves `bracket_table` against `tables` first, then the built-in
    /// tables.
    pub fn into_definition(
        self,
        tables: &BracketTables,
    ) -> Result<PolicyDefinition, PolicyFileError> {
        let tax_brackets = match (self.bracket_table, self.tax_brackets) {
            (Some(_), Some(_)) => {
                return Err(PolicyFileError::ConflictingBrackets { policy: self.id });
            }
            (Some(name), None) => {
                let brackets = tables
                    .get(&name)
                    .map(|t| t.brackets().to_vec())
                    .or_else(|| builtin_bracket_table(&name))
                    .ok_or_else(|| PolicyFileError::UnknownBracketTable {
                        policy: self.id.clone(),
                        table: name,
                    })?;
                Some(brackets)
            }
            (None, inline) => inline,
        };

        Ok(PolicyDefinition {
            id: self.id,
            name: self.name,
            sub_label: self.sub_label,
            base_salary: self.base_salary,
            personal_deduction: self.personal_deduction,
            dependent_deduction: self.dependent_deduction,
            regional_min_salary: self.regional_min_salary,
            tax_brackets,
        })
    }
}

impl PolicyFile {
    pub fn parse(text: &str) -> Result<Self, PolicyFileError> {
        Ok(toml::from_str(text)?)
    }

    /// Validates every entry and returns them as a set, in file order.
    pub fn into_policy_set(
        self,
        tables: &BracketTables,
    ) -> Result<PolicySet, PolicyFileError> {
        let policies = self
            .policies
            .into_iter()
            .map(|entry| Ok(TaxPolicy::new(entry.into_definition(tables)?)?))
            .collect::<Result<Vec<_>, PolicyFileError>>()?;
        Ok(PolicySet::new(policies)?)
    }
}

/// Parses `text` and builds a validated [`PolicySet`].
pub fn load_policies(
    text: &str,
    tables: &BracketTables,
) -> Result<PolicySet, PolicyFileError> {
    PolicyFile::parse(text)?.into_policy_set(tables)
}
