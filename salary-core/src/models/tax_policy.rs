use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BracketTable, BracketTableError, Region, TaxBracket};
use crate::schedules;

/// Errors raised while building policies or policy sets.
///
/// These are configuration errors: they are meant to surface once, at
/// startup, never during a calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("policy id must not be empty")]
    EmptyId,

    #[error("policy '{id}' has an invalid bracket table: {source}")]
    InvalidBrackets {
        id: String,
        #[source]
        source: BracketTableError,
    },

    #[error("policy set must contain at least one policy")]
    EmptySet,

    #[error("duplicate policy id '{0}'")]
    DuplicateId(String),

    #[error("unknown policy '{id}'; available: {available:?}")]
    UnknownPolicy { id: String, available: Vec<String> },
}

/// Regional minimum monthly salary for each zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalMinSalary {
    #[serde(rename = "I")]
    pub region_i: Decimal,
    #[serde(rename = "II")]
    pub region_ii: Decimal,
    #[serde(rename = "III")]
    pub region_iii: Decimal,
    #[serde(rename = "IV")]
    pub region_iv: Decimal,
}

impl RegionalMinSalary {
    pub fn get(
        &self,
        region: Region,
    ) -> Decimal {
        match region {
            Region::I => self.region_i,
            Region::II => self.region_ii,
            Region::III => self.region_iii,
            Region::IV => self.region_iv,
        }
    }
}

/// Unvalidated shape of a policy, as written in configuration.
///
/// `tax_brackets = None` means "use the current 7-tier schedule".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sub_label: Option<String>,
    pub base_salary: Decimal,
    pub personal_deduction: Decimal,
    pub dependent_deduction: Decimal,
    pub regional_min_salary: RegionalMinSalary,
    #[serde(default)]
    pub tax_brackets: Option<Vec<TaxBracket>>,
}

/// A named tax and social-insurance regime.
///
/// Only obtainable through [`TaxPolicy::new`], so every instance carries a
/// validated bracket table. Policies are immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyDefinition")]
pub struct TaxPolicy {
    id: String,
    name: String,
    sub_label: Option<String>,
    base_salary: Decimal,
    personal_deduction: Decimal,
    dependent_deduction: Decimal,
    regional_min_salary: RegionalMinSalary,
    tax_brackets: BracketTable,
}

impl TaxPolicy {
    /// Validates a definition.
    ///
    /// # Errors
    ///
    /// * [`PolicyError::EmptyId`] if the id is blank.
    /// * [`PolicyError::InvalidBrackets`] if the bracket table (explicit or
    ///   defaulted) fails validation.
    pub fn new(definition: PolicyDefinition) -> Result<Self, PolicyError> {
        if definition.id.trim().is_empty() {
            return Err(PolicyError::EmptyId);
        }

        let brackets = definition
            .tax_brackets
            .unwrap_or_else(schedules::current_brackets);
        let tax_brackets =
            BracketTable::new(brackets).map_err(|source| PolicyError::InvalidBrackets {
                id: definition.id.clone(),
                source,
            })?;

        Ok(Self {
            id: definition.id,
            name: definition.name,
            sub_label: definition.sub_label,
            base_salary: definition.base_salary,
            personal_deduction: definition.personal_deduction,
            dependent_deduction: definition.dependent_deduction,
            regional_min_salary: definition.regional_min_salary,
            tax_brackets,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sub_label(&self) -> Option<&str> {
        self.sub_label.as_deref()
    }

    /// Reference wage used for the social and health insurance cap.
    pub fn base_salary(&self) -> Decimal {
        self.base_salary
    }

    pub fn personal_deduction(&self) -> Decimal {
        self.personal_deduction
    }

    /// Deduction granted per registered dependent.
    pub fn dependent_deduction(&self) -> Decimal {
        self.dependent_deduction
    }

    pub fn regional_min_salary(&self) -> &RegionalMinSalary {
        &self.regional_min_salary
    }

    pub fn tax_brackets(&self) -> &BracketTable {
        &self.tax_brackets
    }

    pub fn social_health_cap(&self) -> Decimal {
        schedules::CONTRIBUTION_CAP_MULTIPLIER.saturating_mul(self.base_salary)
    }

    pub fn unemployment_cap(
        &self,
        region: Region,
    ) -> Decimal {
        schedules::CONTRIBUTION_CAP_MULTIPLIER.saturating_mul(self.regional_min_salary.get(region))
    }
}

impl TryFrom<PolicyDefinition> for TaxPolicy {
    type Error = PolicyError;

    fn try_from(definition: PolicyDefinition) -> Result<Self, Self::Error> {
        Self::new(definition)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn definition() -> PolicyDefinition {
        PolicyDefinition {
            id: "test".to_string(),
            name: "Test".to_string(),
            sub_label: None,
            base_salary: dec!(2340000),
            personal_deduction: dec!(11000000),
            dependent_deduction: dec!(4400000),
            regional_min_salary: RegionalMinSalary {
                region_i: dec!(4960000),
                region_ii: dec!(4410000),
                region_iii: dec!(3860000),
                region_iv: dec!(3250000),
            },
            tax_brackets: None,
        }
    }

    #[test]
    fn new_defaults_to_current_brackets() {
        let policy = TaxPolicy::new(definition()).unwrap();

        assert_eq!(policy.tax_brackets().brackets(), schedules::current_brackets());
    }

    #[test]
    fn new_keeps_explicit_brackets() {
        let mut def = definition();
        def.tax_brackets = Some(schedules::july_2026_brackets());

        let policy = TaxPolicy::new(def).unwrap();

        assert_eq!(policy.tax_brackets().brackets().len(), 5);
    }

    #[test]
    fn new_rejects_blank_id() {
        let mut def = definition();
        def.id = "  ".to_string();

        assert_eq!(TaxPolicy::new(def), Err(PolicyError::EmptyId));
    }

    #[test]
    fn new_rejects_table_without_unbounded_tier() {
        let mut def = definition();
        let mut brackets = schedules::current_brackets();
        brackets.pop();
        def.tax_brackets = Some(brackets);

        assert_eq!(
            TaxPolicy::new(def),
            Err(PolicyError::InvalidBrackets {
                id: "test".to_string(),
                source: BracketTableError::NoUnboundedBracket,
            })
        );
    }

    #[test]
    fn caps_are_twenty_times_reference_wages() {
        let policy = TaxPolicy::new(definition()).unwrap();

        assert_eq!(policy.social_health_cap(), dec!(46800000));
        assert_eq!(policy.unemployment_cap(Region::I), dec!(99200000));
        assert_eq!(policy.unemployment_cap(Region::IV), dec!(65000000));
    }

    #[test]
    fn regional_min_salary_deserializes_roman_keys() {
        let json = r#"{"I":"1","II":"2","III":"3","IV":"4"}"#;

        let mins: RegionalMinSalary = serde_json::from_str(json).unwrap();

        assert_eq!(mins.get(Region::III), dec!(3));
    }
}
