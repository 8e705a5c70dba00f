use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{InsuranceMode, Region};

/// Full breakdown of one salary calculation under one policy.
///
/// Always produced whole: every field is computed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub policy_id: String,

    // Echoed input
    pub gross_salary: Decimal,
    pub other_non_taxable_allowance: Decimal,
    pub insurance_mode: InsuranceMode,
    pub dependents: u32,
    pub region: Region,

    /// Contribution base before caps (gross or the fixed amount).
    pub insurance_salary_base: Decimal,
    /// Base for social and health insurance, capped at 20 × base salary.
    pub social_health_base: Decimal,
    /// Base for unemployment insurance, capped at 20 × regional minimum.
    pub unemployment_base: Decimal,

    pub social_insurance: Decimal,
    pub health_insurance: Decimal,
    pub unemployment_insurance: Decimal,
    pub total_insurance: Decimal,

    /// Gross salary minus insurance.
    pub assessable_income: Decimal,
    pub personal_deduction: Decimal,
    /// Total over all dependents.
    pub dependent_deduction: Decimal,
    /// Assessable income minus deductions, never below zero.
    pub taxable_income: Decimal,

    /// Rate of the bracket the taxable income fell into; `None` when nothing
    /// is taxable.
    pub marginal_rate: Option<Decimal>,
    pub tax_amount: Decimal,
    pub net_salary: Decimal,
}

impl TaxResult {
    /// Insurance plus tax.
    pub fn total_withheld(&self) -> Decimal {
        self.total_insurance.saturating_add(self.tax_amount)
    }

    /// Tax as a fraction of gross salary; zero when gross is zero or the
    /// quotient leaves the `Decimal` range.
    pub fn effective_tax_rate(&self) -> Decimal {
        self.tax_amount
            .checked_div(self.gross_salary)
            .unwrap_or(Decimal::ZERO)
    }
}
