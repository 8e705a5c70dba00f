use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{InsuranceMode, Region};

/// One person's salary snapshot for a single calculation.
///
/// Amounts are not validated: negative values flow through the calculator
/// and produce consistent (if meaningless) results.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxInput {
    pub gross_salary: Decimal,

    /// Allowances that are exempt at source. Never taxed, added back to net pay.
    pub other_non_taxable_allowance: Decimal,

    pub insurance_mode: InsuranceMode,

    /// Contribution base, only read when `insurance_mode` is
    /// [`InsuranceMode::FixedAmount`].
    pub insurance_salary: Decimal,

    pub dependents: u32,
    pub region: Region,
}

impl TaxInput {
    /// Input with contributions on `gross_salary`, no allowance, no
    /// dependents and Region I.
    pub fn on_gross(gross_salary: Decimal) -> Self {
        Self {
            gross_salary,
            ..Default::default()
        }
    }

    pub fn with_allowance(
        mut self,
        allowance: Decimal,
    ) -> Self {
        self.other_non_taxable_allowance = allowance;
        self
    }

    /// Switches to [`InsuranceMode::FixedAmount`] with the given base.
    pub fn with_fixed_insurance(
        mut self,
        insurance_salary: Decimal,
    ) -> Self {
        self.insurance_mode = InsuranceMode::FixedAmount;
        self.insurance_salary = insurance_salary;
        self
    }

    pub fn with_dependents(
        mut self,
        dependents: u32,
    ) -> Self {
        self.dependents = dependents;
        self
    }

    pub fn with_region(
        mut self,
        region: Region,
    ) -> Self {
        self.region = region;
        self
    }

    /// Returns `true` if any monetary field is negative.
    pub fn has_negative_amount(&self) -> bool {
        self.gross_salary < Decimal::ZERO
            || self.other_non_taxable_allowance < Decimal::ZERO
            || self.insurance_salary < Decimal::ZERO
    }
}
