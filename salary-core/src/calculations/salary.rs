//! Gross-to-net salary calculation.
//!
//! # Pipeline
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Contribution base: gross salary, or the fixed amount in `FIXED_AMOUNT` mode |
//! | 2a   | Social/health base: step 1 capped at 20 × base salary |
//! | 2b   | Unemployment base: step 1 capped at 20 × regional minimum salary |
//! | 3    | Contributions: 8% and 1.5% of step 2a, 1% of step 2b |
//! | 4    | Assessable income: gross − total contributions |
//! | 5    | Taxable income: step 4 − personal − dependents × per-dependent, floored at 0 |
//! | 6    | Bracket: first `(min, max]` range containing step 5, or none |
//! | 7    | Tax: step 5 × rate − quick deduction, or 0 when no bracket matched |
//! | 8    | Net: gross + non-taxable allowance − contributions − tax |
//!
//! No step rounds. The non-taxable allowance never reaches the tax base.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use salary_core::{PolicySet, TaxInput, calculate};
//!
//! let policies = PolicySet::builtin().unwrap();
//! let current = policies.get("current").unwrap();
//!
//! let result = calculate(&TaxInput::on_gross(dec!(20000000)), current);
//!
//! assert_eq!(result.total_insurance, dec!(2100000));
//! assert_eq!(result.taxable_income, dec!(6900000));
//! assert_eq!(result.tax_amount, dec!(440000));
//! assert_eq!(result.net_salary, dec!(17460000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calculations::common::{max, min};
use crate::models::{InsuranceMode, Region, TaxInput, TaxPolicy, TaxResult};
use crate::schedules::{
    HEALTH_INSURANCE_RATE, SOCIAL_INSURANCE_RATE, UNEMPLOYMENT_INSURANCE_RATE,
};

/// Employee-side contributions and the capped bases they were computed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceContributions {
    pub social_health_base: Decimal,
    pub unemployment_base: Decimal,
    pub social_insurance: Decimal,
    pub health_insurance: Decimal,
    pub unemployment_insurance: Decimal,
    pub total: Decimal,
}

/// Calculator bound to one policy.
///
/// Holds nothing but a shared reference, so it is cheap to build per call and
/// safe to use from any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct SalaryWorksheet<'a> {
    policy: &'a TaxPolicy,
}

impl<'a> SalaryWorksheet<'a> {
    pub fn new(policy: &'a TaxPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &'a TaxPolicy {
        self.policy
    }

    /// Runs the full pipeline. Total over every input: amounts are not
    /// validated, negative values simply propagate, and sums that leave the
    /// `Decimal` range saturate at its bounds.
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> TaxResult {
        if input.has_negative_amount() {
            warn!(
                policy = self.policy.id(),
                gross = %input.gross_salary,
                allowance = %input.other_non_taxable_allowance,
                insurance_salary = %input.insurance_salary,
                "negative amount in salary input"
            );
        }

        let insurance_salary_base = self.insurance_base(input);
        let contributions = self.contributions(insurance_salary_base, input.region);
        let assessable_income = self.assessable_income(input.gross_salary, contributions.total);
        let dependent_deduction = self.dependent_deduction(input.dependents);
        let taxable_income = self.taxable_income(assessable_income, dependent_deduction);
        let (tax_amount, marginal_rate) = self.tax(taxable_income);
        let net_salary = self.net_salary(input, contributions.total, tax_amount);

        debug!(
            policy = self.policy.id(),
            %taxable_income,
            %tax_amount,
            %net_salary,
            "salary calculated"
        );

        TaxResult {
            policy_id: self.policy.id().to_string(),
            gross_salary: input.gross_salary,
            other_non_taxable_allowance: input.other_non_taxable_allowance,
            insurance_mode: input.insurance_mode,
            dependents: input.dependents,
            region: input.region,
            insurance_salary_base,
            social_health_base: contributions.social_health_base,
            unemployment_base: contributions.unemployment_base,
            social_insurance: contributions.social_insurance,
            health_insurance: contributions.health_insurance,
            unemployment_insurance: contributions.unemployment_insurance,
            total_insurance: contributions.total,
            assessable_income,
            personal_deduction: self.policy.personal_deduction(),
            dependent_deduction,
            taxable_income,
            marginal_rate,
            tax_amount,
            net_salary,
        }
    }

    /// Step 1.
    fn insurance_base(
        &self,
        input: &TaxInput,
    ) -> Decimal {
        match input.insurance_mode {
            InsuranceMode::FixedAmount => input.insurance_salary,
            InsuranceMode::OnGross => input.gross_salary,
        }
    }

    /// Steps 2 and 3. The two caps are independent.
    pub fn contributions(
        &self,
        raw_base: Decimal,
        region: Region,
    ) -> InsuranceContributions {
        let social_health_base = min(raw_base, self.policy.social_health_cap());
        let unemployment_base = min(raw_base, self.policy.unemployment_cap(region));

        let social_insurance = social_health_base.saturating_mul(SOCIAL_INSURANCE_RATE);
        let health_insurance = social_health_base.saturating_mul(HEALTH_INSURANCE_RATE);
        let unemployment_insurance =
            unemployment_base.saturating_mul(UNEMPLOYMENT_INSURANCE_RATE);

        InsuranceContributions {
            social_health_base,
            unemployment_base,
            social_insurance,
            health_insurance,
            unemployment_insurance,
            total: social_insurance
                .saturating_add(health_insurance)
                .saturating_add(unemployment_insurance),
        }
    }

    /// Step 4.
    fn assessable_income(
        &self,
        gross_salary: Decimal,
        total_insurance: Decimal,
    ) -> Decimal {
        gross_salary.saturating_sub(total_insurance)
    }

    fn dependent_deduction(
        &self,
        dependents: u32,
    ) -> Decimal {
        Decimal::from(dependents).saturating_mul(self.policy.dependent_deduction())
    }

    /// Step 5. The only clamp in the pipeline.
    fn taxable_income(
        &self,
        assessable_income: Decimal,
        dependent_deduction: Decimal,
    ) -> Decimal {
        max(
            Decimal::ZERO,
            assessable_income
                .saturating_sub(self.policy.personal_deduction())
                .saturating_sub(dependent_deduction),
        )
    }

    /// Steps 6 and 7.
    fn tax(
        &self,
        taxable_income: Decimal,
    ) -> (Decimal, Option<Decimal>) {
        match self.policy.tax_brackets().find(taxable_income) {
            Some(bracket) => (bracket.quick_tax(taxable_income), Some(bracket.rate)),
            None => (Decimal::ZERO, None),
        }
    }

    /// Step 8.
    fn net_salary(
        &self,
        input: &TaxInput,
        total_insurance: Decimal,
        tax_amount: Decimal,
    ) -> Decimal {
        input
            .gross_salary
            .saturating_add(input.other_non_taxable_allowance)
            .saturating_sub(total_insurance)
            .saturating_sub(tax_amount)
    }
}

/// Computes the breakdown of `input` under `policy`.
pub fn calculate(
    input: &TaxInput,
    policy: &TaxPolicy,
) -> TaxResult {
    SalaryWorksheet::new(policy).calculate(input)
}
