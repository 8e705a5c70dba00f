//! Side-by-side evaluation of one input under every policy in a set.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculations::salary::SalaryWorksheet;
use crate::models::{PolicySet, TaxInput, TaxResult};

/// Results for one input, one per policy, in policy-set order.
///
/// The first result belongs to the baseline policy. Only [`compare`] builds
/// one, so there is always at least one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyComparison {
    input: TaxInput,
    results: Vec<TaxResult>,
}

impl PolicyComparison {
    pub fn input(&self) -> &TaxInput {
        &self.input
    }

    pub fn results(&self) -> &[TaxResult] {
        &self.results
    }

    pub fn get(
        &self,
        policy_id: &str,
    ) -> Option<&TaxResult> {
        self.results.iter().find(|r| r.policy_id == policy_id)
    }

    pub fn baseline(&self) -> &TaxResult {
        &self.results[0]
    }

    /// Net salary under `policy_id` minus net salary under the baseline.
    pub fn net_difference(
        &self,
        policy_id: &str,
    ) -> Option<Decimal> {
        self.get(policy_id)
            .map(|r| r.net_salary.saturating_sub(self.baseline().net_salary))
    }

    /// Tax under `policy_id` minus tax under the baseline.
    pub fn tax_difference(
        &self,
        policy_id: &str,
    ) -> Option<Decimal> {
        self.get(policy_id)
            .map(|r| r.tax_amount.saturating_sub(self.baseline().tax_amount))
    }
}

/// Calculates `input` under every policy in `policies`.
///
/// A [`PolicySet`] is never empty, so the comparison always has a baseline.
pub fn compare(
    input: &TaxInput,
    policies: &PolicySet,
) -> PolicyComparison {
    let results = policies
        .iter()
        .map(|policy| SalaryWorksheet::new(policy).calculate(input))
        .collect();

    PolicyComparison {
        input: input.clone(),
        results,
    }
}
