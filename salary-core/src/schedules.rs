//! Statutory rates, bracket tables and the built-in policy regimes.
//!
//! | Regime     | Personal | Per dependent | Regional minimums | Brackets |
//! |------------|----------|---------------|-------------------|----------|
//! | `current`  | 11.0M    | 4.4M          | current           | 7-tier   |
//! | `jan_2026` | 15.5M    | 6.2M          | Decree 293/2025   | 7-tier   |
//! | `jul_2026` | 15.5M    | 6.2M          | Decree 293/2025   | 5-tier   |
//!
//! All three use a base salary of 2,340,000.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{PolicyDefinition, RegionalMinSalary, TaxBracket};

/// Employee social insurance (BHXH) rate.
pub const SOCIAL_INSURANCE_RATE: Decimal = dec!(0.08);
/// Employee health insurance (BHYT) rate.
pub const HEALTH_INSURANCE_RATE: Decimal = dec!(0.015);
/// Employee unemployment insurance (BHTN) rate.
pub const UNEMPLOYMENT_INSURANCE_RATE: Decimal = dec!(0.01);

/// Contribution bases are capped at this multiple of the reference wage.
pub const CONTRIBUTION_CAP_MULTIPLIER: Decimal = dec!(20);

pub const BASE_SALARY: Decimal = dec!(2340000);

pub const CURRENT_TABLE: &str = "current";
pub const JULY_2026_TABLE: &str = "jul_2026";

/// Progressive schedule in force before July 2026.
pub const TAX_BRACKETS_CURRENT: [TaxBracket; 7] = [
    TaxBracket::new(dec!(0), Some(dec!(5000000)), dec!(0.05), dec!(0)),
    TaxBracket::new(dec!(5000000), Some(dec!(10000000)), dec!(0.10), dec!(250000)),
    TaxBracket::new(dec!(10000000), Some(dec!(18000000)), dec!(0.15), dec!(750000)),
    TaxBracket::new(dec!(18000000), Some(dec!(32000000)), dec!(0.20), dec!(1650000)),
    TaxBracket::new(dec!(32000000), Some(dec!(52000000)), dec!(0.25), dec!(3250000)),
    TaxBracket::new(dec!(52000000), Some(dec!(80000000)), dec!(0.30), dec!(5850000)),
    TaxBracket::new(dec!(80000000), None, dec!(0.35), dec!(9850000)),
];

/// Progressive schedule effective 1 July 2026.
pub const TAX_BRACKETS_JULY_2026: [TaxBracket; 5] = [
    TaxBracket::new(dec!(0), Some(dec!(10000000)), dec!(0.05), dec!(0)),
    TaxBracket::new(dec!(10000000), Some(dec!(30000000)), dec!(0.10), dec!(500000)),
    TaxBracket::new(dec!(30000000), Some(dec!(60000000)), dec!(0.20), dec!(3500000)),
    TaxBracket::new(dec!(60000000), Some(dec!(100000000)), dec!(0.30), dec!(9500000)),
    TaxBracket::new(dec!(100000000), None, dec!(0.35), dec!(14500000)),
];

pub const REGIONAL_MIN_CURRENT: RegionalMinSalary = RegionalMinSalary {
    region_i: dec!(4960000),
    region_ii: dec!(4410000),
    region_iii: dec!(3860000),
    region_iv: dec!(3250000),
};

/// Decree 293/2025/ND-CP.
pub const REGIONAL_MIN_2026: RegionalMinSalary = RegionalMinSalary {
    region_i: dec!(5310000),
    region_ii: dec!(4730000),
    region_iii: dec!(4140000),
    region_iv: dec!(3700000),
};

pub fn current_brackets() -> Vec<TaxBracket> {
    TAX_BRACKETS_CURRENT.to_vec()
}

pub fn july_2026_brackets() -> Vec<TaxBracket> {
    TAX_BRACKETS_JULY_2026.to_vec()
}

/// Looks up a shipped bracket table by name (`"current"` or `"jul_2026"`).
pub fn builtin_bracket_table(name: &str) -> Option<Vec<TaxBracket>> {
    match name {
        CURRENT_TABLE => Some(current_brackets()),
        JULY_2026_TABLE => Some(july_2026_brackets()),
        _ => None,
    }
}

pub fn builtin_policy_definitions() -> Vec<PolicyDefinition> {
    vec![
        PolicyDefinition {
            id: "current".to_string(),
            name: "Current".to_string(),
            sub_label: None,
            base_salary: BASE_SALARY,
            personal_deduction: dec!(11000000),
            dependent_deduction: dec!(4400000),
            regional_min_salary: REGIONAL_MIN_CURRENT,
            tax_brackets: Some(current_brackets()),
        },
        PolicyDefinition {
            id: "jan_2026".to_string(),
            name: "From 01/01/2026".to_string(),
            sub_label: Some("New regional wages & deductions".to_string()),
            base_salary: BASE_SALARY,
            personal_deduction: dec!(15500000),
            dependent_deduction: dec!(6200000),
            regional_min_salary: REGIONAL_MIN_2026,
            tax_brackets: Some(current_brackets()),
        },
        PolicyDefinition {
            id: "jul_2026".to_string(),
            name: "From 01/07/2026".to_string(),
            sub_label: Some("Full reform".to_string()),
            base_salary: BASE_SALARY,
            personal_deduction: dec!(15500000),
            dependent_deduction: dec!(6200000),
            regional_min_salary: REGIONAL_MIN_2026,
            tax_brackets: Some(july_2026_brackets()),
        },
    ]
}
