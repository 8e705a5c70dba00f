//! End-to-end checks of the calculator against worked scenarios and the
//! invariants every result must satisfy.

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use salary_core::schedules::{CONTRIBUTION_CAP_MULTIPLIER, TAX_BRACKETS_CURRENT};
use salary_core::{
    BracketTable, InsuranceMode, PolicySet, Region, TaxInput, TaxPolicy, calculate, compare,
};

fn policies() -> PolicySet {
    PolicySet::builtin().expect("built-in policies are valid")
}

fn policy<'a>(
    set: &'a PolicySet,
    id: &str,
) -> &'a TaxPolicy {
    set.get(id).expect("policy exists")
}

/// A spread of inputs covering both insurance modes, every region, capped and
/// uncapped bases, zero income and several dependents.
fn input_grid() -> Vec<TaxInput> {
    let grosses = [
        dec!(0),
        dec!(4000000),
        dec!(11000000),
        dec!(15000000),
        dec!(20000000),
        dec!(35000000),
        dec!(50000000),
        dec!(75000000),
        dec!(120000000),
        dec!(500000000),
    ];
    let mut inputs = Vec::new();
    for gross in grosses {
        for region in Region::all() {
            for dependents in [0, 1, 3] {
                let base = TaxInput::on_gross(gross)
                    .with_region(*region)
                    .with_dependents(dependents)
                    .with_allowance(dec!(730000));
                inputs.push(base.clone());
                inputs.push(base.with_fixed_insurance(dec!(5000000)));
            }
        }
    }
    inputs
}

// =============================================================================
// Worked scenarios
// =============================================================================

#[test]
fn scenario_a_single_earner_current_policy() {
    let set = policies();
    let input = TaxInput::on_gross(dec!(20000000));

    let result = calculate(&input, policy(&set, "current"));

    assert_eq!(result.insurance_salary_base, dec!(20000000));
    assert_eq!(result.social_health_base, dec!(20000000));
    assert_eq!(result.social_insurance, dec!(1600000));
    assert_eq!(result.health_insurance, dec!(300000));
    assert_eq!(result.unemployment_base, dec!(20000000));
    assert_eq!(result.unemployment_insurance, dec!(200000));
    assert_eq!(result.total_insurance, dec!(2100000));
    assert_eq!(result.assessable_income, dec!(17900000));
    assert_eq!(result.dependent_deduction, Decimal::ZERO);
    assert_eq!(result.taxable_income, dec!(6900000));
    assert_eq!(result.marginal_rate, Some(dec!(0.10)));
    assert_eq!(result.tax_amount, dec!(440000));
    assert_eq!(result.net_salary, dec!(17460000));
}

#[test]
fn scenario_b_two_dependents_pay_no_tax() {
    let set = policies();
    let input = TaxInput::on_gross(dec!(20000000)).with_dependents(2);

    let result = calculate(&input, policy(&set, "current"));

    assert_eq!(result.dependent_deduction, dec!(8800000));
    assert_eq!(result.taxable_income, Decimal::ZERO);
    assert_eq!(result.marginal_rate, None);
    assert_eq!(result.tax_amount, Decimal::ZERO);
    assert_eq!(result.net_salary, dec!(17900000));
}

#[test]
fn scenario_c_fixed_insurance_base() {
    let set = policies();
    let input = TaxInput::on_gross(dec!(50000000)).with_fixed_insurance(dec!(5000000));

    let result = calculate(&input, policy(&set, "current"));

    assert_eq!(result.insurance_mode, InsuranceMode::FixedAmount);
    assert_eq!(result.insurance_salary_base, dec!(5000000));
    assert_eq!(result.social_insurance, dec!(400000));
    assert_eq!(result.health_insurance, dec!(75000));
    assert_eq!(result.unemployment_insurance, dec!(50000));
    assert_eq!(result.total_insurance, dec!(525000));
    assert_eq!(result.assessable_income, dec!(49475000));
    assert_eq!(result.taxable_income, dec!(38475000));
    // 32M–52M tier: 25% less 3,250,000
    assert_eq!(result.marginal_rate, Some(dec!(0.25)));
    assert_eq!(result.tax_amount, dec!(6368750));
    assert_eq!(result.net_salary, dec!(43106250));
}

#[test]
fn scenario_a_under_every_regime() {
    let set = policies();
    let input = TaxInput::on_gross(dec!(20000000));

    let comparison = compare(&input, &set);

    let nets: Vec<_> = comparison.results().iter().map(|r| r.net_salary).collect();
    assert_eq!(nets, vec![dec!(17460000), dec!(17780000), dec!(17780000)]);
}

#[test]
fn new_brackets_diverge_from_current_for_high_earners() {
    let set = policies();
    let input = TaxInput::on_gross(dec!(80000000));

    let jan = calculate(&input, policy(&set, "jan_2026"));
    let jul = calculate(&input, policy(&set, "jul_2026"));

    // Same deductions and caps, different schedules
    assert_eq!(jan.taxable_income, jul.taxable_income);
    assert_eq!(jan.taxable_income, dec!(59254000));
    // 7-tier: 59,254,000 × 30% − 5,850,000
    assert_eq!(jan.tax_amount, dec!(11926200));
    // 5-tier: 59,254,000 × 20% − 3,500,000
    assert_eq!(jul.tax_amount, dec!(8350800));
}

// =============================================================================
// Bracket boundaries
// =============================================================================

#[test]
fn first_boundary_is_continuous() {
    let table = BracketTable::new(TAX_BRACKETS_CURRENT.to_vec()).unwrap();

    assert_eq!(table.tax_for(dec!(5000000)), dec!(250000));
    assert_eq!(table.tax_for(dec!(5000001)), dec!(250000.1));
}

#[test]
fn every_boundary_is_continuous() {
    let set = policies();

    for policy in &set {
        let table = policy.tax_brackets();
        for pair in table.brackets().windows(2) {
            let boundary = pair[0].max.expect("only the last tier is unbounded");

            let at = table.tax_for(boundary);
            let above = table.tax_for(boundary + Decimal::ONE);

            assert_eq!(
                above - at,
                pair[1].rate,
                "policy {} boundary {boundary}",
                policy.id()
            );
        }
    }
}

#[test]
fn quick_deduction_equals_cumulative_tax() {
    let set = policies();

    for policy in &set {
        let table = policy.tax_brackets();
        let mut income = dec!(0);
        while income <= dec!(150000000) {
            assert_eq!(
                table.tax_for(income),
                table.cumulative_tax(income),
                "policy {} income {income}",
                policy.id()
            );
            income += dec!(1234567);
        }
    }
}

// =============================================================================
// Invariants
// =============================================================================

#[test]
fn taxable_income_is_never_negative() {
    let set = policies();

    for input in input_grid() {
        for policy in &set {
            let result = calculate(&input, policy);

            assert!(
                result.taxable_income >= Decimal::ZERO,
                "{input:?} under {}",
                policy.id()
            );
        }
    }
}

#[test]
fn net_salary_reconstructs_from_components() {
    let set = policies();

    for input in input_grid() {
        for policy in &set {
            let r = calculate(&input, policy);

            assert_eq!(
                r.net_salary,
                r.gross_salary + r.other_non_taxable_allowance - r.total_insurance - r.tax_amount
            );
            assert_eq!(
                r.total_insurance,
                r.social_insurance + r.health_insurance + r.unemployment_insurance
            );
            assert_eq!(r.assessable_income, r.gross_salary - r.total_insurance);
        }
    }
}

#[test]
fn contribution_bases_respect_caps() {
    let set = policies();

    for input in input_grid() {
        for policy in &set {
            let r = calculate(&input, policy);

            assert!(r.social_health_base <= CONTRIBUTION_CAP_MULTIPLIER * policy.base_salary());
            assert!(
                r.unemployment_base
                    <= CONTRIBUTION_CAP_MULTIPLIER
                        * policy.regional_min_salary().get(input.region)
            );
            assert!(r.social_health_base <= r.insurance_salary_base);
            assert!(r.unemployment_base <= r.insurance_salary_base);
        }
    }
}

#[test]
fn allowance_never_changes_tax() {
    let set = policies();
    let policy = policy(&set, "current");
    let without = TaxInput::on_gross(dec!(35000000));
    let with = without.clone().with_allowance(dec!(10000000));

    let a = calculate(&without, policy);
    let b = calculate(&with, policy);

    assert_eq!(a.taxable_income, b.taxable_income);
    assert_eq!(a.tax_amount, b.tax_amount);
    assert_eq!(b.net_salary - a.net_salary, dec!(10000000));
}

#[test]
fn repeated_calculation_is_identical() {
    let set = policies();

    for input in input_grid() {
        for policy in &set {
            assert_eq!(calculate(&input, policy), calculate(&input, policy));
        }
    }
}

#[test]
fn calculation_is_shareable_across_threads() {
    let set = policies();
    let input = TaxInput::on_gross(dec!(42000000)).with_dependents(1);
    let expected = calculate(&input, policy(&set, "jul_2026"));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| calculate(&input, policy(&set, "jul_2026"))))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

// =============================================================================
// Out-of-range input
// =============================================================================

#[test]
fn largest_gross_and_allowance_saturate_instead_of_panicking() {
    let set = policies();
    let input = TaxInput::on_gross(Decimal::MAX).with_allowance(Decimal::MAX);

    for policy in &set {
        let result = calculate(&input, policy);

        assert_eq!(result.social_health_base, policy.social_health_cap());
        assert_eq!(result.marginal_rate, Some(dec!(0.35)));
        assert!(result.taxable_income > Decimal::ZERO);
        assert!(result.net_salary > Decimal::ZERO);
        assert_eq!(calculate(&input, policy), result);
    }
}

#[test]
fn negative_fixed_base_against_huge_gross_saturates() {
    let set = policies();
    let current = policy(&set, "current");
    let input = TaxInput::on_gross(Decimal::MAX).with_fixed_insurance(-Decimal::MAX);

    let result = calculate(&input, current);

    assert_eq!(result.insurance_salary_base, -Decimal::MAX);
    assert!(result.total_insurance < Decimal::ZERO);
    assert_eq!(result.assessable_income, Decimal::MAX);
    assert_eq!(calculate(&input, current), result);
}

#[test]
fn most_negative_input_stays_total() {
    let set = policies();
    let input = TaxInput::on_gross(-Decimal::MAX)
        .with_allowance(-Decimal::MAX)
        .with_dependents(u32::MAX);

    let comparison = compare(&input, &set);

    for result in comparison.results() {
        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.tax_amount, Decimal::ZERO);
        assert!(result.net_salary < Decimal::ZERO);
    }
    assert_eq!(comparison.net_difference("jul_2026"), Some(Decimal::ZERO));
}
