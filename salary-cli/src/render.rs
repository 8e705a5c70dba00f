//! Text and JSON rendering of comparisons and policy sets.

use std::fmt::Write;

use clap::ValueEnum;
use rust_decimal::Decimal;
use salary_core::schedules::{
    HEALTH_INSURANCE_RATE, SOCIAL_INSURANCE_RATE, UNEMPLOYMENT_INSURANCE_RATE,
};
use salary_core::{InsuranceMode, PolicyComparison, PolicySet, Region, TaxPolicy, TaxResult};
use serde::Serialize;

use crate::utils::{format_amount, format_currency, format_rate, format_signed_currency};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

const COLUMN_GAP: &str = "  ";

/// One labelled line of the comparison table.
struct Row {
    label: String,
    cells: Vec<String>,
}

impl Row {
    fn amounts(
        label: impl Into<String>,
        results: &[TaxResult],
        field: impl Fn(&TaxResult) -> Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            cells: results.iter().map(|r| format_currency(field(r))).collect(),
        }
    }

    /// Amounts withheld from pay, shown with a leading minus.
    fn withheld(
        label: impl Into<String>,
        results: &[TaxResult],
        field: impl Fn(&TaxResult) -> Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            cells: results
                .iter()
                .map(|r| format!("-{}", format_currency(field(r))))
                .collect(),
        }
    }
}

fn policy_name<'a>(
    policies: &'a PolicySet,
    id: &'a str,
) -> &'a str {
    policies.get(id).map_or(id, TaxPolicy::name)
}

fn width(s: &str) -> usize {
    s.chars().count()
}

/// Lays out a header plus rows with a left-aligned label column and
/// right-aligned value columns.
fn layout(
    header: &[String],
    rows: &[Row],
) -> String {
    let label_width = rows.iter().map(|r| width(&r.label)).max().unwrap_or(0);
    let mut widths: Vec<usize> = header.iter().map(|h| width(h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(width(cell));
        }
    }

    let mut out = String::new();
    let _ = write!(out, "{:label_width$}", "");
    for (h, w) in header.iter().zip(&widths) {
        let _ = write!(out, "{COLUMN_GAP}{h:>w$}");
    }
    out.push('\n');

    let rule = label_width + widths.iter().map(|w| w + COLUMN_GAP.len()).sum::<usize>();
    out.push_str(&"-".repeat(rule));
    out.push('\n');

    for row in rows {
        let _ = write!(out, "{:label_width$}", row.label);
        for (cell, w) in row.cells.iter().zip(&widths) {
            let _ = write!(out, "{COLUMN_GAP}{cell:>w$}");
        }
        out.push('\n');
    }
    out
}

fn input_summary(comparison: &PolicyComparison) -> String {
    let input = comparison.input();
    let insurance = match input.insurance_mode {
        InsuranceMode::OnGross => "insurance on gross".to_string(),
        InsuranceMode::FixedAmount => format!(
            "insurance on {}",
            format_currency(input.insurance_salary)
        ),
    };
    format!(
        "Gross {} | {} | {} dependent(s) | {}\n",
        format_currency(input.gross_salary),
        input.region.label(),
        input.dependents,
        insurance,
    )
}

/// Renders one comparison as a table with one column per policy.
pub fn comparison_table(
    comparison: &PolicyComparison,
    policies: &PolicySet,
) -> String {
    let results = comparison.results();
    let header: Vec<String> = results
        .iter()
        .map(|r| policy_name(policies, &r.policy_id).to_string())
        .collect();

    let mut rows = vec![Row::amounts("Gross salary", results, |r| r.gross_salary)];
    if comparison.input().other_non_taxable_allowance > Decimal::ZERO {
        rows.push(Row::amounts("Other allowance (non-taxable)", results, |r| {
            r.other_non_taxable_allowance
        }));
    }
    rows.extend([
        Row::withheld(
            format!("Social insurance ({})", format_rate(SOCIAL_INSURANCE_RATE)),
            results,
            |r| r.social_insurance,
        ),
        Row::withheld(
            format!("Health insurance ({})", format_rate(HEALTH_INSURANCE_RATE)),
            results,
            |r| r.health_insurance,
        ),
        Row::withheld(
            format!(
                "Unemployment insurance ({})",
                format_rate(UNEMPLOYMENT_INSURANCE_RATE)
            ),
            results,
            |r| r.unemployment_insurance,
        ),
        Row::amounts("Assessable income", results, |r| r.assessable_income),
        Row::withheld("Personal deduction", results, |r| r.personal_deduction),
        Row::withheld("Dependent deduction", results, |r| r.dependent_deduction),
        Row::amounts("Taxable income", results, |r| r.taxable_income),
        Row::withheld("Personal income tax", results, |r| r.tax_amount),
        Row::amounts("Total insurance", results, |r| r.total_insurance),
        Row::amounts("Net salary", results, |r| r.net_salary),
        Row::amounts("Total withheld", results, TaxResult::total_withheld),
        Row {
            label: "Effective tax rate".to_string(),
            cells: results
                .iter()
                .map(|r| format_rate(r.effective_tax_rate()))
                .collect(),
        },
    ]);

    let baseline = comparison.baseline();
    rows.push(Row {
        label: format!("Net vs {}", policy_name(policies, &baseline.policy_id)),
        cells: results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if i == 0 {
                    "-".to_string()
                } else {
                    format_signed_currency(r.net_salary.saturating_sub(baseline.net_salary))
                }
            })
            .collect(),
    });

    let mut out = input_summary(comparison);
    out.push('\n');
    out.push_str(&layout(&header, &rows));
    out
}

/// Renders each comparison of a batch under a numbered heading.
pub fn batch_table(
    comparisons: &[PolicyComparison],
    policies: &PolicySet,
) -> String {
    comparisons
        .iter()
        .enumerate()
        .map(|(i, c)| format!("#{}  {}", i + 1, comparison_table(c, policies)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pretty-printed JSON for any serializable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

fn bracket_range(
    min: Decimal,
    max: Option<Decimal>,
) -> String {
    match max {
        Some(max) => format!("({}, {}]", format_amount(min), format_amount(max)),
        None => format!("> {}", format_amount(min)),
    }
}

/// Describes every policy in the set: deductions, caps, regional minimums
/// and the bracket table.
pub fn policies_report(policies: &PolicySet) -> String {
    let mut out = String::new();
    for (i, policy) in policies.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{} [{}]", policy.name(), policy.id());
        if i == 0 {
            out.push_str(" (baseline)");
        }
        out.push('\n');
        if let Some(sub_label) = policy.sub_label() {
            let _ = writeln!(out, "  {sub_label}");
        }
        let _ = writeln!(
            out,
            "  Base salary:          {}",
            format_currency(policy.base_salary())
        );
        let _ = writeln!(
            out,
            "  Personal deduction:   {}",
            format_currency(policy.personal_deduction())
        );
        let _ = writeln!(
            out,
            "  Dependent deduction:  {}",
            format_currency(policy.dependent_deduction())
        );
        let _ = writeln!(
            out,
            "  SI/HI cap:            {}",
            format_currency(policy.social_health_cap())
        );
        out.push_str("  Regional minimum / UI cap:\n");
        for region in Region::all() {
            let _ = writeln!(
                out,
                "    {:<4} {:>14} / {}",
                region.as_str(),
                format_currency(policy.regional_min_salary().get(*region)),
                format_currency(policy.unemployment_cap(*region)),
            );
        }
        out.push_str("  Tax brackets:\n");
        for bracket in policy.tax_brackets().brackets() {
            let _ = writeln!(
                out,
                "    {:<28} {:>4}  less {}",
                bracket_range(bracket.min, bracket.max),
                format_rate(bracket.rate),
                format_currency(bracket.deduction),
            );
        }
    }
    out
}
