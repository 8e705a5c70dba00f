//! Glue between the command line and the calculator: form parsing, policy
//! loading and the three commands.

use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use salary_core::{InsuranceMode, PolicySet, Region, TaxInput, compare};
use salary_data::input_loader;
use salary_data::{BuiltinPolicies, PolicyFileSource, PolicySource};
use thiserror::Error;
use tracing::{debug, warn};

use crate::render::{self, OutputFormat};
use crate::utils::{parse_amount, parse_count};

/// Gross salary shown when nothing is entered.
pub const DEFAULT_GROSS: &str = "20,000,000";

/// Field-level problems found while validating a [`SalaryForm`].
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid input: {}", .errors.join("; "))]
pub struct FormError {
    pub errors: Vec<String>,
}

/// Salary input as typed, before parsing.
///
/// Amounts go through [`parse_amount`], so separators and stray characters are
/// dropped and blank fields read as zero. Setting `insurance_salary` switches
/// contributions to the fixed-amount base.
#[derive(Debug, Clone, Default)]
pub struct SalaryForm {
    pub gross_salary: String,
    pub other_allowance: String,
    pub insurance_salary: Option<String>,
    pub dependents: String,
    pub region: String,

    // Validation errors
    pub errors: Vec<String>,
}

impl SalaryForm {
    pub fn new() -> Self {
        Self {
            gross_salary: DEFAULT_GROSS.to_string(),
            region: Region::default().as_str().to_string(),
            ..Default::default()
        }
    }

    /// Parse the form into a [`TaxInput`], collecting every field error.
    pub fn validate(&mut self) -> Result<TaxInput, FormError> {
        self.errors.clear();

        let gross_salary =
            parse_amount_field(&mut self.errors, "Gross salary", &self.gross_salary);
        let other_allowance =
            parse_amount_field(&mut self.errors, "Other allowance", &self.other_allowance);
        let insurance_salary = match &self.insurance_salary {
            Some(value) => parse_amount_field(&mut self.errors, "Insurance salary", value)
                .map(|amount| (InsuranceMode::FixedAmount, amount)),
            None => Some((InsuranceMode::OnGross, Decimal::ZERO)),
        };
        let dependents = match parse_count(&self.dependents) {
            Ok(count) => Some(count),
            Err(e) => {
                self.errors.push(format!("Dependents: {e}"));
                None
            }
        };
        let region = match Region::parse(&self.region) {
            Some(region) => Some(region),
            None => {
                self.errors.push(format!(
                    "Region '{}' is not one of I, II, III, IV",
                    self.region.trim()
                ));
                None
            }
        };

        match (gross_salary, other_allowance, insurance_salary, dependents, region) {
            (
                Some(gross_salary),
                Some(other_non_taxable_allowance),
                Some((insurance_mode, insurance_salary)),
                Some(dependents),
                Some(region),
            ) if self.errors.is_empty() => Ok(TaxInput {
                gross_salary,
                other_non_taxable_allowance,
                insurance_mode,
                insurance_salary,
                dependents,
                region,
            }),
            _ => Err(FormError {
                errors: self.errors.clone(),
            }),
        }
    }
}

fn parse_amount_field(
    errors: &mut Vec<String>,
    field: &str,
    value: &str,
) -> Option<Decimal> {
    match parse_amount(value) {
        Ok(v) => Some(v),
        Err(e) => {
            errors.push(format!("{field}: {e}"));
            None
        }
    }
}

/// Loads the policy set from a TOML file (with optional CSV bracket tables),
/// or the built-in regimes when no file is given.
pub fn load_policy_set(
    policies: Option<&Path>,
    brackets: Option<&Path>,
) -> Result<PolicySet> {
    match policies {
        Some(path) => {
            let mut source = PolicyFileSource::new(path);
            if let Some(brackets) = brackets {
                source = source.with_brackets(brackets);
            }
            load_from(&source)
        }
        None => {
            if let Some(brackets) = brackets {
                warn!(
                    path = %brackets.display(),
                    "bracket tables are only read together with a policy file; ignoring"
                );
            }
            load_from(&BuiltinPolicies)
        }
    }
}

fn load_from(source: &dyn PolicySource) -> Result<PolicySet> {
    source
        .load()
        .with_context(|| format!("failed to load {} policies", source.name()))
}

/// Narrows `set` to `ids` when any are given.
pub fn select_policies(
    set: &PolicySet,
    ids: &[String],
) -> Result<PolicySet> {
    if ids.is_empty() {
        return Ok(set.clone());
    }
    set.select(ids).context("invalid --policy selection")
}

/// Compares one typed input across the policies.
pub fn run_compare(
    mut form: SalaryForm,
    policies: &PolicySet,
    format: OutputFormat,
) -> Result<String> {
    let input = form.validate()?;
    debug!(?input, "comparing");
    let comparison = compare(&input, policies);
    match format {
        OutputFormat::Table => Ok(render::comparison_table(&comparison, policies)),
        OutputFormat::Json => render::to_json(&comparison).context("failed to serialize result"),
    }
}

/// Compares every row of an input CSV across the policies.
pub fn run_batch(
    input: &Path,
    policies: &PolicySet,
    format: OutputFormat,
) -> Result<String> {
    let inputs = input_loader::load_from_file(input)
        .with_context(|| format!("failed to load inputs from '{}'", input.display()))?;
    debug!(rows = inputs.len(), "batch loaded");
    let comparisons: Vec<_> = inputs.iter().map(|i| compare(i, policies)).collect();
    match format {
        OutputFormat::Table => Ok(render::batch_table(&comparisons, policies)),
        OutputFormat::Json => render::to_json(&comparisons).context("failed to serialize results"),
    }
}

/// Describes the loaded policies.
pub fn run_policies(policies: &PolicySet) -> String {
    render::policies_report(policies)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Collects formatted log output so tests can inspect it.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn form(gross: &str) -> SalaryForm {
        SalaryForm {
            gross_salary: gross.to_string(),
            ..SalaryForm::new()
        }
    }

    // =========================================================================
    // SalaryForm
    // =========================================================================

    #[test]
    fn new_form_starts_at_default_gross() {
        let input = SalaryForm::new().validate().unwrap();

        assert_eq!(input, TaxInput::on_gross(dec!(20000000)));
    }

    #[test]
    fn validate_reads_every_field() {
        let mut form = SalaryForm {
            gross_salary: "30.000.000".to_string(),
            other_allowance: "730,000".to_string(),
            insurance_salary: Some("10,000,000".to_string()),
            dependents: "2".to_string(),
            region: "iii".to_string(),
            errors: Vec::new(),
        };

        let input = form.validate().unwrap();

        assert_eq!(
            input,
            TaxInput::on_gross(dec!(30000000))
                .with_allowance(dec!(730000))
                .with_fixed_insurance(dec!(10000000))
                .with_dependents(2)
                .with_region(Region::III)
        );
    }

    #[test]
    fn blank_fields_read_as_zero() {
        let mut form = SalaryForm {
            region: "I".to_string(),
            ..SalaryForm::default()
        };

        let input = form.validate().unwrap();

        assert_eq!(input.gross_salary, Decimal::ZERO);
        assert_eq!(input.dependents, 0);
        assert_eq!(input.insurance_mode, InsuranceMode::OnGross);
    }

    #[test]
    fn blank_insurance_salary_still_selects_fixed_mode() {
        let mut form = SalaryForm {
            insurance_salary: Some(String::new()),
            ..form("20,000,000")
        };

        let input = form.validate().unwrap();

        assert_eq!(input.insurance_mode, InsuranceMode::FixedAmount);
        assert_eq!(input.insurance_salary, Decimal::ZERO);
    }

    #[test]
    fn validate_collects_all_errors() {
        let mut form = SalaryForm {
            dependents: "99999999999".to_string(),
            region: "V".to_string(),
            ..form(&"9".repeat(40))
        };

        let err = form.validate().unwrap_err();

        assert_eq!(err.errors.len(), 3);
        assert_eq!(form.errors, err.errors);
        assert!(err.to_string().starts_with("invalid input: Gross salary"));
    }

    // =========================================================================
    // Commands
    // =========================================================================

    #[test]
    fn load_policy_set_defaults_to_builtin() {
        let set = load_policy_set(None, None).unwrap();

        assert_eq!(set.ids(), vec!["current", "jan_2026", "jul_2026"]);
    }

    #[test]
    fn load_policy_set_reports_missing_file() {
        let err = load_policy_set(Some(Path::new("does/not/exist.toml")), None).unwrap_err();

        assert!(err.to_string().contains("failed to load"));
    }

    #[test]
    fn brackets_without_policy_file_warn_and_use_builtin() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();

        let set = tracing::subscriber::with_default(subscriber, || {
            load_policy_set(None, Some(Path::new("tables.csv")))
        })
        .unwrap();

        assert_eq!(set, PolicySet::builtin().unwrap());
        let output = logs.contents();
        assert!(output.contains("WARN"));
        assert!(output.contains("bracket tables are only read together with a policy file"));
        assert!(output.contains("tables.csv"));
    }

    #[test]
    fn select_policies_keeps_requested_order() {
        let set = PolicySet::builtin().unwrap();

        let selected =
            select_policies(&set, &["jul_2026".to_string(), "current".to_string()]).unwrap();

        assert_eq!(selected.ids(), vec!["jul_2026", "current"]);
    }

    #[test]
    fn select_policies_rejects_unknown_id() {
        let set = PolicySet::builtin().unwrap();

        assert!(select_policies(&set, &["2030".to_string()]).is_err());
    }

    #[test]
    fn run_compare_renders_table() {
        let set = PolicySet::builtin().unwrap();

        let out = run_compare(SalaryForm::new(), &set, OutputFormat::Table).unwrap();

        assert!(out.contains("17.460.000\u{a0}₫"));
        assert!(out.contains("17.780.000\u{a0}₫"));
    }

    #[test]
    fn run_compare_renders_json() {
        let set = PolicySet::builtin().unwrap();

        let out = run_compare(SalaryForm::new(), &set, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["results"].as_array().unwrap().len(), 3);
        let net: Decimal = value["results"][0]["net_salary"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(net, dec!(17460000));
    }

    #[test]
    fn run_compare_surfaces_form_errors() {
        let set = PolicySet::builtin().unwrap();
        let form = SalaryForm {
            region: "north".to_string(),
            ..SalaryForm::new()
        };

        let err = run_compare(form, &set, OutputFormat::Table).unwrap_err();

        assert!(err.to_string().contains("Region 'north'"));
    }

    #[test]
    fn run_compare_handles_largest_typed_amounts() {
        let set = PolicySet::builtin().unwrap();
        let form = SalaryForm {
            other_allowance: "79,228,162,514,264,337,593,543,950,335".to_string(),
            ..form("79,228,162,514,264,337,593,543,950,335")
        };

        let table = run_compare(form.clone(), &set, OutputFormat::Table).unwrap();
        let json = run_compare(form, &set, OutputFormat::Json).unwrap();

        assert!(table.contains("79.228.162.514.264.337.593.543.950.335"));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["results"].as_array().unwrap().len(), 3);
    }
}
