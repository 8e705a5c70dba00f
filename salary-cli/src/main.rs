use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use salary_cli::app::{self, DEFAULT_GROSS, SalaryForm};
use salary_cli::logging;
use salary_cli::render::OutputFormat;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Vietnamese gross-to-net salary calculator.
///
/// Computes insurance contributions, personal income tax and net pay under
/// each policy regime and prints them side by side. Without a subcommand it
/// runs `compare`.
#[derive(Debug, Parser)]
#[command(name = "net-salary", version, args_conflicts_with_subcommands = true)]
struct Cli {
    /// TOML policy file replacing the built-in regimes.
    #[arg(long, global = true)]
    policies: Option<PathBuf>,

    /// CSV of named bracket tables the policy file can refer to.
    #[arg(long, global = true)]
    brackets: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `salary_core=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    compare: CompareArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare one salary across the policies.
    Compare(CompareArgs),

    /// Compare every row of an input CSV.
    Batch(BatchArgs),

    /// List the loaded policies.
    Policies,
}

#[derive(Debug, Args)]
struct SelectionArgs {
    /// Only show this policy; repeat to pick several, in order.
    #[arg(long = "policy", value_name = "ID")]
    policy: Vec<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct CompareArgs {
    /// Gross monthly salary. Separators are ignored.
    #[arg(long, default_value = DEFAULT_GROSS)]
    gross: String,

    /// Non-taxable allowance added to net pay.
    #[arg(long, default_value = "0")]
    allowance: String,

    /// Contribute on this amount instead of the gross salary.
    #[arg(long)]
    insurance_salary: Option<String>,

    #[arg(long, default_value = "0")]
    dependents: String,

    /// Minimum-wage region: I, II, III or IV.
    #[arg(long, default_value = "I")]
    region: String,

    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// CSV with a `gross_salary` column and optional input columns.
    #[arg(long)]
    input: PathBuf,

    #[command(flatten)]
    selection: SelectionArgs,
}

impl From<CompareArgs> for SalaryForm {
    fn from(args: CompareArgs) -> Self {
        Self {
            gross_salary: args.gross,
            other_allowance: args.allowance,
            insurance_salary: args.insurance_salary,
            dependents: args.dependents,
            region: args.region,
            errors: Vec::new(),
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    info!("starting net-salary");

    let loaded = app::load_policy_set(cli.policies.as_deref(), cli.brackets.as_deref())?;

    let output = match cli.command.unwrap_or(Command::Compare(cli.compare)) {
        Command::Compare(args) => {
            let policies = app::select_policies(&loaded, &args.selection.policy)?;
            let format = args.selection.format;
            app::run_compare(args.into(), &policies, format)?
        }
        Command::Batch(args) => {
            let policies = app::select_policies(&loaded, &args.selection.policy)?;
            app::run_batch(&args.input, &policies, args.selection.format)?
        }
        Command::Policies => app::run_policies(&loaded),
    };

    print!("{output}");
    Ok(())
}
