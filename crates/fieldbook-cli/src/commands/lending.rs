use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use fieldbook_core::lending::comparison::{self, LoanComparisonInput};
use fieldbook_core::lending::payoff::{self, PayoffInput, DEFAULT_MAX_MONTHS};
use fieldbook_core::lending::sweep::{self, ExtraPaymentSweepInput};
use fieldbook_core::FieldbookResult;

use crate::input;
use crate::input::prompt::Prompter;

/// Arguments for the two-scenario loan comparison
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding loan balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// APR as a percentage (e.g. 14.54)
    #[arg(long)]
    pub apr: Option<Decimal>,

    /// Base monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// First month of the loan (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Extra monthly payment for scenario B
    #[arg(long, allow_hyphen_values = true)]
    pub extra: Option<Decimal>,

    /// Stop simulating after this many months
    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    pub max_months: u32,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let comparison_input: LoanComparisonInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        collect_loan_input(&args)?
    };

    let result = comparison::compare_scenarios(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Fill in the comparison from flags, asking on the terminal for anything
/// left out. Without a terminal a missing flag is an error.
fn collect_loan_input(args: &LoanArgs) -> Result<LoanComparisonInput, Box<dyn std::error::Error>> {
    let interactive = input::stdin::is_interactive();
    let mut prompter = Prompter::stdio();

    let principal = flag_or_prompt(args.principal, "--principal", interactive, || {
        prompter.decimal("principal", "Loan balance (principal): ")
    })?;
    let apr_percent = flag_or_prompt(args.apr, "--apr", interactive, || {
        prompter.decimal("apr", "APR % (e.g., 14.54): ")
    })?;
    let payment = flag_or_prompt(args.payment, "--payment", interactive, || {
        prompter.decimal("payment", "Monthly payment: ")
    })?;
    let start_date = flag_or_prompt(args.start_date, "--start-date", interactive, || {
        prompter.date("start_date", "Start date (YYYY-MM-DD): ")
    })?;
    let extra_payment = match args.extra {
        Some(extra) => extra,
        None if interactive => {
            prompter.decimal("extra", "Scenario B extra payment (enter 0 if none): ")?
        }
        None => Decimal::ZERO,
    };

    Ok(LoanComparisonInput {
        principal,
        apr_percent,
        payment,
        start_date,
        extra_payment,
        max_months: args.max_months,
    })
}

fn flag_or_prompt<T>(
    value: Option<T>,
    flag: &str,
    interactive: bool,
    ask: impl FnOnce() -> FieldbookResult<T>,
) -> Result<T, Box<dyn std::error::Error>> {
    match value {
        Some(v) => Ok(v),
        None if interactive => Ok(ask()?),
        None => Err(format!("{flag} is required (or provide --input)").into()),
    }
}

/// Arguments for a single payoff simulation
#[derive(Args)]
pub struct PayoffArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding loan balance
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// APR as a percentage (e.g. 14.54)
    #[arg(long)]
    pub apr: Option<Decimal>,

    /// Base monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Extra monthly payment on top of the base payment
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub extra: Decimal,

    /// Stop simulating after this many months
    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    pub max_months: u32,

    /// Include the month-by-month schedule in the output
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_payoff(args: PayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payoff_input: PayoffInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PayoffInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            apr_percent: args.apr.ok_or("--apr is required (or provide --input)")?,
            payment: args
                .payment
                .ok_or("--payment is required (or provide --input)")?,
            extra_payment: args.extra,
            max_months: args.max_months,
            record_schedule: args.schedule,
        }
    };

    let result = payoff::simulate_payoff(&payoff_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the extra-payment sensitivity sweep
#[derive(Args)]
pub struct ExtraSweepArgs {
    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    /// APR as a percentage (e.g. 14.54)
    #[arg(long)]
    pub apr: Option<Decimal>,

    /// Base monthly payment
    #[arg(long)]
    pub payment: Option<Decimal>,

    /// Smallest extra payment to try
    #[arg(long, default_value = "0")]
    pub min: Decimal,

    /// Largest extra payment to try
    #[arg(long)]
    pub max: Option<Decimal>,

    /// Increment between extra payments
    #[arg(long)]
    pub step: Option<Decimal>,

    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    pub max_months: u32,
}

pub fn run_extra_sweep(args: ExtraSweepArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sweep_input: ExtraPaymentSweepInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ExtraPaymentSweepInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            apr_percent: args.apr.ok_or("--apr is required (or provide --input)")?,
            payment: args
                .payment
                .ok_or("--payment is required (or provide --input)")?,
            min_extra: args.min,
            max_extra: args.max.ok_or("--max is required (or provide --input)")?,
            step: args.step.ok_or("--step is required (or provide --input)")?,
            max_months: args.max_months,
        }
    };

    let result = sweep::sweep_extra_payments(&sweep_input)?;
    Ok(serde_json::to_value(result)?)
}
