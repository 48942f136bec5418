mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::lending::{ExtraSweepArgs, LoanArgs, PayoffArgs};
use commands::maintenance::MaintenanceArgs;

/// Loan payoff comparison and maintenance log analysis
#[derive(Parser)]
#[command(
    name = "fieldbook",
    version,
    about = "Loan payoff comparison and maintenance log analysis",
    long_about = "Compares loan payoff scenarios with and without extra monthly \
                  payments, and ranks equipment by downtime and failure keywords \
                  from maintenance log CSV files."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "report", global = true)]
    output: OutputFormat,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a maintenance log CSV: keyword counts and downtime ranking
    Maintenance(MaintenanceArgs),
    /// Compare paying a loan off with and without an extra monthly payment
    Loan(LoanArgs),
    /// Simulate paying off a single loan
    Payoff(PayoffArgs),
    /// Tabulate months and interest saved across a range of extra payments
    ExtraSweep(ExtraSweepArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Report,
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Maintenance(args) => commands::maintenance::run_maintenance(args),
        Commands::Loan(args) => commands::lending::run_loan(args),
        Commands::Payoff(args) => commands::lending::run_payoff(args),
        Commands::ExtraSweep(args) => commands::lending::run_extra_sweep(args),
        Commands::Version => {
            println!("fieldbook {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
