mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::AffordabilityArgs;
use commands::bond::{AdditionalArgs, AmortisationArgs, BondArgs};
use commands::compare::CompareArgs;
use commands::deposit::DepositArgs;
use commands::transfer::TransferArgs;

/// Home-loan repayment and cost calculations
#[derive(Parser)]
#[command(
    name = "bondcalc",
    version,
    about = "Home-loan repayment and cost calculations",
    long_about = "A CLI for home-loan calculations with decimal precision. \
                  Supports bond repayments, full amortisation tables, extra-payment \
                  simulations, affordability, deposit savings plans, transfer costs, \
                  and side-by-side loan comparisons."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly bond repayment and lifetime totals
    Bond(BondArgs),
    /// Build the full period-by-period amortisation table
    Amortisation(AmortisationArgs),
    /// Simulate extra recurring and lump-sum payments
    Additional(AdditionalArgs),
    /// Derive the maximum affordable loan from income and commitments
    Affordability(AffordabilityArgs),
    /// Project months of saving needed to reach a deposit target
    Deposit(DepositArgs),
    /// Calculate transfer duty, registration, and attorney costs
    Transfer(TransferArgs),
    /// Compare a base loan against rate/term variants
    Compare(CompareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Bond(args) => commands::bond::run_bond(args),
        Commands::Amortisation(args) => commands::bond::run_amortisation(args),
        Commands::Additional(args) => commands::bond::run_additional(args),
        Commands::Affordability(args) => commands::affordability::run_affordability(args),
        Commands::Deposit(args) => commands::deposit::run_deposit(args),
        Commands::Transfer(args) => commands::transfer::run_transfer(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("bondcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
