use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bondcalc_core::solvers::deposit_savings::{self, DepositSavingsInput};

use crate::input;

#[derive(Args)]
pub struct DepositArgs {
    /// Deposit amount being saved towards
    #[arg(long)]
    pub target: Option<Decimal>,

    /// Savings already in hand
    #[arg(long, default_value = "0")]
    pub current: Decimal,

    /// Amount saved each month
    #[arg(long, default_value = "0")]
    pub monthly: Decimal,

    /// Expected annual return on savings as a percentage
    #[arg(long, default_value = "0", alias = "return")]
    pub annual_return: Decimal,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_deposit(args: DepositArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deposit_input: DepositSavingsInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DepositSavingsInput {
            target_deposit: args.target.ok_or("--target is required (or provide --input)")?,
            current_savings: args.current,
            monthly_savings_amount: args.monthly,
            annual_return_percent: args.annual_return,
        }
    };
    let result = deposit_savings::calculate_deposit_savings(&deposit_input)?;
    Ok(serde_json::to_value(result)?)
}
