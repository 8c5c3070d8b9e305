use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bondcalc_core::transfer_costs::{self, TransferCostsInput};

use crate::input;

#[derive(Args)]
pub struct TransferArgs {
    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Bond amount being registered
    #[arg(long, default_value = "0")]
    pub loan: Decimal,

    /// Apply the first-time buyer duty concession
    #[arg(long)]
    pub first_time_buyer: bool,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_transfer(args: TransferArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let costs_input: TransferCostsInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        TransferCostsInput {
            purchase_price: args.price.ok_or("--price is required (or provide --input)")?,
            loan_amount: args.loan,
            first_time_buyer: args.first_time_buyer,
        }
    };
    let result = transfer_costs::calculate_transfer_costs(&costs_input)?;
    Ok(serde_json::to_value(result)?)
}
