use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use bondcalc_core::rates::{rate_or_prime, FixedPrimeRate};
use bondcalc_core::solvers::affordability::{self, AffordabilityInput};

use crate::input;

#[derive(Args)]
pub struct AffordabilityArgs {
    /// Net monthly income after tax
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Total monthly living expenses
    #[arg(long, default_value = "0")]
    pub expenses: Decimal,

    /// Existing monthly debt repayments
    #[arg(long, default_value = "0")]
    pub debt: Decimal,

    /// Annual interest rate as a percentage (defaults to the published
    /// prime rate when omitted)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Fraction of net income allocable to the installment (default 0.30)
    #[arg(long)]
    pub ratio: Option<Decimal>,

    /// Cash deposit added on top of the loan
    #[arg(long, default_value = "0")]
    pub deposit: Decimal,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_affordability(args: AffordabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let afford_input: AffordabilityInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AffordabilityInput {
            net_monthly_income: args.income.ok_or("--income is required (or provide --input)")?,
            monthly_expenses: args.expenses,
            existing_debt_payments: args.debt,
            annual_rate_percent: rate_or_prime(args.rate, &FixedPrimeRate::published())?,
            term_years: args
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            max_affordability_ratio: args.ratio.unwrap_or(dec!(0.30)),
            deposit_amount: args.deposit,
        }
    };
    let result = affordability::calculate_affordability(&afford_input)?;
    Ok(serde_json::to_value(result)?)
}
