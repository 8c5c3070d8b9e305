use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use bondcalc_core::amortization::extra_payments::{self, AdditionalPaymentScenario};
use bondcalc_core::amortization::schedule;
use bondcalc_core::rates::{rate_or_prime, FixedPrimeRate};
use bondcalc_core::types::{LoanInput, PaymentFrequency};

use crate::input;

#[derive(Debug, Clone, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Biweekly,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::Biweekly => PaymentFrequency::Biweekly,
        }
    }
}

/// Shared loan flags for the bond and amortisation commands.
#[derive(Args)]
pub struct LoanFlags {
    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Annual interest rate as a percentage (defaults to the published
    /// prime rate when omitted)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Cash deposit subtracted from the price
    #[arg(long, default_value = "0")]
    pub deposit: Decimal,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,
}

impl LoanFlags {
    fn into_loan(self) -> Result<LoanInput, Box<dyn std::error::Error>> {
        Ok(LoanInput {
            principal: self.price.ok_or("--price is required (or provide --input)")?,
            annual_rate_percent: rate_or_prime(self.rate, &FixedPrimeRate::published())?,
            term_years: self
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            deposit_amount: self.deposit,
            frequency: self.frequency.into(),
            label: None,
        })
    }
}

#[derive(Args)]
pub struct BondArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct AmortisationArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct AdditionalArgs {
    #[command(flatten)]
    pub loan: LoanFlags,

    /// Recurring extra amount per period
    #[arg(long, default_value = "0")]
    pub extra_monthly: Decimal,

    /// First period the recurring extra applies (1-based)
    #[arg(long)]
    pub extra_start: Option<u32>,

    /// Last period the recurring extra applies (1-based)
    #[arg(long)]
    pub extra_end: Option<u32>,

    /// One-time lump sum
    #[arg(long, default_value = "0")]
    pub lump_sum: Decimal,

    /// Period the lump sum is paid in (1-based)
    #[arg(long)]
    pub lump_sum_period: Option<u32>,

    /// Escalation added to the extra amount at each step
    #[arg(long, default_value = "0")]
    pub increase_amount: Decimal,

    /// Months between escalation steps
    #[arg(long)]
    pub increase_frequency: Option<u32>,

    /// Path to a JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_bond(args: BondArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.loan.into_loan()?
    };
    let result = schedule::calculate_bond_repayment(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortisation(args: AmortisationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.loan.into_loan()?
    };
    let result = schedule::build_amortisation_table(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_additional(args: AdditionalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: AdditionalPaymentScenario = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        AdditionalPaymentScenario {
            loan: args.loan.into_loan()?,
            extra_monthly_amount: args.extra_monthly,
            extra_start_period: args.extra_start,
            extra_end_period: args.extra_end,
            lump_sum_amount: args.lump_sum,
            lump_sum_period: args.lump_sum_period,
            monthly_increase_amount: args.increase_amount,
            increase_frequency_months: args.increase_frequency,
        }
    };
    let result = extra_payments::simulate_additional_payments(&scenario)?;
    Ok(serde_json::to_value(result)?)
}
