//! Deposit savings solver: months of compounded saving needed to reach a
//! target deposit, with a bounded horizon instead of an open-ended loop.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BondCalcError;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, Rate};
use crate::BondCalcResult;

/// Iteration cap: 100 years of monthly saving.
pub const HORIZON_MONTHS: u32 = 1200;

const PERCENT_DIVISOR: Decimal = dec!(100);
const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Savings plan towards a deposit target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositSavingsInput {
    pub target_deposit: Money,
    #[serde(default)]
    pub current_savings: Money,
    #[serde(default)]
    pub monthly_savings_amount: Money,
    /// Expected annual return on savings, quoted as a percentage.
    #[serde(default)]
    pub annual_return_percent: Rate,
}

/// How the savings plan resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SavingsOutcome {
    /// Target reached after the given number of whole months (0 when the
    /// current savings already cover it).
    Reached { months: u32 },
    /// Nothing is being saved and the balance is below target.
    Unreachable,
    /// Saving continues past the 100-year horizon.
    ExceedsHorizon { balance_at_horizon: Money },
}

/// Projection alongside the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositSavingsOutput {
    pub outcome: SavingsOutcome,
    pub target_deposit: Money,
    /// Contributions made over the projected months.
    pub total_contributed: Money,
    /// Compounded growth earned over the projected months.
    pub growth_earned: Money,
    /// Balance when the projection stopped.
    pub projected_balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project month-by-month compounded saving until the target is reached,
/// the horizon runs out, or the plan is trivially unreachable.
pub fn calculate_deposit_savings(
    input: &DepositSavingsInput,
) -> BondCalcResult<ComputationOutput<DepositSavingsOutput>> {
    let start = Instant::now();

    validate(input)?;

    let monthly_rate = input.annual_return_percent / PERCENT_DIVISOR / MONTHS_PER_YEAR;
    let output = project(input, monthly_rate);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly compounding with end-of-month contributions",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

fn project(input: &DepositSavingsInput, monthly_rate: Rate) -> DepositSavingsOutput {
    if input.current_savings >= input.target_deposit {
        return DepositSavingsOutput {
            outcome: SavingsOutcome::Reached { months: 0 },
            target_deposit: input.target_deposit,
            total_contributed: Decimal::ZERO,
            growth_earned: Decimal::ZERO,
            projected_balance: input.current_savings,
        };
    }

    if input.monthly_savings_amount.is_zero() {
        return DepositSavingsOutput {
            outcome: SavingsOutcome::Unreachable,
            target_deposit: input.target_deposit,
            total_contributed: Decimal::ZERO,
            growth_earned: Decimal::ZERO,
            projected_balance: input.current_savings,
        };
    }

    let mut balance = round_cents(input.current_savings);
    let mut total_contributed = Decimal::ZERO;
    let mut growth_earned = Decimal::ZERO;

    for month in 1..=HORIZON_MONTHS {
        let growth = round_cents(balance * monthly_rate);
        balance += growth + input.monthly_savings_amount;
        growth_earned += growth;
        total_contributed += input.monthly_savings_amount;

        if balance >= input.target_deposit {
            return DepositSavingsOutput {
                outcome: SavingsOutcome::Reached { months: month },
                target_deposit: input.target_deposit,
                total_contributed,
                growth_earned,
                projected_balance: balance,
            };
        }
    }

    DepositSavingsOutput {
        outcome: SavingsOutcome::ExceedsHorizon {
            balance_at_horizon: balance,
        },
        target_deposit: input.target_deposit,
        total_contributed,
        growth_earned,
        projected_balance: balance,
    }
}

fn validate(input: &DepositSavingsInput) -> BondCalcResult<()> {
    if input.target_deposit <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "target_deposit".into(),
            reason: "Target deposit must be positive".into(),
        });
    }
    for (field, value) in [
        ("current_savings", input.current_savings),
        ("monthly_savings_amount", input.monthly_savings_amount),
    ] {
        if value < Decimal::ZERO {
            return Err(BondCalcError::InvalidInput {
                field: field.into(),
                reason: "Amount cannot be negative".into(),
            });
        }
    }
    if input.annual_return_percent < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "annual_return_percent".into(),
            reason: "Annual return cannot be negative".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
