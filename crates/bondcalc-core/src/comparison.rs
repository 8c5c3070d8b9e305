//! Loan comparison orchestrator: headline figures for a base loan and a
//! set of variants, with deltas against the base. Input order is
//! preserved; nothing is sorted by outcome.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{payment_amount, validate_loan};
use crate::rates::normalize;
use crate::types::{with_metadata, ComputationOutput, LoanInput, Money, Rate};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub base: LoanInput,
    pub variants: Vec<LoanInput>,
}

/// Headline figures for one loan in the comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub label: String,
    pub annual_rate_percent: Rate,
    pub term_years: u32,
    pub loan_amount: Money,
    pub periodic_payment: Money,
    pub total_interest: Money,
    pub total_cost: Money,
    /// This entry's payment minus the base payment; zero for the base.
    pub payment_delta: Money,
    /// This entry's total interest minus the base's; zero for the base.
    pub interest_delta: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub base: ComparisonEntry,
    /// One entry per variant, in input order.
    pub scenarios: Vec<ComparisonEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare a base loan against rate/term variants.
pub fn compare_loans(input: &ComparisonInput) -> BondCalcResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();

    let base = headline(&input.base, "Base", 0)?;
    let mut scenarios = Vec::with_capacity(input.variants.len());
    for (i, variant) in input.variants.iter().enumerate() {
        let mut entry = headline(variant, "Scenario", i + 1)?;
        entry.payment_delta = entry.periodic_payment - base.periodic_payment;
        entry.interest_delta = entry.total_interest - base.total_interest;
        scenarios.push(entry);
    }

    let output = ComparisonOutput { base, scenarios };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Closed-form annuity comparison",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Closed-form figures for one loan; the full schedule is never built.
fn headline(loan: &LoanInput, fallback: &str, index: usize) -> BondCalcResult<ComparisonEntry> {
    validate_loan(loan)?;
    let (periodic_rate, total_periods) =
        normalize(loan.annual_rate_percent, loan.term_years, loan.frequency)?;

    let loan_amount = loan.financed_amount();
    let payment = payment_amount(loan_amount, periodic_rate, total_periods)?;
    let total_cost = payment * Decimal::from(total_periods);

    let label = loan.label.clone().unwrap_or_else(|| {
        if index == 0 {
            fallback.to_string()
        } else {
            format!("{fallback} {index}")
        }
    });

    Ok(ComparisonEntry {
        label,
        annual_rate_percent: loan.annual_rate_percent,
        term_years: loan.term_years,
        loan_amount,
        periodic_payment: payment,
        total_interest: total_cost - loan_amount,
        total_cost,
        payment_delta: Decimal::ZERO,
        interest_delta: Decimal::ZERO,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
