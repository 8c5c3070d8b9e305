//! Affordability solver: inverts the annuity formula to find the largest
//! loan a given monthly installment can service.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::annuity_factor;
use crate::error::BondCalcError;
use crate::rates::validate_term;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money, PaymentFrequency, Rate};
use crate::BondCalcResult;

const PERCENT_DIVISOR: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Income and commitment picture used to derive the affordable loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityInput {
    pub net_monthly_income: Money,
    pub monthly_expenses: Money,
    pub existing_debt_payments: Money,
    /// Quoted annual nominal rate, e.g. 11.25. Zero is allowed and treated
    /// as interest-free straight-line repayment.
    pub annual_rate_percent: Rate,
    pub term_years: u32,
    /// Fraction of net income allocable to the bond installment, e.g. 0.30.
    pub max_affordability_ratio: Rate,
    /// Cash the buyer brings; added on top of the loan for purchase power.
    #[serde(default)]
    pub deposit_amount: Money,
}

/// The affordable loan and the installment that produces it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    /// Income × ratio − expenses − existing debt, clamped to zero.
    pub max_monthly_installment: Money,
    pub max_loan_amount: Money,
    /// Loan plus deposit.
    pub max_purchase_price: Money,
    pub affordability_ratio_used: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the maximum affordable loan from income and commitments.
///
/// "Cannot afford anything" is a zero-loan success, not an error.
pub fn calculate_affordability(
    input: &AffordabilityInput,
) -> BondCalcResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let mut installment = input.net_monthly_income * input.max_affordability_ratio
        - input.existing_debt_payments
        - input.monthly_expenses;
    if installment <= Decimal::ZERO {
        warnings.push("Commitments consume the full affordable installment".into());
        installment = Decimal::ZERO;
    }
    installment = round_cents(installment);

    let total_periods = input.term_years * PaymentFrequency::Monthly.periods_per_year();
    let periodic_rate =
        input.annual_rate_percent / PERCENT_DIVISOR
            / Decimal::from(PaymentFrequency::Monthly.periods_per_year());

    let max_loan_amount = if installment.is_zero() {
        Decimal::ZERO
    } else {
        round_cents(invert_payment(installment, periodic_rate, total_periods)?)
    };

    let output = AffordabilityOutput {
        max_monthly_installment: installment,
        max_loan_amount,
        max_purchase_price: max_loan_amount + input.deposit_amount,
        affordability_ratio_used: input.max_affordability_ratio,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inverse annuity from disposable installment",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Principal serviceable by a periodic installment: the annuity formula
/// solved for present value.
fn invert_payment(installment: Money, periodic_rate: Rate, total_periods: u32) -> BondCalcResult<Money> {
    if periodic_rate.is_zero() {
        return Ok(installment * Decimal::from(total_periods));
    }
    let factor = annuity_factor(periodic_rate, total_periods)?;
    Ok(installment * factor)
}

fn validate(input: &AffordabilityInput) -> BondCalcResult<()> {
    if input.net_monthly_income <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "net_monthly_income".into(),
            reason: "Net monthly income must be positive".into(),
        });
    }
    for (field, value) in [
        ("monthly_expenses", input.monthly_expenses),
        ("existing_debt_payments", input.existing_debt_payments),
        ("deposit_amount", input.deposit_amount),
    ] {
        if value < Decimal::ZERO {
            return Err(BondCalcError::InvalidInput {
                field: field.into(),
                reason: "Amount cannot be negative".into(),
            });
        }
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate cannot be negative".into(),
        });
    }
    validate_term(input.term_years)?;
    if input.max_affordability_ratio <= Decimal::ZERO || input.max_affordability_ratio > Decimal::ONE
    {
        return Err(BondCalcError::InvalidInput {
            field: "max_affordability_ratio".into(),
            reason: "Affordability ratio must be between 0 and 1".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::build_schedule;

    fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "{}: expected ~{}, got {} (diff = {})",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn standard_input() -> AffordabilityInput {
        AffordabilityInput {
            net_monthly_income: dec!(45_000),
            monthly_expenses: dec!(6_000),
            existing_debt_payments: dec!(3_500),
            annual_rate_percent: dec!(11.25),
            term_years: 20,
            max_affordability_ratio: dec!(0.30),
            deposit_amount: dec!(120_000),
        }
    }

    // -----------------------------------------------------------------------
    // 1. Disposable installment arithmetic
    // -----------------------------------------------------------------------
    #[test]
    fn test_installment_derivation() {
        let out = calculate_affordability(&standard_input()).unwrap().result;
        // 45 000 × 0.30 − 3 500 − 6 000 = 4 000
        assert_eq!(out.max_monthly_installment, dec!(4_000));
        assert!(out.max_loan_amount > Decimal::ZERO);
        assert_eq!(out.max_purchase_price, out.max_loan_amount + dec!(120_000));
    }

    // -----------------------------------------------------------------------
    // 2. Round-trip: the affordable loan's installment matches
    // -----------------------------------------------------------------------
    #[test]
    fn test_inverse_round_trip() {
        let out = calculate_affordability(&standard_input()).unwrap().result;
        let schedule = build_schedule(out.max_loan_amount, dec!(0.009375), 240).unwrap();
        assert_close(
            schedule.level_payment,
            out.max_monthly_installment,
            dec!(0.01),
            "direct and inverse annuity must agree",
        );
    }

    // -----------------------------------------------------------------------
    // 3. Cannot afford anything: zero loan, not an error
    // -----------------------------------------------------------------------
    #[test]
    fn test_unaffordable_returns_zero() {
        let mut input = standard_input();
        input.monthly_expenses = dec!(50_000);
        let result = calculate_affordability(&input).unwrap();
        assert_eq!(result.result.max_monthly_installment, Decimal::ZERO);
        assert_eq!(result.result.max_loan_amount, Decimal::ZERO);
        assert_eq!(result.result.max_purchase_price, dec!(120_000));
        assert!(!result.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 4. Zero rate: direct multiplication
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_direct_multiplication() {
        let mut input = standard_input();
        input.annual_rate_percent = Decimal::ZERO;
        let out = calculate_affordability(&input).unwrap().result;
        assert_eq!(out.max_loan_amount, dec!(4_000) * dec!(240));
    }

    // -----------------------------------------------------------------------
    // 5. Higher rate lowers the affordable loan
    // -----------------------------------------------------------------------
    #[test]
    fn test_rate_sensitivity() {
        let base = calculate_affordability(&standard_input()).unwrap().result;
        let mut input = standard_input();
        input.annual_rate_percent = dec!(13.75);
        let pricier = calculate_affordability(&input).unwrap().result;
        assert!(pricier.max_loan_amount < base.max_loan_amount);
    }

    // -----------------------------------------------------------------------
    // 6. Validation failures
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation() {
        let mut input = standard_input();
        input.net_monthly_income = Decimal::ZERO;
        assert!(calculate_affordability(&input).is_err());

        let mut input = standard_input();
        input.monthly_expenses = dec!(-1);
        assert!(calculate_affordability(&input).is_err());

        let mut input = standard_input();
        input.max_affordability_ratio = dec!(1.2);
        assert!(calculate_affordability(&input).is_err());

        let mut input = standard_input();
        input.term_years = 0;
        assert!(calculate_affordability(&input).is_err());

        let mut input = standard_input();
        input.annual_rate_percent = dec!(-2);
        assert!(calculate_affordability(&input).is_err());
    }
}
