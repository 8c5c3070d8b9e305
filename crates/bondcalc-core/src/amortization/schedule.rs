//! Amortisation core: level-payment schedules with exact cent accounting.
//!
//! The closed-form annuity installment and the full period-by-period
//! schedule share one rounding contract: the installment and each
//! period's interest are rounded to the cent as they occur, and the final
//! period absorbs the accumulated residual so the closing balance is
//! exactly zero and the principal portions sum exactly to the original
//! loan amount. All math in `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BondCalcError;
use crate::rates::normalize;
use crate::types::{round_cents, with_metadata, ComputationOutput, LoanInput, Money, Rate};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One repayment period in an amortisation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// 1-based period number.
    pub period_index: u32,
    /// Total paid this period (interest + principal).
    pub payment_amount: Money,
    /// Portion of the payment reducing the balance.
    pub principal_portion: Money,
    /// Interest accrued on the opening balance.
    pub interest_portion: Money,
    /// Balance after this period's payment.
    pub remaining_balance: Money,
}

/// A complete schedule for a level-payment loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// The fixed installment; the final period may differ by the rounding
    /// residual.
    pub level_payment: Money,
    pub periods: Vec<AmortizationPeriod>,
}

impl AmortizationSchedule {
    pub fn total_interest(&self) -> Money {
        self.periods.iter().map(|p| p.interest_portion).sum()
    }

    pub fn total_principal(&self) -> Money {
        self.periods.iter().map(|p| p.principal_portion).sum()
    }

    pub fn total_paid(&self) -> Money {
        self.periods.iter().map(|p| p.payment_amount).sum()
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}

/// Headline figures for the bond repayment calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BondRepaymentOutput {
    /// Purchase price less deposit.
    pub loan_amount: Money,
    pub periodic_payment: Money,
    pub total_periods: u32,
    pub total_interest: Money,
    pub total_repaid: Money,
}

/// Full-table output for the amortisation calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortisationOutput {
    pub loan_amount: Money,
    pub periodic_payment: Money,
    pub total_interest: Money,
    pub total_repaid: Money,
    pub schedule: Vec<AmortizationPeriod>,
}

// ---------------------------------------------------------------------------
// Decimal math helpers
// ---------------------------------------------------------------------------

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd
/// drift).
pub(crate) fn compound_factor(periodic_rate: Rate, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + periodic_rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

/// Present-value annuity factor: (1 - (1+r)^-n) / r, for r > 0.
pub(crate) fn annuity_factor(periodic_rate: Rate, n: u32) -> BondCalcResult<Decimal> {
    let compound = compound_factor(periodic_rate, n);
    if compound.is_zero() {
        return Err(BondCalcError::DivisionByZero {
            context: format!("compound factor over {n} periods"),
        });
    }
    Ok((Decimal::ONE - Decimal::ONE / compound) / periodic_rate)
}

// ---------------------------------------------------------------------------
// Core primitives
// ---------------------------------------------------------------------------

/// Closed-form level installment, without building the full schedule.
pub fn payment_amount(
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
) -> BondCalcResult<Money> {
    validate_core(principal, periodic_rate, total_periods)?;

    if periodic_rate.is_zero() {
        return Ok(round_cents(principal / Decimal::from(total_periods)));
    }

    let factor = annuity_factor(periodic_rate, total_periods)?;
    if factor <= Decimal::ZERO {
        return Err(BondCalcError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }
    Ok(round_cents(principal / factor))
}

/// Build the complete per-period schedule.
pub fn build_schedule(
    principal: Money,
    periodic_rate: Rate,
    total_periods: u32,
) -> BondCalcResult<AmortizationSchedule> {
    let level_payment = payment_amount(principal, periodic_rate, total_periods)?;

    let mut periods = Vec::with_capacity(total_periods as usize);
    let mut balance = round_cents(principal);

    for period_index in 1..=total_periods {
        let interest = round_cents(balance * periodic_rate);
        let mut principal_portion = level_payment - interest;
        if principal_portion < Decimal::ZERO {
            principal_portion = Decimal::ZERO;
        }
        // The final period takes whatever balance remains, absorbing the
        // sub-cent residual the earlier rounding left behind.
        if period_index == total_periods || principal_portion >= balance {
            principal_portion = balance;
        }

        balance -= principal_portion;
        periods.push(AmortizationPeriod {
            period_index,
            payment_amount: interest + principal_portion,
            principal_portion,
            interest_portion: interest,
            remaining_balance: balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    Ok(AmortizationSchedule {
        level_payment,
        periods,
    })
}

fn validate_core(principal: Money, periodic_rate: Rate, total_periods: u32) -> BondCalcResult<()> {
    if principal <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if periodic_rate < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "periodic_rate".into(),
            reason: "Periodic rate cannot be negative".into(),
        });
    }
    if total_periods == 0 {
        return Err(BondCalcError::InvalidInput {
            field: "total_periods".into(),
            reason: "Total periods must be greater than zero".into(),
        });
    }
    Ok(())
}

pub(crate) fn validate_loan(input: &LoanInput) -> BondCalcResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if input.deposit_amount < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "deposit_amount".into(),
            reason: "Deposit cannot be negative".into(),
        });
    }
    if input.deposit_amount >= input.principal {
        return Err(BondCalcError::InvalidInput {
            field: "deposit_amount".into(),
            reason: "Deposit must be less than the purchase price".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Bond repayment calculator: headline installment and lifetime totals.
pub fn calculate_bond_repayment(
    input: &LoanInput,
) -> BondCalcResult<ComputationOutput<BondRepaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan(input)?;
    let (periodic_rate, total_periods) =
        normalize(input.annual_rate_percent, input.term_years, input.frequency)?;

    if input.term_years > 30 {
        warnings.push(format!(
            "Term of {} years exceeds the 30-year maximum most lenders offer",
            input.term_years
        ));
    }

    let loan_amount = input.financed_amount();
    let schedule = build_schedule(loan_amount, periodic_rate, total_periods)?;

    let output = BondRepaymentOutput {
        loan_amount,
        periodic_payment: schedule.level_payment,
        total_periods,
        total_interest: schedule.total_interest(),
        total_repaid: schedule.total_paid(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment amortisation (annuity method)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Amortisation calculator: the full period-by-period table.
pub fn build_amortisation_table(
    input: &LoanInput,
) -> BondCalcResult<ComputationOutput<AmortisationOutput>> {
    let start = Instant::now();

    validate_loan(input)?;
    let (periodic_rate, total_periods) =
        normalize(input.annual_rate_percent, input.term_years, input.frequency)?;

    let loan_amount = input.financed_amount();
    let schedule = build_schedule(loan_amount, periodic_rate, total_periods)?;

    let output = AmortisationOutput {
        loan_amount,
        periodic_payment: schedule.level_payment,
        total_interest: schedule.total_interest(),
        total_repaid: schedule.total_paid(),
        schedule: schedule.periods,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-payment amortisation (annuity method)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentFrequency;
    use rust_decimal_macros::dec;

    const CENT: Decimal = dec!(0.01);

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

    fn standard_loan() -> LoanInput {
        LoanInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(11.25),
            term_years: 20,
            deposit_amount: Decimal::ZERO,
            frequency: PaymentFrequency::Monthly,
            label: None,
        }
    }

    // -----------------------------------------------------------------------
    // 1. Known-value regression: R1m at 11.25% over 240 months
    // -----------------------------------------------------------------------
    #[test]
    fn test_known_value_installment() {
        let payment = payment_amount(dec!(1_000_000), dec!(0.009375), 240).unwrap();
        assert_close(
            payment,
            dec!(10492.56),
            dec!(0.05),
            "R1m @ 11.25% over 20 years",
        );
    }

    // -----------------------------------------------------------------------
    // 2. Zero-rate special case: equal principal installments, no interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_zero_rate_schedule() {
        let schedule = build_schedule(dec!(120_000), Decimal::ZERO, 12).unwrap();
        assert_eq!(schedule.len(), 12);
        for period in &schedule.periods {
            assert_eq!(period.payment_amount, dec!(10_000));
            assert_eq!(period.interest_portion, Decimal::ZERO);
        }
        assert_eq!(schedule.total_interest(), Decimal::ZERO);
        assert_eq!(schedule.periods.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 3. Invariant: principal portions sum exactly to the loan amount
    // -----------------------------------------------------------------------
    #[test]
    fn test_sum_of_principal_invariant() {
        for (principal, rate, periods) in [
            (dec!(1_000_000), dec!(0.009375), 240u32),
            (dec!(750_000), dec!(0.0075), 120),
            (dec!(1_234.56), dec!(0.01), 36),
        ] {
            let schedule = build_schedule(principal, rate, periods).unwrap();
            assert_eq!(
                schedule.total_principal(),
                principal,
                "principal must be repaid exactly for {principal} over {periods}",
            );
        }
    }

    // -----------------------------------------------------------------------
    // 4. Invariant: terminal balance is exactly zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_terminal_balance_zero() {
        let schedule = build_schedule(dec!(1_000_000), dec!(0.009375), 240).unwrap();
        assert_eq!(schedule.periods.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 5. Invariant: balance is monotonically non-increasing, never negative
    // -----------------------------------------------------------------------
    #[test]
    fn test_balance_monotonic() {
        let schedule = build_schedule(dec!(1_000_000), dec!(0.009375), 240).unwrap();
        let mut prev = dec!(1_000_000);
        for period in &schedule.periods {
            assert!(
                period.remaining_balance <= prev,
                "period {}: balance {} exceeds previous {}",
                period.period_index,
                period.remaining_balance,
                prev
            );
            assert!(period.remaining_balance >= Decimal::ZERO);
            prev = period.remaining_balance;
        }
    }

    // -----------------------------------------------------------------------
    // 6. Schedule length equals the period count
    // -----------------------------------------------------------------------
    #[test]
    fn test_schedule_length() {
        let schedule = build_schedule(dec!(500_000), dec!(0.00875), 120).unwrap();
        assert_eq!(schedule.len(), 120);
    }

    // -----------------------------------------------------------------------
    // 7. Final-period residual stays within accumulated rounding drift
    // -----------------------------------------------------------------------
    #[test]
    fn test_final_period_residual_bounded() {
        let schedule = build_schedule(dec!(1_000_000), dec!(0.009375), 240).unwrap();
        let last = schedule.periods.last().unwrap();
        let residual = (last.payment_amount - schedule.level_payment).abs();
        assert!(
            residual < dec!(5),
            "final payment {} drifted too far from level payment {}",
            last.payment_amount,
            schedule.level_payment
        );
    }

    // -----------------------------------------------------------------------
    // 8. Each period's split is internally consistent
    // -----------------------------------------------------------------------
    #[test]
    fn test_period_split_consistency() {
        let schedule = build_schedule(dec!(850_000), dec!(0.009375), 240).unwrap();
        for period in &schedule.periods {
            assert_eq!(
                period.payment_amount,
                period.interest_portion + period.principal_portion,
                "period {} split mismatch",
                period.period_index
            );
        }
    }

    // -----------------------------------------------------------------------
    // 9. Validation: non-positive principal and zero periods
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_core() {
        assert!(payment_amount(Decimal::ZERO, dec!(0.01), 12).is_err());
        assert!(payment_amount(dec!(-5), dec!(0.01), 12).is_err());
        assert!(payment_amount(dec!(100), dec!(0.01), 0).is_err());
        assert!(payment_amount(dec!(100), dec!(-0.01), 12).is_err());
        assert!(build_schedule(Decimal::ZERO, dec!(0.01), 12).is_err());
    }

    // -----------------------------------------------------------------------
    // 10. Bond repayment: deposit reduces the financed amount
    // -----------------------------------------------------------------------
    #[test]
    fn test_bond_repayment_deposit() {
        let mut input = standard_loan();
        input.deposit_amount = dec!(100_000);
        let result = calculate_bond_repayment(&input).unwrap();
        assert_eq!(result.result.loan_amount, dec!(900_000));

        let full = calculate_bond_repayment(&standard_loan()).unwrap();
        assert!(result.result.periodic_payment < full.result.periodic_payment);
    }

    // -----------------------------------------------------------------------
    // 11. Bond repayment: totals reconcile with the schedule
    // -----------------------------------------------------------------------
    #[test]
    fn test_bond_repayment_totals() {
        let result = calculate_bond_repayment(&standard_loan()).unwrap().result;
        assert_eq!(
            result.total_repaid,
            result.total_interest + dec!(1_000_000),
            "repaid = interest + principal"
        );
        assert_eq!(result.total_periods, 240);
        assert!(result.total_interest > Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 12. Bond repayment: envelope fields populated
    // -----------------------------------------------------------------------
    #[test]
    fn test_bond_repayment_envelope() {
        let result = calculate_bond_repayment(&standard_loan()).unwrap();
        assert!(result.methodology.contains("amortisation"));
        assert_eq!(result.metadata.precision, "rust_decimal_128bit");
        assert!(result.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 13. Bond repayment: long terms carry a warning
    // -----------------------------------------------------------------------
    #[test]
    fn test_bond_repayment_long_term_warning() {
        let mut input = standard_loan();
        input.term_years = 35;
        let result = calculate_bond_repayment(&input).unwrap();
        assert_eq!(result.warnings.len(), 1);
    }

    // -----------------------------------------------------------------------
    // 14. Validation: deposit bounds
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation_deposit() {
        let mut input = standard_loan();
        input.deposit_amount = dec!(-1);
        assert!(calculate_bond_repayment(&input).is_err());
        input.deposit_amount = dec!(1_000_000);
        assert!(calculate_bond_repayment(&input).is_err());
    }

    // -----------------------------------------------------------------------
    // 15. Amortisation table output carries the full schedule
    // -----------------------------------------------------------------------
    #[test]
    fn test_amortisation_table() {
        let result = build_amortisation_table(&standard_loan()).unwrap().result;
        assert_eq!(result.schedule.len(), 240);
        assert_eq!(result.loan_amount, dec!(1_000_000));
        assert_close(
            result.total_repaid,
            result.periodic_payment * dec!(240),
            dec!(5),
            "total repaid tracks level payment",
        );
    }

    // -----------------------------------------------------------------------
    // 16. Tiny loans still close at exactly zero
    // -----------------------------------------------------------------------
    #[test]
    fn test_tiny_loan_closes() {
        let schedule = build_schedule(dec!(99.99), dec!(0.009375), 12).unwrap();
        assert_eq!(schedule.total_principal(), dec!(99.99));
        assert_eq!(schedule.periods.last().unwrap().remaining_balance, Decimal::ZERO);
        assert!(schedule.len() <= 12);
    }

    // -----------------------------------------------------------------------
    // 17. Interest in the first period equals opening balance times rate
    // -----------------------------------------------------------------------
    #[test]
    fn test_first_period_interest() {
        let schedule = build_schedule(dec!(1_000_000), dec!(0.009375), 240).unwrap();
        assert_eq!(schedule.periods[0].interest_portion, dec!(9375.00));
        assert!(schedule.periods[0].interest_portion > schedule.periods[1].interest_portion - CENT);
    }
}
