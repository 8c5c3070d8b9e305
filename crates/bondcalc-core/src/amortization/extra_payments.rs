//! Additional/lump-sum payment simulator.
//!
//! Replays the amortisation core period by period while injecting extra
//! recurring and one-time payments as pure principal reduction, tracking
//! the reduced term and the interest saved against the unaccelerated
//! baseline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{build_schedule, payment_amount, validate_loan};
use crate::error::BondCalcError;
use crate::rates::normalize;
use crate::types::{round_cents, with_metadata, ComputationOutput, LoanInput, Money};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A loan plus the extra payments to simulate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalPaymentScenario {
    pub loan: LoanInput,
    /// Recurring extra amount paid every period inside the window.
    #[serde(default)]
    pub extra_monthly_amount: Money,
    /// First period (1-based, inclusive) the recurring extra applies.
    /// Defaults to 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_start_period: Option<u32>,
    /// Last period (1-based, inclusive) the recurring extra applies.
    /// Defaults to the nominal term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_end_period: Option<u32>,
    /// One-time extra payment.
    #[serde(default)]
    pub lump_sum_amount: Money,
    /// Period (1-based) at which the lump sum lands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lump_sum_period: Option<u32>,
    /// Escalator: amount added to the recurring extra every
    /// `increase_frequency_months` periods after the window opens.
    #[serde(default)]
    pub monthly_increase_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increase_frequency_months: Option<u32>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One period of the accelerated schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceleratedPeriod {
    /// 1-based period number.
    pub period_index: u32,
    /// Scheduled installment actually paid (interest + scheduled principal).
    pub payment_amount: Money,
    /// Extra principal applied this period, after clamping.
    pub extra_payment: Money,
    pub interest_portion: Money,
    /// Total balance reduction: scheduled principal plus extra.
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// Simulation result: the accelerated schedule and its savings vs the
/// unaccelerated baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditionalPaymentOutput {
    pub nominal_term_periods: u32,
    pub actual_term_periods: u32,
    pub term_reduced_periods: u32,
    pub level_payment: Money,
    pub interest_paid: Money,
    pub baseline_interest_paid: Money,
    pub interest_saved: Money,
    pub total_extra_paid: Money,
    pub schedule: Vec<AcceleratedPeriod>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate extra recurring and lump-sum payments against a loan.
pub fn simulate_additional_payments(
    scenario: &AdditionalPaymentScenario,
) -> BondCalcResult<ComputationOutput<AdditionalPaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan(&scenario.loan)?;
    let (periodic_rate, total_periods) = normalize(
        scenario.loan.annual_rate_percent,
        scenario.loan.term_years,
        scenario.loan.frequency,
    )?;
    validate_scenario(scenario, total_periods)?;

    let loan_amount = scenario.loan.financed_amount();
    let level_payment = payment_amount(loan_amount, periodic_rate, total_periods)?;
    let baseline_interest_paid = build_schedule(loan_amount, periodic_rate, total_periods)?
        .total_interest();

    let window_start = scenario.extra_start_period.unwrap_or(1);
    let window_end = scenario.extra_end_period.unwrap_or(total_periods);
    let recurring_active =
        scenario.extra_monthly_amount > Decimal::ZERO
            || scenario.monthly_increase_amount > Decimal::ZERO;
    let increase_frequency = scenario.increase_frequency_months.unwrap_or(0);

    let mut schedule = Vec::new();
    let mut balance = round_cents(loan_amount);
    let mut interest_paid = Decimal::ZERO;
    let mut total_extra_paid = Decimal::ZERO;
    let mut extra_clamped = false;

    for period_index in 1..=total_periods {
        let interest = round_cents(balance * periodic_rate);
        let mut scheduled_principal = level_payment - interest;
        if scheduled_principal < Decimal::ZERO {
            scheduled_principal = Decimal::ZERO;
        }
        if period_index == total_periods || scheduled_principal >= balance {
            scheduled_principal = balance;
        }

        let mut extra = Decimal::ZERO;
        if recurring_active && period_index >= window_start && period_index <= window_end {
            let escalations = if increase_frequency > 0 {
                (period_index - window_start) / increase_frequency
            } else {
                0
            };
            extra += scenario.extra_monthly_amount
                + scenario.monthly_increase_amount * Decimal::from(escalations);
        }
        if scenario.lump_sum_period == Some(period_index) {
            extra += scenario.lump_sum_amount;
        }
        extra = round_cents(extra);

        // Extras only ever reduce principal; anything beyond the balance
        // remaining after the scheduled payment is dropped.
        let available = balance - scheduled_principal;
        if extra > available {
            extra = available;
            extra_clamped = true;
        }

        let principal_portion = scheduled_principal + extra;
        balance -= principal_portion;
        interest_paid += interest;
        total_extra_paid += extra;

        schedule.push(AcceleratedPeriod {
            period_index,
            payment_amount: interest + scheduled_principal,
            extra_payment: extra,
            interest_portion: interest,
            principal_portion,
            remaining_balance: balance,
        });

        if balance.is_zero() {
            break;
        }
    }

    if extra_clamped {
        warnings.push(
            "Extra payments exceeding the remaining balance were reduced in the final period"
                .into(),
        );
    }

    let actual_term_periods = schedule.len() as u32;
    let output = AdditionalPaymentOutput {
        nominal_term_periods: total_periods,
        actual_term_periods,
        term_reduced_periods: total_periods - actual_term_periods,
        level_payment,
        interest_paid,
        baseline_interest_paid,
        interest_saved: baseline_interest_paid - interest_paid,
        total_extra_paid,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Period-by-period amortisation replay with principal prepayments",
        scenario,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_scenario(
    scenario: &AdditionalPaymentScenario,
    total_periods: u32,
) -> BondCalcResult<()> {
    if scenario.extra_monthly_amount < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "extra_monthly_amount".into(),
            reason: "Extra monthly amount cannot be negative".into(),
        });
    }
    if scenario.lump_sum_amount < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "lump_sum_amount".into(),
            reason: "Lump sum cannot be negative".into(),
        });
    }
    if scenario.monthly_increase_amount < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "monthly_increase_amount".into(),
            reason: "Escalation amount cannot be negative".into(),
        });
    }
    if scenario.lump_sum_amount > Decimal::ZERO && scenario.lump_sum_period.is_none() {
        return Err(BondCalcError::InvalidInput {
            field: "lump_sum_period".into(),
            reason: "A lump sum requires the period it is paid in".into(),
        });
    }
    if let Some(period) = scenario.lump_sum_period {
        if period == 0 || period > total_periods {
            return Err(BondCalcError::InvalidInput {
                field: "lump_sum_period".into(),
                reason: format!("Lump sum period must be between 1 and {total_periods}"),
            });
        }
    }
    if let Some(start) = scenario.extra_start_period {
        if start == 0 || start > total_periods {
            return Err(BondCalcError::InvalidInput {
                field: "extra_start_period".into(),
                reason: format!("Start period must be between 1 and {total_periods}"),
            });
        }
        if let Some(end) = scenario.extra_end_period {
            if end < start {
                return Err(BondCalcError::InvalidInput {
                    field: "extra_end_period".into(),
                    reason: "End period cannot precede the start period".into(),
                });
            }
        }
    }
    if scenario.monthly_increase_amount > Decimal::ZERO
        && scenario.increase_frequency_months.unwrap_or(0) == 0
    {
        return Err(BondCalcError::InvalidInput {
            field: "increase_frequency_months".into(),
            reason: "An escalation amount requires a positive frequency".into(),
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
    use crate::types::PaymentFrequency;
    use rust_decimal_macros::dec;

    fn standard_scenario() -> AdditionalPaymentScenario {
        AdditionalPaymentScenario {
            loan: LoanInput {
                principal: dec!(1_000_000),
                annual_rate_percent: dec!(11.25),
                term_years: 20,
                deposit_amount: Decimal::ZERO,
                frequency: PaymentFrequency::Monthly,
                label: None,
            },
            extra_monthly_amount: Decimal::ZERO,
            extra_start_period: None,
            extra_end_period: None,
            lump_sum_amount: Decimal::ZERO,
            lump_sum_period: None,
            monthly_increase_amount: Decimal::ZERO,
            increase_frequency_months: None,
        }
    }

    fn run(scenario: &AdditionalPaymentScenario) -> AdditionalPaymentOutput {
        simulate_additional_payments(scenario).unwrap().result
    }

    // -----------------------------------------------------------------------
    // 1. Recurring extra shortens the term and saves interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_recurring_extra_saves() {
        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(1_000);
        let out = run(&scenario);

        assert!(out.actual_term_periods < out.nominal_term_periods);
        assert!(out.interest_saved > Decimal::ZERO);
        assert_eq!(
            out.term_reduced_periods,
            out.nominal_term_periods - out.actual_term_periods
        );
    }

    // -----------------------------------------------------------------------
    // 2. No extras: simulation matches the plain schedule exactly
    // -----------------------------------------------------------------------
    #[test]
    fn test_no_extras_matches_baseline() {
        let out = run(&standard_scenario());
        assert_eq!(out.actual_term_periods, 240);
        assert_eq!(out.term_reduced_periods, 0);
        assert_eq!(out.interest_paid, out.baseline_interest_paid);
        assert_eq!(out.interest_saved, Decimal::ZERO);
        assert_eq!(out.total_extra_paid, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 3. Lump sum alone reduces the term
    // -----------------------------------------------------------------------
    #[test]
    fn test_lump_sum_reduces_term() {
        let mut scenario = standard_scenario();
        scenario.lump_sum_amount = dec!(100_000);
        scenario.lump_sum_period = Some(12);
        let out = run(&scenario);

        assert!(out.actual_term_periods < 240);
        assert!(out.interest_saved > Decimal::ZERO);
        assert_eq!(out.schedule[11].extra_payment, dec!(100_000));
        assert_eq!(out.schedule[10].extra_payment, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 4. A lump sum covering the whole balance ends the loan that period
    // -----------------------------------------------------------------------
    #[test]
    fn test_oversized_lump_sum_terminates_immediately() {
        let mut scenario = standard_scenario();
        scenario.lump_sum_amount = dec!(2_000_000);
        scenario.lump_sum_period = Some(1);
        let result = simulate_additional_payments(&scenario).unwrap();
        let out = result.result;

        assert_eq!(out.actual_term_periods, 1);
        assert_eq!(out.schedule.len(), 1);
        assert_eq!(out.schedule[0].remaining_balance, Decimal::ZERO);
        // The excess over the balance is dropped, not credited.
        assert!(out.total_extra_paid < dec!(2_000_000));
        assert!(!result.warnings.is_empty());
    }

    // -----------------------------------------------------------------------
    // 5. Window bounds: extras stop after the end period
    // -----------------------------------------------------------------------
    #[test]
    fn test_extra_window() {
        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(2_000);
        scenario.extra_start_period = Some(7);
        scenario.extra_end_period = Some(18);
        let out = run(&scenario);

        assert_eq!(out.schedule[5].extra_payment, Decimal::ZERO);
        assert_eq!(out.schedule[6].extra_payment, dec!(2_000));
        assert_eq!(out.schedule[17].extra_payment, dec!(2_000));
        assert_eq!(out.schedule[18].extra_payment, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 6. Escalator steps the extra amount at the configured cadence
    // -----------------------------------------------------------------------
    #[test]
    fn test_escalator_cadence() {
        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(500);
        scenario.monthly_increase_amount = dec!(100);
        scenario.increase_frequency_months = Some(12);
        let out = run(&scenario);

        // Window opens at period 1: periods 1-12 pay 500, 13-24 pay 600.
        assert_eq!(out.schedule[0].extra_payment, dec!(500));
        assert_eq!(out.schedule[11].extra_payment, dec!(500));
        assert_eq!(out.schedule[12].extra_payment, dec!(600));
        assert_eq!(out.schedule[24].extra_payment, dec!(700));
    }

    // -----------------------------------------------------------------------
    // 7. Invariants on the accelerated schedule
    // -----------------------------------------------------------------------
    #[test]
    fn test_accelerated_invariants() {
        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(1_500);
        scenario.lump_sum_amount = dec!(50_000);
        scenario.lump_sum_period = Some(24);
        let out = run(&scenario);

        let mut prev = dec!(1_000_000);
        let mut principal_sum = Decimal::ZERO;
        for period in &out.schedule {
            assert!(period.remaining_balance <= prev);
            assert!(period.remaining_balance >= Decimal::ZERO);
            principal_sum += period.principal_portion;
            prev = period.remaining_balance;
        }
        assert_eq!(principal_sum, dec!(1_000_000));
        assert_eq!(out.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    }

    // -----------------------------------------------------------------------
    // 8. More extra never pays more interest
    // -----------------------------------------------------------------------
    #[test]
    fn test_monotone_in_extra_amount() {
        let mut small = standard_scenario();
        small.extra_monthly_amount = dec!(500);
        let mut large = standard_scenario();
        large.extra_monthly_amount = dec!(2_500);

        let out_small = run(&small);
        let out_large = run(&large);
        assert!(out_large.interest_paid < out_small.interest_paid);
        assert!(out_large.actual_term_periods <= out_small.actual_term_periods);
    }

    // -----------------------------------------------------------------------
    // 9. Validation failures
    // -----------------------------------------------------------------------
    #[test]
    fn test_validation() {
        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(-1);
        assert!(simulate_additional_payments(&scenario).is_err());

        let mut scenario = standard_scenario();
        scenario.lump_sum_amount = dec!(10_000);
        assert!(simulate_additional_payments(&scenario).is_err());

        let mut scenario = standard_scenario();
        scenario.lump_sum_amount = dec!(10_000);
        scenario.lump_sum_period = Some(241);
        assert!(simulate_additional_payments(&scenario).is_err());

        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(100);
        scenario.extra_start_period = Some(0);
        assert!(simulate_additional_payments(&scenario).is_err());

        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(100);
        scenario.extra_start_period = Some(24);
        scenario.extra_end_period = Some(12);
        assert!(simulate_additional_payments(&scenario).is_err());

        let mut scenario = standard_scenario();
        scenario.monthly_increase_amount = dec!(100);
        assert!(simulate_additional_payments(&scenario).is_err());
    }

    // -----------------------------------------------------------------------
    // 10. Interest saved reconciles against a directly-built baseline
    // -----------------------------------------------------------------------
    #[test]
    fn test_baseline_reconciliation() {
        let mut scenario = standard_scenario();
        scenario.extra_monthly_amount = dec!(1_000);
        let out = run(&scenario);

        let baseline = build_schedule(dec!(1_000_000), dec!(0.009375), 240).unwrap();
        assert_eq!(out.baseline_interest_paid, baseline.total_interest());
        assert_eq!(
            out.interest_saved,
            out.baseline_interest_paid - out.interest_paid
        );
    }
}
