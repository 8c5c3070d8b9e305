//! Transfer and bond registration cost calculator.
//!
//! A pure lookup over published fee schedules: the SARS transfer-duty
//! brackets, the deeds-office registry fee bands, and the conveyancer
//! guideline tariff (applied to both the transfer and bond attorneys,
//! plus VAT). The schedules are versioned by effective date so a result
//! is reproducible given the same table version.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BondCalcError;
use crate::types::{round_cents, with_metadata, ComputationOutput, Money};
use crate::BondCalcResult;

// ---------------------------------------------------------------------------
// Fee schedules (effective 2025-04-01)
// ---------------------------------------------------------------------------

/// SARS transfer-duty brackets: (lower bound, duty at lower bound,
/// marginal rate on the excess).
const TRANSFER_DUTY_BRACKETS: [(Decimal, Decimal, Decimal); 6] = [
    (dec!(0), dec!(0), dec!(0)),
    (dec!(1_210_000), dec!(0), dec!(0.03)),
    (dec!(1_663_800), dec!(13_614), dec!(0.06)),
    (dec!(2_329_300), dec!(53_544), dec!(0.08)),
    (dec!(2_994_800), dec!(106_784), dec!(0.11)),
    (dec!(13_310_000), dec!(1_241_456), dec!(0.13)),
];

/// Deeds-office registry fee bands: (upper bound on the amount, fee).
/// The final band applies to everything above the second-to-last bound.
const DEEDS_OFFICE_FEE_BANDS: [(Decimal, Decimal); 11] = [
    (dec!(150_000), dec!(516)),
    (dec!(300_000), dec!(722)),
    (dec!(600_000), dec!(903)),
    (dec!(800_000), dec!(1_266)),
    (dec!(1_000_000), dec!(1_446)),
    (dec!(2_000_000), dec!(1_627)),
    (dec!(4_000_000), dec!(2_259)),
    (dec!(6_000_000), dec!(2_711)),
    (dec!(8_000_000), dec!(3_252)),
    (dec!(10_000_000), dec!(3_794)),
    (Decimal::MAX, dec!(4_337)),
];

const VAT_RATE: Decimal = dec!(0.15);

/// When the tables above took effect.
fn schedule_effective_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).expect("static date")
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCostsInput {
    pub purchase_price: Money,
    pub loan_amount: Money,
    #[serde(default)]
    pub first_time_buyer: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCostsOutput {
    pub transfer_duty: Money,
    pub bond_registration_fee: Money,
    pub transfer_attorney_fee: Money,
    pub bond_attorney_fee: Money,
    pub total: Money,
    /// Version of the fee tables the figures were produced from.
    pub schedule_effective_date: NaiveDate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Total once-off costs of transferring a property and registering the
/// bond against it.
pub fn calculate_transfer_costs(
    input: &TransferCostsInput,
) -> BondCalcResult<ComputationOutput<TransferCostsOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate(input)?;

    let transfer_duty = if input.first_time_buyer {
        warnings.push("First-time buyer concession applied: transfer duty waived".into());
        Decimal::ZERO
    } else {
        transfer_duty(input.purchase_price)
    };

    // No bond means no registration or bond attorney costs.
    let (bond_registration_fee, bond_attorney_fee) = if input.loan_amount.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            deeds_office_fee(input.loan_amount),
            attorney_fee_with_vat(input.loan_amount),
        )
    };
    let transfer_attorney_fee = attorney_fee_with_vat(input.purchase_price);

    let total = transfer_duty + bond_registration_fee + transfer_attorney_fee + bond_attorney_fee;
    let output = TransferCostsOutput {
        transfer_duty,
        bond_registration_fee,
        transfer_attorney_fee,
        bond_attorney_fee,
        total,
        schedule_effective_date: schedule_effective_date(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Published duty brackets and guideline fee tariffs",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Transfer duty on a purchase price per the bracket table.
pub fn transfer_duty(purchase_price: Money) -> Money {
    let mut duty = Decimal::ZERO;
    for (lower, base, marginal) in TRANSFER_DUTY_BRACKETS {
        if purchase_price > lower {
            duty = base + (purchase_price - lower) * marginal;
        }
    }
    round_cents(duty)
}

/// Deeds-office registry fee for the amount's band.
pub fn deeds_office_fee(amount: Money) -> Money {
    for (upper, fee) in DEEDS_OFFICE_FEE_BANDS {
        if amount <= upper {
            return fee;
        }
    }
    DEEDS_OFFICE_FEE_BANDS[DEEDS_OFFICE_FEE_BANDS.len() - 1].1
}

/// Conveyancer guideline tariff, VAT inclusive.
///
/// Tariff shape: a base fee covers the first R100 000, then stepped
/// increments per completed slice of value up to each threshold.
pub fn attorney_fee_with_vat(amount: Money) -> Money {
    let fee = guideline_tariff(amount);
    round_cents(fee * (Decimal::ONE + VAT_RATE))
}

fn guideline_tariff(amount: Money) -> Money {
    let base = dec!(5_500);
    if amount <= dec!(100_000) {
        return base;
    }

    let mut fee = base;
    // R990 per started R50 000 between R100 000 and R500 000.
    fee += step_fee(amount, dec!(100_000), dec!(500_000), dec!(50_000), dec!(990));
    // R1 980 per started R100 000 between R500 000 and R1 000 000.
    fee += step_fee(amount, dec!(500_000), dec!(1_000_000), dec!(100_000), dec!(1_980));
    // R990 per started R200 000 between R1 000 000 and R5 000 000.
    fee += step_fee(amount, dec!(1_000_000), dec!(5_000_000), dec!(200_000), dec!(990));
    // R495 per started R200 000 above R5 000 000.
    fee += step_fee(amount, dec!(5_000_000), Decimal::MAX, dec!(200_000), dec!(495));
    fee
}

/// Fee increments accrued within one tier: `rate` per started `step` of
/// the amount falling between `from` and `to`.
fn step_fee(amount: Money, from: Money, to: Money, step: Money, rate: Money) -> Money {
    if amount <= from {
        return Decimal::ZERO;
    }
    let span = amount.min(to) - from;
    let mut steps = (span / step).floor();
    if steps * step < span {
        steps += Decimal::ONE;
    }
    steps * rate
}

fn validate(input: &TransferCostsInput) -> BondCalcResult<()> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "purchase_price".into(),
            reason: "Purchase price must be positive".into(),
        });
    }
    if input.loan_amount < Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount cannot be negative".into(),
        });
    }
    if input.loan_amount > input.purchase_price {
        return Err(BondCalcError::InvalidInput {
            field: "loan_amount".into(),
            reason: "Loan amount cannot exceed the purchase price".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
