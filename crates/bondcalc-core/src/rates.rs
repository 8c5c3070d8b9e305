//! Rate and term normalisation, plus the prime-rate collaborator contract.
//!
//! Every calculator works in periodic terms: the quoted annual nominal
//! rate divided across the payment periods of one year, and the term in
//! whole periods. The prime rate itself is supplied by an external
//! collaborator; the engine only consumes the number.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BondCalcError;
use crate::types::{PaymentFrequency, Rate};
use crate::BondCalcResult;

/// Longest supported loan term. Bond terms above 35 years do not exist in
/// practice; 100 keeps the guard far clear of real inputs.
pub const MAX_TERM_YEARS: u32 = 100;

const PERCENT_DIVISOR: Decimal = dec!(100);

/// Convert a quoted annual rate and term in years into a periodic rate
/// and a total period count.
pub fn normalize(
    annual_rate_percent: Rate,
    term_years: u32,
    frequency: PaymentFrequency,
) -> BondCalcResult<(Rate, u32)> {
    if annual_rate_percent <= Decimal::ZERO {
        return Err(BondCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Annual rate must be positive".into(),
        });
    }
    validate_term(term_years)?;

    let per_year = frequency.periods_per_year();
    let periodic_rate = annual_rate_percent / PERCENT_DIVISOR / Decimal::from(per_year);
    let total_periods = term_years * per_year;

    Ok((periodic_rate, total_periods))
}

pub(crate) fn validate_term(term_years: u32) -> BondCalcResult<()> {
    if term_years == 0 {
        return Err(BondCalcError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least one year".into(),
        });
    }
    if term_years > MAX_TERM_YEARS {
        return Err(BondCalcError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term cannot exceed {MAX_TERM_YEARS} years"),
        });
    }
    Ok(())
}

/// The prime lending rate as published at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrimeRate {
    /// Quoted annual percentage, e.g. 11.25.
    pub rate: Rate,
    pub effective_date: NaiveDate,
}

/// External collaborator supplying the current prime rate.
///
/// Caching and refresh policy belong to the implementor; the engine
/// treats the rate as just another decimal input and never mutates it.
pub trait PrimeRateProvider {
    fn current_rate(&self) -> BondCalcResult<PrimeRate>;
}

/// A fixed, injected prime rate. Used as the default rate source when the
/// user has not overridden the interest rate.
#[derive(Debug, Clone)]
pub struct FixedPrimeRate {
    prime: PrimeRate,
}

impl FixedPrimeRate {
    pub fn new(rate: Rate, effective_date: NaiveDate) -> Self {
        FixedPrimeRate {
            prime: PrimeRate {
                rate,
                effective_date,
            },
        }
    }

    /// The SARB prime rate as last published against this crate version.
    pub fn published() -> Self {
        FixedPrimeRate::new(
            dec!(10.50),
            NaiveDate::from_ymd_opt(2025, 8, 1).expect("static date"),
        )
    }
}

impl PrimeRateProvider for FixedPrimeRate {
    fn current_rate(&self) -> BondCalcResult<PrimeRate> {
        Ok(self.prime.clone())
    }
}

/// The explicit rate when the user supplied one, otherwise the
/// collaborator's current prime rate.
pub fn rate_or_prime(
    explicit: Option<Rate>,
    provider: &dyn PrimeRateProvider,
) -> BondCalcResult<Rate> {
    match explicit {
        Some(rate) => Ok(rate),
        None => Ok(provider.current_rate()?.rate),
    }
}
