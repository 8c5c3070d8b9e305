use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.009375 = 0.9375% per period) unless a
/// field name says `_percent`, in which case the value is the quoted
/// percentage (11.25 = 11.25% per annum).
pub type Rate = Decimal;

/// How often installments are paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Biweekly,
}

impl PaymentFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Biweekly => 26,
        }
    }
}

/// The common loan description shared by every calculator.
///
/// `principal` is the purchase price; the financed amount is
/// `principal - deposit_amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Quoted annual nominal rate, e.g. 11.25 for 11.25%.
    pub annual_rate_percent: Rate,
    pub term_years: u32,
    #[serde(default)]
    pub deposit_amount: Money,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    /// Optional display name, used by the comparison calculator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl LoanInput {
    /// Amount actually borrowed once the deposit is subtracted.
    pub fn financed_amount(&self) -> Money {
        self.principal - self.deposit_amount
    }
}

/// A render-ready label/value pair, decoupling the engine from
/// presentation formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayLine {
    pub label: String,
    pub value: String,
}

impl DisplayLine {
    pub fn new(label: &str, value: String) -> Self {
        DisplayLine {
            label: label.to_string(),
            value,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Round a monetary amount to the cent, half away from zero.
pub fn round_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format a Rand amount for display: "R1 234 567.89".
pub fn fmt_money(amount: Money) -> String {
    let rounded = round_cents(amount);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();
    let (whole, cents) = match text.split_once('.') {
        Some((w, c)) => (w.to_string(), format!("{c:0<2}")),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = whole.chars().collect();
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(*d);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R{grouped}.{cents}")
}

/// Format a quoted percentage for display: "11.25%".
pub fn fmt_percent(rate_percent: Rate) -> String {
    format!("{}%", rate_percent.normalize())
}
