//! The tagged calculation result: one variant per calculator, carrying
//! the raw input alongside the computed output so a stored result can be
//! reproduced and re-rendered later.

use serde::{Deserialize, Serialize};

use crate::amortization::extra_payments::{AdditionalPaymentOutput, AdditionalPaymentScenario};
use crate::amortization::schedule::{AmortisationOutput, BondRepaymentOutput};
use crate::comparison::{ComparisonInput, ComparisonOutput};
use crate::solvers::affordability::{AffordabilityInput, AffordabilityOutput};
use crate::solvers::deposit_savings::{DepositSavingsInput, DepositSavingsOutput, SavingsOutcome};
use crate::transfer_costs::{TransferCostsInput, TransferCostsOutput};
use crate::types::{fmt_money, fmt_percent, DisplayLine, LoanInput};

/// A completed calculation of any kind. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CalculationResult {
    Bond {
        input: LoanInput,
        output: BondRepaymentOutput,
    },
    Amortisation {
        input: LoanInput,
        output: AmortisationOutput,
    },
    Additional {
        input: AdditionalPaymentScenario,
        output: AdditionalPaymentOutput,
    },
    Affordability {
        input: AffordabilityInput,
        output: AffordabilityOutput,
    },
    Deposit {
        input: DepositSavingsInput,
        output: DepositSavingsOutput,
    },
    Transfer {
        input: TransferCostsInput,
        output: TransferCostsOutput,
    },
    Comparison {
        input: ComparisonInput,
        output: ComparisonOutput,
    },
}

impl CalculationResult {
    /// Storage discriminator, matching the serde tag.
    pub fn kind(&self) -> &'static str {
        match self {
            CalculationResult::Bond { .. } => "bond",
            CalculationResult::Amortisation { .. } => "amortisation",
            CalculationResult::Additional { .. } => "additional",
            CalculationResult::Affordability { .. } => "affordability",
            CalculationResult::Deposit { .. } => "deposit",
            CalculationResult::Transfer { .. } => "transfer",
            CalculationResult::Comparison { .. } => "comparison",
        }
    }

    /// Render-ready label/value pairs for the headline figures.
    pub fn display_lines(&self) -> Vec<DisplayLine> {
        match self {
            CalculationResult::Bond { output, .. } => vec![
                DisplayLine::new("Loan amount", fmt_money(output.loan_amount)),
                DisplayLine::new("Monthly repayment", fmt_money(output.periodic_payment)),
                DisplayLine::new("Total interest", fmt_money(output.total_interest)),
                DisplayLine::new("Total repaid", fmt_money(output.total_repaid)),
            ],
            CalculationResult::Amortisation { output, .. } => vec![
                DisplayLine::new("Loan amount", fmt_money(output.loan_amount)),
                DisplayLine::new("Monthly repayment", fmt_money(output.periodic_payment)),
                DisplayLine::new("Total interest", fmt_money(output.total_interest)),
                DisplayLine::new("Periods", output.schedule.len().to_string()),
            ],
            CalculationResult::Additional { output, .. } => vec![
                DisplayLine::new("Interest saved", fmt_money(output.interest_saved)),
                DisplayLine::new(
                    "Term reduced by",
                    format!("{} months", output.term_reduced_periods),
                ),
                DisplayLine::new(
                    "Repaid after",
                    format!("{} months", output.actual_term_periods),
                ),
                DisplayLine::new("Extra paid", fmt_money(output.total_extra_paid)),
            ],
            CalculationResult::Affordability { output, .. } => vec![
                DisplayLine::new(
                    "Affordable installment",
                    fmt_money(output.max_monthly_installment),
                ),
                DisplayLine::new("Maximum loan", fmt_money(output.max_loan_amount)),
                DisplayLine::new("Maximum purchase price", fmt_money(output.max_purchase_price)),
            ],
            CalculationResult::Deposit { output, .. } => {
                let mut lines = vec![DisplayLine::new(
                    "Target deposit",
                    fmt_money(output.target_deposit),
                )];
                match &output.outcome {
                    SavingsOutcome::Reached { months } => {
                        lines.push(DisplayLine::new("Months to target", months.to_string()));
                        lines.push(DisplayLine::new(
                            "Projected balance",
                            fmt_money(output.projected_balance),
                        ));
                    }
                    SavingsOutcome::Unreachable => {
                        lines.push(DisplayLine::new(
                            "Outcome",
                            "Target cannot be reached without monthly saving".to_string(),
                        ));
                    }
                    SavingsOutcome::ExceedsHorizon { balance_at_horizon } => {
                        lines.push(DisplayLine::new(
                            "Outcome",
                            "Target not reached within 100 years".to_string(),
                        ));
                        lines.push(DisplayLine::new(
                            "Balance at horizon",
                            fmt_money(*balance_at_horizon),
                        ));
                    }
                }
                lines
            }
            CalculationResult::Transfer { output, .. } => vec![
                DisplayLine::new("Transfer duty", fmt_money(output.transfer_duty)),
                DisplayLine::new(
                    "Bond registration",
                    fmt_money(output.bond_registration_fee),
                ),
                DisplayLine::new(
                    "Transfer attorney",
                    fmt_money(output.transfer_attorney_fee),
                ),
                DisplayLine::new("Bond attorney", fmt_money(output.bond_attorney_fee)),
                DisplayLine::new("Total costs", fmt_money(output.total)),
            ],
            CalculationResult::Comparison { output, .. } => {
                let mut lines = vec![DisplayLine::new(
                    &format!("{} ({})", output.base.label, fmt_percent(output.base.annual_rate_percent)),
                    fmt_money(output.base.periodic_payment),
                )];
                for entry in &output.scenarios {
                    lines.push(DisplayLine::new(
                        &format!("{} ({})", entry.label, fmt_percent(entry.annual_rate_percent)),
                        fmt_money(entry.periodic_payment),
                    ));
                }
                lines
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::schedule::calculate_bond_repayment;
    use crate::solvers::deposit_savings::calculate_deposit_savings;
    use crate::types::PaymentFrequency;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn bond_result() -> CalculationResult {
        let input = LoanInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(11.25),
            term_years: 20,
            deposit_amount: Decimal::ZERO,
            frequency: PaymentFrequency::Monthly,
            label: None,
        };
        let output = calculate_bond_repayment(&input).unwrap().result;
        CalculationResult::Bond { input, output }
    }

    // -----------------------------------------------------------------------
    // 1. Kind matches the serde tag
    // -----------------------------------------------------------------------
    #[test]
    fn test_kind_matches_serde_tag() {
        let result = bond_result();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], result.kind());
    }

    // -----------------------------------------------------------------------
    // 2. Serde round-trip preserves the variant
    // -----------------------------------------------------------------------
    #[test]
    fn test_serde_round_trip() {
        let result = bond_result();
        let json = serde_json::to_string(&result).unwrap();
        let back: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), "bond");
    }

    // -----------------------------------------------------------------------
    // 3. Display lines are render-ready
    // -----------------------------------------------------------------------
    #[test]
    fn test_display_lines() {
        let lines = bond_result().display_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].label, "Loan amount");
        assert!(lines[0].value.starts_with('R'));
    }

    // -----------------------------------------------------------------------
    // 4. Deposit outcomes render distinctly
    // -----------------------------------------------------------------------
    #[test]
    fn test_deposit_unreachable_rendering() {
        let input = DepositSavingsInput {
            target_deposit: dec!(100_000),
            current_savings: dec!(10_000),
            monthly_savings_amount: Decimal::ZERO,
            annual_return_percent: dec!(5),
        };
        let output = calculate_deposit_savings(&input).unwrap().result;
        let result = CalculationResult::Deposit { input, output };
        let lines = result.display_lines();
        assert!(lines.iter().any(|l| l.value.contains("cannot be reached")));
    }
}
