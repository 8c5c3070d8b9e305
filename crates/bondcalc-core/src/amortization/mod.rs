//! Fixed-payment amortisation: the shared primitive behind every
//! calculator, plus the extra-payment simulator built on top of it.

pub mod extra_payments;
pub mod schedule;

pub use extra_payments::{
    simulate_additional_payments, AdditionalPaymentOutput, AdditionalPaymentScenario,
};
pub use schedule::{
    build_amortisation_table, build_schedule, calculate_bond_repayment, payment_amount,
    AmortisationOutput, AmortizationPeriod, AmortizationSchedule, BondRepaymentOutput,
};
