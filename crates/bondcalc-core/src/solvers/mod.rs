//! Inverse and derived calculations: the maximum affordable loan and the
//! time needed to save a target deposit.

pub mod affordability;
pub mod deposit_savings;

pub use affordability::{calculate_affordability, AffordabilityInput, AffordabilityOutput};
pub use deposit_savings::{
    calculate_deposit_savings, DepositSavingsInput, DepositSavingsOutput, SavingsOutcome,
};
