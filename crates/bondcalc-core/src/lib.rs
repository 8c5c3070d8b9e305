pub mod amortization;
pub mod comparison;
pub mod error;
pub mod rates;
pub mod result;
pub mod solvers;
pub mod store;
pub mod transfer_costs;
pub mod types;

pub use error::BondCalcError;
pub use types::*;

/// Standard result type for all bondcalc operations
pub type BondCalcResult<T> = Result<T, BondCalcError>;
