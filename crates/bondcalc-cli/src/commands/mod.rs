pub mod affordability;
pub mod bond;
pub mod compare;
pub mod deposit;
pub mod transfer;
