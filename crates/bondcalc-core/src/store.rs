//! Persistence collaborator contract.
//!
//! The engine writes results through this trait and nothing else: it
//! never owns storage, never blocks on it to produce a return value, and
//! depends on no schema beyond the opaque record below.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::result::CalculationResult;
use crate::BondCalcResult;

/// The write contract: opaque serialized payloads keyed by user and
/// calculator kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub user_id: String,
    pub calculation_type: String,
    pub input_data: Value,
    pub result_data: Value,
}

/// External storage collaborator. Returns the stored record's id.
pub trait CalculationStore {
    fn save(&self, record: &CalculationRecord) -> BondCalcResult<String>;
}

/// Build the storage record for a completed calculation.
pub fn record_for(user_id: &str, result: &CalculationResult) -> BondCalcResult<CalculationRecord> {
    let (input_data, result_data) = match result {
        CalculationResult::Bond { input, output } => {
            (serde_json::to_value(input)?, serde_json::to_value(output)?)
        }
        CalculationResult::Amortisation { input, output } => {
            (serde_json::to_value(input)?, serde_json::to_value(output)?)
        }
        CalculationResult::Additional { input, output } => {
            (serde_json::to_value(input)?, serde_json::to_value(output)?)
        }
        CalculationResult::Affordability { input, output } => {
            (serde_json::to_value(input)?, serde_json::to_value(output)?)
        }
        CalculationResult::Deposit { input, output } => {
            (serde_json::to_value(input)?, serde_json::to_value(output)?)
        }
        CalculationResult::Transfer { input, output } => {
            (serde_json::to_value(input)?, serde_json::to_value(output)?)
        }
        CalculationResult::Comparison { input, output } => {
            (serde_json::to_value(input)?, serde_json::to_value(output)?)
        }
    };

    Ok(CalculationRecord {
        user_id: user_id.to_string(),
        calculation_type: result.kind().to_string(),
        input_data,
        result_data,
    })
}
