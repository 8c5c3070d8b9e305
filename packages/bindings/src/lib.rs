use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Repayments
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_bond_repayment(input_json: String) -> NapiResult<String> {
    let input: bondcalc_core::types::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondcalc_core::amortization::schedule::calculate_bond_repayment(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_amortisation_table(input_json: String) -> NapiResult<String> {
    let input: bondcalc_core::types::LoanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondcalc_core::amortization::schedule::build_amortisation_table(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_additional_payments(input_json: String) -> NapiResult<String> {
    let input: bondcalc_core::amortization::extra_payments::AdditionalPaymentScenario =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondcalc_core::amortization::extra_payments::simulate_additional_payments(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Solvers
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_affordability(input_json: String) -> NapiResult<String> {
    let input: bondcalc_core::solvers::affordability::AffordabilityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondcalc_core::solvers::affordability::calculate_affordability(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_deposit_savings(input_json: String) -> NapiResult<String> {
    let input: bondcalc_core::solvers::deposit_savings::DepositSavingsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondcalc_core::solvers::deposit_savings::calculate_deposit_savings(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Costs and comparisons
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_transfer_costs(input_json: String) -> NapiResult<String> {
    let input: bondcalc_core::transfer_costs::TransferCostsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondcalc_core::transfer_costs::calculate_transfer_costs(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_loans(input_json: String) -> NapiResult<String> {
    let input: bondcalc_core::comparison::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = bondcalc_core::comparison::compare_loans(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
