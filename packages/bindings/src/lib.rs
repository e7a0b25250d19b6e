use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_dcf(input_json: String) -> NapiResult<String> {
    let input: dcf_core::valuation::ValuationInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dcf_core::valuation::calculate_dcf(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn dcf_chart(input_json: String) -> NapiResult<String> {
    let input: dcf_core::valuation::ValuationInputs =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let result = dcf_core::valuation::compute(&input).map_err(to_napi_error)?;
    let chart = dcf_core::valuation::build_chart(&result);
    serde_json::to_string(&chart).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn dcf_sensitivity(input_json: String) -> NapiResult<String> {
    let input: dcf_core::scenarios::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dcf_core::scenarios::sensitivity::evaluate_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
