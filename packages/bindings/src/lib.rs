use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Lending
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_payoff(input_json: String) -> NapiResult<String> {
    let input: fieldbook_core::lending::payoff::PayoffInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        fieldbook_core::lending::payoff::simulate_payoff(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_loan_scenarios(input_json: String) -> NapiResult<String> {
    let input: fieldbook_core::lending::comparison::LoanComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fieldbook_core::lending::comparison::compare_scenarios(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sweep_extra_payments(input_json: String) -> NapiResult<String> {
    let input: fieldbook_core::lending::sweep::ExtraPaymentSweepInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fieldbook_core::lending::sweep::sweep_extra_payments(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_maintenance_logs(input_json: String) -> NapiResult<String> {
    let input: fieldbook_core::maintenance::analysis::MaintenanceAnalysisInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = fieldbook_core::maintenance::analysis::analyze_logs(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Analyse raw CSV text. `keywords_json` is an optional JSON array of
/// keywords; the stock failure vocabulary is used when it is absent.
#[napi]
pub fn analyze_maintenance_csv(
    csv_text: String,
    keywords_json: Option<String>,
    top_n: Option<u32>,
) -> NapiResult<String> {
    use fieldbook_core::maintenance::analysis::{analyze_logs, MaintenanceAnalysisInput};
    use fieldbook_core::maintenance::downtime::DEFAULT_TOP_N;
    use fieldbook_core::maintenance::keywords::KeywordVocabulary;
    use fieldbook_core::maintenance::logs::load_logs;

    let entries = load_logs(csv_text.as_bytes()).map_err(to_napi_error)?;
    let keywords: KeywordVocabulary = match keywords_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => KeywordVocabulary::default(),
    };
    let input = MaintenanceAnalysisInput {
        entries,
        keywords,
        top_n: top_n.map_or(DEFAULT_TOP_N, |n| n as usize),
    };
    let output = analyze_logs(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
