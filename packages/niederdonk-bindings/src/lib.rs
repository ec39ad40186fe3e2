use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use niederdonk_core::format::Locale;
use niederdonk_core::portfolio::aggregate::PortfolioTotals;
use niederdonk_core::portfolio::catalog::BuildingCatalog;
use niederdonk_core::portfolio::leverage::LeverageAssumptions;
use niederdonk_core::portfolio::selection::Selection;
use niederdonk_core::pro_forma::engine::{ProFormaEngine, ProFormaInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Site plan (masterplan calculator)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AggregateRequest {
    #[serde(default)]
    catalog: Option<BuildingCatalog>,
    selection: Selection,
}

#[derive(Deserialize)]
struct LeverageRequest {
    totals: PortfolioTotals,
    assumptions: LeverageAssumptions,
}

#[napi]
pub fn default_catalog() -> NapiResult<String> {
    serde_json::to_string(&BuildingCatalog::niederdonk()).map_err(to_napi_error)
}

#[napi]
pub fn aggregate_portfolio(input_json: String) -> NapiResult<String> {
    let req: AggregateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let catalog = req.catalog.unwrap_or_default();
    let totals = niederdonk_core::portfolio::aggregate::aggregate_portfolio(&catalog, &req.selection);
    serde_json::to_string(&totals).map_err(to_napi_error)
}

#[napi]
pub fn compute_leverage(input_json: String) -> NapiResult<String> {
    let req: LeverageRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    req.assumptions.validate().map_err(to_napi_error)?;
    let output = niederdonk_core::portfolio::leverage::compute_leverage(&req.totals, &req.assumptions);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_masterplan(input_json: String) -> NapiResult<String> {
    let input: niederdonk_core::portfolio::masterplan::MasterplanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = niederdonk_core::portfolio::masterplan::calculate_masterplan(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Quick profitability model (mobile dock)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SummaryRequest {
    #[serde(flatten)]
    input: ProFormaInput,
    #[serde(default)]
    locale: Locale,
}

#[napi]
pub fn analyze_pro_forma(input_json: String) -> NapiResult<String> {
    let input: ProFormaInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        niederdonk_core::pro_forma::engine::analyze_pro_forma(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn pro_forma_summary(input_json: String) -> NapiResult<String> {
    let req: SummaryRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let engine = match req.input.base_case {
        Some(base) => ProFormaEngine::new(base).map_err(to_napi_error)?,
        None => ProFormaEngine::default(),
    };
    let result = engine.compute(&req.input.assumptions);
    Ok(niederdonk_core::pro_forma::summary::pro_forma_summary(
        &req.input.assumptions,
        &result,
        req.locale,
    ))
}

#[napi]
pub fn pro_forma_sensitivity(input_json: String) -> NapiResult<String> {
    let input: niederdonk_core::scenarios::sensitivity::ProFormaSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = niederdonk_core::scenarios::sensitivity::pro_forma_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FormatRequest {
    value: rust_decimal::Decimal,
    #[serde(default)]
    locale: Locale,
}

#[napi]
pub fn format_currency(input_json: String) -> NapiResult<String> {
    let req: FormatRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    Ok(niederdonk_core::format::format_currency(req.value, req.locale))
}

#[napi]
pub fn format_percent(input_json: String) -> NapiResult<String> {
    let req: FormatRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    Ok(niederdonk_core::format::format_percent(req.value, req.locale))
}

#[napi]
pub fn format_millions(input_json: String) -> NapiResult<String> {
    let req: FormatRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    Ok(niederdonk_core::format::format_millions(req.value, req.locale))
}
