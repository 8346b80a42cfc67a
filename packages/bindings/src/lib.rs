use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use loan_pricing_core::underwriting::standard::{StandardPolicy, StandardPolicyConfig};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn price_loan(input_json: String) -> NapiResult<String> {
    let input: loan_pricing_core::pricing::quote::PricingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = loan_pricing_core::pricing::quote::price_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn resolve_rate(input_json: String) -> NapiResult<String> {
    #[derive(Deserialize)]
    struct RateInput {
        product: loan_pricing_core::LoanProduct,
        borrower: loan_pricing_core::BorrowerProfile,
        #[serde(default)]
        market: loan_pricing_core::MarketConditions,
    }

    let input: RateInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let breakdown = loan_pricing_core::pricing::rate::resolve_rate_breakdown(
        &input.product,
        &input.borrower,
        &input.market,
    );
    serde_json::to_string(&breakdown).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    #[derive(Deserialize)]
    struct AmortizeInput {
        principal: Decimal,
        effective_annual_rate: Decimal,
        term_years: u32,
        #[serde(default)]
        insurance_premium_annual_rate: Decimal,
        #[serde(default)]
        include_schedule: bool,
        #[serde(default)]
        first_payment_date: Option<chrono::NaiveDate>,
    }

    let input: AmortizeInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    if input.include_schedule {
        let output = loan_pricing_core::amortization::schedule::build_schedule(
            input.principal,
            input.effective_annual_rate,
            input.term_years,
            input.insurance_premium_annual_rate,
            input.first_payment_date,
        )
        .map_err(to_napi_error)?;
        serde_json::to_string(&output).map_err(to_napi_error)
    } else {
        let output = loan_pricing_core::amortization::payment::amortize(
            input.principal,
            input.effective_annual_rate,
            input.term_years,
            input.insurance_premium_annual_rate,
        )
        .map_err(to_napi_error)?;
        serde_json::to_string(&output).map_err(to_napi_error)
    }
}

// ---------------------------------------------------------------------------
// Risk & underwriting
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate_risk(product_json: String) -> NapiResult<String> {
    let product: loan_pricing_core::LoanProduct =
        serde_json::from_str(&product_json).map_err(to_napi_error)?;
    let output = loan_pricing_core::risk::scoring::evaluate_risk(&product);
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `policy_json` overrides the standard thresholds; pass `None` for defaults.
#[napi]
pub fn underwrite(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: loan_pricing_core::pricing::quote::PricingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config: StandardPolicyConfig = match policy_json {
        Some(json) => serde_json::from_str(&json).map_err(to_napi_error)?,
        None => StandardPolicyConfig::default(),
    };
    let policy = StandardPolicy::new(config).map_err(to_napi_error)?;
    let output = loan_pricing_core::underwriting::decision::underwrite_application(&input, &policy)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_products(input_json: String) -> NapiResult<String> {
    let input: loan_pricing_core::comparison::ComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_pricing_core::comparison::compare_products(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn rate_sensitivity(input_json: String) -> NapiResult<String> {
    let input: loan_pricing_core::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        loan_pricing_core::sensitivity::rate_sensitivity(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
