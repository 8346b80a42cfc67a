//! Side-by-side pricing of several products for one borrower.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LendingError;
use crate::pricing::quote::{price, PricingInput};
use crate::risk::scoring::RiskTier;
use crate::types::*;
use crate::validation::{validate_borrower, validate_market, validate_product, validate_request};
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedProduct {
    pub name: String,
    #[serde(flatten)]
    pub product: LoanProduct,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub products: Vec<NamedProduct>,
    pub borrower: BorrowerProfile,
    #[serde(default)]
    pub market: MarketConditions,
    pub request: LoanRequest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuote {
    pub name: String,
    pub term_years: u32,
    pub effective_annual_rate: Percent,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub risk_score: Score,
    pub risk_tier: RiskTier,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    /// In input order.
    pub results: Vec<ProductQuote>,
    pub lowest_payment: String,
    pub lowest_total_cost: String,
    pub lowest_risk: String,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Price every product for the same borrower, market and request.
///
/// Ties go to the product listed first.
pub fn compare_products(input: &ComparisonInput) -> LendingResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.products.is_empty() {
        return Err(LendingError::InvalidInput {
            field: "products".into(),
            reason: "At least one product is required for comparison".into(),
        });
    }
    validate_borrower(&input.borrower)?;
    validate_request(&input.request, &input.borrower)?;
    validate_market(&input.market)?;

    let mut results = Vec::with_capacity(input.products.len());
    for named in &input.products {
        validate_product(&named.product)?;
        let priced = price(&PricingInput {
            product: named.product.clone(),
            borrower: input.borrower.clone(),
            market: input.market.clone(),
            request: input.request.clone(),
            include_schedule: false,
            first_payment_date: None,
        })?;
        if priced.rate_breakdown.stacked_rate <= Decimal::ZERO {
            warnings.push(format!("{}: stacked rate is non-positive", named.name));
        }
        results.push(ProductQuote {
            name: named.name.clone(),
            term_years: priced.term_years,
            effective_annual_rate: priced.effective_annual_rate,
            monthly_payment: priced.monthly_payment,
            total_interest: priced.total_interest,
            total_payment: priced.total_payment,
            risk_score: priced.risk_score,
            risk_tier: priced.risk_tier,
        });
    }

    let lowest_payment = pick(&results, |q| q.monthly_payment);
    let lowest_total_cost = pick(&results, |q| q.total_payment);
    let lowest_risk = pick(&results, |q| q.risk_score);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "products": input.products.len(),
        "volatility_index": input.market.volatility_index.to_string(),
    });

    Ok(with_metadata(
        "Multi-product pricing comparison",
        &assumptions,
        warnings,
        elapsed,
        ComparisonOutput {
            results,
            lowest_payment,
            lowest_total_cost,
            lowest_risk,
        },
    ))
}

fn pick(results: &[ProductQuote], key: impl Fn(&ProductQuote) -> Money) -> String {
    results
        .iter()
        .min_by(|a, b| key(a).cmp(&key(b)))
        .map(|q| q.name.clone())
        .unwrap_or_default()
}
