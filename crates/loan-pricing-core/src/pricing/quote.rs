//! End-to-end loan quote: principal, effective rate, payment and product risk.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::rate::{resolve_rate_breakdown, RateBreakdown};
use crate::amortization::payment::amortize;
use crate::amortization::schedule::{build_schedule, scheduled_interest, ScheduleRow};
use crate::risk::scoring::{evaluate_risk, RiskTier};
use crate::types::*;
use crate::validation::validate_pricing_input;
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    pub product: LoanProduct,
    pub borrower: BorrowerProfile,
    #[serde(default)]
    pub market: MarketConditions,
    pub request: LoanRequest,
    /// Attach the period-by-period schedule to the result.
    #[serde(default)]
    pub include_schedule: bool,
    /// Date of the first instalment; only used to stamp schedule rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_payment_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub principal: Money,
    pub term_years: u32,
    pub num_payments: u32,
    pub effective_annual_rate: Percent,
    pub rate_breakdown: RateBreakdown,
    pub monthly_payment: Money,
    pub base_payment: Money,
    pub insurance_monthly: Money,
    /// Includes insurance when the product carries a premium.
    pub total_interest: Money,
    pub total_payment: Money,
    pub total_insurance: Money,
    pub risk_score: Score,
    pub risk_tier: RiskTier,
    /// Interest accrued across the attached schedule, insurance excluded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_interest: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate and price a loan, wrapped in the standard output envelope.
pub fn price_loan(input: &PricingInput) -> LendingResult<ComputationOutput<PricingResult>> {
    let start = Instant::now();

    validate_pricing_input(&input.product, &input.borrower, &input.market, &input.request)?;

    let result = price(input)?;
    let warnings = collect_warnings(&result);

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "principal_basis": "loan_amount less down payment",
        "down_payment_percent": input.borrower.down_payment_percent.to_string(),
        "volatility_index": input.market.volatility_index.to_string(),
        "compounding": "monthly",
        "insurance_basis": "original principal",
    });

    Ok(with_metadata(
        "Stacked-rate pricing with level-payment amortization",
        &assumptions,
        warnings,
        elapsed,
        result,
    ))
}

/// Price without validation or envelope. Deterministic in its input.
pub fn price(input: &PricingInput) -> LendingResult<PricingResult> {
    let principal = input.request.financed_principal(&input.borrower);
    let breakdown = resolve_rate_breakdown(&input.product, &input.borrower, &input.market);
    let insurance_rate = input
        .product
        .insurance_premium_annual_rate
        .unwrap_or(Decimal::ZERO);

    let (amort, interest, schedule) = if input.include_schedule {
        let s = build_schedule(
            principal,
            breakdown.effective_annual_rate,
            input.product.term_years,
            insurance_rate,
            input.first_payment_date,
        )?;
        let interest = scheduled_interest(&s);
        (s.summary, Some(interest), Some(s.rows))
    } else {
        let a = amortize(
            principal,
            breakdown.effective_annual_rate,
            input.product.term_years,
            insurance_rate,
        )?;
        (a, None, None)
    };

    let risk = evaluate_risk(&input.product);

    Ok(PricingResult {
        principal,
        term_years: input.product.term_years,
        num_payments: amort.num_payments,
        effective_annual_rate: breakdown.effective_annual_rate,
        rate_breakdown: breakdown,
        monthly_payment: amort.monthly_payment,
        base_payment: amort.base_payment,
        insurance_monthly: amort.insurance_monthly,
        total_interest: amort.total_interest,
        total_payment: amort.total_payment,
        total_insurance: amort.total_insurance,
        risk_score: risk.risk_score,
        risk_tier: risk.risk_tier,
        scheduled_interest: interest,
        schedule,
    })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn collect_warnings(result: &PricingResult) -> Vec<String> {
    let mut warnings = Vec::new();
    if result.rate_breakdown.stacked_rate <= Decimal::ZERO {
        warnings.push(format!(
            "Guarantee discount outweighs the product add-ons: stacked rate is {}%",
            result.rate_breakdown.stacked_rate
        ));
    }
    if result.effective_annual_rate <= Decimal::ZERO {
        warnings.push(format!(
            "Effective annual rate is non-positive ({}%)",
            result.effective_annual_rate
        ));
    }
    if !result.total_insurance.is_zero() {
        warnings.push(format!(
            "total_interest includes {} of insurance premiums",
            result.total_insurance.round_dp(2)
        ));
    }
    warnings
}
