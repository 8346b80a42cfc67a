use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::policy::{UnderwritingPolicy, UnderwritingRequest};
use crate::amortization::payment::MONTHS_PER_YEAR;
use crate::pricing::quote::{price_loan, PricingInput, PricingResult};
use crate::types::*;
use crate::LendingResult;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingDecision {
    pub approved: bool,
    pub policy: String,
    pub risk_score: Score,
    pub interest_rate: Percent,
    pub monthly_payment: Money,
    pub conditions: Vec<String>,
    pub debt_to_income: Option<Rate>,
    pub housing_ratio: Option<Rate>,
    pub loan_to_value: Rate,
    pub max_affordable_principal: Option<Money>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run a priced loan through an underwriting policy.
pub fn underwrite(
    pricing: &PricingResult,
    borrower: &BorrowerProfile,
    request: &LoanRequest,
    policy: &dyn UnderwritingPolicy,
) -> LendingResult<ComputationOutput<UnderwritingDecision>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let uw_request = build_request(pricing, borrower, request);
    if uw_request.debt_to_income.is_none() {
        warnings.push("No income supplied; debt ratios not computed".to_string());
    }

    let outcome = policy.evaluate(&uw_request)?;
    log::debug!(
        "policy '{}' decided approved={} risk_score={} with {} condition(s)",
        policy.name(),
        outcome.approved,
        outcome.risk_score,
        outcome.conditions.len()
    );

    let decision = UnderwritingDecision {
        approved: outcome.approved,
        policy: policy.name().to_string(),
        risk_score: outcome.risk_score,
        interest_rate: pricing.effective_annual_rate,
        monthly_payment: pricing.monthly_payment,
        conditions: outcome.conditions,
        debt_to_income: uw_request.debt_to_income,
        housing_ratio: uw_request.housing_ratio,
        loan_to_value: uw_request.loan_to_value,
        max_affordable_principal: outcome.max_affordable_principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "policy": policy.name(),
        "debt_to_income": "(monthly debt + loan payment) / monthly income",
        "loan_to_value": "financed principal / property value",
    });

    Ok(with_metadata(
        "Policy-driven underwriting decision",
        &assumptions,
        warnings,
        elapsed,
        decision,
    ))
}

/// Validate, price and underwrite a full application in one call.
pub fn underwrite_application(
    input: &PricingInput,
    policy: &dyn UnderwritingPolicy,
) -> LendingResult<ComputationOutput<UnderwritingDecision>> {
    let priced = price_loan(input)?;
    let mut output = underwrite(&priced.result, &input.borrower, &input.request, policy)?;
    let mut warnings = priced.warnings;
    warnings.append(&mut output.warnings);
    output.warnings = warnings;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn build_request(
    pricing: &PricingResult,
    borrower: &BorrowerProfile,
    request: &LoanRequest,
) -> UnderwritingRequest {
    let monthly_income = borrower.annual_income / Decimal::from(MONTHS_PER_YEAR);
    let (debt_to_income, housing_ratio) = if monthly_income > Decimal::ZERO {
        (
            Some((borrower.monthly_debt + pricing.monthly_payment) / monthly_income),
            Some(pricing.monthly_payment / monthly_income),
        )
    } else {
        (None, None)
    };

    let property_value = request.collateral_value();
    let loan_to_value = if property_value.is_zero() {
        Decimal::ONE
    } else {
        pricing.principal / property_value
    };

    UnderwritingRequest {
        credit_score: borrower.credit_score,
        annual_income: borrower.annual_income,
        monthly_debt: borrower.monthly_debt,
        assets: borrower.assets,
        liabilities: borrower.liabilities,
        loan_amount: request.loan_amount,
        property_value,
        down_payment: request.down_payment(borrower),
        principal: pricing.principal,
        term_years: pricing.term_years,
        interest_rate: pricing.effective_annual_rate,
        monthly_payment: pricing.monthly_payment,
        insurance_monthly: pricing.insurance_monthly,
        debt_to_income,
        housing_ratio,
        loan_to_value,
    }
}
