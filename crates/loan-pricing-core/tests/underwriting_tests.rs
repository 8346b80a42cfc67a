use loan_pricing_core::pricing::quote::{self, PricingInput};
use loan_pricing_core::types::*;
use loan_pricing_core::underwriting::decision;
use loan_pricing_core::underwriting::policy::{PolicyOutcome, UnderwritingPolicy, UnderwritingRequest};
use loan_pricing_core::underwriting::standard::{StandardPolicy, StandardPolicyConfig};
use loan_pricing_core::{LendingError, LendingResult};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Mutex;

// ===========================================================================
// Test doubles
// ===========================================================================

/// Always returns the same outcome and remembers the last request it saw.
struct FixedPolicy {
    outcome: PolicyOutcome,
    seen: Mutex<Option<UnderwritingRequest>>,
}

impl FixedPolicy {
    fn new(approved: bool, conditions: Vec<&str>) -> Self {
        Self {
            outcome: PolicyOutcome {
                approved,
                risk_score: dec!(42),
                conditions: conditions.into_iter().map(String::from).collect(),
                max_affordable_principal: None,
            },
            seen: Mutex::new(None),
        }
    }
}

impl UnderwritingPolicy for FixedPolicy {
    fn name(&self) -> &str {
        "fixed"
    }

    fn evaluate(&self, request: &UnderwritingRequest) -> LendingResult<PolicyOutcome> {
        *self.seen.lock().unwrap() = Some(request.clone());
        Ok(self.outcome.clone())
    }
}

struct FailingPolicy;

impl UnderwritingPolicy for FailingPolicy {
    fn name(&self) -> &str {
        "failing"
    }

    fn evaluate(&self, _request: &UnderwritingRequest) -> LendingResult<PolicyOutcome> {
        Err(LendingError::PolicyError("decision service unavailable".into()))
    }
}

// ===========================================================================
// Fixtures
// ===========================================================================

fn application() -> PricingInput {
    PricingInput {
        product: LoanProduct {
            base_rate: dec!(6.0),
            spread: dec!(0.25),
            risk_adjustment: dec!(0.15),
            guarantee_discount: dec!(0.25),
            guarantee_term_years: 30,
            term_years: 30,
            insurance_premium_annual_rate: Some(dec!(0.55)),
        },
        borrower: BorrowerProfile {
            credit_score: 745,
            annual_income: dec!(140_000),
            monthly_debt: dec!(600),
            assets: dec!(75_000),
            liabilities: dec!(5_000),
            down_payment_percent: dec!(10),
        },
        market: MarketConditions::default(),
        request: LoanRequest {
            loan_amount: dec!(400_000),
            property_value: Some(dec!(400_000)),
        },
        include_schedule: false,
        first_payment_date: None,
    }
}

// ===========================================================================
// Policy seam
// ===========================================================================

#[test]
fn test_policy_receives_derived_request() {
    let input = application();
    let priced = quote::price_loan(&input).unwrap().result;
    let policy = FixedPolicy::new(true, vec![]);

    let out = decision::underwrite(&priced, &input.borrower, &input.request, &policy).unwrap();
    assert!(out.result.approved);
    assert_eq!(out.result.policy, "fixed");
    assert_eq!(out.result.risk_score, dec!(42));
    assert_eq!(out.result.interest_rate, priced.effective_annual_rate);
    assert_eq!(out.result.monthly_payment, priced.monthly_payment);

    let seen = policy.seen.lock().unwrap().clone().unwrap();
    assert_eq!(seen.principal, dec!(360_000));
    assert_eq!(seen.down_payment, dec!(40_000));
    assert_eq!(seen.loan_to_value, dec!(0.9));
    assert_eq!(seen.term_years, 30);
    let monthly_income = dec!(140_000) / dec!(12);
    assert_eq!(
        seen.debt_to_income,
        Some((dec!(600) + priced.monthly_payment) / monthly_income)
    );
}

#[test]
fn test_policy_conditions_are_reported() {
    let input = application();
    let policy = FixedPolicy::new(false, vec!["insufficient income documentation"]);
    let out = decision::underwrite_application(&input, &policy).unwrap();
    assert!(!out.result.approved);
    assert_eq!(
        out.result.conditions,
        vec!["insufficient income documentation".to_string()]
    );
}

#[test]
fn test_policy_error_propagates() {
    let err = decision::underwrite_application(&application(), &FailingPolicy).unwrap_err();
    assert!(matches!(err, LendingError::PolicyError(_)));
}

#[test]
fn test_invalid_application_never_reaches_policy() {
    let mut input = application();
    input.request.loan_amount = dec!(-1);
    let policy = FixedPolicy::new(true, vec![]);
    assert!(decision::underwrite_application(&input, &policy).is_err());
    assert!(policy.seen.lock().unwrap().is_none());
}

// ===========================================================================
// Standard policy
// ===========================================================================

#[test]
fn test_standard_policy_approves_strong_file() {
    let out = decision::underwrite_application(&application(), &StandardPolicy::default()).unwrap();
    assert!(out.result.approved, "conditions: {:?}", out.result.conditions);
    assert!(out.result.max_affordable_principal.unwrap() > dec!(360_000));
    // Insurance premium note carried over from pricing
    assert!(out.warnings.iter().any(|w| w.contains("insurance")));
}

#[test]
fn test_standard_policy_flags_stretched_borrower() {
    let mut input = application();
    input.borrower.annual_income = dec!(60_000);
    input.borrower.credit_score = 560;
    input.borrower.down_payment_percent = dec!(2);
    let out = decision::underwrite_application(&input, &StandardPolicy::default()).unwrap();
    let d = &out.result;
    assert!(!d.approved);
    assert!(d.conditions.iter().any(|c| c.starts_with("Credit score 560")));
    assert!(d.conditions.iter().any(|c| c.starts_with("Debt-to-income")));
    assert!(d.conditions.iter().any(|c| c.starts_with("Housing payment")));
    assert!(d.conditions.iter().any(|c| c.starts_with("Loan-to-value 98%")));
}

#[test]
fn test_no_income_needs_documentation() {
    let mut input = application();
    input.borrower.annual_income = Decimal::ZERO;
    let out = decision::underwrite_application(&input, &StandardPolicy::default()).unwrap();
    assert!(!out.result.approved);
    assert_eq!(out.result.debt_to_income, None);
    assert!(out
        .result
        .conditions
        .contains(&"Insufficient income documentation".to_string()));
    assert!(out.warnings.iter().any(|w| w.contains("No income")));
}

#[test]
fn test_custom_thresholds() {
    let strict = StandardPolicy::new(StandardPolicyConfig {
        min_credit_score: 760,
        ..StandardPolicyConfig::default()
    })
    .unwrap();
    let out = decision::underwrite_application(&application(), &strict).unwrap();
    assert!(!out.result.approved);
    assert_eq!(out.result.conditions.len(), 1);
}

#[test]
fn test_policy_config_partial_json() {
    let cfg: StandardPolicyConfig = serde_json::from_str(r#"{ "max_debt_to_income": "0.43" }"#).unwrap();
    assert_eq!(cfg.max_debt_to_income, dec!(0.43));
    assert_eq!(cfg.min_credit_score, 580);
}
