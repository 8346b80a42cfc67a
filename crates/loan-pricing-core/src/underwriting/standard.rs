//! Threshold-based underwriting policy.
//!
//! Rules, all configurable through [`StandardPolicyConfig`]:
//! 1. **Credit floor** -- minimum credit score (580).
//! 2. **Income** -- some documented income is required.
//! 3. **Debt-to-income** -- back-end ratio at most 45%.
//! 4. **Housing ratio** -- loan payment at most 31% of monthly income.
//! 5. **Loan-to-value** -- at most 96.5%.
//! 6. **Reserves** -- net assets covering two months of payments.
//!
//! Approval requires every rule to pass. The risk score blends credit, DTI and
//! LTV components, 40/35/25, each clamped to 0-100.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::policy::{PolicyOutcome, UnderwritingPolicy, UnderwritingRequest};
use crate::amortization::payment::{periodic_rate, MONTHS_PER_YEAR};
use crate::error::LendingError;
use crate::time_value::present_value_of_payments;
use crate::types::{Money, Rate, Score};
use crate::validation::MAX_CREDIT_SCORE;
use crate::LendingResult;

const CREDIT_WEIGHT: Decimal = dec!(0.40);
const DTI_WEIGHT: Decimal = dec!(0.35);
const LTV_WEIGHT: Decimal = dec!(0.25);
const SCORE_SPAN: Decimal = dec!(550);
const HUNDRED: Decimal = dec!(100);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardPolicyConfig {
    pub min_credit_score: u32,
    pub max_debt_to_income: Rate,
    pub max_housing_ratio: Rate,
    pub max_loan_to_value: Rate,
    pub min_reserve_months: Decimal,
}

impl Default for StandardPolicyConfig {
    fn default() -> Self {
        Self {
            min_credit_score: 580,
            max_debt_to_income: dec!(0.45),
            max_housing_ratio: dec!(0.31),
            max_loan_to_value: dec!(0.965),
            min_reserve_months: dec!(2),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StandardPolicy {
    config: StandardPolicyConfig,
}

impl StandardPolicy {
    pub fn new(config: StandardPolicyConfig) -> LendingResult<Self> {
        for (field, value) in [
            ("max_debt_to_income", config.max_debt_to_income),
            ("max_housing_ratio", config.max_housing_ratio),
            ("max_loan_to_value", config.max_loan_to_value),
        ] {
            if value <= Decimal::ZERO {
                return Err(LendingError::PolicyError(format!(
                    "{field} must be positive, got {value}"
                )));
            }
        }
        if config.min_reserve_months < Decimal::ZERO {
            return Err(LendingError::PolicyError(
                "min_reserve_months cannot be negative".into(),
            ));
        }
        Ok(Self { config })
    }

    fn risk_score(&self, request: &UnderwritingRequest) -> Score {
        let credit = Decimal::from(MAX_CREDIT_SCORE) - Decimal::from(request.credit_score);
        let credit_component = clamp_score(credit / SCORE_SPAN * HUNDRED);
        let dti_component = match request.debt_to_income {
            Some(dti) => clamp_score(dti / self.config.max_debt_to_income * HUNDRED),
            None => HUNDRED,
        };
        let ltv_component = clamp_score(request.loan_to_value * HUNDRED);

        CREDIT_WEIGHT * credit_component + DTI_WEIGHT * dti_component + LTV_WEIGHT * ltv_component
    }

    /// Largest principal whose payment fits inside both ratio limits.
    fn max_affordable_principal(&self, request: &UnderwritingRequest) -> LendingResult<Option<Money>> {
        if request.annual_income <= Decimal::ZERO {
            return Ok(None);
        }
        let monthly_income = request.annual_income / Decimal::from(MONTHS_PER_YEAR);
        let by_dti = monthly_income * self.config.max_debt_to_income - request.monthly_debt;
        let by_housing = monthly_income * self.config.max_housing_ratio;
        let budget = by_dti.min(by_housing) - request.insurance_monthly;
        if budget <= Decimal::ZERO {
            return Ok(Some(Decimal::ZERO));
        }

        let periods = request.term_years * MONTHS_PER_YEAR;
        let pv = present_value_of_payments(budget, periodic_rate(request.interest_rate), periods)?;
        Ok(Some(pv.max(Decimal::ZERO)))
    }
}

impl UnderwritingPolicy for StandardPolicy {
    fn name(&self) -> &str {
        "standard"
    }

    fn evaluate(&self, request: &UnderwritingRequest) -> LendingResult<PolicyOutcome> {
        let cfg = &self.config;
        let mut conditions = Vec::new();

        if request.credit_score < cfg.min_credit_score {
            conditions.push(format!(
                "Credit score {} is below the program minimum of {}",
                request.credit_score, cfg.min_credit_score
            ));
        }

        match (request.debt_to_income, request.housing_ratio) {
            (Some(dti), Some(housing)) => {
                if dti > cfg.max_debt_to_income {
                    conditions.push(format!(
                        "Debt-to-income ratio {}% exceeds the {}% limit",
                        as_percent(dti),
                        as_percent(cfg.max_debt_to_income)
                    ));
                }
                if housing > cfg.max_housing_ratio {
                    conditions.push(format!(
                        "Housing payment ratio {}% exceeds the {}% limit",
                        as_percent(housing),
                        as_percent(cfg.max_housing_ratio)
                    ));
                }
            }
            _ => conditions.push("Insufficient income documentation".to_string()),
        }

        if request.loan_to_value > cfg.max_loan_to_value {
            conditions.push(format!(
                "Loan-to-value {}% exceeds the {}% limit",
                as_percent(request.loan_to_value),
                as_percent(cfg.max_loan_to_value)
            ));
        }

        let reserves = request.assets - request.liabilities;
        let required = request.monthly_payment * cfg.min_reserve_months;
        if reserves < required {
            conditions.push(format!(
                "Reserves of {} cover less than {} months of payments",
                reserves.round_dp(2),
                cfg.min_reserve_months
            ));
        }

        Ok(PolicyOutcome {
            approved: conditions.is_empty(),
            risk_score: self.risk_score(request),
            conditions,
            max_affordable_principal: self.max_affordable_principal(request)?,
        })
    }
}

fn clamp_score(value: Decimal) -> Score {
    value.max(Decimal::ZERO).min(HUNDRED)
}

fn as_percent(ratio: Rate) -> Decimal {
    (ratio * HUNDRED).round_dp(1).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> UnderwritingRequest {
        UnderwritingRequest {
            credit_score: 740,
            annual_income: dec!(120_000),
            monthly_debt: dec!(500),
            assets: dec!(60_000),
            liabilities: dec!(10_000),
            loan_amount: dec!(400_000),
            property_value: dec!(400_000),
            down_payment: dec!(40_000),
            principal: dec!(360_000),
            term_years: 30,
            interest_rate: dec!(6),
            monthly_payment: dec!(2_158.38),
            insurance_monthly: Decimal::ZERO,
            debt_to_income: Some(dec!(0.2658)),
            housing_ratio: Some(dec!(0.2158)),
            loan_to_value: dec!(0.9),
        }
    }

    #[test]
    fn test_clean_file_approved() {
        let outcome = StandardPolicy::default().evaluate(&request()).unwrap();
        assert!(outcome.approved);
        assert!(outcome.conditions.is_empty());
    }

    #[test]
    fn test_low_credit_condition() {
        let mut req = request();
        req.credit_score = 560;
        let outcome = StandardPolicy::default().evaluate(&req).unwrap();
        assert!(!outcome.approved);
        assert_eq!(
            outcome.conditions,
            vec!["Credit score 560 is below the program minimum of 580".to_string()]
        );
    }

    #[test]
    fn test_high_dti_condition() {
        let mut req = request();
        req.debt_to_income = Some(dec!(0.52));
        let outcome = StandardPolicy::default().evaluate(&req).unwrap();
        assert!(!outcome.approved);
        assert!(outcome.conditions[0].contains("52%"));
        assert!(outcome.conditions[0].contains("45%"));
    }

    #[test]
    fn test_missing_income() {
        let mut req = request();
        req.annual_income = Decimal::ZERO;
        req.debt_to_income = None;
        req.housing_ratio = None;
        let outcome = StandardPolicy::default().evaluate(&req).unwrap();
        assert!(outcome
            .conditions
            .contains(&"Insufficient income documentation".to_string()));
        assert_eq!(outcome.max_affordable_principal, None);
    }

    #[test]
    fn test_thin_reserves() {
        let mut req = request();
        req.assets = dec!(12_000);
        let outcome = StandardPolicy::default().evaluate(&req).unwrap();
        assert!(outcome.conditions.iter().any(|c| c.starts_with("Reserves")));
    }

    #[test]
    fn test_risk_score_composition() {
        let mut req = request();
        req.credit_score = 850;
        req.debt_to_income = Some(dec!(0.45));
        req.loan_to_value = dec!(0.8);
        let outcome = StandardPolicy::default().evaluate(&req).unwrap();
        // 0.40*0 + 0.35*100 + 0.25*80 = 55
        assert_eq!(outcome.risk_score, dec!(55));
    }

    #[test]
    fn test_max_affordable_principal() {
        let outcome = StandardPolicy::default().evaluate(&request()).unwrap();
        // budget = min(10k*0.45 - 500, 10k*0.31) = 3100 at 0.5%/month over 360
        let expected = present_value_of_payments(dec!(3100), dec!(0.005), 360).unwrap();
        let got = outcome.max_affordable_principal.unwrap();
        assert!((got - expected).abs() < dec!(0.000001));
        assert!(got > dec!(500_000));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = StandardPolicyConfig {
            max_debt_to_income: Decimal::ZERO,
            ..StandardPolicyConfig::default()
        };
        assert!(matches!(
            StandardPolicy::new(cfg),
            Err(LendingError::PolicyError(_))
        ));
    }
}
