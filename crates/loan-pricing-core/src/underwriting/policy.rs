//! Pluggable underwriting policy seam.
//!
//! The decision rule is not part of the pricing engine: callers supply any
//! [`UnderwritingPolicy`] and the engine feeds it a fully derived request.

use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate, Score};
use crate::LendingResult;

/// Everything a policy may look at. Ratios are decimal fractions (0.45 = 45%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnderwritingRequest {
    pub credit_score: u32,
    pub annual_income: Money,
    pub monthly_debt: Money,
    pub assets: Money,
    pub liabilities: Money,
    pub loan_amount: Money,
    pub property_value: Money,
    pub down_payment: Money,
    pub principal: Money,
    pub term_years: u32,
    pub interest_rate: Percent,
    pub monthly_payment: Money,
    pub insurance_monthly: Money,
    /// (monthly debt + loan payment) / monthly income. `None` without income.
    pub debt_to_income: Option<Rate>,
    /// Loan payment / monthly income. `None` without income.
    pub housing_ratio: Option<Rate>,
    pub loan_to_value: Rate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub approved: bool,
    pub risk_score: Score,
    /// Conditions to clear before approval. Empty when approved.
    pub conditions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_affordable_principal: Option<Money>,
}

pub trait UnderwritingPolicy: Send + Sync {
    /// Short identifier reported with every decision.
    fn name(&self) -> &str;

    fn evaluate(&self, request: &UnderwritingRequest) -> LendingResult<PolicyOutcome>;
}
