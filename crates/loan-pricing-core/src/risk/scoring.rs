//! Product risk score and tier.
//!
//! Three "badness" components on a roughly 0-100 scale, averaged without
//! weights:
//! 1. **Volatility proxy** -- the product's spread rescaled by 100.
//! 2. **Coverage gap** -- 100 minus the share of a 50-year reference term the
//!    guarantee spans.
//! 3. **Backing gap** -- 100 minus the guarantee discount rescaled by 100.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{LoanProduct, Score};

/// Guarantee coverage is measured against this nominal term.
const REFERENCE_TERM_YEARS: Decimal = dec!(50);
const SCALE: Decimal = dec!(100);

const MEDIUM_THRESHOLD: Score = dec!(30);
const HIGH_THRESHOLD: Score = dec!(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Low => "Low",
            RiskTier::Medium => "Medium",
            RiskTier::High => "High",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub dax_volatility: Score,
    pub guarantee_coverage: Score,
    pub government_backing: Score,
    pub risk_score: Score,
    pub risk_tier: RiskTier,
}

pub fn evaluate_risk(product: &LoanProduct) -> RiskProfile {
    let guarantee_coverage =
        Decimal::from(product.guarantee_term_years) / REFERENCE_TERM_YEARS * SCALE;
    let dax_volatility = product.spread * SCALE;
    let government_backing = product.guarantee_discount * SCALE;

    let risk_score =
        (dax_volatility + (SCALE - guarantee_coverage) + (SCALE - government_backing)) / dec!(3);

    RiskProfile {
        dax_volatility,
        guarantee_coverage,
        government_backing,
        risk_score,
        risk_tier: classify_tier(risk_score),
    }
}

/// Fixed thresholds: below 30 Low, [30, 60) Medium, 60 and above High.
pub fn classify_tier(risk_score: Score) -> RiskTier {
    if risk_score < MEDIUM_THRESHOLD {
        RiskTier::Low
    } else if risk_score < HIGH_THRESHOLD {
        RiskTier::Medium
    } else {
        RiskTier::High
    }
}
