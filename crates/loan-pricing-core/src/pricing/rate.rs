//! Effective annual rate resolution.
//!
//! Stacks the product's rate components, then tilts the result for market
//! volatility and the borrower's credit score. No bounds are enforced here:
//! out-of-range scores and negative rates pass straight through the
//! arithmetic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{BorrowerProfile, LoanProduct, MarketConditions, Percent, NEUTRAL_VOLATILITY};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Percentage points per index point away from neutral volatility.
const MARKET_SENSITIVITY: Decimal = dec!(0.002);

const SUBPRIME_LOADING: Percent = dec!(0.25);
const NEAR_PRIME_LOADING: Percent = dec!(0.10);
const SUPER_PRIME_DISCOUNT: Percent = dec!(-0.10);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBreakdown {
    /// base + spread + risk adjustment - guarantee discount
    pub stacked_rate: Percent,
    pub market_adjustment: Percent,
    pub credit_adjustment: Percent,
    pub effective_annual_rate: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Effective annual percentage rate for a borrower on a product.
pub fn resolve_rate(
    product: &LoanProduct,
    borrower: &BorrowerProfile,
    market: &MarketConditions,
) -> Percent {
    resolve_rate_breakdown(product, borrower, market).effective_annual_rate
}

/// Same as [`resolve_rate`] but keeps every component of the build-up.
pub fn resolve_rate_breakdown(
    product: &LoanProduct,
    borrower: &BorrowerProfile,
    market: &MarketConditions,
) -> RateBreakdown {
    let stacked_rate = stacked_rate(product);
    let market_adjustment = market_adjustment(market.volatility_index);
    let credit_adjustment = credit_adjustment(borrower.credit_score);
    let effective_annual_rate = stacked_rate + market_adjustment + credit_adjustment;

    log::debug!(
        "resolved rate {effective_annual_rate}% (stacked {stacked_rate}, market {market_adjustment}, credit {credit_adjustment})"
    );

    RateBreakdown {
        stacked_rate,
        market_adjustment,
        credit_adjustment,
        effective_annual_rate,
    }
}

/// Product rate before applicant and market adjustments. The guarantee
/// discount is not floored: it may drive the stacked rate to zero or below.
pub fn stacked_rate(product: &LoanProduct) -> Percent {
    product.base_rate + product.spread + product.risk_adjustment - product.guarantee_discount
}

/// Linear tilt around neutral volatility: -0.1pp at 0, +0.1pp at 100.
pub fn market_adjustment(volatility_index: Decimal) -> Percent {
    (volatility_index - NEUTRAL_VOLATILITY) * MARKET_SENSITIVITY
}

/// Step loading on credit score. Brackets are half-open:
/// below 700, [700, 740), [740, 780] flat, above 780 discounted.
pub fn credit_adjustment(credit_score: u32) -> Percent {
    match credit_score {
        s if s < 700 => SUBPRIME_LOADING,
        s if s < 740 => NEAR_PRIME_LOADING,
        s if s > 780 => SUPER_PRIME_DISCOUNT,
        _ => Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fha_product() -> LoanProduct {
        LoanProduct {
            base_rate: dec!(3.1),
            spread: dec!(0.25),
            risk_adjustment: dec!(0.15),
            guarantee_discount: dec!(0.25),
            guarantee_term_years: 30,
            term_years: 50,
            insurance_premium_annual_rate: None,
        }
    }

    fn borrower(credit_score: u32) -> BorrowerProfile {
        BorrowerProfile {
            credit_score,
            annual_income: Decimal::ZERO,
            monthly_debt: Decimal::ZERO,
            assets: Decimal::ZERO,
            liabilities: Decimal::ZERO,
            down_payment_percent: Decimal::ZERO,
        }
    }

    #[test]
    fn test_credit_adjustment_boundaries() {
        assert_eq!(credit_adjustment(699), dec!(0.25));
        assert_eq!(credit_adjustment(700), dec!(0.10));
        assert_eq!(credit_adjustment(739), dec!(0.10));
        assert_eq!(credit_adjustment(740), Decimal::ZERO);
        assert_eq!(credit_adjustment(780), Decimal::ZERO);
        assert_eq!(credit_adjustment(781), dec!(-0.10));
    }

    #[test]
    fn test_credit_adjustment_out_of_range_passes_through() {
        assert_eq!(credit_adjustment(0), dec!(0.25));
        assert_eq!(credit_adjustment(999), dec!(-0.10));
    }

    #[test]
    fn test_market_adjustment_linear() {
        assert_eq!(market_adjustment(dec!(50)), Decimal::ZERO);
        assert_eq!(market_adjustment(dec!(0)), dec!(-0.1));
        assert_eq!(market_adjustment(dec!(100)), dec!(0.1));
        assert_eq!(market_adjustment(dec!(75)), dec!(0.05));
    }

    #[test]
    fn test_fha_effective_rate() {
        let rate = resolve_rate(&fha_product(), &borrower(720), &MarketConditions::default());
        // 3.1 + 0.25 + 0.15 - 0.25 + 0 + 0.10 (720 sits in [700, 740))
        assert_eq!(rate, dec!(3.35));
    }

    #[test]
    fn test_breakdown_sums_to_effective() {
        let market = MarketConditions {
            volatility_index: dec!(80),
        };
        let b = resolve_rate_breakdown(&fha_product(), &borrower(800), &market);
        assert_eq!(b.stacked_rate, dec!(3.25));
        assert_eq!(b.market_adjustment, dec!(0.06));
        assert_eq!(b.credit_adjustment, dec!(-0.10));
        assert_eq!(b.effective_annual_rate, dec!(3.21));
    }

    #[test]
    fn test_guarantee_discount_not_floored() {
        let mut product = fha_product();
        product.guarantee_discount = dec!(10);
        assert_eq!(stacked_rate(&product), dec!(-6.5));
        let rate = resolve_rate(&product, &borrower(760), &MarketConditions::default());
        assert!(rate < Decimal::ZERO);
    }
}
