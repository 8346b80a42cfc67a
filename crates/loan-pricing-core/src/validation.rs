//! Fail-fast checks run in front of the engine by the top-level operations.
//!
//! The bare calculators accept anything arithmetic accepts; these checks reject
//! inputs that would otherwise produce meaningless prices.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::LendingError;
use crate::types::{BorrowerProfile, LoanProduct, LoanRequest, MarketConditions};
use crate::LendingResult;

pub const MIN_CREDIT_SCORE: u32 = 300;
pub const MAX_CREDIT_SCORE: u32 = 850;

pub fn validate_product(product: &LoanProduct) -> LendingResult<()> {
    if product.term_years == 0 {
        return Err(LendingError::InvalidTerm(
            "Loan term must be at least one year".into(),
        ));
    }
    if let Some(rate) = product.insurance_premium_annual_rate {
        if rate < Decimal::ZERO {
            return Err(LendingError::InvalidInput {
                field: "insurance_premium_annual_rate".into(),
                reason: "Insurance premium cannot be negative".into(),
            });
        }
    }
    Ok(())
}

pub fn validate_borrower(borrower: &BorrowerProfile) -> LendingResult<()> {
    if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&borrower.credit_score) {
        return Err(LendingError::InvalidCreditScore(borrower.credit_score));
    }
    if borrower.down_payment_percent < Decimal::ZERO || borrower.down_payment_percent > dec!(100)
    {
        return Err(LendingError::InvalidInput {
            field: "down_payment_percent".into(),
            reason: "Down payment must be between 0 and 100 percent".into(),
        });
    }
    for (field, value) in [
        ("annual_income", borrower.annual_income),
        ("monthly_debt", borrower.monthly_debt),
        ("assets", borrower.assets),
        ("liabilities", borrower.liabilities),
    ] {
        if value < Decimal::ZERO {
            return Err(LendingError::InvalidInput {
                field: field.into(),
                reason: "Amount cannot be negative".into(),
            });
        }
    }
    Ok(())
}

pub fn validate_market(market: &MarketConditions) -> LendingResult<()> {
    if market.volatility_index < Decimal::ZERO || market.volatility_index > dec!(100) {
        return Err(LendingError::InvalidInput {
            field: "volatility_index".into(),
            reason: "Volatility index must be between 0 and 100".into(),
        });
    }
    Ok(())
}

pub fn validate_request(request: &LoanRequest, borrower: &BorrowerProfile) -> LendingResult<()> {
    if request.loan_amount <= Decimal::ZERO {
        return Err(LendingError::InvalidPrincipal(format!(
            "loan amount must be positive, got {}",
            request.loan_amount
        )));
    }
    if request.financed_principal(borrower) <= Decimal::ZERO {
        return Err(LendingError::InvalidPrincipal(
            "down payment leaves nothing to finance".into(),
        ));
    }
    if let Some(value) = request.property_value {
        if value <= Decimal::ZERO {
            return Err(LendingError::InvalidInput {
                field: "property_value".into(),
                reason: "Property value must be positive".into(),
            });
        }
    }
    Ok(())
}

/// Every check a pricing call needs, in the order errors are reported.
pub fn validate_pricing_input(
    product: &LoanProduct,
    borrower: &BorrowerProfile,
    market: &MarketConditions,
    request: &LoanRequest,
) -> LendingResult<()> {
    validate_borrower(borrower)?;
    validate_request(request, borrower)?;
    validate_product(product)?;
    validate_market(market)
}
