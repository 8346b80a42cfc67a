use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::LendingError;
use crate::types::{Money, Rate};
use crate::LendingResult;

/// Value today of one unit paid after `periods`: (1 + rate)^-periods.
///
/// Raises 1 / (1 + rate) rather than dividing by (1 + rate)^periods, so a large
/// positive rate shrinks toward zero instead of overflowing.
pub fn discount_factor(rate: Rate, periods: u32) -> LendingResult<Decimal> {
    let base = Decimal::ONE
        .checked_div(Decimal::ONE + rate)
        .ok_or_else(|| LendingError::DivisionByZero {
            context: format!("discount factor at rate {rate}"),
        })?;
    base.checked_powu(u64::from(periods)).ok_or_else(|| {
        LendingError::FinancialImpossibility(format!(
            "discount factor (1 + {rate})^-{periods} overflows"
        ))
    })
}

/// 1 - (1 + rate)^-periods, the annuity numerator shared by payment and present value
fn annuity_factor(rate: Rate, periods: u32, context: &str) -> LendingResult<Decimal> {
    let discount = discount_factor(rate, periods)?;
    let numer = Decimal::ONE - discount;
    if numer.is_zero() {
        return Err(LendingError::DivisionByZero {
            context: context.into(),
        });
    }
    Ok(numer)
}

/// Level payment that retires `principal` over `periods`:
/// P * r / (1 - (1 + r)^-n).
///
/// A zero rate degenerates to straight-line repayment.
pub fn level_payment(principal: Money, rate: Rate, periods: u32) -> LendingResult<Money> {
    if periods == 0 {
        return Err(LendingError::DivisionByZero {
            context: "level payment over zero periods".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(periods));
    }

    let denom = annuity_factor(rate, periods, "level payment annuity factor")?;

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_div(denom))
        .ok_or_else(|| {
            LendingError::FinancialImpossibility("level payment overflows".into())
        })
}

/// Present value of `periods` level payments discounted at `rate` per period
pub fn present_value_of_payments(payment: Money, rate: Rate, periods: u32) -> LendingResult<Money> {
    let overflow =
        || LendingError::FinancialImpossibility("present value of payments overflows".into());

    if rate.is_zero() || periods == 0 {
        return payment
            .checked_mul(Decimal::from(periods))
            .ok_or_else(overflow);
    }

    let numer = annuity_factor(rate, periods, "present value discount factor")?;

    payment
        .checked_mul(numer)
        .and_then(|v| v.checked_div(rate))
        .ok_or_else(overflow)
}
