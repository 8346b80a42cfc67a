//! Fixed-rate level-payment amortization with an optional flat insurance add-on.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LendingError;
use crate::time_value::level_payment;
use crate::types::{Money, Percent, Rate};
use crate::LendingResult;

pub const MONTHS_PER_YEAR: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub periodic_rate: Rate,
    pub num_payments: u32,
    /// Principal and interest only.
    pub base_payment: Money,
    pub insurance_monthly: Money,
    /// `base_payment + insurance_monthly`
    pub monthly_payment: Money,
    pub total_payment: Money,
    /// `total_payment - principal`; includes every insurance payment.
    pub total_interest: Money,
    pub total_insurance: Money,
}

/// Monthly periodic rate for an annual percentage.
pub fn periodic_rate(effective_annual_rate: Percent) -> Rate {
    effective_annual_rate / dec!(100) / Decimal::from(MONTHS_PER_YEAR)
}

/// Monthly insurance charge. Levied on the original principal every month; it
/// does not decline with the balance.
pub fn insurance_monthly(
    principal: Money,
    insurance_premium_annual_rate: Percent,
) -> LendingResult<Money> {
    principal
        .checked_mul(insurance_premium_annual_rate / dec!(100))
        .map(|annual| annual / Decimal::from(MONTHS_PER_YEAR))
        .ok_or_else(|| overflow("monthly insurance"))
}

fn overflow(what: &str) -> LendingError {
    LendingError::FinancialImpossibility(format!("{what} overflows"))
}

/// Level monthly payment and lifetime totals for a principal, annual rate and term.
///
/// Pass `Decimal::ZERO` for `insurance_premium_annual_rate` when the product
/// carries no insurance. A zero term has no payment count to divide by and is
/// reported as `DivisionByZero`.
pub fn amortize(
    principal: Money,
    effective_annual_rate: Percent,
    term_years: u32,
    insurance_premium_annual_rate: Percent,
) -> LendingResult<AmortizationResult> {
    let num_payments = term_years.checked_mul(MONTHS_PER_YEAR).ok_or_else(|| {
        LendingError::InvalidTerm(format!("{term_years} years overflows the payment count"))
    })?;
    let periodic_rate = periodic_rate(effective_annual_rate);

    let base_payment = level_payment(principal, periodic_rate, num_payments)?;
    let insurance_monthly = insurance_monthly(principal, insurance_premium_annual_rate)?;
    let monthly_payment = base_payment
        .checked_add(insurance_monthly)
        .ok_or_else(|| overflow("monthly payment"))?;

    let n = Decimal::from(num_payments);
    let total_payment = monthly_payment
        .checked_mul(n)
        .ok_or_else(|| overflow("total payment"))?;
    let total_interest = total_payment
        .checked_sub(principal)
        .ok_or_else(|| overflow("total interest"))?;
    let total_insurance = insurance_monthly
        .checked_mul(n)
        .ok_or_else(|| overflow("total insurance"))?;

    Ok(AmortizationResult {
        periodic_rate,
        num_payments,
        base_payment,
        insurance_monthly,
        monthly_payment,
        total_payment,
        total_interest,
        total_insurance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_is_straight_line() {
        let r = amortize(dec!(450_000), Decimal::ZERO, 50, Decimal::ZERO).unwrap();
        assert_eq!(r.monthly_payment, dec!(450_000) / dec!(600));
        assert_eq!(r.monthly_payment, dec!(750));
        assert_eq!(r.total_interest, Decimal::ZERO);
    }

    #[test]
    fn test_fha_fifty_year_payment() {
        let r = amortize(dec!(450_000), dec!(3.25), 50, Decimal::ZERO).unwrap();
        assert_eq!(r.num_payments, 600);
        assert!((r.periodic_rate - dec!(0.0027083333)).abs() < dec!(0.0000001));
        // P * r * (1+r)^n / ((1+r)^n - 1) ≈ 1518.40
        assert!((r.monthly_payment - dec!(1518.40)).abs() < dec!(1));
    }

    #[test]
    fn test_totals_close() {
        let r = amortize(dec!(200_000), dec!(6.5), 30, Decimal::ZERO).unwrap();
        assert_eq!(r.total_payment, r.monthly_payment * dec!(360));
        assert_eq!(r.total_interest, r.total_payment - dec!(200_000));
    }

    #[test]
    fn test_insurance_is_flat_add_on() {
        let plain = amortize(dec!(450_000), dec!(3.25), 50, Decimal::ZERO).unwrap();
        let insured = amortize(dec!(450_000), dec!(3.25), 50, dec!(0.85)).unwrap();
        assert_eq!(insured.insurance_monthly, dec!(318.75));
        assert_eq!(insured.base_payment, plain.base_payment);
        assert_eq!(insured.monthly_payment - plain.monthly_payment, dec!(318.75));
        // Insurance is folded into total interest
        assert_eq!(
            insured.total_interest - plain.total_interest,
            dec!(318.75) * dec!(600)
        );
        assert_eq!(insured.total_insurance, dec!(191_250));
    }

    #[test]
    fn test_high_rate_amortizes_interest_only() {
        // 150% a year over 50 years: the payment is the monthly interest charge.
        let r = amortize(dec!(450_000), dec!(150), 50, Decimal::ZERO).unwrap();
        assert!((r.monthly_payment - dec!(56_250)).abs() < dec!(0.01));
        let r = amortize(dec!(450_000), dec!(400), 30, Decimal::ZERO).unwrap();
        assert!((r.monthly_payment - dec!(150_000)).abs() < dec!(0.01));
    }

    #[test]
    fn test_huge_principal_overflows_without_panicking() {
        // Payment fits, but 600 of them exceed the Decimal range.
        let principal = Decimal::MAX / dec!(2);
        let err = amortize(principal, dec!(6), 50, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, LendingError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_zero_term_rejected() {
        let err = amortize(dec!(100_000), dec!(5), 0, Decimal::ZERO).unwrap_err();
        assert!(matches!(err, LendingError::DivisionByZero { .. }));
    }

    #[test]
    fn test_negative_principal_passes_through() {
        let r = amortize(dec!(-10_000), dec!(5), 10, Decimal::ZERO).unwrap();
        assert!(r.monthly_payment < Decimal::ZERO);
    }

    #[test]
    fn test_negative_rate_still_amortizes() {
        let r = amortize(dec!(120_000), dec!(-1), 10, Decimal::ZERO).unwrap();
        // Payments below straight-line when the rate is negative
        assert!(r.monthly_payment < dec!(1000));
        assert!(r.total_interest < Decimal::ZERO);
    }
}
