//! Period-by-period amortization schedule.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::{amortize, AmortizationResult};
use crate::error::LendingError;
use crate::types::{Money, Percent};
use crate::LendingResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub insurance: Money,
    pub balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub summary: AmortizationResult,
    pub rows: Vec<ScheduleRow>,
}

/// Full schedule for a level-payment loan.
///
/// Interest accrues on the declining balance while insurance stays flat. The
/// last row retires whatever balance remains so the loan closes at zero.
pub fn build_schedule(
    principal: Money,
    effective_annual_rate: Percent,
    term_years: u32,
    insurance_premium_annual_rate: Percent,
    first_payment_date: Option<NaiveDate>,
) -> LendingResult<AmortizationSchedule> {
    let summary = amortize(
        principal,
        effective_annual_rate,
        term_years,
        insurance_premium_annual_rate,
    )?;

    let mut rows = Vec::with_capacity(summary.num_payments as usize);
    let mut balance = principal;

    for period in 1..=summary.num_payments {
        let interest = balance * summary.periodic_rate;
        let principal_paid = if period == summary.num_payments {
            balance
        } else {
            summary.base_payment - interest
        };
        balance -= principal_paid;

        let payment_date = match first_payment_date {
            Some(first) => Some(
                first
                    .checked_add_months(Months::new(period - 1))
                    .ok_or_else(|| {
                        LendingError::DateError(format!(
                            "payment {period} falls outside the supported date range"
                        ))
                    })?,
            ),
            None => None,
        };

        rows.push(ScheduleRow {
            period,
            payment_date,
            payment: interest + principal_paid + summary.insurance_monthly,
            interest,
            principal: principal_paid,
            insurance: summary.insurance_monthly,
            balance,
        });
    }

    Ok(AmortizationSchedule { summary, rows })
}

/// Total interest actually accrued across the schedule, excluding insurance.
pub fn scheduled_interest(schedule: &AmortizationSchedule) -> Money {
    schedule.rows.iter().map(|r| r.interest).sum::<Decimal>()
}
