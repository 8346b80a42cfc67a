//! Rate-sheet style sensitivity: volatility index against credit score.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LendingError;
use crate::pricing::quote::{price, PricingInput};
use crate::types::*;
use crate::validation::{validate_pricing_input, MAX_CREDIT_SCORE, MIN_CREDIT_SCORE};
use crate::LendingResult;

/// Upper bound on points per axis.
const MAX_SWEEP_POINTS: usize = 201;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    pub base: PricingInput,
    /// Sweep of `market.volatility_index`.
    pub volatility: SensitivityVariable,
    /// Sweep of `borrower.credit_score`; values must be whole numbers.
    pub credit_score: SensitivityVariable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub volatility_values: Vec<Decimal>,
    pub credit_score_values: Vec<u32>,
    /// rate_matrix[i][j] = effective rate at volatility_values[i], credit_score_values[j]
    pub rate_matrix: Vec<Vec<Percent>>,
    pub payment_matrix: Vec<Vec<Money>>,
    pub base_case_rate: Percent,
    pub base_case_payment: Money,
}

pub fn rate_sensitivity(input: &SensitivityInput) -> LendingResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let base = &input.base;
    validate_pricing_input(&base.product, &base.borrower, &base.market, &base.request)?;

    let volatility_values = generate_sweep_values(&input.volatility)?;
    let credit_score_values = generate_sweep_values(&input.credit_score)?
        .into_iter()
        .map(|v| to_credit_score(v, &input.credit_score.name))
        .collect::<LendingResult<Vec<u32>>>()?;

    if volatility_values
        .iter()
        .any(|v| *v < Decimal::ZERO || *v > Decimal::ONE_HUNDRED)
    {
        warnings.push("Volatility sweep leaves the 0-100 index range".to_string());
    }

    let mut scenario = base.clone();
    scenario.include_schedule = false;

    let mut rate_matrix = Vec::with_capacity(volatility_values.len());
    let mut payment_matrix = Vec::with_capacity(volatility_values.len());
    for vol in &volatility_values {
        scenario.market.volatility_index = *vol;
        let mut rate_row = Vec::with_capacity(credit_score_values.len());
        let mut payment_row = Vec::with_capacity(credit_score_values.len());
        for score in &credit_score_values {
            scenario.borrower.credit_score = *score;
            let priced = price(&scenario)?;
            rate_row.push(priced.effective_annual_rate);
            payment_row.push(priced.monthly_payment);
        }
        rate_matrix.push(rate_row);
        payment_matrix.push(payment_row);
    }

    let mut base_case = base.clone();
    base_case.include_schedule = false;
    let base_priced = price(&base_case)?;

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "volatility_variable": input.volatility.name,
        "credit_score_variable": input.credit_score.name,
        "base_volatility_index": base.market.volatility_index.to_string(),
        "base_credit_score": base.borrower.credit_score,
    });

    Ok(with_metadata(
        "2-Way Rate Sensitivity (volatility x credit score)",
        &assumptions,
        warnings,
        elapsed,
        SensitivityOutput {
            volatility_values,
            credit_score_values,
            rate_matrix,
            payment_matrix,
            base_case_rate: base_priced.effective_annual_rate,
            base_case_payment: base_priced.monthly_payment,
        },
    ))
}

/// Sweep values from min to max by step, always including max.
fn generate_sweep_values(var: &SensitivityVariable) -> LendingResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(LendingError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(LendingError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    let too_many = || LendingError::InvalidInput {
        field: format!("variable:{}", var.name),
        reason: format!("Sweep exceeds {MAX_SWEEP_POINTS} points"),
    };

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        if values.len() == MAX_SWEEP_POINTS {
            return Err(too_many());
        }
        values.push(current);
        current += var.step;
    }
    if let Some(&last) = values.last() {
        if last < var.max {
            // The appended max counts against the cap too.
            if values.len() == MAX_SWEEP_POINTS {
                return Err(too_many());
            }
            values.push(var.max);
        }
    }

    Ok(values)
}

fn to_credit_score(value: Decimal, name: &str) -> LendingResult<u32> {
    let score = if value.fract().is_zero() {
        value.to_u32()
    } else {
        None
    };
    match score {
        Some(s) if (MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&s) => Ok(s),
        Some(s) => Err(LendingError::InvalidCreditScore(s)),
        None => Err(LendingError::InvalidInput {
            field: format!("variable:{name}"),
            reason: format!("{value} is not a whole credit score"),
        }),
    }
}
