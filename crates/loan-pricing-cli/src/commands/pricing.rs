use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_pricing_core::amortization::{payment, schedule};
use loan_pricing_core::pricing::quote::{self, PricingInput};
use loan_pricing_core::risk::scoring;
use loan_pricing_core::types::{
    BorrowerProfile, LoanProduct, LoanRequest, MarketConditions, NEUTRAL_VOLATILITY,
};

use crate::input;

/// Arguments for pricing a loan
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PriceArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross amount requested, before the down payment
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Appraised property value (defaults to the loan amount)
    #[arg(long)]
    pub property_value: Option<Decimal>,

    #[command(flatten)]
    pub product: ProductFlags,

    /// Borrower credit score
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Down payment as a percent of the loan amount
    #[arg(long, default_value = "0")]
    pub down_payment_percent: Decimal,

    /// Market volatility index, 0-100 (50 = neutral)
    #[arg(long)]
    pub volatility_index: Option<Decimal>,

    /// Attach the full amortization schedule
    #[arg(long)]
    pub schedule: bool,

    /// First instalment date (YYYY-MM-DD) for schedule rows
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

/// Product terms shared by the pricing flags
#[derive(Args)]
pub struct ProductFlags {
    /// Base annual rate in percent
    #[arg(long)]
    pub base_rate: Option<Decimal>,

    /// Market spread in percent
    #[arg(long, default_value = "0")]
    pub spread: Decimal,

    /// Product risk loading in percent
    #[arg(long, default_value = "0")]
    pub risk_adjustment: Decimal,

    /// Guarantee discount in percent
    #[arg(long, default_value = "0")]
    pub guarantee_discount: Decimal,

    /// Years covered by the guarantee
    #[arg(long, default_value_t = 0)]
    pub guarantee_term_years: u32,

    /// Amortization term in years
    #[arg(long, alias = "term")]
    pub term_years: Option<u32>,

    /// Annual insurance premium in percent of principal
    #[arg(long, alias = "mip")]
    pub insurance_rate: Option<Decimal>,
}

/// Arguments for a bare amortization
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortizeArgs {
    /// Financed principal
    #[arg(long)]
    pub principal: Decimal,

    /// Effective annual rate in percent
    #[arg(long)]
    pub rate: Decimal,

    /// Term in years
    #[arg(long, alias = "term")]
    pub term_years: u32,

    /// Annual insurance premium in percent of principal
    #[arg(long, default_value = "0")]
    pub insurance_rate: Decimal,

    /// Include every period in the output
    #[arg(long)]
    pub schedule: bool,

    /// First instalment date (YYYY-MM-DD)
    #[arg(long)]
    pub first_payment_date: Option<NaiveDate>,
}

/// Arguments for product risk scoring
#[derive(Args)]
pub struct RiskArgs {
    /// Path to JSON file holding a product definition
    #[arg(long)]
    pub input: Option<String>,

    /// Market spread in percent
    #[arg(long, default_value = "0")]
    pub spread: Decimal,

    /// Guarantee discount in percent
    #[arg(long, default_value = "0")]
    pub guarantee_discount: Decimal,

    /// Years covered by the guarantee
    #[arg(long, default_value_t = 0)]
    pub guarantee_term_years: u32,
}

impl ProductFlags {
    fn to_product(&self) -> Result<LoanProduct, Box<dyn std::error::Error>> {
        Ok(LoanProduct {
            base_rate: self
                .base_rate
                .ok_or("--base-rate is required (or provide --input)")?,
            spread: self.spread,
            risk_adjustment: self.risk_adjustment,
            guarantee_discount: self.guarantee_discount,
            guarantee_term_years: self.guarantee_term_years,
            term_years: self
                .term_years
                .ok_or("--term-years is required (or provide --input)")?,
            insurance_premium_annual_rate: self.insurance_rate,
        })
    }
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut pricing_input: PricingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PricingInput {
            product: args.product.to_product()?,
            borrower: BorrowerProfile {
                credit_score: args
                    .credit_score
                    .ok_or("--credit-score is required (or provide --input)")?,
                annual_income: Decimal::ZERO,
                monthly_debt: Decimal::ZERO,
                assets: Decimal::ZERO,
                liabilities: Decimal::ZERO,
                down_payment_percent: args.down_payment_percent,
            },
            market: MarketConditions {
                volatility_index: args.volatility_index.unwrap_or(NEUTRAL_VOLATILITY),
            },
            request: LoanRequest {
                loan_amount: args
                    .loan_amount
                    .ok_or("--loan-amount is required (or provide --input)")?,
                property_value: args.property_value,
            },
            include_schedule: false,
            first_payment_date: None,
        }
    };
    if args.schedule {
        pricing_input.include_schedule = true;
    }
    if args.first_payment_date.is_some() {
        pricing_input.first_payment_date = args.first_payment_date;
    }

    let result = quote::price_loan(&pricing_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut result = if args.schedule || args.first_payment_date.is_some() {
        let sched = schedule::build_schedule(
            args.principal,
            args.rate,
            args.term_years,
            args.insurance_rate,
            args.first_payment_date,
        )?;
        let mut v = serde_json::to_value(&sched.summary)?;
        v["schedule"] = serde_json::to_value(&sched.rows)?;
        v
    } else {
        serde_json::to_value(payment::amortize(
            args.principal,
            args.rate,
            args.term_years,
            args.insurance_rate,
        )?)?
    };
    result["principal"] = serde_json::to_value(args.principal)?;
    Ok(json!({ "result": result }))
}

pub fn run_risk(args: RiskArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let product: LoanProduct = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanProduct {
            base_rate: Decimal::ZERO,
            spread: args.spread,
            risk_adjustment: Decimal::ZERO,
            guarantee_discount: args.guarantee_discount,
            guarantee_term_years: args.guarantee_term_years,
            term_years: 0,
            insurance_premium_annual_rate: None,
        }
    };
    let profile = scoring::evaluate_risk(&product);
    Ok(json!({ "result": profile }))
}
