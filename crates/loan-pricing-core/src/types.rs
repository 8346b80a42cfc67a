use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Annual percentages as quoted on a rate sheet (3.25 = 3.25%).
pub type Percent = Decimal;

/// Periodic rates expressed as decimals (0.0027 = 0.27% per month).
pub type Rate = Decimal;

/// Scores on a 0-100 scale.
pub type Score = Decimal;

/// Neutral reading of the market volatility index.
pub const NEUTRAL_VOLATILITY: Decimal = dec!(50);

/// A named financing instrument. All rate components are annual percentages
/// on the same principal base and are additive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProduct {
    /// Nominal annual rate before adjustments.
    pub base_rate: Percent,
    /// Market or benchmark spread added to the base rate.
    #[serde(default)]
    pub spread: Percent,
    /// Product-specific risk loading.
    #[serde(default)]
    pub risk_adjustment: Percent,
    /// Reduction from a government or insurer guarantee.
    #[serde(default)]
    pub guarantee_discount: Percent,
    /// Years the guarantee runs.
    #[serde(default)]
    pub guarantee_term_years: u32,
    /// Amortization period.
    pub term_years: u32,
    /// Recurring insurance premium charged on the original principal (e.g. mortgage insurance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_premium_annual_rate: Option<Percent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowerProfile {
    pub credit_score: u32,
    #[serde(default)]
    pub annual_income: Money,
    #[serde(default)]
    pub monthly_debt: Money,
    #[serde(default)]
    pub assets: Money,
    #[serde(default)]
    pub liabilities: Money,
    /// Share of the loan amount paid up front, 0-100.
    #[serde(default)]
    pub down_payment_percent: Percent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConditions {
    /// 0-100, 50 is neutral. Below 50 eases the rate, above tightens it.
    pub volatility_index: Decimal,
}

impl Default for MarketConditions {
    fn default() -> Self {
        Self {
            volatility_index: NEUTRAL_VOLATILITY,
        }
    }
}

/// Amount requested by the borrower.
///
/// `loan_amount` is always the gross amount (purchase price or requested sum);
/// the borrower's down payment is taken off it to reach the financed principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub loan_amount: Money,
    /// Appraised collateral value. Defaults to `loan_amount` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_value: Option<Money>,
}

impl LoanRequest {
    /// Principal actually amortized after the down payment.
    pub fn financed_principal(&self, borrower: &BorrowerProfile) -> Money {
        self.loan_amount * (Decimal::ONE - borrower.down_payment_percent / dec!(100))
    }

    pub fn down_payment(&self, borrower: &BorrowerProfile) -> Money {
        self.loan_amount - self.financed_principal(borrower)
    }

    pub fn collateral_value(&self) -> Money {
        self.property_value.unwrap_or(self.loan_amount)
    }
}

/// Sweep specification for one sensitivity axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub name: String,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    for w in &warnings {
        log::warn!("{methodology}: {w}");
    }
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
