use clap::Args;
use serde_json::Value;

use loan_pricing_core::comparison::{self, ComparisonInput};
use loan_pricing_core::sensitivity::{self, SensitivityInput};

use crate::input;

#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON input file (products, borrower, market, request)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON input file (base pricing input plus two sweep variables)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cmp_input: ComparisonInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for product comparison".into());
    };
    let result = comparison::compare_products(&cmp_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sens_input: SensitivityInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for sensitivity analysis".into());
    };
    let result = sensitivity::rate_sensitivity(&sens_input)?;
    Ok(serde_json::to_value(result)?)
}
