use clap::Args;
use serde_json::Value;

use loan_pricing_core::pricing::quote::PricingInput;
use loan_pricing_core::underwriting::decision;
use loan_pricing_core::underwriting::standard::{StandardPolicy, StandardPolicyConfig};

use crate::input;

/// Arguments for underwriting a full application
#[derive(Args)]
pub struct UnderwriteArgs {
    /// Path to JSON application file (product, borrower, market, request)
    #[arg(long)]
    pub input: Option<String>,

    /// Path to a YAML or JSON file overriding the standard policy thresholds
    #[arg(long)]
    pub policy: Option<String>,
}

pub fn run_underwrite(args: UnderwriteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let application: PricingInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for underwriting".into());
    };

    let config: StandardPolicyConfig = match args.policy {
        Some(ref path) => input::file::read_config(path)?,
        None => StandardPolicyConfig::default(),
    };
    log::debug!("underwriting with policy thresholds {config:?}");
    let policy = StandardPolicy::new(config)?;

    let result = decision::underwrite_application(&application, &policy)?;
    Ok(serde_json::to_value(result)?)
}
