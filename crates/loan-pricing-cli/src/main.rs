mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::{CompareArgs, SensitivityArgs};
use commands::pricing::{AmortizeArgs, PriceArgs, RiskArgs};
use commands::underwriting::UnderwriteArgs;

/// Loan pricing, amortization and underwriting
#[derive(Parser)]
#[command(
    name = "lpx",
    version,
    about = "Loan pricing, amortization and underwriting",
    long_about = "A CLI for pricing loans with decimal precision. Resolves effective rates \
                  from stacked product terms, credit and market adjustments, builds \
                  amortization schedules, scores product risk and runs underwriting policies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a loan: effective rate, payment, totals and product risk
    Price(PriceArgs),
    /// Level-payment amortization for a principal, rate and term
    Amortize(AmortizeArgs),
    /// Product risk score and tier
    Risk(RiskArgs),
    /// Price and underwrite a full application
    Underwrite(UnderwriteArgs),
    /// Compare several products for one borrower
    Compare(CompareArgs),
    /// Volatility x credit score rate sensitivity grid
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Price(args) => commands::pricing::run_price(args),
        Commands::Amortize(args) => commands::pricing::run_amortize(args),
        Commands::Risk(args) => commands::pricing::run_risk(args),
        Commands::Underwrite(args) => commands::underwriting::run_underwrite(args),
        Commands::Compare(args) => commands::analysis::run_compare(args),
        Commands::Sensitivity(args) => commands::analysis::run_sensitivity(args),
        Commands::Version => {
            println!("lpx {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
