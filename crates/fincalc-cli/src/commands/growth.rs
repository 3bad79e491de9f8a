use clap::Args;
use serde_json::Value;

use fincalc_core::growth::{calculate_investment, CompoundingFrequency, GrowthInput};

use crate::commands::{optional_flag, required_flag};
use crate::input;

/// Arguments for the investment growth calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct InvestArgs {
    /// Lump sum invested up front (plain number or currency string)
    #[arg(long, alias = "initial")]
    pub initial_amount: Option<String>,

    /// Contribution added at the end of every month
    #[arg(long, alias = "contribution")]
    pub periodic_contribution: Option<String>,

    /// Annual growth rate in percent (e.g. 8 for 8%/year)
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<String>,

    /// Term in years
    #[arg(long, alias = "years")]
    pub term_years: Option<String>,

    /// Compounding frequency: annually, semiannually, quarterly, monthly, daily
    #[arg(long, alias = "frequency", default_value = "monthly")]
    pub compounding_frequency: String,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_invest(args: InvestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let growth_input: GrowthInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        GrowthInput::from_raw(&data)
    } else {
        GrowthInput {
            initial_amount: required_flag(&args.initial_amount, "--initial-amount")?,
            periodic_contribution: optional_flag(&args.periodic_contribution),
            annual_rate_pct: required_flag(&args.annual_rate_pct, "--annual-rate-pct")?,
            term_years: required_flag(&args.term_years, "--term-years")?,
            compounding_frequency: CompoundingFrequency::from_label(&args.compounding_frequency),
        }
    };

    let output = calculate_investment(&growth_input);
    Ok(serde_json::to_value(&output)?)
}
