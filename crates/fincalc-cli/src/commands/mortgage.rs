use clap::Args;
use serde_json::Value;

use fincalc_core::mortgage::{calculate_mortgage, MortgageInput};

use crate::commands::{optional_flag, required_flag};
use crate::input;

/// Arguments for the mortgage calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct MortgageArgs {
    /// Purchase price of the home (plain number or currency string)
    #[arg(long, alias = "price")]
    pub home_price: Option<String>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<String>,

    /// Annual interest rate in percent (e.g. 4.5 for 4.5%/year)
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<String>,

    /// Term in years
    #[arg(long, alias = "years")]
    pub term_years: Option<String>,

    /// Annual property tax
    #[arg(long, alias = "property-tax")]
    pub annual_property_tax: Option<String>,

    /// Annual homeowner's insurance
    #[arg(long, alias = "insurance")]
    pub annual_insurance: Option<String>,

    /// Annual private mortgage insurance
    #[arg(long, alias = "pmi")]
    pub annual_pmi: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        MortgageInput::from_raw(&data)
    } else {
        MortgageInput {
            home_price: required_flag(&args.home_price, "--home-price")?,
            down_payment: required_flag(&args.down_payment, "--down-payment")?,
            annual_rate_pct: required_flag(&args.annual_rate_pct, "--annual-rate-pct")?,
            term_years: required_flag(&args.term_years, "--term-years")?,
            annual_property_tax: optional_flag(&args.annual_property_tax),
            annual_insurance: optional_flag(&args.annual_insurance),
            annual_pmi: optional_flag(&args.annual_pmi),
        }
    };

    let output = calculate_mortgage(&mortgage_input);
    Ok(serde_json::to_value(&output)?)
}
