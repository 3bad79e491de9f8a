use clap::Args;
use serde_json::Value;

use fincalc_core::loan::{calculate_loan, LoanInput};

use crate::commands::{optional_flag, required_flag};
use crate::input;

/// Arguments for the loan calculator
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Amount borrowed (plain number or currency string)
    #[arg(long)]
    pub principal: Option<String>,

    /// Annual interest rate in percent (e.g. 8.5 for 8.5%/year)
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<String>,

    /// Term in years
    #[arg(long, alias = "years")]
    pub term_years: Option<String>,

    /// Extra principal paid every month on top of the installment
    #[arg(long, alias = "extra")]
    pub extra_monthly_payment: Option<String>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        LoanInput::from_raw(&data)
    } else {
        LoanInput {
            principal: required_flag(&args.principal, "--principal")?,
            annual_rate_pct: required_flag(&args.annual_rate_pct, "--annual-rate-pct")?,
            term_years: required_flag(&args.term_years, "--term-years")?,
            extra_monthly_payment: optional_flag(&args.extra_monthly_payment),
        }
    };

    let output = calculate_loan(&loan_input);
    Ok(serde_json::to_value(&output)?)
}
