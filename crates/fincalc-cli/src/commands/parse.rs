use clap::Args;
use serde_json::{json, Value};

use fincalc_core::normalize::{normalize, parse_and_validate, ParsePolicy};

/// Arguments for the standalone normalizer
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ParseArgs {
    /// Raw value to normalize: a number, currency string, or JSON fragment
    pub raw: String,

    /// Minimum allowed value
    #[arg(long)]
    pub min: Option<f64>,

    /// Maximum allowed value
    #[arg(long)]
    pub max: Option<f64>,

    /// Reject a normalized value of exactly zero
    #[arg(long)]
    pub no_zero: bool,

    /// Reject negative values
    #[arg(long)]
    pub no_negative: bool,
}

/// Normalize a single value and apply the requested policy. Validation
/// failures are structured output, not process errors: the calculators
/// downstream of this normalizer never crash on bad input, and neither
/// does their front end.
pub fn run_parse(args: ParseArgs) -> Result<Value, Box<dyn std::error::Error>> {
    // Accept JSON fragments ("[1,2]", "{\"value\": 3}", "true") so every
    // RawInput shape is reachable from the shell; anything that does not
    // parse as JSON is treated as a plain string.
    let raw: Value = serde_json::from_str(&args.raw).unwrap_or(Value::String(args.raw.clone()));

    let policy = ParsePolicy {
        min: args.min,
        max: args.max,
        allow_zero: !args.no_zero,
        allow_negative: !args.no_negative,
    };

    let value = match parse_and_validate(&raw, &policy) {
        Ok(number) => json!({
            "valid": true,
            "number": number,
        }),
        Err(e) => json!({
            "valid": false,
            "number": normalize(&raw),
            "error": e.to_string(),
        }),
    };

    Ok(value)
}
