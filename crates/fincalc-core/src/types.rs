use serde::{Deserialize, Serialize};

/// Monetary amounts in the caller's base currency unit. IEEE doubles;
/// every currency-bearing output field is pre-rounded to 2 decimals.
pub type Money = f64;

/// Rates expressed as annual percentages at the API boundary (8.5 = 8.5%/year).
/// Internal fractional rates are documented per function.
pub type Rate = f64;

/// Magnitude ceiling for every calculation. Matches 2^53 - 1, the largest
/// integer exactly representable in an IEEE double; the normalizer clamps
/// into this range and the validator rejects values beyond it.
pub const MAX_SAFE_CALCULATION_VALUE: f64 = 9_007_199_254_740_991.0;

/// Hard ceiling on simulated periods (200 years of monthly steps). Bounds
/// every schedule even when the payment never amortizes the balance.
pub const MAX_SCHEDULE_PERIODS: u32 = 2400;

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
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee_f64".to_string(),
        },
    }
}
