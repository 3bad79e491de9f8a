pub mod growth;
pub mod loan;
pub mod mortgage;
pub mod parse;

use fincalc_core::normalize::normalize_str;

/// Normalize a required flag value, erroring only when the flag is absent.
/// The value itself may be any string the core normalizer accepts.
pub(crate) fn required_flag(
    flag: &Option<String>,
    name: &str,
) -> Result<f64, Box<dyn std::error::Error>> {
    let raw = flag
        .as_deref()
        .ok_or_else(|| format!("{name} is required (or provide --input)"))?;
    Ok(normalize_str(raw))
}

/// Normalize an optional flag value, defaulting to zero.
pub(crate) fn optional_flag(flag: &Option<String>) -> f64 {
    flag.as_deref().map(normalize_str).unwrap_or(0.0)
}
