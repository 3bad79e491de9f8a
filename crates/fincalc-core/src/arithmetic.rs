//! Overflow-guarded arithmetic primitives. Total functions: they never
//! panic and never return NaN or an infinity. The fallback policy is
//! explicit at each call site.

use crate::normalize::sanitize;
use crate::types::MAX_SAFE_CALCULATION_VALUE;

/// Magnitudes below this are treated as exactly zero, so floating-point
/// residue cannot stall iterative payoff simulations.
pub const EPSILON: f64 = 1e-9;

/// True when `value` is within [`EPSILON`] of zero.
pub fn is_effectively_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// `a / b`, or `fallback` when `b` is zero, either operand is non-finite,
/// or the quotient itself is non-finite. The quotient is clamped into the
/// safe range.
pub fn safe_divide(a: f64, b: f64, fallback: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() || b == 0.0 {
        return fallback;
    }
    let quotient = a / b;
    if !quotient.is_finite() {
        return fallback;
    }
    quotient.clamp(-MAX_SAFE_CALCULATION_VALUE, MAX_SAFE_CALCULATION_VALUE)
}

/// Product of the sanitized operands, clamped on overflow instead of
/// returning an infinity.
pub fn safe_multiply(a: f64, b: f64) -> f64 {
    (sanitize(a) * sanitize(b)).clamp(-MAX_SAFE_CALCULATION_VALUE, MAX_SAFE_CALCULATION_VALUE)
}

/// Sum of a slice. Non-finite addends count as zero; the running sum is
/// clamped into the safe range at every step.
pub fn safe_add(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc: f64, v| {
        (acc + sanitize(*v)).clamp(-MAX_SAFE_CALCULATION_VALUE, MAX_SAFE_CALCULATION_VALUE)
    })
}

/// `base ^ exponent` with the mathematical convention `0^0 = 1`, `0^x = 0`
/// for positive `x`, and overflow clamped into the safe range. A result
/// with no real value (negative base, fractional exponent) yields 0.
pub fn safe_power(base: f64, exponent: f64) -> f64 {
    let base = sanitize(base);
    let exponent = sanitize(exponent);

    if exponent == 0.0 {
        return 1.0;
    }
    if base == 0.0 && exponent > 0.0 {
        return 0.0;
    }

    let result = base.powf(exponent);
    if result.is_nan() {
        return 0.0;
    }
    result.clamp(-MAX_SAFE_CALCULATION_VALUE, MAX_SAFE_CALCULATION_VALUE)
}

/// Decimal rounding, half away from zero. Currency-bearing results are
/// rounded to 2 digits before they reach callers.
pub fn round_to_precision(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
