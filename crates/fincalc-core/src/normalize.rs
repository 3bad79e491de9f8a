//! Permissive input normalization: converts arbitrary, possibly malformed
//! caller input into safe finite doubles.
//!
//! `normalize` never fails: unparseable input degrades to `0.0` so a
//! presentation layer can always render something. The companion validator
//! family (`validate_safe_number`, `parse_and_validate`) is for form
//! boundaries that must surface an error instead of silently substituting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FincalcError;
use crate::types::MAX_SAFE_CALCULATION_VALUE;
use crate::FincalcResult;

/// Object keys probed, in preference order, when a mapping is supplied
/// where a number is expected.
const OBJECT_KEYS: [&str; 4] = ["value", "amount", "number", "price"];

/// Currency symbols stripped before numeric parsing.
const CURRENCY_SYMBOLS: [char; 5] = ['₹', '$', '€', '£', '¥'];

/// Convert an arbitrary value into a finite double.
///
/// Dispatch rules:
/// - null → 0
/// - booleans → 1 / 0
/// - numbers → clamped into the safe range (non-finite → 0)
/// - strings → currency symbols, separators, and whitespace stripped, then
///   the first valid numeric substring is parsed; otherwise 0
/// - arrays → the first element, recursively; empty → 0
/// - mappings → the first conventional key present (`value`, `amount`,
///   `number`, `price`), recursively; none → 0
pub fn normalize(raw: &Value) -> f64 {
    match raw {
        Value::Null => 0.0,
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Number(n) => sanitize(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => normalize_str(s),
        Value::Array(items) => items.first().map(normalize).unwrap_or(0.0),
        Value::Object(map) => OBJECT_KEYS
            .iter()
            .find_map(|key| map.get(*key))
            .map(normalize)
            .unwrap_or(0.0),
    }
}

/// String fast path of [`normalize`]: strip symbols and separators, then
/// parse the first numeric substring. Unparseable input yields 0.
pub fn normalize_str(raw: &str) -> f64 {
    let stripped: String = raw
        .chars()
        .filter(|c| !is_stripped_char(*c))
        .collect();
    sanitize(first_numeric_substring(&stripped).unwrap_or(0.0))
}

/// Normalize the first present key out of a raw mapping. Missing keys and
/// non-mapping input become zero.
pub fn normalize_field(raw: &Value, keys: &[&str]) -> f64 {
    keys.iter()
        .find_map(|key| raw.get(*key))
        .map(normalize)
        .unwrap_or(0.0)
}

/// Clamp an already-typed double into the safe range. Non-finite → 0.
/// Engines apply this to every parameter before calculating; callers are
/// not trusted to have validated anything.
pub fn sanitize(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(-MAX_SAFE_CALCULATION_VALUE, MAX_SAFE_CALCULATION_VALUE)
}

fn is_stripped_char(c: char) -> bool {
    c.is_whitespace() || c == ',' || c == '_' || CURRENCY_SYMBOLS.contains(&c)
}

/// Scan for the first substring that parses as a double: optional sign,
/// digits with at most one decimal point, optional exponent. Thousands
/// separators (Western "1,234,567" and Indian "10,00,000" grouping alike)
/// were already removed by the caller.
fn first_numeric_substring(s: &str) -> Option<f64> {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut i = 0;

    while i < n {
        let c = chars[i];
        let starts_number = c.is_ascii_digit()
            || ((c == '+' || c == '-')
                && i + 1 < n
                && (chars[i + 1].is_ascii_digit() || chars[i + 1] == '.'))
            || (c == '.' && i + 1 < n && chars[i + 1].is_ascii_digit());

        if starts_number {
            let mut j = i;
            if chars[j] == '+' || chars[j] == '-' {
                j += 1;
            }
            let mut saw_dot = false;
            while j < n && (chars[j].is_ascii_digit() || (chars[j] == '.' && !saw_dot)) {
                if chars[j] == '.' {
                    saw_dot = true;
                }
                j += 1;
            }
            // Exponent suffix only counts when at least one digit follows.
            if j < n && (chars[j] == 'e' || chars[j] == 'E') {
                let mut k = j + 1;
                if k < n && (chars[k] == '+' || chars[k] == '-') {
                    k += 1;
                }
                if k < n && chars[k].is_ascii_digit() {
                    while k < n && chars[k].is_ascii_digit() {
                        k += 1;
                    }
                    j = k;
                }
            }

            let candidate: String = chars[i..j].iter().collect();
            if let Ok(parsed) = candidate.parse::<f64>() {
                return Some(parsed);
            }
            i = j;
        }
        i += 1;
    }

    None
}

/// Reject values the engines cannot operate on, with a descriptive error
/// instead of the silent clamp `normalize` applies.
pub fn validate_safe_number(value: f64) -> FincalcResult<f64> {
    if !value.is_finite() {
        return Err(FincalcError::NotFinite);
    }
    if value.abs() > MAX_SAFE_CALCULATION_VALUE {
        return Err(FincalcError::ExceedsSafeRange { value });
    }
    Ok(value)
}

/// Range and sign policy layered on top of normalization, for form-level
/// validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsePolicy {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub allow_zero: bool,
    pub allow_negative: bool,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        ParsePolicy {
            min: None,
            max: None,
            allow_zero: true,
            allow_negative: true,
        }
    }
}

/// Normalize a raw value, then enforce the policy. Returns the first
/// violated rule; never panics.
pub fn parse_and_validate(raw: &Value, policy: &ParsePolicy) -> FincalcResult<f64> {
    let value = validate_safe_number(normalize(raw))?;

    if !policy.allow_negative && value < 0.0 {
        return Err(FincalcError::NegativeNotAllowed { value });
    }
    if !policy.allow_zero && value == 0.0 {
        return Err(FincalcError::ZeroNotAllowed);
    }
    if let Some(min) = policy.min {
        if value < min {
            return Err(FincalcError::BelowMinimum { value, min });
        }
    }
    if let Some(max) = policy.max {
        if value > max {
            return Err(FincalcError::AboveMaximum { value, max });
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_and_bool() {
        assert_eq!(normalize(&Value::Null), 0.0);
        assert_eq!(normalize(&json!(true)), 1.0);
        assert_eq!(normalize(&json!(false)), 0.0);
    }

    #[test]
    fn test_plain_numbers() {
        assert_eq!(normalize(&json!(42)), 42.0);
        assert_eq!(normalize(&json!(-3.75)), -3.75);
        assert_eq!(normalize(&json!(0)), 0.0);
    }

    #[test]
    fn test_currency_strings() {
        assert_eq!(normalize(&json!("$1,234.56")), 1234.56);
        assert_eq!(normalize(&json!("₹10,00,000")), 1_000_000.0);
        assert_eq!(normalize(&json!("€ 999")), 999.0);
        assert_eq!(normalize(&json!("£-250.00")), -250.0);
        assert_eq!(normalize(&json!("¥1_000")), 1000.0);
    }

    #[test]
    fn test_first_numeric_substring_wins() {
        assert_eq!(normalize(&json!("approx 12.5 to 14")), 12.5);
        assert_eq!(normalize(&json!("rate: 8.5%")), 8.5);
        assert_eq!(normalize(&json!("7 years")), 7.0);
    }

    #[test]
    fn test_unparseable_strings() {
        assert_eq!(normalize(&json!("")), 0.0);
        assert_eq!(normalize(&json!("   ")), 0.0);
        assert_eq!(normalize(&json!("not a number")), 0.0);
        assert_eq!(normalize(&json!("--")), 0.0);
        assert_eq!(normalize(&json!(".")), 0.0);
    }

    #[test]
    fn test_exponent_strings() {
        assert_eq!(normalize(&json!("1e3")), 1000.0);
        assert_eq!(normalize(&json!("2.5e-2")), 0.025);
        // A bare trailing 'e' is not an exponent.
        assert_eq!(normalize(&json!("12e")), 12.0);
    }

    #[test]
    fn test_arrays() {
        assert_eq!(normalize(&json!(["55", "ignored"])), 55.0);
        assert_eq!(normalize(&json!([])), 0.0);
        assert_eq!(normalize(&json!([[7]])), 7.0);
    }

    #[test]
    fn test_object_key_preference() {
        assert_eq!(normalize(&json!({"value": 10, "amount": 20})), 10.0);
        assert_eq!(normalize(&json!({"amount": "₹5,000"})), 5000.0);
        assert_eq!(normalize(&json!({"price": 9.99})), 9.99);
        assert_eq!(normalize(&json!({"unrelated": 1})), 0.0);
    }

    #[test]
    fn test_sanitize_non_finite() {
        assert_eq!(sanitize(f64::NAN), 0.0);
        assert_eq!(sanitize(f64::INFINITY), 0.0);
        assert_eq!(sanitize(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_sanitize_clamps_magnitude() {
        assert_eq!(sanitize(1e300), MAX_SAFE_CALCULATION_VALUE);
        assert_eq!(sanitize(-1e300), -MAX_SAFE_CALCULATION_VALUE);
        assert_eq!(sanitize(123.45), 123.45);
    }

    #[test]
    fn test_validate_safe_number() {
        assert_eq!(validate_safe_number(100.0), Ok(100.0));
        assert_eq!(validate_safe_number(f64::NAN), Err(FincalcError::NotFinite));
        assert!(matches!(
            validate_safe_number(1e18),
            Err(FincalcError::ExceedsSafeRange { .. })
        ));
    }

    #[test]
    fn test_parse_and_validate_policy_order() {
        let policy = ParsePolicy {
            min: Some(300.0),
            max: Some(900.0),
            allow_zero: false,
            allow_negative: false,
        };
        assert_eq!(parse_and_validate(&json!(720), &policy), Ok(720.0));
        assert_eq!(
            parse_and_validate(&json!(-5), &policy),
            Err(FincalcError::NegativeNotAllowed { value: -5.0 })
        );
        assert_eq!(
            parse_and_validate(&json!("garbage"), &policy),
            Err(FincalcError::ZeroNotAllowed)
        );
        assert_eq!(
            parse_and_validate(&json!(150), &policy),
            Err(FincalcError::BelowMinimum {
                value: 150.0,
                min: 300.0
            })
        );
        assert_eq!(
            parse_and_validate(&json!(1000), &policy),
            Err(FincalcError::AboveMaximum {
                value: 1000.0,
                max: 900.0
            })
        );
    }

    #[test]
    fn test_parse_and_validate_default_policy_is_permissive() {
        let policy = ParsePolicy::default();
        assert_eq!(parse_and_validate(&json!(0), &policy), Ok(0.0));
        assert_eq!(parse_and_validate(&json!(-42), &policy), Ok(-42.0));
    }
}
