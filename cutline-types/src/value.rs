//! Soft numeric coercion for loosely-typed records arriving from the host.
//!
//! The host sends plain JSON whose numeric fields may be numbers, numeric
//! strings, booleans or garbage. Nothing here fails: values that cannot be
//! read as a finite number resolve to the caller's fallback.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Returns `value` if it is present and finite, otherwise `fallback`.
pub fn to_number(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Integer flavour of [`to_number`]; fractional values truncate toward zero.
pub fn to_integer(value: Option<f64>, fallback: i64) -> i64 {
    match value {
        Some(v) if v.is_finite() => v.trunc() as i64,
        _ => fallback,
    }
}

/// Read a JSON value as a number.
///
/// Numeric strings parse (an empty string reads as 0), booleans map to 0/1,
/// `null` is absent, and anything else is NaN so that [`to_number`] falls back.
pub fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Null => None,
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                Some(trimmed.parse().unwrap_or(f64::NAN))
            }
        }
        Value::Array(_) | Value::Object(_) => Some(f64::NAN),
    }
}

/// JS-style truthiness, used for fields a patch may clear with a falsy value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn nan() -> f64 {
    f64::NAN
}

/// `deserialize_with` adapter for optional loose numbers.
pub fn lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce(&value))
}

/// `deserialize_with` adapter for required loose numbers; unreadable becomes NaN.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient(deserializer)?.unwrap_or(f64::NAN))
}

/// `deserialize_with` adapter for loose integers; unreadable becomes 0.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(to_integer(lenient(deserializer)?, 0))
}

/// `deserialize_with` adapter that keeps an explicit `null` as `Some(Value::Null)`,
/// so patches can tell "cleared" apart from "not mentioned".
pub fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
