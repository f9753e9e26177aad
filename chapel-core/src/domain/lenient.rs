//! Lenient field deserializers
//!
//! Records come from two clients that never validated their forms, so a
//! numeric field may arrive as a number, a numeric string, `null`, or junk.
//! Everything is coalesced here, once, so the aggregation code only ever sees
//! `Option<Decimal>`.

use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Convert a JSON value to a decimal amount, `None` when it is not numeric
///
/// A finite number too large for `Decimal` clamps to `Decimal::MAX` (or
/// `Decimal::MIN`), which every total reports as overflowed.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => decimal_from_str(&n.to_string()),
        Value::String(s) => decimal_from_str(s.trim()),
        _ => None,
    }
}

fn decimal_from_str(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .ok()
        .or_else(|| Decimal::from_scientific(s).ok())
        .or_else(|| s.parse::<f64>().ok().and_then(decimal_from_f64))
}

fn decimal_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or(Some(if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    }))
}

pub(crate) fn amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

/// Strings pass through, numbers are stringified, anything else is dropped
pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// A missing or non-array list is empty; entries of the wrong shape become
/// default entries so list lengths are preserved.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(decimal_from_value(&json!(100)), Some(Decimal::new(100, 0)));
        assert_eq!(decimal_from_value(&json!(12.5)), Some(Decimal::new(125, 1)));
        assert_eq!(decimal_from_value(&json!(" 40 ")), Some(Decimal::new(40, 0)));
        assert_eq!(decimal_from_value(&json!("1e3")), Some(Decimal::new(1000, 0)));
    }

    #[test]
    fn test_non_numeric_is_none() {
        assert_eq!(decimal_from_value(&json!(null)), None);
        assert_eq!(decimal_from_value(&json!(true)), None);
        assert_eq!(decimal_from_value(&json!("")), None);
        assert_eq!(decimal_from_value(&json!("abc")), None);
        assert_eq!(decimal_from_value(&json!({"amount": 1})), None);
    }

    #[test]
    fn test_out_of_range_numbers_clamp() {
        assert_eq!(decimal_from_value(&json!(1e30)), Some(Decimal::MAX));
        assert_eq!(decimal_from_value(&json!(-1e30)), Some(Decimal::MIN));
        assert_eq!(decimal_from_value(&json!("1e30")), Some(Decimal::MAX));
        assert_eq!(decimal_from_value(&json!("1e-40")), Some(Decimal::ZERO));
        assert_eq!(decimal_from_value(&json!("NaN")), None);
        assert_eq!(decimal_from_value(&json!("inf")), None);
    }
}
