//! Reading fetched snapshots
//!
//! The clients hand over whatever the REST backend returned: either a bare
//! array or an envelope such as `{"data": [...], "message": "ok"}`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::result::{Error, Result};

/// Parse a snapshot into a list of items
pub fn parse_snapshot<T: DeserializeOwned>(json: &str) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(json)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(item @ Value::Object(_)) => vec![item],
            Some(_) => {
                return Err(Error::validation("`data` must be an array or an object"));
            }
            None => vec![Value::Object(map)],
        },
        _ => {
            return Err(Error::validation(
                "expected a JSON array or an object with a `data` array",
            ));
        }
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FinancialRecord;

    #[test]
    fn test_bare_array() {
        let records: Vec<FinancialRecord> =
            parse_snapshot(r#"[{"thanksgiving": 1}, {"welfare": 2}]"#).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_envelope() {
        let records: Vec<FinancialRecord> =
            parse_snapshot(r#"{"message": "ok", "data": [{"id": "a"}]}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn test_single_object() {
        let records: Vec<FinancialRecord> = parse_snapshot(r#"{"welfare": 5}"#).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_rejects_scalars() {
        let err = parse_snapshot::<FinancialRecord>("42").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = parse_snapshot::<FinancialRecord>(r#"{"data": "nope"}"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_rejects_non_object_items() {
        let err = parse_snapshot::<FinancialRecord>("[1, 2]").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
