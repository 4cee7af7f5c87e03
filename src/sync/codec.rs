//! JSON encoding of field maps for the pending queue.
//!
//! The stored text is a JSON object with one entry per field. Numbers written
//! without a fraction decode as `Int`, numbers with one as `Decimal`, and
//! strings always decode as `Text`. A `DateTime` is the only non-scalar entry:
//! `{"$datetime": "YYYY-MM-DDTHH:MM:SS[.fff]"}`.

use chrono::NaiveDateTime;
use serde_json::{Map, Number, Value};

use crate::error_handling::DatabaseError;
use crate::storage::{FieldMap, SqlValue};

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATETIME_TAG: &str = "$datetime";

/// Encodes a field map as a compact JSON object.
///
/// # Errors
///
/// Returns `DatabaseError::SerializationError` for NaN or infinite decimals,
/// which JSON cannot represent.
pub fn serialize_field_map(fields: &FieldMap) -> Result<String, DatabaseError> {
    let mut object = Map::with_capacity(fields.len());
    for (key, value) in fields {
        object.insert(key.clone(), to_json(key, value)?);
    }
    Ok(serde_json::to_string(&Value::Object(object))?)
}

/// Decodes text produced by `serialize_field_map`.
///
/// # Errors
///
/// Returns `DatabaseError::SerializationError` for malformed JSON, a root that
/// is not an object, or nested arrays and objects other than a tagged
/// datetime.
pub fn deserialize_field_map(text: &str) -> Result<FieldMap, DatabaseError> {
    let object = match serde_json::from_str::<Value>(text)? {
        Value::Object(object) => object,
        other => {
            return Err(DatabaseError::SerializationError(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            )))
        }
    };

    object
        .into_iter()
        .map(|(key, value)| from_json(&key, value).map(|v| (key, v)))
        .collect()
}

fn to_json(key: &str, value: &SqlValue) -> Result<Value, DatabaseError> {
    let json = match value {
        SqlValue::Null => Value::Null,
        SqlValue::Int(v) => Value::from(*v),
        SqlValue::Decimal(v) => Number::from_f64(*v).map(Value::Number).ok_or_else(|| {
            DatabaseError::SerializationError(format!("field {key} holds non-finite number {v}"))
        })?,
        SqlValue::Text(v) => Value::String(v.clone()),
        SqlValue::DateTime(v) => {
            let mut tagged = Map::with_capacity(1);
            tagged.insert(
                DATETIME_TAG.to_string(),
                Value::String(v.format(DATETIME_FORMAT).to_string()),
            );
            Value::Object(tagged)
        }
        SqlValue::Bool(v) => Value::Bool(*v),
    };
    Ok(json)
}

fn from_json(key: &str, value: Value) -> Result<SqlValue, DatabaseError> {
    let value = match value {
        Value::Null => SqlValue::Null,
        Value::Bool(v) => SqlValue::Bool(v),
        Value::Number(n) => match n.as_i64() {
            Some(v) => SqlValue::Int(v),
            None => SqlValue::Decimal(n.as_f64().ok_or_else(|| {
                DatabaseError::SerializationError(format!("field {key} holds unreadable number {n}"))
            })?),
        },
        Value::String(s) => SqlValue::Text(s),
        Value::Object(object) => SqlValue::DateTime(tagged_datetime(key, object)?),
        other => {
            return Err(DatabaseError::SerializationError(format!(
                "field {key} holds {}, only scalars are supported",
                json_kind(&other)
            )))
        }
    };
    Ok(value)
}

fn tagged_datetime(key: &str, object: Map<String, Value>) -> Result<NaiveDateTime, DatabaseError> {
    let mut entries = object.into_iter();
    match (entries.next(), entries.next()) {
        (Some((tag, Value::String(text))), None) if tag == DATETIME_TAG => {
            NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT).map_err(|e| {
                DatabaseError::SerializationError(format!(
                    "field {key} holds invalid datetime {text:?}: {e}"
                ))
            })
        }
        _ => Err(DatabaseError::SerializationError(format!(
            "field {key} holds an object, only scalars and {{\"{DATETIME_TAG}\": ..}} are supported"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn guest_fields() -> FieldMap {
        FieldMap::from([
            ("name".to_string(), SqlValue::from("Alice")),
            ("age".to_string(), SqlValue::from(30)),
        ])
    }

    #[test]
    fn test_alice_encoding() {
        let text = serialize_field_map(&guest_fields()).unwrap();
        assert_eq!(text, r#"{"age":30,"name":"Alice"}"#);
    }

    #[test]
    fn test_round_trip_all_scalars_with_null() {
        let checked_in = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_milli_opt(14, 5, 0, 250)
            .unwrap();
        let fields = FieldMap::from([
            ("note".to_string(), SqlValue::Null),
            ("nights".to_string(), SqlValue::Int(-3)),
            ("rate".to_string(), SqlValue::Decimal(30.0)),
            ("discount".to_string(), SqlValue::Decimal(0.125)),
            ("guest".to_string(), SqlValue::Text("Bob \"B\" Smith".to_string())),
            ("checked_in".to_string(), SqlValue::DateTime(checked_in)),
            ("vip".to_string(), SqlValue::Bool(true)),
        ]);

        let text = serialize_field_map(&fields).unwrap();
        assert_eq!(deserialize_field_map(&text).unwrap(), fields);
    }

    #[test]
    fn test_whole_datetime_round_trip() {
        let dt = NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let fields = FieldMap::from([("at".to_string(), SqlValue::DateTime(dt))]);
        let text = serialize_field_map(&fields).unwrap();
        assert_eq!(text, r#"{"at":{"$datetime":"2025-01-01T00:00:00"}}"#);
        assert_eq!(deserialize_field_map(&text).unwrap(), fields);
    }

    #[test]
    fn test_datetime_shaped_text_stays_text() {
        let fields = FieldMap::from([
            ("body".to_string(), SqlValue::from("2024-03-09T14:05:00")),
            ("tag".to_string(), SqlValue::from("$datetime")),
        ]);
        let text = serialize_field_map(&fields).unwrap();
        assert_eq!(text, r#"{"body":"2024-03-09T14:05:00","tag":"$datetime"}"#);
        assert_eq!(deserialize_field_map(&text).unwrap(), fields);
    }

    #[test]
    fn test_malformed_tagged_datetime_rejected() {
        for text in [
            r#"{"at":{"$datetime":"yesterday"}}"#,
            r#"{"at":{"$datetime":20250101}}"#,
            r#"{"at":{"$datetime":"2025-01-01T00:00:00","extra":1}}"#,
        ] {
            assert!(
                matches!(
                    deserialize_field_map(text),
                    Err(DatabaseError::SerializationError(_))
                ),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_finite_decimal_rejected() {
        let fields = FieldMap::from([("rate".to_string(), SqlValue::Decimal(f64::NAN))]);
        assert!(matches!(
            serialize_field_map(&fields),
            Err(DatabaseError::SerializationError(_))
        ));
    }

    #[test]
    fn test_nested_values_rejected() {
        for text in [r#"{"a":[1,2]}"#, r#"{"a":{"b":1}}"#, "[1]", "42", "{broken"] {
            assert!(
                matches!(
                    deserialize_field_map(text),
                    Err(DatabaseError::SerializationError(_))
                ),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn test_empty_object() {
        assert!(deserialize_field_map("{}").unwrap().is_empty());
    }
}
