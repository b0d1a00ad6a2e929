//! Firestore typed values <-> plain JSON
//!
//! Firestore wraps every value in a single-key object naming its type
//! (`{"stringValue": "DAX"}`, `{"mapValue": {"fields": {...}}}`). Integers
//! travel as decimal strings.

use firestocks_core::Fields;
use serde_json::{Map, Value, json};

use crate::error::RestError;

/// Encode one plain JSON value
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or(f64::NAN) }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => {
            let values: Vec<Value> = values.iter().map(encode).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode a document's fields
pub fn encode_fields(fields: &Fields) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, value)| (key.clone(), encode(value)))
        .collect()
}

/// Decode one typed value
pub fn decode(value: &Value) -> Result<Value, RestError> {
    let Some((kind, inner)) = value.as_object().and_then(|map| map.iter().next()) else {
        return Err(RestError::Parse(format!("not a typed value: {value}")));
    };

    let decoded = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or(false)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| RestError::Parse(format!("bad integerValue: {inner}")))?
        }
        // "NaN" and "Infinity" arrive as strings and have no JSON form
        "doubleValue" => inner
            .as_f64()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => {
            let values = match inner.get("values") {
                Some(Value::Array(values)) => values.iter().map(decode).collect::<Result<_, _>>()?,
                _ => Vec::new(),
            };
            Value::Array(values)
        }
        "mapValue" => {
            let fields = match inner.get("fields") {
                Some(Value::Object(fields)) => decode_fields(fields)?,
                _ => Fields::new(),
            };
            Value::Object(fields)
        }
        other => return Err(RestError::Parse(format!("unknown value type '{other}'"))),
    };
    Ok(decoded)
}

/// Decode a document's fields
pub fn decode_fields(fields: &Map<String, Value>) -> Result<Fields, RestError> {
    fields
        .iter()
        .map(|(key, value)| decode(value).map(|decoded| (key.clone(), decoded)))
        .collect()
}

/// Field path usable in an update mask
///
/// Names that are not plain identifiers are backquoted.
pub fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        let escaped = name.replace('\\', "\\\\").replace('`', "\\`");
        format!("`{escaped}`")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_stock_fields() {
        let fields: Fields = serde_json::from_value(json!({
            "name": "adidas AG",
            "id": 3,
            "DividendKings_value": 4.1,
            "last_price_usd": {"ADDYY": null},
            "indices": ["DAX"]
        }))
        .unwrap();

        let encoded = Value::Object(encode_fields(&fields));

        assert_eq!(encoded["name"], json!({"stringValue": "adidas AG"}));
        assert_eq!(encoded["id"], json!({"integerValue": "3"}));
        assert_eq!(encoded["DividendKings_value"], json!({"doubleValue": 4.1}));
        assert_eq!(
            encoded["last_price_usd"],
            json!({"mapValue": {"fields": {"ADDYY": {"nullValue": null}}}})
        );
        assert_eq!(
            encoded["indices"],
            json!({"arrayValue": {"values": [{"stringValue": "DAX"}]}})
        );
    }

    #[test]
    fn test_decode_listing_fields() {
        let typed = json!({
            "name": {"stringValue": "SAP SE"},
            "id": {"integerValue": "12"},
            "tags": {"arrayValue": {}},
            "prices": {"mapValue": {"fields": {"SAP.F": {"doubleValue": 171.2}}}},
            "updated": {"timestampValue": "2024-05-03T18:00:00Z"},
            "bad": {"doubleValue": "NaN"}
        });

        let decoded = decode_fields(typed.as_object().unwrap()).unwrap();

        assert_eq!(decoded["name"], json!("SAP SE"));
        assert_eq!(decoded["id"], json!(12));
        assert_eq!(decoded["tags"], json!([]));
        assert_eq!(decoded["prices"], json!({"SAP.F": 171.2}));
        assert_eq!(decoded["updated"], json!("2024-05-03T18:00:00Z"));
        assert_eq!(decoded["bad"], Value::Null);
    }

    #[test]
    fn test_decode_rejects_unknown_types() {
        assert!(decode(&json!({"vectorValue": {}})).is_err());
        assert!(decode(&json!("plain")).is_err());
    }

    #[test]
    fn test_field_path_quoting() {
        assert_eq!(field_path("DividendKings_value"), "DividendKings_value");
        assert_eq!(field_path("Piotroski F-Score_value"), "`Piotroski F-Score_value`");
        assert_eq!(field_path("1st"), "`1st`");
        assert_eq!(field_path("a`b"), "`a\\`b`");
    }
}
