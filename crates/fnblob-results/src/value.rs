//! The value model shared by descriptors and execution results.
//!
//! JSON alone cannot carry date/time values, and callers routinely put
//! timestamps into their results. [`Value`] is JSON plus a date/time variant
//! and a raw float variant; the encoder decides how both are written out.

use chrono::{DateTime, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::SerializationError;

/// Ordered string-keyed mapping of values.
pub type Map = IndexMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Bool(bool),
  /// A number already known to be representable in JSON.
  Number(serde_json::Number),
  /// A raw float. Non-finite values are rejected at encoding time.
  Float(f64),
  String(String),
  DateTime(DateTime<Utc>),
  Array(Vec<Value>),
  Object(Map),
}

impl Value {
  /// Convert a JSON document. Never fails: every JSON value has a counterpart.
  pub fn from_json(json: serde_json::Value) -> Self {
    match json {
      serde_json::Value::Null => Value::Null,
      serde_json::Value::Bool(b) => Value::Bool(b),
      serde_json::Value::Number(n) => Value::Number(n),
      serde_json::Value::String(s) => Value::String(s),
      serde_json::Value::Array(items) => {
        Value::Array(items.into_iter().map(Value::from_json).collect())
      }
      serde_json::Value::Object(fields) => Value::Object(
        fields
          .into_iter()
          .map(|(k, v)| (k, Value::from_json(v)))
          .collect(),
      ),
    }
  }

  /// Convert any serializable value.
  ///
  /// Goes through `serde_json`, so date/time fields arrive as whatever string
  /// their serde impl writes. Annotate them with
  /// `#[serde(with = "fnblob_results::datetime")]` to get the results format;
  /// chrono's default keeps fractional seconds.
  pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, SerializationError> {
    let json = serde_json::to_value(value)?;
    Ok(Self::from_json(json))
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_object(&self) -> Option<&Map> {
    match self {
      Value::Object(map) => Some(map),
      _ => None,
    }
  }

  /// Look up a key when this value is an object.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.as_object().and_then(|map| map.get(key))
  }

  /// Short type name for diagnostics.
  pub fn kind(&self) -> &'static str {
    match self {
      Value::Null => "null",
      Value::Bool(_) => "bool",
      Value::Number(_) => "number",
      Value::Float(_) => "float",
      Value::String(_) => "string",
      Value::DateTime(_) => "datetime",
      Value::Array(_) => "array",
      Value::Object(_) => "object",
    }
  }
}

impl From<serde_json::Value> for Value {
  fn from(json: serde_json::Value) -> Self {
    Value::from_json(json)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Bool(b)
  }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self {
    Value::Number(n.into())
  }
}

impl From<i32> for Value {
  fn from(n: i32) -> Self {
    Value::Number(n.into())
  }
}

impl From<u64> for Value {
  fn from(n: u64) -> Self {
    Value::Number(n.into())
  }
}

impl From<f64> for Value {
  fn from(f: f64) -> Self {
    Value::Float(f)
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s)
  }
}

impl From<DateTime<Utc>> for Value {
  fn from(dt: DateTime<Utc>) -> Self {
    Value::DateTime(dt)
  }
}

/// Naive date/times are taken to be UTC.
impl From<NaiveDateTime> for Value {
  fn from(dt: NaiveDateTime) -> Self {
    Value::DateTime(dt.and_utc())
  }
}

impl From<Vec<Value>> for Value {
  fn from(items: Vec<Value>) -> Self {
    Value::Array(items)
  }
}

impl From<Map> for Value {
  fn from(map: Map) -> Self {
    Value::Object(map)
  }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(value: Option<T>) -> Self {
    value.map_or(Value::Null, Into::into)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use chrono::NaiveDate;
  use serde_json::json;

  use super::*;

  #[test]
  fn test_from_json_preserves_key_order() {
    let value = Value::from_json(json!({"b": 1, "a": [true, null], "c": {"d": "x"}}));
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["b", "a", "c"]);
    assert_eq!(value.get("c").and_then(|c| c.get("d")), Some(&Value::from("x")));
  }

  #[test]
  fn test_naive_datetime_is_utc() {
    let naive = NaiveDate::from_ymd_opt(2024, 1, 2)
      .unwrap()
      .and_hms_opt(3, 4, 5)
      .unwrap();
    let Value::DateTime(dt) = Value::from(naive) else {
      panic!("expected datetime");
    };
    assert_eq!(dt.naive_utc(), naive);
  }

  #[test]
  fn test_from_serialize_struct() {
    #[derive(Serialize)]
    struct Rows {
      rows: u32,
      source: &'static str,
    }

    let value = Value::from_serialize(&Rows { rows: 42, source: "a.csv" }).unwrap();
    assert_eq!(value, Value::from_json(json!({"rows": 42, "source": "a.csv"})));
  }

  #[test]
  fn test_from_serialize_rejects_non_string_keys() {
    let mut by_pair = HashMap::new();
    by_pair.insert((1, 2), "x");

    let err = Value::from_serialize(&by_pair).unwrap_err();
    assert!(matches!(err, SerializationError::Json(_)));
  }

  #[test]
  fn test_option_into_value() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::String("x".to_string()));
  }
}
