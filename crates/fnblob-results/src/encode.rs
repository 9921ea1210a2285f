//! JSON encoding of [`Value`] trees.
//!
//! The encoder walks the tree once. Date/time values are handled first and
//! rendered with [`DATETIME_FORMAT`]; every other variant falls through to
//! its plain JSON counterpart. Anything without a JSON form is reported with
//! its location in the tree, e.g. `execution_results.scores[2]`.

use crate::{Map, SerializationError, Value};

/// Format applied to every date/time value: UTC, seconds precision, `Z` suffix.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Encodes [`Value`] trees as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
  pretty: bool,
}

impl JsonEncoder {
  /// Compact output, the form uploaded to storage.
  pub fn new() -> Self {
    Self::default()
  }

  /// Indented output, for humans.
  pub fn pretty() -> Self {
    Self { pretty: true }
  }

  /// Encode a value to UTF-8 JSON bytes.
  pub fn encode(&self, value: &Value) -> Result<Vec<u8>, SerializationError> {
    let json = self.to_json(value)?;
    self.write(&json)
  }

  /// Encode a mapping as a JSON object.
  pub fn encode_map(&self, map: &Map) -> Result<Vec<u8>, SerializationError> {
    let json = self.map_to_json(map, &mut Location::root())?;
    self.write(&json)
  }

  /// Convert a value to a `serde_json` tree, applying the date/time format.
  pub fn to_json(&self, value: &Value) -> Result<serde_json::Value, SerializationError> {
    self.visit(value, &mut Location::root())
  }

  fn write(&self, json: &serde_json::Value) -> Result<Vec<u8>, SerializationError> {
    let bytes = if self.pretty {
      serde_json::to_vec_pretty(json)?
    } else {
      serde_json::to_vec(json)?
    };
    Ok(bytes)
  }

  fn visit(
    &self,
    value: &Value,
    location: &mut Location,
  ) -> Result<serde_json::Value, SerializationError> {
    let json = match value {
      Value::DateTime(dt) => serde_json::Value::String(dt.format(DATETIME_FORMAT).to_string()),
      Value::Null => serde_json::Value::Null,
      Value::Bool(b) => serde_json::Value::Bool(*b),
      Value::Number(n) => serde_json::Value::Number(n.clone()),
      Value::Float(f) => serde_json::Number::from_f64(*f)
        .map(serde_json::Value::Number)
        .ok_or_else(|| {
          SerializationError::unencodable(location.to_string(), format!("non-finite float {f}"))
        })?,
      Value::String(s) => serde_json::Value::String(s.clone()),
      Value::Array(items) => {
        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
          location.push_index(index);
          let encoded = self.visit(item, location);
          location.pop();
          out.push(encoded?);
        }
        serde_json::Value::Array(out)
      }
      Value::Object(map) => self.map_to_json(map, location)?,
    };
    Ok(json)
  }

  fn map_to_json(
    &self,
    map: &Map,
    location: &mut Location,
  ) -> Result<serde_json::Value, SerializationError> {
    let mut out = serde_json::Map::with_capacity(map.len());
    for (key, item) in map {
      location.push_key(key);
      let encoded = self.visit(item, location);
      location.pop();
      out.insert(key.clone(), encoded?);
    }
    Ok(serde_json::Value::Object(out))
  }
}

/// Path from the root of the tree to the value being encoded.
#[derive(Debug, Default)]
struct Location {
  segments: Vec<Segment>,
}

#[derive(Debug)]
enum Segment {
  Key(String),
  Index(usize),
}

impl Location {
  fn root() -> Self {
    Self::default()
  }

  fn push_key(&mut self, key: &str) {
    self.segments.push(Segment::Key(key.to_string()));
  }

  fn push_index(&mut self, index: usize) {
    self.segments.push(Segment::Index(index));
  }

  fn pop(&mut self) {
    self.segments.pop();
  }
}

impl std::fmt::Display for Location {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.segments.is_empty() {
      return f.write_str("<root>");
    }
    for (i, segment) in self.segments.iter().enumerate() {
      match segment {
        Segment::Key(key) if i == 0 => write!(f, "{key}")?,
        Segment::Key(key) => write!(f, ".{key}")?,
        Segment::Index(index) => write!(f, "[{index}]")?,
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use chrono::{NaiveDate, TimeZone, Utc};
  use serde_json::json;

  use super::*;

  #[test]
  fn test_datetime_format() {
    let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let json = JsonEncoder::new().to_json(&Value::from(dt)).unwrap();
    assert_eq!(json, json!("2024-01-02T03:04:05Z"));
  }

  #[test]
  fn test_datetime_drops_fractional_seconds() {
    let naive = NaiveDate::from_ymd_opt(2023, 11, 7)
      .unwrap()
      .and_hms_milli_opt(23, 59, 58, 999)
      .unwrap();
    let json = JsonEncoder::new().to_json(&Value::from(naive)).unwrap();
    assert_eq!(json, json!("2023-11-07T23:59:58Z"));
  }

  #[test]
  fn test_nested_datetimes() {
    let dt = Utc.with_ymd_and_hms(2023, 11, 7, 12, 0, 0).unwrap();
    let mut inner = Map::new();
    inner.insert("finished".to_string(), Value::from(dt));
    inner.insert(
      "batches".to_string(),
      Value::Array(vec![Value::from(dt), Value::from(1)]),
    );

    let json = JsonEncoder::new().to_json(&Value::Object(inner)).unwrap();
    assert_eq!(
      json,
      json!({
        "finished": "2023-11-07T12:00:00Z",
        "batches": ["2023-11-07T12:00:00Z", 1]
      })
    );
  }

  #[test]
  fn test_encode_is_compact_and_ordered() {
    let value = Value::from_json(json!({"z": 1, "a": [1.5, "x", null, false]}));
    let bytes = JsonEncoder::new().encode(&value).unwrap();
    assert_eq!(
      String::from_utf8(bytes).unwrap(),
      r#"{"z":1,"a":[1.5,"x",null,false]}"#
    );
  }

  #[test]
  fn test_pretty_encoding() {
    let value = Value::from_json(json!({"a": 1}));
    let bytes = JsonEncoder::pretty().encode(&value).unwrap();
    assert_eq!(String::from_utf8(bytes).unwrap(), "{\n  \"a\": 1\n}");
  }

  #[test]
  fn test_non_finite_float_reports_location() {
    let mut results = Map::new();
    results.insert(
      "scores".to_string(),
      Value::Array(vec![Value::from(0.5), Value::from(1.0), Value::from(f64::INFINITY)]),
    );
    let mut root = Map::new();
    root.insert("execution_results".to_string(), Value::Object(results));

    let err = JsonEncoder::new().encode_map(&root).unwrap_err();
    match err {
      SerializationError::Unencodable { location, .. } => {
        assert_eq!(location, "execution_results.scores[2]");
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn test_root_location() {
    let err = JsonEncoder::new().encode(&Value::Float(f64::NAN)).unwrap_err();
    assert!(err.to_string().contains("<root>"));
  }
}
