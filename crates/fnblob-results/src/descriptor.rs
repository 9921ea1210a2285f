use crate::{JsonEncoder, Map, SerializationError, Value};

pub const FUNCTION_NAME_KEY: &str = "functionName";
pub const DATA_SET_KEY: &str = "dataSet";
pub const DATA_TYPE_KEY: &str = "dataType";

pub const DEFAULT_FUNCTION_NAME: &str = "unknown-function";
pub const DEFAULT_DATA_SET: &str = "unknown-dataset";
pub const DEFAULT_DATA_TYPE: &str = "unknown-data-type";

/// Metadata identifying one function invocation.
///
/// An ordered mapping from string keys to arbitrary values. `functionName`,
/// `dataSet` and `dataType` are expected but not required; the accessors for
/// them fall back to fixed defaults. A descriptor is never modified by this
/// crate, only read and copied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionDescriptor {
  fields: Map,
}

impl FunctionDescriptor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_map(fields: Map) -> Self {
    Self { fields }
  }

  /// Build a descriptor from a JSON object.
  pub fn from_json(json: serde_json::Value) -> Result<Self, SerializationError> {
    match Value::from_json(json) {
      Value::Object(fields) => Ok(Self { fields }),
      other => Err(SerializationError::NotAnObject { found: other.kind() }),
    }
  }

  /// Set a field, replacing any previous value under the same key.
  pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.fields.insert(key.into(), value.into());
    self
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.fields.get(key)
  }

  /// A field's string value. Present but non-string values count as absent.
  pub fn get_str(&self, key: &str) -> Option<&str> {
    self.get(key).and_then(Value::as_str)
  }

  pub fn function_name(&self) -> &str {
    self.get_str(FUNCTION_NAME_KEY).unwrap_or(DEFAULT_FUNCTION_NAME)
  }

  pub fn data_set(&self) -> &str {
    self.get_str(DATA_SET_KEY).unwrap_or(DEFAULT_DATA_SET)
  }

  pub fn data_type(&self) -> &str {
    self.get_str(DATA_TYPE_KEY).unwrap_or(DEFAULT_DATA_TYPE)
  }

  pub fn fields(&self) -> &Map {
    &self.fields
  }

  /// JSON text of the descriptor, for error messages and logs.
  ///
  /// Falls back to the debug form when the descriptor itself holds a value
  /// JSON cannot express, so diagnostics never fail.
  pub fn to_diagnostic_json(&self) -> String {
    match JsonEncoder::new().encode_map(&self.fields) {
      Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
      Err(_) => format!("{:?}", self.fields),
    }
  }
}

impl From<Map> for FunctionDescriptor {
  fn from(fields: Map) -> Self {
    Self::from_map(fields)
  }
}
