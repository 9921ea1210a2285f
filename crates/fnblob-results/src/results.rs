use crate::{FunctionDescriptor, JsonEncoder, Map, SerializationError, Value};

/// Key under which execution results are stored in a results object.
pub const EXECUTION_RESULTS_KEY: &str = "execution_results";

/// A descriptor merged with the execution results of one invocation.
///
/// Always contains [`EXECUTION_RESULTS_KEY`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsObject {
  fields: Map,
}

impl ResultsObject {
  pub fn fields(&self) -> &Map {
    &self.fields
  }

  pub fn get(&self, key: &str) -> Option<&Value> {
    self.fields.get(key)
  }

  pub fn execution_results(&self) -> &Value {
    // Present by construction.
    self.fields.get(EXECUTION_RESULTS_KEY).unwrap_or(&Value::Null)
  }
}

impl From<ResultsObject> for Value {
  fn from(results: ResultsObject) -> Self {
    Value::Object(results.fields)
  }
}

/// Merge a descriptor with execution results.
///
/// The descriptor's fields are copied in order and `execution_results` is set
/// to `custom_results`. If the descriptor already has an `execution_results`
/// field it is overwritten in place. The descriptor itself is left untouched.
pub fn build_results_object(
  descriptor: &FunctionDescriptor,
  custom_results: impl Into<Value>,
) -> ResultsObject {
  let mut fields = descriptor.fields().clone();
  fields.insert(EXECUTION_RESULTS_KEY.to_string(), custom_results.into());
  ResultsObject { fields }
}

/// Encode a results object as compact UTF-8 JSON.
///
/// Date/time values anywhere in the object are written as
/// `YYYY-MM-DDTHH:MM:SSZ`.
pub fn serialize_results(results: &ResultsObject) -> Result<Vec<u8>, SerializationError> {
  JsonEncoder::new().encode_map(&results.fields)
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_merges_descriptor_and_results() {
    let descriptor = FunctionDescriptor::from_json(json!({
      "functionName": "ingest",
      "dataSet": "sales",
      "dataType": "raw"
    }))
    .unwrap();

    let results = build_results_object(&descriptor, json!({"rows": 42}));

    assert_eq!(
      Value::from(results),
      Value::from_json(json!({
        "functionName": "ingest",
        "dataSet": "sales",
        "dataType": "raw",
        "execution_results": {"rows": 42}
      }))
    );
  }

  #[test]
  fn test_descriptor_is_not_mutated() {
    let descriptor = FunctionDescriptor::new().with("functionName", "ingest");
    let before = descriptor.clone();

    let results = build_results_object(&descriptor, json!({}));

    assert_eq!(descriptor, before);
    assert!(descriptor.get(EXECUTION_RESULTS_KEY).is_none());
    assert_eq!(results.fields().len(), 2);
  }

  #[test]
  fn test_existing_execution_results_is_overwritten_in_place() {
    let descriptor = FunctionDescriptor::new()
      .with(EXECUTION_RESULTS_KEY, "stale")
      .with("functionName", "ingest");

    let results = build_results_object(&descriptor, 5);

    let keys: Vec<&str> = results.fields().keys().map(String::as_str).collect();
    assert_eq!(keys, vec![EXECUTION_RESULTS_KEY, "functionName"]);
    assert_eq!(results.execution_results(), &Value::from(5));
    assert_eq!(descriptor.get_str(EXECUTION_RESULTS_KEY), Some("stale"));
  }

  #[test]
  fn test_non_object_results_are_kept_as_is() {
    let results = build_results_object(&FunctionDescriptor::new(), vec![Value::from("a")]);
    assert_eq!(results.execution_results(), &Value::Array(vec![Value::from("a")]));
  }

  #[test]
  fn test_serialize_results() {
    let descriptor = FunctionDescriptor::new().with("functionName", "ingest");
    let results = build_results_object(&descriptor, json!({"rows": 42}));

    let bytes = serialize_results(&results).unwrap();
    assert_eq!(
      std::str::from_utf8(&bytes).unwrap(),
      r#"{"functionName":"ingest","execution_results":{"rows":42}}"#
    );
  }

  #[test]
  fn test_serialize_rejects_nan() {
    let results = build_results_object(&FunctionDescriptor::new(), f64::NAN);
    let err = serialize_results(&results).unwrap_err();
    assert!(matches!(
      err,
      SerializationError::Unencodable { ref location, .. } if location == EXECUTION_RESULTS_KEY
    ));
  }
}
