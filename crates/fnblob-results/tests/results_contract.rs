//! End-to-end checks of the results contract: path, object and encoding
//! together, the way a function uses them.

use chrono::{NaiveDate, TimeZone, Utc};
use fnblob_results::{
  DATETIME_FORMAT, FunctionDescriptor, Map, Value, build_results_object, derive_results_path,
  serialize_results,
};
use serde_json::json;

#[test]
fn test_ingest_scenario() {
  let descriptor = FunctionDescriptor::from_json(json!({
    "functionName": "ingest",
    "dataSet": "sales",
    "dataType": "raw"
  }))
  .unwrap();
  let date = NaiveDate::from_ymd_opt(2023, 11, 7).unwrap();

  let path = derive_results_path(&descriptor, &date);
  let results = build_results_object(&descriptor, json!({"rows": 42}));
  let body: serde_json::Value =
    serde_json::from_slice(&serialize_results(&results).unwrap()).unwrap();

  assert_eq!(path.as_str(), "ingest/sales/raw/2023/11/07/results.json");
  assert_eq!(
    body,
    json!({
      "functionName": "ingest",
      "dataSet": "sales",
      "dataType": "raw",
      "execution_results": {"rows": 42}
    })
  );
}

#[test]
fn test_empty_descriptor_scenario() {
  let descriptor = FunctionDescriptor::new();
  let ts = Utc::now();

  let path = derive_results_path(&descriptor, &ts);
  assert!(
    path
      .as_str()
      .starts_with("unknown-function/unknown-dataset/unknown-data-type/")
  );
  assert!(path.as_str().ends_with("/results.json"));
  assert_eq!(path.as_str().split('/').count(), 7);

  let results = build_results_object(&descriptor, json!({}));
  let body: serde_json::Value =
    serde_json::from_slice(&serialize_results(&results).unwrap()).unwrap();
  assert_eq!(body, json!({"execution_results": {}}));
}

#[test]
fn test_round_trip_turns_datetimes_into_strings() {
  let started = Utc.with_ymd_and_hms(2023, 11, 7, 8, 30, 0).unwrap();
  let finished = NaiveDate::from_ymd_opt(2023, 11, 7)
    .unwrap()
    .and_hms_micro_opt(8, 31, 15, 250_000)
    .unwrap();

  let mut run = Map::new();
  run.insert("started".to_string(), Value::from(started));
  run.insert("finished".to_string(), Value::from(finished));
  run.insert("rows".to_string(), Value::from(42));
  run.insert("ratio".to_string(), Value::from(0.25));
  run.insert(
    "files".to_string(),
    Value::Array(vec![Value::from("a.csv"), Value::Null, Value::from(true)]),
  );

  let descriptor = FunctionDescriptor::new()
    .with("functionName", "ingest")
    .with("triggeredAt", started);
  let results = build_results_object(&descriptor, Value::Object(run));

  let parsed: serde_json::Value =
    serde_json::from_slice(&serialize_results(&results).unwrap()).unwrap();

  assert_eq!(
    parsed,
    json!({
      "functionName": "ingest",
      "triggeredAt": "2023-11-07T08:30:00Z",
      "execution_results": {
        "started": "2023-11-07T08:30:00Z",
        "finished": "2023-11-07T08:31:15Z",
        "rows": 42,
        "ratio": 0.25,
        "files": ["a.csv", null, true]
      }
    })
  );

  let rendered = parsed["execution_results"]["started"].as_str().unwrap();
  assert!(chrono::NaiveDateTime::parse_from_str(rendered, DATETIME_FORMAT).is_ok());
}

#[test]
fn test_round_trip_without_datetimes_is_identity() {
  let original = json!({
    "functionName": "report",
    "nested": {"list": [1, 2.5, "three", [false]], "empty": {}},
    "execution_results": {"ok": true}
  });
  let descriptor = FunctionDescriptor::from_json(original.clone()).unwrap();
  let results = build_results_object(&descriptor, json!({"ok": true}));

  let parsed: serde_json::Value =
    serde_json::from_slice(&serialize_results(&results).unwrap()).unwrap();
  assert_eq!(parsed, original);
}

#[test]
fn test_serde_results_struct_keeps_datetime_format() {
  #[derive(serde::Serialize)]
  struct Stage {
    name: &'static str,
    #[serde(with = "fnblob_results::datetime")]
    finished: chrono::DateTime<Utc>,
  }

  #[derive(serde::Serialize)]
  struct Run {
    stages: Vec<Stage>,
  }

  let finished =
    Utc.with_ymd_and_hms(2023, 11, 7, 8, 30, 0).unwrap() + chrono::TimeDelta::milliseconds(250);
  let run = Run {
    stages: vec![Stage {
      name: "load",
      finished,
    }],
  };

  let execution_results = Value::from_serialize(&run).unwrap();
  let results = build_results_object(&FunctionDescriptor::new(), execution_results);
  let body = String::from_utf8(serialize_results(&results).unwrap()).unwrap();

  assert_eq!(
    body,
    r#"{"execution_results":{"stages":[{"name":"load","finished":"2023-11-07T08:30:00Z"}]}}"#
  );
}
