//! fnblob Results
//!
//! The pure core of fnblob: everything a function needs to decide *where* its
//! results go and *what* gets written there, with no I/O.
//!
//! - [`derive_results_path`] maps a [`FunctionDescriptor`] and a date to the
//!   time-partitioned key `function/dataset/datatype/YYYY/MM/DD/results.json`.
//! - [`build_results_object`] merges the descriptor with the caller's
//!   execution results.
//! - [`serialize_results`] encodes the merged object as JSON, rendering
//!   date/time values as `YYYY-MM-DDTHH:MM:SSZ`. Serde-derived results use
//!   [`datetime`] on their date/time fields for the same format.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use fnblob_results::{FunctionDescriptor, Value, build_results_object, derive_results_path};
//!
//! let descriptor = FunctionDescriptor::new()
//!   .with("functionName", "ingest")
//!   .with("dataSet", "sales")
//!   .with("dataType", "raw");
//! let date = NaiveDate::from_ymd_opt(2023, 11, 7).unwrap();
//!
//! let path = derive_results_path(&descriptor, &date);
//! assert_eq!(path.as_str(), "ingest/sales/raw/2023/11/07/results.json");
//!
//! let rows = Value::from_json(serde_json::json!({"rows": 42}));
//! let results = build_results_object(&descriptor, rows.clone());
//! assert_eq!(results.execution_results(), &rows);
//! ```

pub mod datetime;
mod descriptor;
mod encode;
mod error;
mod path;
mod results;
mod value;

pub use descriptor::{
  DATA_SET_KEY, DATA_TYPE_KEY, DEFAULT_DATA_SET, DEFAULT_DATA_TYPE, DEFAULT_FUNCTION_NAME,
  FUNCTION_NAME_KEY, FunctionDescriptor,
};
pub use encode::{DATETIME_FORMAT, JsonEncoder};
pub use error::SerializationError;
pub use path::{RESULTS_FILE_NAME, ResultsPath, derive_results_path};
pub use results::{EXECUTION_RESULTS_KEY, ResultsObject, build_results_object, serialize_results};
pub use value::{Map, Value};
