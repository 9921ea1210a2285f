//! Serde support for the results date/time format.
//!
//! chrono's own serde impls write RFC 3339 with fractional seconds, which is
//! not what results files carry. Structs that go through
//! [`Value::from_serialize`](crate::Value::from_serialize) should mark their
//! date/time fields:
//!
//! ```
//! use chrono::{DateTime, TimeZone, Utc};
//! use serde::Serialize;
//! use fnblob_results::Value;
//!
//! #[derive(Serialize)]
//! struct Run {
//!   #[serde(with = "fnblob_results::datetime")]
//!   finished: DateTime<Utc>,
//! }
//!
//! let run = Run { finished: Utc.with_ymd_and_hms(2023, 11, 7, 8, 30, 0).unwrap() };
//! let value = Value::from_serialize(&run).unwrap();
//! assert_eq!(value.get("finished"), Some(&Value::from("2023-11-07T08:30:00Z")));
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};

use crate::DATETIME_FORMAT;

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
  serializer.collect_str(&value.format(DATETIME_FORMAT))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
  let raw = String::deserialize(deserializer)?;
  parse(&raw).map_err(de::Error::custom)
}

fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
  NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map(|dt| dt.and_utc())
}

/// The same format for `Option<DateTime<Utc>>` fields; `None` is `null`.
pub mod option {
  use chrono::{DateTime, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de};

  pub fn serialize<S: Serializer>(
    value: &Option<DateTime<Utc>>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    match value {
      Some(dt) => super::serialize(dt, serializer),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<Option<DateTime<Utc>>, D::Error> {
    Option::<String>::deserialize(deserializer)?
      .map(|raw| super::parse(&raw))
      .transpose()
      .map_err(de::Error::custom)
  }
}
