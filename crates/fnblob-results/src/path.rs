use std::fmt;

use chrono::Datelike;

use crate::FunctionDescriptor;

/// Final segment of every results path.
pub const RESULTS_FILE_NAME: &str = "results.json";

const SEGMENT_COUNT: usize = 7;

/// Storage key of a results document.
///
/// `<functionName>/<dataSet>/<dataType>/<YYYY>/<MM>/<DD>/results.json`
///
/// Descriptor fields are used verbatim. A field containing `/` (or an empty
/// field) still produces a path, but one whose storage layout differs from
/// the seven logical segments; see [`ResultsPath::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultsPath {
  segments: [String; SEGMENT_COUNT],
  joined: String,
}

impl ResultsPath {
  fn from_segments(segments: [String; SEGMENT_COUNT]) -> Self {
    let joined = segments.join("/");
    Self { segments, joined }
  }

  pub fn as_str(&self) -> &str {
    &self.joined
  }

  /// The seven logical segments, before joining.
  pub fn segments(&self) -> &[String] {
    &self.segments
  }

  pub fn into_string(self) -> String {
    self.joined
  }

  /// True when every logical segment is non-empty and free of `/`, i.e. the
  /// joined key splits back into exactly seven parts.
  pub fn is_well_formed(&self) -> bool {
    self
      .segments
      .iter()
      .all(|segment| !segment.is_empty() && !segment.contains('/'))
  }
}

impl fmt::Display for ResultsPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.joined)
  }
}

impl AsRef<str> for ResultsPath {
  fn as_ref(&self) -> &str {
    &self.joined
  }
}

impl From<ResultsPath> for String {
  fn from(path: ResultsPath) -> Self {
    path.joined
  }
}

/// Derive the time-partitioned results key for an invocation.
///
/// Missing (or non-string) `functionName`, `dataSet` and `dataType` fields are
/// replaced by `unknown-function`, `unknown-dataset` and `unknown-data-type`.
/// The date is written as zero-padded `YYYY/MM/DD`.
pub fn derive_results_path<D: Datelike>(
  descriptor: &FunctionDescriptor,
  timestamp: &D,
) -> ResultsPath {
  ResultsPath::from_segments([
    descriptor.function_name().to_string(),
    descriptor.data_set().to_string(),
    descriptor.data_type().to_string(),
    format!("{:04}", timestamp.year()),
    format!("{:02}", timestamp.month()),
    format!("{:02}", timestamp.day()),
    RESULTS_FILE_NAME.to_string(),
  ])
}
