//! Reading downloaded CSV files.
//!
//! Source files are produced by systems that write ISO-8859-1, so every byte
//! is decoded as the Unicode code point of the same value. Decoding cannot
//! fail, which means UTF-8 input is mis-read rather than rejected.

use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use indexmap::IndexMap;

use crate::Error;

/// One data row, keyed by header name in header order. A column the row is
/// too short to reach is `None`.
pub type CsvRow = IndexMap<String, Option<String>>;

/// Read a CSV file with a header row into one map per data row.
///
/// Every row carries every header column, `None` where the row ends early.
/// Values beyond the last header column have no name to go under and are
/// dropped. Blank lines are skipped.
pub fn read_csv_file(path: impl AsRef<Path>) -> Result<Vec<CsvRow>, Error> {
  let path = path.as_ref();
  let csv_error = |source| Error::CsvRead {
    path: path.to_path_buf(),
    source,
  };

  let mut reader = ReaderBuilder::new()
    .flexible(true)
    .from_path(path)
    .map_err(csv_error)?;

  let headers: Vec<String> = reader
    .byte_headers()
    .map_err(csv_error)?
    .iter()
    .map(latin1)
    .collect();

  let mut rows = Vec::new();
  let mut record = ByteRecord::new();
  while reader.read_byte_record(&mut record).map_err(csv_error)? {
    let row: CsvRow = headers
      .iter()
      .enumerate()
      .map(|(i, header)| (header.clone(), record.get(i).map(latin1)))
      .collect();
    rows.push(row);
  }

  Ok(rows)
}

fn latin1(bytes: &[u8]) -> String {
  bytes.iter().map(|&b| char::from(b)).collect()
}
