//! Client error types.

use std::path::PathBuf;

use fnblob_results::{FunctionDescriptor, SerializationError};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end the current invocation.
///
/// `descriptor` fields hold the invocation descriptor rendered as JSON.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The storage client could not be constructed.
  #[error("unable to create {client_type} blob client: {descriptor}: {source}")]
  ClientCreation {
    client_type: String,
    descriptor: String,
    #[source]
    source: BoxError,
  },

  /// The source blob could not be fetched or written locally.
  #[error("unable to download source file: {descriptor}: {source}")]
  Download {
    descriptor: String,
    #[source]
    source: fnblob_artifact::Error,
  },

  /// The results blob could not be written.
  #[error("unable to upload results file: {descriptor}: {source}")]
  Upload {
    descriptor: String,
    #[source]
    source: fnblob_artifact::Error,
  },

  /// The results object is not JSON-encodable.
  #[error("unable to serialize results: {descriptor}: {source}")]
  Serialization {
    descriptor: String,
    #[source]
    source: SerializationError,
  },

  /// A local CSV file could not be read.
  #[error("unable to read csv file {}: {source}", path.display())]
  CsvRead {
    path: PathBuf,
    #[source]
    source: csv::Error,
  },
}

impl Error {
  pub fn client_creation(
    client_type: impl Into<String>,
    descriptor: &FunctionDescriptor,
    source: impl Into<BoxError>,
  ) -> Self {
    Self::ClientCreation {
      client_type: client_type.into(),
      descriptor: descriptor.to_diagnostic_json(),
      source: source.into(),
    }
  }

  pub fn download(descriptor: &FunctionDescriptor, source: fnblob_artifact::Error) -> Self {
    Self::Download {
      descriptor: descriptor.to_diagnostic_json(),
      source,
    }
  }

  pub fn upload(descriptor: &FunctionDescriptor, source: fnblob_artifact::Error) -> Self {
    Self::Upload {
      descriptor: descriptor.to_diagnostic_json(),
      source,
    }
  }

  pub fn serialization(descriptor: &FunctionDescriptor, source: SerializationError) -> Self {
    Self::Serialization {
      descriptor: descriptor.to_diagnostic_json(),
      source,
    }
  }
}
