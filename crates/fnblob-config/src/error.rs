use std::path::PathBuf;

/// Errors raised while loading or interpreting configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The configuration file could not be read.
  #[error("failed to read config file {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// The configuration document is not valid JSON for [`crate::StorageConfig`].
  #[error("invalid config: {0}")]
  Parse(#[from] serde_json::Error),

  /// The storage connection string is malformed or incomplete.
  #[error("invalid connection string: {message}")]
  ConnectionString { message: String },
}

impl ConfigError {
  pub fn connection_string(message: impl Into<String>) -> Self {
    Self::ConnectionString {
      message: message.into(),
    }
  }
}
