/// Errors raised when a value cannot be written as JSON.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
  /// A value in the tree has no JSON representation (e.g. a NaN float).
  #[error("value at '{location}' is not JSON-encodable: {message}")]
  Unencodable { location: String, message: String },

  /// The underlying JSON encoder failed.
  #[error("json encoding failed: {0}")]
  Json(#[from] serde_json::Error),

  /// A descriptor was built from JSON that is not an object.
  #[error("descriptor must be a JSON object, got {found}")]
  NotAnObject { found: &'static str },
}

impl SerializationError {
  pub fn unencodable(location: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Unencodable {
      location: location.into(),
      message: message.into(),
    }
  }
}
