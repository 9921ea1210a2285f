use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConnectionString};

/// Storage settings for one function deployment.
///
/// ```json
/// {
///   "connection_string": "AccountName=acct;EndpointSuffix=core.windows.net",
///   "source_container": "landing",
///   "results_container": "results",
///   "credential": { "type": "managed_identity", "client_id": "..." }
/// }
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
  /// Azure storage connection string.
  pub connection_string: String,
  /// Container holding the blobs a function reads.
  pub source_container: String,
  /// Container results documents are written to.
  pub results_container: String,
  /// How the storage client authenticates.
  #[serde(default)]
  pub credential: CredentialSource,
}

/// Where storage credentials come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialSource {
  /// The managed identity of the hosting function app.
  ManagedIdentity {
    /// Client id of a user-assigned identity. System-assigned when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    /// Override for the identity endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    msi_endpoint: Option<String>,
  },
  /// Use the account key or SAS token carried by the connection string.
  ConnectionString,
}

impl Default for CredentialSource {
  fn default() -> Self {
    Self::ManagedIdentity {
      client_id: None,
      msi_endpoint: None,
    }
  }
}

impl StorageConfig {
  pub fn from_json(json: &str) -> Result<Self, ConfigError> {
    let config: Self = serde_json::from_str(json)?;
    config.connection()?;
    Ok(config)
  }

  /// Load and validate a JSON config file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&json)
  }

  pub fn connection(&self) -> Result<ConnectionString, ConfigError> {
    ConnectionString::parse(&self.connection_string)
  }
}

impl std::fmt::Debug for StorageConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StorageConfig")
      .field("connection_string", &"<redacted>")
      .field("source_container", &self.source_container)
      .field("results_container", &self.results_container)
      .field("credential", &self.credential)
      .finish()
  }
}
