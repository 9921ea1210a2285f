use fnblob_config::{ConnectionString, CredentialSource};
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};

use crate::BoxError;

/// How a storage client authenticates.
///
/// Constructed explicitly by the caller and passed to [`crate::create_blob_client`];
/// nothing in this crate looks credentials up on its own. Token acquisition
/// itself is left to the storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
  /// The managed identity of the hosting function app.
  ManagedIdentity {
    client_id: Option<String>,
    msi_endpoint: Option<String>,
  },
  /// The account key or SAS token embedded in the connection string.
  ConnectionString,
}

impl Credential {
  /// System-assigned managed identity.
  pub fn managed_identity() -> Self {
    Self::ManagedIdentity {
      client_id: None,
      msi_endpoint: None,
    }
  }

  pub fn from_source(source: &CredentialSource) -> Self {
    match source {
      CredentialSource::ManagedIdentity {
        client_id,
        msi_endpoint,
      } => Self::ManagedIdentity {
        client_id: client_id.clone(),
        msi_endpoint: msi_endpoint.clone(),
      },
      CredentialSource::ConnectionString => Self::ConnectionString,
    }
  }

  /// Configure an Azure builder for the account in `connection`.
  ///
  /// The emulator (`UseDevelopmentStorage=true`) always uses its well-known
  /// key, whatever credential was requested.
  pub(crate) fn configure(
    &self,
    builder: MicrosoftAzureBuilder,
    connection: &ConnectionString,
  ) -> Result<MicrosoftAzureBuilder, BoxError> {
    let mut builder = builder.with_account(connection.account());

    if connection.blob_endpoint.is_some() || connection.endpoint_suffix.is_some() {
      let endpoint = connection.blob_endpoint();
      let allow_http = endpoint.starts_with("http://");
      builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
    }

    if connection.use_development_storage {
      return Ok(builder.with_use_emulator(true));
    }

    match self {
      Self::ManagedIdentity {
        client_id,
        msi_endpoint,
      } => {
        if let Some(client_id) = client_id {
          builder = builder.with_client_id(client_id);
        }
        if let Some(msi_endpoint) = msi_endpoint {
          builder = builder.with_msi_endpoint(msi_endpoint);
        }
        Ok(builder)
      }
      Self::ConnectionString => {
        if let Some(key) = &connection.account_key {
          Ok(builder.with_access_key(key))
        } else if let Some(sas) = connection.sas_token() {
          // Decoded once by the builder; query pairs are re-encoded on the wire.
          Ok(builder.with_config(AzureConfigKey::SasKey, sas))
        } else {
          Err("connection string carries neither AccountKey nor SharedAccessSignature".into())
        }
      }
    }
  }
}

impl From<&CredentialSource> for Credential {
  fn from(source: &CredentialSource) -> Self {
    Self::from_source(source)
  }
}
