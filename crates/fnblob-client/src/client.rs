use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Datelike;
use fnblob_artifact::{ByteStream, ObjectStoreBackend, PutOptions, Store, byte_stream};
use fnblob_config::ConnectionString;
use fnblob_results::{FunctionDescriptor, derive_results_path};
use object_store::azure::MicrosoftAzureBuilder;
use tracing::{error, info, instrument, warn};

use crate::{BoxError, Credential, Error};

/// A handle on one blob: a store plus the key of the blob within it.
#[derive(Clone)]
pub struct BlobClient {
  store: Arc<dyn Store>,
  blob_name: String,
}

impl BlobClient {
  /// Bind a blob name on any store.
  pub fn new(store: Arc<dyn Store>, blob_name: impl Into<String>) -> Self {
    Self {
      store,
      blob_name: blob_name.into(),
    }
  }

  pub fn blob_name(&self) -> &str {
    &self.blob_name
  }

  pub async fn download(&self) -> Result<ByteStream, fnblob_artifact::Error> {
    self.store.get(&self.blob_name).await
  }

  pub async fn upload(
    &self,
    data: impl Into<Bytes>,
    options: &PutOptions,
  ) -> Result<(), fnblob_artifact::Error> {
    self
      .store
      .put(&self.blob_name, byte_stream(data), options)
      .await
  }
}

impl fmt::Debug for BlobClient {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("BlobClient")
      .field("blob_name", &self.blob_name)
      .finish_non_exhaustive()
  }
}

/// Create a client for `blob_name` in `container` on the account described by
/// `connection_string`.
///
/// `client_type` names the client's role ("source", "results") in errors and
/// logs. No request is made here; authentication problems surface on first
/// use.
#[instrument(
  name = "create_blob_client",
  skip(descriptor, connection_string, credential),
  fields(function = %descriptor.function_name())
)]
pub fn create_blob_client(
  descriptor: &FunctionDescriptor,
  connection_string: &str,
  container: &str,
  blob_name: &str,
  credential: &Credential,
  client_type: &str,
) -> Result<BlobClient, Error> {
  match build_azure_store(connection_string, container, credential) {
    Ok(store) => {
      info!("blob client created");
      Ok(BlobClient::new(Arc::new(store), blob_name))
    }
    Err(e) => {
      error!(error = %e, "blob client creation failed");
      Err(Error::client_creation(client_type, descriptor, e))
    }
  }
}

fn build_azure_store(
  connection_string: &str,
  container: &str,
  credential: &Credential,
) -> Result<ObjectStoreBackend, BoxError> {
  let connection = ConnectionString::parse(connection_string)?;
  let builder = MicrosoftAzureBuilder::new().with_container_name(container);
  let azure = credential.configure(builder, &connection)?.build()?;
  Ok(ObjectStoreBackend::new(Arc::new(azure)))
}

/// Create the results client for an invocation: the blob is the derived
/// results path for `descriptor` on `timestamp`'s date.
pub fn results_blob_client<D: Datelike>(
  descriptor: &FunctionDescriptor,
  connection_string: &str,
  container: &str,
  credential: &Credential,
  timestamp: &D,
) -> Result<BlobClient, Error> {
  let path = derive_results_path(descriptor, timestamp);
  if !path.is_well_formed() {
    warn!(path = %path, "results path segments contain '/' or are empty");
  }
  create_blob_client(
    descriptor,
    connection_string,
    container,
    path.as_str(),
    credential,
    "results",
  )
}
