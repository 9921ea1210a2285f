use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::{Attribute, Attributes, ObjectStore, PutMode, PutPayload};

use crate::{ByteStream, Error, PutOptions, Store, collect};

/// Blob store backed by any [`ObjectStore`].
///
/// This is how remote blob containers are reached: the Azure backend is an
/// `object_store::azure::MicrosoftAzure` instance scoped to one container.
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend {
  inner: Arc<dyn ObjectStore>,
}

impl ObjectStoreBackend {
  pub fn new(inner: Arc<dyn ObjectStore>) -> Self {
    Self { inner }
  }

  /// An empty in-process store. Contents are lost on drop.
  pub fn in_memory() -> Self {
    Self::new(Arc::new(InMemory::new()))
  }

  fn object_path(key: &str) -> Result<Path, Error> {
    Path::parse(key).map_err(|e| Error::InvalidKey {
      key: key.to_string(),
      message: e.to_string(),
    })
  }
}

fn backend_error(key: &str, source: object_store::Error) -> Error {
  match source {
    object_store::Error::NotFound { .. } => Error::NotFound(key.to_string()),
    object_store::Error::AlreadyExists { .. } => Error::AlreadyExists(key.to_string()),
    source => Error::Backend {
      key: key.to_string(),
      source,
    },
  }
}

#[async_trait]
impl Store for ObjectStoreBackend {
  async fn get(&self, key: &str) -> Result<ByteStream, Error> {
    let path = Self::object_path(key)?;
    let result = self
      .inner
      .get(&path)
      .await
      .map_err(|e| backend_error(key, e))?;

    let key = key.to_string();
    let stream = result
      .into_stream()
      .map_err(move |e| backend_error(&key, e));
    Ok(Box::pin(stream))
  }

  async fn put(&self, key: &str, data: ByteStream, options: &PutOptions) -> Result<(), Error> {
    let path = Self::object_path(key)?;
    let body = collect(data).await?;

    let mut attributes = Attributes::new();
    attributes.insert(Attribute::ContentType, options.content_type.clone().into());

    let mode = if options.overwrite {
      PutMode::Overwrite
    } else {
      PutMode::Create
    };
    let opts = object_store::PutOptions {
      mode,
      attributes,
      ..Default::default()
    };

    self
      .inner
      .put_opts(&path, PutPayload::from(body), opts)
      .await
      .map_err(|e| backend_error(key, e))?;
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), Error> {
    let path = Self::object_path(key)?;
    self
      .inner
      .delete(&path)
      .await
      .map_err(|e| backend_error(key, e))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::byte_stream;

  #[tokio::test]
  async fn test_in_memory_put_get() {
    let store = ObjectStoreBackend::in_memory();

    store
      .put(
        "ingest/sales/raw/2023/11/07/results.json",
        byte_stream(r#"{"rows":42}"#),
        &PutOptions::new("application/json"),
      )
      .await
      .unwrap();

    let data = collect(
      store
        .get("ingest/sales/raw/2023/11/07/results.json")
        .await
        .unwrap(),
    )
    .await
    .unwrap();
    assert_eq!(&data[..], br#"{"rows":42}"#);
  }

  #[tokio::test]
  async fn test_missing_key_is_not_found() {
    let store = ObjectStoreBackend::in_memory();
    assert!(matches!(
      store.get("nope.csv").await,
      Err(Error::NotFound(key)) if key == "nope.csv"
    ));
  }

  #[tokio::test]
  async fn test_create_mode_rejects_existing() {
    let store = ObjectStoreBackend::in_memory();
    let options = PutOptions::default();

    store.put("a.json", byte_stream("1"), &options).await.unwrap();
    let err = store
      .put("a.json", byte_stream("2"), &options)
      .await
      .unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    store
      .put("a.json", byte_stream("3"), &options.clone().overwrite(true))
      .await
      .unwrap();
    let data = collect(store.get("a.json").await.unwrap()).await.unwrap();
    assert_eq!(&data[..], b"3");
  }

  #[tokio::test]
  async fn test_empty_segment_is_invalid_key() {
    let store = ObjectStoreBackend::in_memory();
    let err = store
      .put("ingest//raw/results.json", byte_stream("{}"), &PutOptions::default())
      .await
      .unwrap_err();
    assert!(matches!(err, Error::InvalidKey { .. }));
  }
}
