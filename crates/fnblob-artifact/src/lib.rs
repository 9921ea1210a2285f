//! fnblob Artifact
//!
//! This crate provides the blob storage trait and implementations used by
//! fnblob. Blobs are the source files a function downloads and the results
//! documents it uploads.
//!
//! The [`Store`] trait is the storage collaborator seam: callers address blobs
//! by key and never see the transport. Implementations handle the actual
//! storage (local filesystem, Azure Blob via `object_store`, in-memory).
//!
//! The trait uses async streaming so large source files never need to be held
//! in memory at once.

mod fs;
mod object;

pub use fs::FsStore;
pub use object::ObjectStoreBackend;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt, stream};
use std::pin::Pin;

/// A boxed stream of bytes for blob data.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Error>> + Send>>;

/// Error type for blob storage operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The requested blob was not found.
  #[error("blob not found: {0}")]
  NotFound(String),

  /// A blob already exists and the write did not allow overwriting it.
  #[error("blob already exists: {0}")]
  AlreadyExists(String),

  /// The key cannot be used as a storage path.
  #[error("invalid blob key '{key}': {message}")]
  InvalidKey { key: String, message: String },

  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The remote storage backend reported an error.
  #[error("storage backend error for '{key}': {source}")]
  Backend {
    key: String,
    #[source]
    source: object_store::Error,
  },
}

/// Options for [`Store::put`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutOptions {
  /// MIME type recorded with the blob, where the backend supports it.
  pub content_type: String,
  /// Replace an existing blob at the same key. When false, writing to an
  /// existing key fails with [`Error::AlreadyExists`].
  pub overwrite: bool,
}

impl PutOptions {
  pub fn new(content_type: impl Into<String>) -> Self {
    Self {
      content_type: content_type.into(),
      overwrite: false,
    }
  }

  pub fn overwrite(mut self, overwrite: bool) -> Self {
    self.overwrite = overwrite;
    self
  }
}

impl Default for PutOptions {
  fn default() -> Self {
    Self::new("application/octet-stream")
  }
}

/// Blob storage trait.
///
/// Keys are `/`-separated relative paths. Implementations decide how a key
/// maps to their own addressing (a file path, an object path).
#[async_trait]
pub trait Store: Send + Sync {
  /// Retrieve a blob by key.
  ///
  /// Returns a stream of bytes for efficient handling of large files.
  async fn get(&self, key: &str) -> Result<ByteStream, Error>;

  /// Store a blob.
  async fn put(&self, key: &str, data: ByteStream, options: &PutOptions) -> Result<(), Error>;

  /// Delete a blob by key.
  async fn delete(&self, key: &str) -> Result<(), Error>;
}

/// Wrap an in-memory buffer as a single-chunk [`ByteStream`].
pub fn byte_stream(data: impl Into<Bytes>) -> ByteStream {
  let chunk: Result<Bytes, Error> = Ok(data.into());
  Box::pin(stream::once(async move { chunk }))
}

/// Drain a [`ByteStream`] into one contiguous buffer.
pub async fn collect(mut data: ByteStream) -> Result<Bytes, Error> {
  let mut buf = BytesMut::new();
  while let Some(chunk) = data.next().await {
    buf.extend_from_slice(&chunk?);
  }
  Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_collect_single_chunk() {
    let data = collect(byte_stream("hello")).await.unwrap();
    assert_eq!(&data[..], b"hello");
  }

  #[tokio::test]
  async fn test_collect_propagates_chunk_error() {
    let chunks: Vec<Result<Bytes, Error>> = vec![
      Ok(Bytes::from_static(b"ab")),
      Err(Error::NotFound("gone".to_string())),
    ];
    let data: ByteStream = Box::pin(stream::iter(chunks));

    let err = collect(data).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(key) if key == "gone"));
  }

  #[test]
  fn test_put_options_default_does_not_overwrite() {
    let options = PutOptions::default();
    assert!(!options.overwrite);
    assert_eq!(options.content_type, "application/octet-stream");

    let options = PutOptions::new("application/json").overwrite(true);
    assert!(options.overwrite);
  }
}
