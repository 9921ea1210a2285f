use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::{ByteStream, Error, PutOptions, Store};

/// Filesystem-based blob store.
///
/// Stores blobs as files on the local filesystem. Each blob is stored at
/// `{base_path}/{key}`. Parent directories are created automatically.
/// Content types are not recorded.
pub struct FsStore {
  base_path: PathBuf,
}

impl FsStore {
  /// Create a new filesystem store with the given base path.
  pub fn new(base_path: impl Into<PathBuf>) -> Self {
    Self {
      base_path: base_path.into(),
    }
  }

  fn key_to_path(&self, key: &str) -> Result<PathBuf, Error> {
    let relative = Path::new(key);
    let escapes = relative
      .components()
      .any(|c| !matches!(c, Component::Normal(_)));
    if key.is_empty() || escapes {
      return Err(Error::InvalidKey {
        key: key.to_string(),
        message: "key must be a relative path without '.' or '..' segments".to_string(),
      });
    }
    Ok(self.base_path.join(relative))
  }
}

fn not_found_or_io(key: &str, e: std::io::Error) -> Error {
  if e.kind() == ErrorKind::NotFound {
    Error::NotFound(key.to_string())
  } else {
    Error::Io(e)
  }
}

#[async_trait]
impl Store for FsStore {
  async fn get(&self, key: &str) -> Result<ByteStream, Error> {
    let path = self.key_to_path(key)?;
    let file = File::open(&path)
      .await
      .map_err(|e| not_found_or_io(key, e))?;
    let stream = ReaderStream::new(file).map(|r| r.map_err(Error::Io));
    Ok(Box::pin(stream))
  }

  async fn put(&self, key: &str, data: ByteStream, options: &PutOptions) -> Result<(), Error> {
    let path = self.key_to_path(key)?;

    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).await?;
    }

    let mut open = OpenOptions::new();
    open.write(true);
    if options.overwrite {
      open.create(true).truncate(true);
    } else {
      open.create_new(true);
    }

    let mut file = open.open(&path).await.map_err(|e| {
      if e.kind() == ErrorKind::AlreadyExists {
        Error::AlreadyExists(key.to_string())
      } else {
        Error::Io(e)
      }
    })?;
    let mut stream = std::pin::pin!(data);

    while let Some(chunk) = stream.next().await {
      let bytes = chunk?;
      file.write_all(&bytes).await?;
    }

    file.flush().await?;
    Ok(())
  }

  async fn delete(&self, key: &str) -> Result<(), Error> {
    let path = self.key_to_path(key)?;
    fs::remove_file(&path)
      .await
      .map_err(|e| not_found_or_io(key, e))
  }
}
