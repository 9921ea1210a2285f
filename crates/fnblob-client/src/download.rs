use std::path::{Path, PathBuf};

use fnblob_results::FunctionDescriptor;
use futures::StreamExt;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{error, info, instrument};

use crate::{BlobClient, Error};

/// A fresh file name under the system temp directory.
pub fn unique_temp_file_name() -> PathBuf {
  unique_temp_file_name_in(std::env::temp_dir())
}

/// A fresh file name under `dir`: a random v4 UUID, no extension.
pub fn unique_temp_file_name_in(dir: impl AsRef<Path>) -> PathBuf {
  dir.as_ref().join(uuid::Uuid::new_v4().to_string())
}

/// Download the client's blob to a new local temp file and return its path.
///
/// The file is created, written, flushed and closed before this returns. On
/// failure any partially written file is removed.
#[instrument(
  name = "download_file",
  skip(descriptor, client),
  fields(function = %descriptor.function_name(), blob = %client.blob_name())
)]
pub async fn download_file(
  descriptor: &FunctionDescriptor,
  client: &BlobClient,
) -> Result<PathBuf, Error> {
  let local = unique_temp_file_name();

  match write_blob(client, &local).await {
    Ok(bytes) => {
      info!(local = %local.display(), bytes, "download completed");
      Ok(local)
    }
    Err(e) => {
      error!(error = %e, "download failed");
      match tokio::fs::remove_file(&local).await {
        Err(cleanup) if cleanup.kind() != std::io::ErrorKind::NotFound => {
          error!(error = %cleanup, local = %local.display(), "failed to remove partial download");
        }
        _ => {}
      }
      Err(Error::download(descriptor, e))
    }
  }
}

async fn write_blob(client: &BlobClient, local: &Path) -> Result<u64, fnblob_artifact::Error> {
  let mut data = client.download().await?;
  let mut file = OpenOptions::new()
    .write(true)
    .create_new(true)
    .open(local)
    .await?;

  let mut written = 0u64;
  while let Some(chunk) = data.next().await {
    let chunk = chunk?;
    file.write_all(&chunk).await?;
    written += chunk.len() as u64;
  }

  file.flush().await?;
  Ok(written)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unique_temp_file_names() {
    let a = unique_temp_file_name();
    let b = unique_temp_file_name();

    assert_ne!(a, b);
    assert_eq!(a.parent(), Some(std::env::temp_dir().as_path()));
    assert!(uuid::Uuid::parse_str(a.file_name().unwrap().to_str().unwrap()).is_ok());
  }

  #[test]
  fn test_unique_temp_file_name_in_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = unique_temp_file_name_in(dir.path());
    assert_eq!(path.parent(), Some(dir.path()));
    assert!(!path.exists());
  }
}
