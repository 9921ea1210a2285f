//! fnblob Client
//!
//! The I/O side of fnblob, used directly by function handlers:
//!
//! - [`create_blob_client`] binds a container and blob name on an Azure
//!   storage account, authenticating with an explicit [`Credential`].
//! - [`download_file`] copies a source blob to a unique local temp file.
//! - [`read_csv_file`] reads a downloaded CSV file into row maps.
//! - [`create_and_upload_results`] merges the descriptor with the function's
//!   results and writes them as JSON, replacing any earlier upload.
//!
//! Every operation fails fast. Errors carry the invocation descriptor as JSON
//! so a failed invocation can be identified from the error alone; nothing here
//! retries.

mod client;
mod credential;
mod csv_file;
mod download;
mod error;
mod upload;

pub use client::{BlobClient, create_blob_client, results_blob_client};
pub use credential::Credential;
pub use csv_file::{CsvRow, read_csv_file};
pub use download::{download_file, unique_temp_file_name, unique_temp_file_name_in};
pub use error::{BoxError, Error};
pub use upload::{RESULTS_CONTENT_TYPE, create_and_upload_results, upload_results};
