use fnblob_artifact::PutOptions;
use fnblob_results::{
  FunctionDescriptor, ResultsObject, Value, build_results_object, serialize_results,
};
use tracing::{error, info, instrument};

use crate::{BlobClient, Error};

/// Content type recorded on uploaded results documents.
pub const RESULTS_CONTENT_TYPE: &str = "application/json";

/// Merge `custom_results` into the descriptor and upload the result.
pub async fn create_and_upload_results(
  descriptor: &FunctionDescriptor,
  custom_results: impl Into<Value>,
  client: &BlobClient,
) -> Result<(), Error> {
  let results = build_results_object(descriptor, custom_results);
  upload_results(descriptor, client, &results).await
}

/// Serialize a results object and write it to the client's blob, replacing
/// any existing blob.
#[instrument(
  name = "upload_results",
  skip(descriptor, client, results),
  fields(function = %descriptor.function_name(), blob = %client.blob_name())
)]
pub async fn upload_results(
  descriptor: &FunctionDescriptor,
  client: &BlobClient,
  results: &ResultsObject,
) -> Result<(), Error> {
  let body = serialize_results(results).map_err(|e| {
    error!(error = %e, "results serialization failed");
    Error::serialization(descriptor, e)
  })?;
  let bytes = body.len();

  let options = PutOptions::new(RESULTS_CONTENT_TYPE).overwrite(true);
  client.upload(body, &options).await.map_err(|e| {
    error!(error = %e, "results upload failed");
    Error::upload(descriptor, e)
  })?;

  info!(bytes, "results uploaded");
  Ok(())
}
