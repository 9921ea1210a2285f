//! Azure storage connection strings.
//!
//! A connection string is a `;`-separated list of `Key=Value` pairs, e.g.
//!
//! ```text
//! DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=c2VjcmV0;EndpointSuffix=core.windows.net
//! ```
//!
//! or, for a SAS-scoped connection, just an endpoint and a token:
//!
//! ```text
//! BlobEndpoint=https://acct.blob.core.windows.net/;SharedAccessSignature=sv=2022-11-02&sig=...
//! ```
//!
//! Keys are matched case-insensitively. Values may themselves contain `=`
//! (base64 padding), so only the first `=` separates key from value. Keys this
//! crate has no use for (`QueueEndpoint`, `TableEndpoint`, ...) are ignored.

use std::fmt;

use url::Url;

use crate::ConfigError;

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Account used by the local storage emulator (Azurite).
const EMULATOR_ACCOUNT: &str = "devstoreaccount1";

/// A parsed storage connection string.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
  pub account_name: Option<String>,
  pub account_key: Option<String>,
  pub sas_token: Option<String>,
  pub blob_endpoint: Option<String>,
  pub protocol: Option<String>,
  pub endpoint_suffix: Option<String>,
  pub use_development_storage: bool,
}

impl ConnectionString {
  pub fn parse(input: &str) -> Result<Self, ConfigError> {
    let mut parsed = Self::default();

    for pair in input.split(';').map(str::trim).filter(|p| !p.is_empty()) {
      let (key, value) = pair.split_once('=').ok_or_else(|| {
        ConfigError::connection_string(format!("expected Key=Value, got '{pair}'"))
      })?;
      let value = value.trim().to_string();

      match key.trim() {
        k if k.eq_ignore_ascii_case("AccountName") => parsed.account_name = Some(value),
        k if k.eq_ignore_ascii_case("AccountKey") => parsed.account_key = Some(value),
        k if k.eq_ignore_ascii_case("SharedAccessSignature") => parsed.sas_token = Some(value),
        k if k.eq_ignore_ascii_case("BlobEndpoint") => parsed.blob_endpoint = Some(value),
        k if k.eq_ignore_ascii_case("DefaultEndpointsProtocol") => parsed.protocol = Some(value),
        k if k.eq_ignore_ascii_case("EndpointSuffix") => parsed.endpoint_suffix = Some(value),
        k if k.eq_ignore_ascii_case("UseDevelopmentStorage") => {
          parsed.use_development_storage = value.eq_ignore_ascii_case("true");
        }
        _ => {}
      }
    }

    if !parsed.use_development_storage && parsed.account_name.is_none() {
      let endpoint = parsed.blob_endpoint.as_deref().ok_or_else(|| {
        ConfigError::connection_string(
          "AccountName or BlobEndpoint is required unless UseDevelopmentStorage=true",
        )
      })?;
      parsed.account_name = Some(account_from_endpoint(endpoint)?);
    }

    Ok(parsed)
  }

  /// The storage account this connection string addresses.
  pub fn account(&self) -> &str {
    match &self.account_name {
      Some(name) => name,
      None => EMULATOR_ACCOUNT,
    }
  }

  /// Blob service endpoint, explicit or derived from account and suffix.
  pub fn blob_endpoint(&self) -> String {
    if let Some(endpoint) = &self.blob_endpoint {
      return endpoint.trim_end_matches('/').to_string();
    }
    if self.use_development_storage {
      return format!("http://127.0.0.1:10000/{EMULATOR_ACCOUNT}");
    }
    format!(
      "{}://{}.blob.{}",
      self.protocol.as_deref().unwrap_or(DEFAULT_PROTOCOL),
      self.account(),
      self.endpoint_suffix.as_deref().unwrap_or(DEFAULT_ENDPOINT_SUFFIX),
    )
  }

  /// The SAS token exactly as written in the connection string, still
  /// percent-encoded. The storage backend decodes it once before signing
  /// requests, so it must not be decoded here as well.
  pub fn sas_token(&self) -> Option<&str> {
    self.sas_token.as_deref()
  }
}

/// Account name implied by a blob endpoint: the first host label of
/// `https://{account}.blob.{suffix}`, or the first path segment of a
/// path-style endpoint such as `http://127.0.0.1:10000/{account}`.
fn account_from_endpoint(endpoint: &str) -> Result<String, ConfigError> {
  let url = Url::parse(endpoint).map_err(|e| {
    ConfigError::connection_string(format!("invalid BlobEndpoint '{endpoint}': {e}"))
  })?;

  let subdomain = url
    .host_str()
    .and_then(|host| host.split_once('.'))
    .filter(|(account, rest)| !account.is_empty() && rest.starts_with("blob."));
  if let Some((account, _)) = subdomain {
    return Ok(account.to_string());
  }

  url
    .path_segments()
    .and_then(|mut segments| segments.find(|s| !s.is_empty()))
    .map(str::to_string)
    .ok_or_else(|| {
      ConfigError::connection_string(format!(
        "cannot determine the account from BlobEndpoint '{endpoint}'"
      ))
    })
}

// Secrets never reach logs.
impl fmt::Debug for ConnectionString {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ConnectionString")
      .field("account_name", &self.account_name)
      .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
      .field("sas_token", &self.sas_token.as_ref().map(|_| "<redacted>"))
      .field("blob_endpoint", &self.blob_endpoint)
      .field("protocol", &self.protocol)
      .field("endpoint_suffix", &self.endpoint_suffix)
      .field("use_development_storage", &self.use_development_storage)
      .finish()
  }
}
