//! Async HTTP client for the location endpoint.

use std::time::Duration;

use reqwest::Client;
use shiptrack_core::source::TrackingSource;
use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.aprs.fi/api/get";

pub const DEFAULT_USER_AGENT: &str =
  concat!("shiptrack/", env!("CARGO_PKG_VERSION"), " (vessel position logger)");

/// Connection settings for the location API.
#[derive(Debug, Clone)]
pub struct AprsConfig {
  pub api_url:    String,
  pub api_key:    String,
  pub user_agent: String,
}

impl AprsConfig {
  /// Settings for the public endpoint with the given key.
  pub fn new(api_key: impl Into<String>) -> Self {
    Self {
      api_url:    DEFAULT_API_URL.to_string(),
      api_key:    api_key.into(),
      user_agent: DEFAULT_USER_AGENT.to_string(),
    }
  }
}

/// Queries the latest location of a set of vessels.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct AprsClient {
  client: Client,
  config: AprsConfig,
}

impl AprsClient {
  pub fn new(config: AprsConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(config.user_agent.clone())
      .build()
      .map_err(Error::Client)?;
    Ok(Self { client, config })
  }

  /// `GET {api_url}?name=<ids>&what=loc&apikey=<key>&format=json`
  pub async fn locations(&self, ids: &[i64]) -> Result<String> {
    let names = ids
      .iter()
      .map(i64::to_string)
      .collect::<Vec<_>>()
      .join(",");

    debug!(count = ids.len(), "requesting locations");

    let resp = self
      .client
      .get(&self.config.api_url)
      .query(&[
        ("name", names.as_str()),
        ("what", "loc"),
        ("apikey", self.config.api_key.as_str()),
        ("format", "json"),
      ])
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      return Err(Error::Status { status });
    }
    Ok(resp.text().await?)
  }
}

impl TrackingSource for AprsClient {
  type Error = Error;

  async fn fetch_locations(&self, ids: &[i64]) -> Result<String> {
    self.locations(ids).await
  }
}
