//! Remote config document (`GET {host}/api/config`)

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Path of the config document relative to the config host
pub const CONFIG_PATH: &str = "/api/config";

#[derive(Deserialize)]
struct RemoteConfig {
    #[serde(rename = "apiUrl", alias = "api_url")]
    api_url: String,
}

/// Fetch the backend base URL advertised by `{config_url}/api/config`
pub async fn fetch_remote_api_url(config_url: &str) -> Result<String> {
    let url = format!("{}{CONFIG_PATH}", config_url.trim().trim_end_matches('/'));
    debug!(%url, "fetching remote config");

    let client = Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

    let config: RemoteConfig = client
        .get(&url)
        .send()
        .await
        .map_err(|e| Error::Config(format!("remote config unreachable: {e}")))?
        .error_for_status()
        .map_err(|e| Error::Config(format!("remote config request failed: {e}")))?
        .json()
        .await
        .map_err(|e| Error::Config(format!("malformed remote config: {e}")))?;

    Ok(config.api_url)
}
