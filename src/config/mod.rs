//! Client configuration
//!
//! Resolved once at startup and handed to the client at construction time.
//! The base URL comes from, in order: the `--api-url` flag, the
//! `WRITER_INSIGHT_API_URL` environment variable, a remote config document,
//! then the built-in default.

mod remote;

pub use remote::{fetch_remote_api_url, CONFIG_PATH};

use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default delay between status queries
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default status query budget (five minutes at the default interval)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the backend base URL
pub const API_URL_ENV: &str = "WRITER_INSIGHT_API_URL";

/// Environment variable pointing at a host that serves `/api/config`
pub const CONFIG_URL_ENV: &str = "WRITER_INSIGHT_CONFIG_URL";

/// Environment variable overriding the poll interval (seconds)
pub const POLL_INTERVAL_ENV: &str = "WRITER_INSIGHT_POLL_INTERVAL_SECS";

/// Environment variable overriding the attempt budget
pub const MAX_ATTEMPTS_ENV: &str = "WRITER_INSIGHT_MAX_ATTEMPTS";

/// Where the base URL was obtained from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseUrlSource {
    /// `--api-url` flag
    Flag,
    /// Environment variable
    EnvVar,
    /// Remote `/api/config` document
    RemoteConfig,
    /// Built-in default
    Default,
}

impl fmt::Display for BaseUrlSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flag => write!(f, "command line"),
            Self::EnvVar => write!(f, "{API_URL_ENV}"),
            Self::RemoteConfig => write!(f, "remote config"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Poll loop settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between status queries
    pub interval: Duration,
    /// Maximum number of status queries before timing out
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Resolved client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, without the `/api/v1` suffix
    pub base_url: Url,
    /// Where `base_url` came from
    pub base_url_source: BaseUrlSource,
    /// Poll loop settings
    pub poll: PollSettings,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl ClientConfig {
    /// Config pointing at `base_url` with default settings
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            base_url_source: BaseUrlSource::Flag,
            poll: PollSettings::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `--api-url`
    pub api_url: Option<String>,
    /// `--interval` in seconds
    pub poll_interval_secs: Option<u64>,
    /// `--max-attempts`
    pub max_attempts: Option<u32>,
}

/// Resolve configuration from overrides and the process environment
pub async fn resolve_config(overrides: &ConfigOverrides) -> Result<ClientConfig> {
    resolve_config_from(overrides, |name| env::var(name).ok()).await
}

/// Resolve configuration using `lookup` in place of the process environment
pub async fn resolve_config_from<F>(overrides: &ConfigOverrides, lookup: F) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    let interval_secs = match overrides.poll_interval_secs {
        Some(secs) => secs,
        None => parse_var(POLL_INTERVAL_ENV, lookup(POLL_INTERVAL_ENV))?
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
    };

    let max_attempts = match overrides.max_attempts {
        Some(n) => n,
        None => parse_var(MAX_ATTEMPTS_ENV, lookup(MAX_ATTEMPTS_ENV))?
            .unwrap_or(DEFAULT_MAX_ATTEMPTS),
    };

    if max_attempts == 0 {
        return Err(Error::Config("max attempts must be at least 1".to_string()));
    }

    let (base_url, base_url_source) = resolve_base_url(
        overrides.api_url.as_deref(),
        lookup(API_URL_ENV),
        lookup(CONFIG_URL_ENV),
    )
    .await?;

    debug!(%base_url, source = %base_url_source, interval_secs, max_attempts, "resolved config");

    Ok(ClientConfig {
        base_url,
        base_url_source,
        poll: PollSettings {
            interval: Duration::from_secs(interval_secs),
            max_attempts,
        },
        request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    })
}

async fn resolve_base_url(
    flag: Option<&str>,
    env_value: Option<String>,
    config_url: Option<String>,
) -> Result<(Url, BaseUrlSource)> {
    if let Some(raw) = flag {
        return Ok((parse_base_url(raw)?, BaseUrlSource::Flag));
    }

    if let Some(raw) = env_value {
        return Ok((parse_base_url(&raw)?, BaseUrlSource::EnvVar));
    }

    // A broken remote config is not fatal; fall through to the default
    if let Some(config_url) = config_url {
        match fetch_remote_api_url(&config_url).await {
            Ok(raw) => match parse_base_url(&raw) {
                Ok(url) => return Ok((url, BaseUrlSource::RemoteConfig)),
                Err(e) => warn!(%config_url, error = %e, "remote config returned an unusable URL"),
            },
            Err(e) => warn!(%config_url, error = %e, "failed to fetch remote config"),
        }
    }

    Ok((parse_base_url(DEFAULT_BASE_URL)?, BaseUrlSource::Default))
}

/// Parse and normalize a backend base URL
///
/// Accepts only absolute http(s) URLs. A trailing `/` or `/api/v1` is
/// stripped so endpoint paths can be appended directly.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| Error::Config(format!("invalid base URL '{raw}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::Config(format!(
            "base URL must use http or https: '{raw}'"
        )));
    }

    let path = url.path().trim_end_matches('/');
    let path = path.strip_suffix("/api/v1").unwrap_or(path).to_string();
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| Error::Config(format!("{name} must be a number, got '{raw}'")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_parse_base_url_strips_api_prefix() {
        let url = parse_base_url("http://localhost:8000/api/v1/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/");

        let url = parse_base_url("https://example.com/writer/api/v1").unwrap();
        assert_eq!(url.as_str(), "https://example.com/writer");
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(Error::Config(_))
        ));
        assert!(matches!(parse_base_url("not a url"), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_configured() {
        let config = resolve_config_from(&ConfigOverrides::default(), env_of(&[]))
            .await
            .unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.base_url_source, BaseUrlSource::Default);
        assert_eq!(config.poll, PollSettings::default());
    }

    #[tokio::test]
    async fn test_flag_beats_env() {
        let overrides = ConfigOverrides {
            api_url: Some("http://flag.test".to_string()),
            ..Default::default()
        };
        let config = resolve_config_from(&overrides, env_of(&[(API_URL_ENV, "http://env.test")]))
            .await
            .unwrap();

        assert_eq!(config.base_url.as_str(), "http://flag.test/");
        assert_eq!(config.base_url_source, BaseUrlSource::Flag);
    }

    #[tokio::test]
    async fn test_env_used_without_flag() {
        let config = resolve_config_from(
            &ConfigOverrides::default(),
            env_of(&[
                (API_URL_ENV, "http://env.test/api/v1"),
                (POLL_INTERVAL_ENV, "3"),
                (MAX_ATTEMPTS_ENV, "10"),
            ]),
        )
        .await
        .unwrap();

        assert_eq!(config.base_url.as_str(), "http://env.test/");
        assert_eq!(config.base_url_source, BaseUrlSource::EnvVar);
        assert_eq!(config.poll.interval, Duration::from_secs(3));
        assert_eq!(config.poll.max_attempts, 10);
    }

    #[tokio::test]
    async fn test_blank_env_values_are_ignored() {
        let config = resolve_config_from(
            &ConfigOverrides::default(),
            env_of(&[(API_URL_ENV, "  "), (MAX_ATTEMPTS_ENV, "")]),
        )
        .await
        .unwrap();

        assert_eq!(config.base_url_source, BaseUrlSource::Default);
        assert_eq!(config.poll.max_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_invalid_numbers_and_zero_attempts_rejected() {
        let err = resolve_config_from(
            &ConfigOverrides::default(),
            env_of(&[(POLL_INTERVAL_ENV, "soon")]),
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains(POLL_INTERVAL_ENV));

        let overrides = ConfigOverrides {
            max_attempts: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config_from(&overrides, env_of(&[])).await,
            Err(Error::Config(_))
        ));
    }
}
