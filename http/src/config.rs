//! Client configuration.
//!
//! Loaded from TOML and overridable from the environment:
//!
//! ```toml
//! url = "https://api.example.com/rpc"
//! connect_timeout_ms = 2000
//! user_agent = "my-app/1.0"
//! ```
//!
//! | variable | overrides |
//! |---|---|
//! | `COURIER_URL` | `url` |
//! | `COURIER_CONNECT_TIMEOUT_MS` | `connect_timeout_ms` |
//! | `COURIER_USER_AGENT` | `user_agent` |

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_URL: &str = "COURIER_URL";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "COURIER_CONNECT_TIMEOUT_MS";
pub const ENV_USER_AGENT: &str = "COURIER_USER_AGENT";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// The single address every endpoint is posted to.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout_ms: None,
            user_agent: None,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Build a config purely from `COURIER_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup(ENV_URL).ok_or(ConfigError::Missing(ENV_URL))?;
        Self::new(url).with_overrides_from(lookup)
    }

    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup (environment, test maps).
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_URL) {
            self.url = url;
        }
        if let Some(raw) = lookup(ENV_CONNECT_TIMEOUT_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidEnv {
                    key: ENV_CONNECT_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
            self.connect_timeout_ms = Some(millis);
        }
        if let Some(user_agent) = lookup(ENV_USER_AGENT) {
            self.user_agent = Some(user_agent);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason,
        };
        let url = reqwest::Url::parse(&self.url).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme `{}`", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_from_toml_str() {
        let config = ClientConfig::from_toml_str(
            r#"
            url = "http://localhost:8080/rpc"
            connect_timeout_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.url, "http://localhost:8080/rpc");
        assert_eq!(config.connect_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.user_agent, None);
    }

    #[test]
    fn test_connect_timeout_saturates() {
        let config = ClientConfig::new("http://localhost/rpc").with_connect_timeout(Duration::MAX);
        assert_eq!(config.connect_timeout_ms, Some(u64::MAX));

        let config = ClientConfig::new("http://localhost/rpc")
            .with_connect_timeout(Duration::from_secs(u64::MAX / 1000 + 1));
        assert_eq!(config.connect_timeout_ms, Some(u64::MAX));

        let config =
            ClientConfig::new("http://localhost/rpc").with_connect_timeout(Duration::from_secs(2));
        assert_eq!(config.connect_timeout_ms, Some(2000));
    }

    #[test]
    fn test_rejects_bad_url() {
        let err = ClientConfig::from_toml_str(r#"url = "not a url""#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));

        let err = ClientConfig::new("ftp://example.com/rpc").validate().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_rejects_missing_url() {
        let err = ClientConfig::from_toml_str("connect_timeout_ms = 5").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::new("http://localhost/rpc")
            .with_overrides_from(lookup(&[
                (ENV_URL, "https://api.example.com/rpc"),
                (ENV_CONNECT_TIMEOUT_MS, " 250 "),
                (ENV_USER_AGENT, "courier-test"),
            ]))
            .unwrap();

        assert_eq!(config.url, "https://api.example.com/rpc");
        assert_eq!(config.connect_timeout_ms, Some(250));
        assert_eq!(config.user_agent.as_deref(), Some("courier-test"));
    }

    #[test]
    fn test_bad_timeout_override() {
        let err = ClientConfig::new("http://localhost/rpc")
            .with_overrides_from(lookup(&[(ENV_CONNECT_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                key: ENV_CONNECT_TIMEOUT_MS,
                ..
            }
        ));
    }

    #[test]
    fn test_from_lookup_requires_url() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENV_URL)));

        let config =
            ClientConfig::from_lookup(lookup(&[(ENV_URL, "http://127.0.0.1:9/rpc")])).unwrap();
        assert_eq!(config, ClientConfig::new("http://127.0.0.1:9/rpc"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"url = "http://localhost:3000/api""#).unwrap();
        writeln!(file, r#"user_agent = "file-agent""#).unwrap();

        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.url, "http://localhost:3000/api");
        assert_eq!(config.user_agent.as_deref(), Some("file-agent"));

        let err = ClientConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
