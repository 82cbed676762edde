//! Service configuration: an optional YAML file, then environment overrides.

use crate::context::RequestContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Runtime settings for [`OrderSystem`](super::OrderSystem).
///
/// Every field has a default, so an empty file (or no file) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// PostgreSQL URL. Without one, orders live in the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    /// Deadline applied to each request built by [`ServiceConfig::request_context`].
    pub request_timeout_ms: u64,
    /// Channel capacity of every actor.
    pub actor_buffer_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 10,
            acquire_timeout_ms: 5000,
            request_timeout_ms: 3000,
            actor_buffer_size: 32,
        }
    }
}

impl ServiceConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Loads `path` (or the defaults), applies the process environment and validates.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overrides fields from `DATABASE_URL`, `ORDER_DB_MAX_CONNECTIONS` and
    /// `ORDER_REQUEST_TIMEOUT_MS` as returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()) {
            self.database_url = Some(url);
        }
        if let Some(value) = lookup("ORDER_DB_MAX_CONNECTIONS") {
            self.max_connections = parse_env("max_connections", &value)?;
        }
        if let Some(value) = lookup("ORDER_REQUEST_TIMEOUT_MS") {
            self.request_timeout_ms = parse_env("request_timeout_ms", &value)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let must_be_positive = |field: &'static str, value: u64| {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be greater than zero".to_string(),
                });
            }
            Ok(())
        };
        must_be_positive("max_connections", u64::from(self.max_connections))?;
        must_be_positive("request_timeout_ms", self.request_timeout_ms)?;
        must_be_positive("actor_buffer_size", self.actor_buffer_size as u64)?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }

    /// A fresh context whose deadline is `request_timeout` from now.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout())
    }
}

fn parse_env<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            field,
            reason: format!("{value:?}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = ServiceConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_overrides_some_fields() {
        let config = ServiceConfig::from_yaml_str(
            "database_url: postgres://localhost/orders\nmax_connections: 4\n",
        )
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/orders")
        );
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.actor_buffer_size, 32);
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let err = ServiceConfig::from_yaml_str("max_connections: lots").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = ServiceConfig::default();
        config
            .apply_env(env(&[
                ("DATABASE_URL", "postgres://db/orders"),
                ("ORDER_DB_MAX_CONNECTIONS", "20"),
                ("ORDER_REQUEST_TIMEOUT_MS", " 250 "),
            ]))
            .unwrap();

        assert_eq!(config.database_url.as_deref(), Some("postgres://db/orders"));
        assert_eq!(config.max_connections, 20);
        assert_eq!(config.request_timeout(), Duration::from_millis(250));
    }

    #[test]
    fn test_blank_database_url_keeps_memory_store() {
        let mut config = ServiceConfig::default();
        config.apply_env(env(&[("DATABASE_URL", "  ")])).unwrap();
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_bad_env_value_names_the_field() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_env(env(&[("ORDER_DB_MAX_CONNECTIONS", "-1")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_connections",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = ServiceConfig {
            actor_buffer_size: 0,
            ..ServiceConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "actor_buffer_size",
                ..
            })
        ));

        let config = ServiceConfig {
            request_timeout_ms: 0,
            ..ServiceConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let err = ServiceConfig::from_file(Path::new("/nonexistent/order-service.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
