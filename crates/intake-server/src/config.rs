//! Server configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! | Variable          | Field                 |
//! |-------------------|-----------------------|
//! | `INTAKE_BIND`     | `server.bind`         |
//! | `INTAKE_DATABASE` | `database.path`       |
//! | `INTAKE_LOG_JSON` | `logging.json`        |
//!
//! Every section falls back to its defaults, so an empty file is valid.

use intake_dispatch::notify::{DEFAULT_QUEUE_CAPACITY, DEFAULT_RECIPIENT};
use intake_store::{StoreOptions, DEFAULT_BUSY_TIMEOUT};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_BIND: &str = "INTAKE_BIND";
pub const ENV_DATABASE: &str = "INTAKE_DATABASE";
pub const ENV_LOG_JSON: &str = "INTAKE_LOG_JSON";

/// Path segment the forms post to
pub const DEFAULT_ROUTE: &str = "contact-handler";
/// Largest request body accepted
pub const DEFAULT_MAX_BODY_BYTES: u64 = 64 * 1024;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: SocketAddr,
    /// Single path segment, without slashes
    pub route: String,
    pub max_body_bytes: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            route: DEFAULT_ROUTE.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sparknest.db"),
            busy_timeout_ms: u64::try_from(DEFAULT_BUSY_TIMEOUT.as_millis()).unwrap_or(5_000),
        }
    }
}

impl DatabaseSection {
    #[must_use]
    pub fn store_options(&self) -> StoreOptions {
        StoreOptions::default().with_busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSection {
    pub enabled: bool,
    pub recipient: String,
    pub queue_capacity: usize,
}

impl Default for NotificationSection {
    fn default() -> Self {
        Self {
            enabled: true,
            recipient: DEFAULT_RECIPIENT.to_string(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// One JSON object per line instead of human-readable output
    pub json: bool,
    /// Used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            json: false,
            filter: "info".to_string(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub notifications: NotificationSection,
    pub logging: LoggingSection,
}

impl IntakeConfig {
    #[must_use]
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.server.bind = bind;
        self
    }

    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.server.route = route.into();
        self
    }

    #[must_use]
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.path = path.into();
        self
    }

    #[must_use]
    pub fn with_notifications(mut self, enabled: bool) -> Self {
        self.notifications.enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.logging.json = json;
        self
    }

    /// Parse TOML text and check the result
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// File (or defaults when `path` is `None`) plus process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.with_env_overrides(|name| std::env::var(name).ok())
    }

    /// Apply `INTAKE_*` overrides read through `lookup`
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_BIND) {
            self.server.bind = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_BIND,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_DATABASE).filter(|v| !v.trim().is_empty()) {
            self.database.path = PathBuf::from(value);
        }
        if let Some(value) = lookup(ENV_LOG_JSON) {
            self.logging.json = parse_bool(&value).ok_or(ConfigError::InvalidEnv {
                name: ENV_LOG_JSON,
                value,
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let route = &self.server.route;
        if route.is_empty() || route.contains('/') {
            return Err(ConfigError::Invalid(format!(
                "server.route must be a single path segment, got {route:?}"
            )));
        }
        if self.notifications.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "notifications.queue_capacity must be at least 1".into(),
            ));
        }
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_file_is_defaults() {
        assert_eq!(IntakeConfig::from_toml_str("").unwrap(), IntakeConfig::default());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = IntakeConfig::from_toml_str(
            r#"
            [server]
            bind = "0.0.0.0:9000"

            [notifications]
            recipient = "ops@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.server.route, DEFAULT_ROUTE);
        assert_eq!(config.notifications.recipient, "ops@example.com");
        assert!(config.notifications.enabled);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
    }

    #[test]
    fn env_overrides_win() {
        let config = IntakeConfig::default()
            .with_env_overrides(env(&[
                (ENV_BIND, "127.0.0.1:3000"),
                (ENV_DATABASE, "/var/lib/intake.db"),
                (ENV_LOG_JSON, "TRUE"),
            ]))
            .unwrap();
        assert_eq!(config.server.bind.port(), 3000);
        assert_eq!(config.database.path, PathBuf::from("/var/lib/intake.db"));
        assert!(config.logging.json);
    }

    #[test]
    fn bad_env_value_is_reported() {
        let err = IntakeConfig::default()
            .with_env_overrides(env(&[(ENV_LOG_JSON, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { name: ENV_LOG_JSON, .. }));

        let err = IntakeConfig::default()
            .with_env_overrides(env(&[(ENV_BIND, "nowhere")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_BIND));
    }

    #[test]
    fn route_must_be_one_segment() {
        let err = IntakeConfig::default()
            .with_route("api/contact")
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_toml_is_a_parse_error() {
        let err = IntakeConfig::from_toml_str("[server]\nbind = 42").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = IntakeConfig::load(Some(Path::new("/nonexistent/intake.toml"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/intake.toml"));
    }
}
