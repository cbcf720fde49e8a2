//! Client configuration.
//!
//! Values resolve with explicit settings first, then the environment, then
//! the defaults below. [`load_config`] performs the merge without touching
//! process state, so callers and tests can supply any environment source.

use crate::Result;
use crate::error::Error;
use std::fmt;
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.usepoodle.com";

/// Default total request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "POODLE_API_KEY";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "POODLE_BASE_URL";
/// Environment variable overriding the total timeout (e.g. `45s`).
pub const ENV_TIMEOUT: &str = "POODLE_TIMEOUT";
/// Environment variable overriding the connect timeout (e.g. `5s`).
pub const ENV_CONNECT_TIMEOUT: &str = "POODLE_CONNECT_TIMEOUT";
/// Environment variable enabling debug logging (e.g. `true`).
pub const ENV_DEBUG: &str = "POODLE_DEBUG";

/// Resolved client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// API base URL.
    pub base_url: String,
    /// Total request timeout.
    pub timeout: Duration,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Log outgoing requests and incoming responses.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            debug: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Config {
    /// Create a configuration with defaults and the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Load configuration from the process environment over the defaults.
    pub fn from_env() -> Self {
        load_config(&ConfigOverrides::default(), |key| std::env::var(key).ok())
    }

    /// Check that a client can be built from this configuration.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] keyed by the first offending field:
    /// `api_key`, `base_url`, `timeout` or `connect_timeout`.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::validation_field("api_key", "API key is required"));
        }
        if self.base_url.is_empty() {
            return Err(Error::validation_field("base_url", "Base URL is required"));
        }
        if self.timeout.is_zero() {
            return Err(Error::validation_field(
                "timeout",
                "Timeout must be greater than 0",
            ));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::validation_field(
                "connect_timeout",
                "Connect timeout must be greater than 0",
            ));
        }
        Ok(())
    }

    /// User-Agent sent with every request.
    pub fn user_agent(&self) -> String {
        format!("poodle-rust/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Full URL of the send-email endpoint.
    pub fn send_email_url(&self) -> String {
        format!("{}/v1/send-email", self.base_url.trim_end_matches('/'))
    }
}

/// Explicitly supplied settings; `None` defers to the environment or default.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// API key.
    pub api_key: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
    /// Total request timeout.
    pub timeout: Option<Duration>,
    /// Connection timeout.
    pub connect_timeout: Option<Duration>,
    /// Debug logging.
    pub debug: Option<bool>,
}

impl fmt::Debug for ConfigOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigOverrides")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Merge explicit settings, an environment source and the defaults.
///
/// `env` returns the value of a variable, if set. Empty values count as
/// unset, and malformed durations or booleans are ignored.
///
/// # Examples
/// ```
/// use poodle_client::{ConfigOverrides, load_config};
/// use std::time::Duration;
///
/// let explicit = ConfigOverrides {
///     api_key: Some("key".into()),
///     ..Default::default()
/// };
/// let config = load_config(&explicit, |name| match name {
///     "POODLE_API_KEY" => Some("ignored".into()),
///     "POODLE_TIMEOUT" => Some("45s".into()),
///     _ => None,
/// });
///
/// assert_eq!(config.api_key, "key");
/// assert_eq!(config.timeout, Duration::from_secs(45));
/// ```
pub fn load_config<F>(explicit: &ConfigOverrides, env: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| env(key).filter(|value| !value.is_empty());
    let defaults = Config::default();

    Config {
        api_key: explicit
            .api_key
            .clone()
            .or_else(|| lookup(ENV_API_KEY))
            .unwrap_or(defaults.api_key),
        base_url: explicit
            .base_url
            .clone()
            .or_else(|| lookup(ENV_BASE_URL))
            .unwrap_or(defaults.base_url),
        timeout: explicit
            .timeout
            .or_else(|| lookup(ENV_TIMEOUT).and_then(|v| parse_duration(&v)))
            .unwrap_or(defaults.timeout),
        connect_timeout: explicit
            .connect_timeout
            .or_else(|| lookup(ENV_CONNECT_TIMEOUT).and_then(|v| parse_duration(&v)))
            .unwrap_or(defaults.connect_timeout),
        debug: explicit
            .debug
            .or_else(|| lookup(ENV_DEBUG).and_then(|v| parse_bool(&v)))
            .unwrap_or(defaults.debug),
    }
}

fn parse_duration(value: &str) -> Option<Duration> {
    humantime::parse_duration(value.trim()).ok()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = load_config(&ConfigOverrides::default(), env_of(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(!config.debug);
    }

    #[test]
    fn test_environment_overlay() {
        let config = load_config(
            &ConfigOverrides::default(),
            env_of(&[
                (ENV_API_KEY, "env_key"),
                (ENV_BASE_URL, "https://test.api.usepoodle.com"),
                (ENV_TIMEOUT, "45s"),
                (ENV_CONNECT_TIMEOUT, "1m 30s"),
                (ENV_DEBUG, "true"),
            ]),
        );

        assert_eq!(config.api_key, "env_key");
        assert_eq!(config.base_url, "https://test.api.usepoodle.com");
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.connect_timeout, Duration::from_secs(90));
        assert!(config.debug);
    }

    #[test]
    fn test_explicit_wins_over_environment() {
        let explicit = ConfigOverrides {
            api_key: Some("explicit".into()),
            timeout: Some(Duration::from_secs(5)),
            debug: Some(false),
            ..ConfigOverrides::default()
        };
        let config = load_config(
            &explicit,
            env_of(&[(ENV_API_KEY, "env_key"), (ENV_TIMEOUT, "45s"), (ENV_DEBUG, "1")]),
        );

        assert_eq!(config.api_key, "explicit");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(!config.debug);
    }

    #[test]
    fn test_malformed_environment_values_are_ignored() {
        let config = load_config(
            &ConfigOverrides::default(),
            env_of(&[
                (ENV_BASE_URL, ""),
                (ENV_TIMEOUT, "soon"),
                (ENV_CONNECT_TIMEOUT, "10"),
                (ENV_DEBUG, "yes"),
            ]),
        );

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(!config.debug);
    }

    #[test]
    fn test_parse_bool_forms() {
        for value in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(parse_bool(value), Some(true), "{value}");
        }
        for value in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(parse_bool(value), Some(false), "{value}");
        }
        assert_eq!(parse_bool("yes"), None);
    }

    #[test]
    fn test_validate() {
        assert!(Config::new("key").validate().is_ok());

        let cases = [
            (Config::default(), "api_key"),
            (
                Config {
                    base_url: String::new(),
                    ..Config::new("key")
                },
                "base_url",
            ),
            (
                Config {
                    timeout: Duration::ZERO,
                    ..Config::new("key")
                },
                "timeout",
            ),
            (
                Config {
                    connect_timeout: Duration::ZERO,
                    ..Config::new("key")
                },
                "connect_timeout",
            ),
        ];

        for (config, field) in cases {
            let err = config.validate().unwrap_err();
            assert!(err.field_errors().unwrap().contains_key(field), "{field}");
        }
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let rendered = format!("{:?}", Config::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }

    #[test]
    fn test_send_email_url_trims_trailing_slash() {
        let config = Config {
            base_url: "https://api.example.com/".into(),
            ..Config::new("key")
        };
        assert_eq!(config.send_email_url(), "https://api.example.com/v1/send-email");
        assert!(config.user_agent().starts_with("poodle-rust/"));
    }
}
