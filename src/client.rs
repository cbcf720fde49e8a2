//! Poodle async client implementation.

use crate::config::{Config, ConfigOverrides, load_config};
use crate::transport::Transport;
use crate::{Email, Result, SendResponse};
use std::time::Duration;
use tokio::sync::RwLock;

/// Async client for the Poodle email API.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like the base URL, timeouts, or reading the environment. A `Client` can be
/// shared across tasks behind an [`Arc`](std::sync::Arc); sends take a shared
/// lock on the configuration and [`Client::set_debug`] an exclusive one.
#[derive(Debug)]
pub struct Client {
    config: RwLock<Config>,
    transport: Transport,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client with the given API key and default settings.
    ///
    /// The environment is not consulted.
    ///
    /// # Examples
    /// ```no_run
    /// # use poodle_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), poodle_client::Error> {
    /// let client = Client::new("your_api_key")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::new(api_key))
    }

    /// Create a client from the `POODLE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        ClientBuilder::new().with_env().build()
    }

    /// Create a client from a complete configuration.
    ///
    /// # Errors
    /// Returns [`Error::Validation`](crate::Error::Validation) if the
    /// configuration is invalid; no client is created in that case.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let transport = Transport::new(&config)?;

        Ok(Self {
            config: RwLock::new(config),
            transport,
        })
    }

    /// Send an email.
    ///
    /// The email is validated first; an invalid email is rejected without
    /// any network traffic.
    ///
    /// # Arguments
    /// * `email` - The email to send
    ///
    /// # Returns
    /// The API's response once the email is queued
    ///
    /// # Examples
    /// ```no_run
    /// # use poodle_client::{Client, Email};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), poodle_client::Error> {
    /// let client = Client::new("your_api_key")?;
    /// let email = Email::new_html(
    ///     "sender@yourdomain.com",
    ///     "recipient@example.com",
    ///     "Hello",
    ///     "<h1>Hello!</h1>",
    /// );
    /// let response = client.send(&email).await?;
    /// println!("{}", response.message);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(&self, email: &Email) -> Result<SendResponse> {
        let config = self.config.read().await;
        self.transport.send_email(&config, email).await
    }

    /// Send an HTML email.
    ///
    /// # Arguments
    /// * `from` - Sender address
    /// * `to` - Recipient address
    /// * `subject` - Subject line
    /// * `html` - HTML body
    ///
    /// # Returns
    /// The API's response once the email is queued
    ///
    /// # Examples
    /// ```no_run
    /// # use poodle_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), poodle_client::Error> {
    /// let client = Client::new("your_api_key")?;
    /// let response = client
    ///     .send_html(
    ///         "sender@yourdomain.com",
    ///         "recipient@example.com",
    ///         "Welcome",
    ///         "<h1>Welcome aboard</h1>",
    ///     )
    ///     .await?;
    /// assert!(response.success);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_html(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<SendResponse> {
        self.send(&Email::new_html(from, to, subject, html)).await
    }

    /// Send a plain-text email.
    ///
    /// # Arguments
    /// * `from` - Sender address
    /// * `to` - Recipient address
    /// * `subject` - Subject line
    /// * `text` - Plain-text body
    ///
    /// # Returns
    /// The API's response once the email is queued
    ///
    /// # Examples
    /// ```no_run
    /// # use poodle_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), poodle_client::Error> {
    /// let client = Client::new("your_api_key")?;
    /// client
    ///     .send_text(
    ///         "sender@yourdomain.com",
    ///         "recipient@example.com",
    ///         "Your code",
    ///         "Your login code is 123456",
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_text(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        text: &str,
    ) -> Result<SendResponse> {
        self.send(&Email::new_text(from, to, subject, text)).await
    }

    /// Send an email with both HTML and plain-text bodies.
    ///
    /// # Arguments
    /// * `from` - Sender address
    /// * `to` - Recipient address
    /// * `subject` - Subject line
    /// * `html` - HTML body
    /// * `text` - Plain-text alternative
    ///
    /// # Returns
    /// The API's response once the email is queued
    ///
    /// # Examples
    /// ```no_run
    /// # use poodle_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), poodle_client::Error> {
    /// let client = Client::new("your_api_key")?;
    /// client
    ///     .send_with_both(
    ///         "sender@yourdomain.com",
    ///         "recipient@example.com",
    ///         "Receipt",
    ///         "<p>Thanks for your order</p>",
    ///         "Thanks for your order",
    ///     )
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send_with_both(
        &self,
        from: &str,
        to: &str,
        subject: &str,
        html: &str,
        text: &str,
    ) -> Result<SendResponse> {
        self.send(&Email::new_with_both(from, to, subject, html, text))
            .await
    }

    /// A copy of the current configuration.
    ///
    /// Changing the returned value does not affect the client.
    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }

    /// Enable or disable debug logging of requests and responses.
    pub async fn set_debug(&self, debug: bool) {
        self.config.write().await.debug = debug;
    }

    /// Returns true if debug logging is enabled.
    pub async fn is_debug(&self) -> bool {
        self.config.read().await.debug
    }
}

/// Builder for configuring a Poodle client.
///
/// Start with [`Client::builder`] to override defaults. Explicit settings
/// take precedence over the environment, which takes precedence over the
/// defaults.
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    overrides: ConfigOverrides,
    use_env: bool,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - Base URL `https://api.usepoodle.com`
    /// - 30 second total timeout, 10 second connect timeout
    /// - Debug logging off
    /// - Environment not consulted
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.overrides.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing against a local server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.overrides.base_url = Some(base_url.into());
        self
    }

    /// Set the total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.overrides.timeout = Some(timeout);
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.overrides.connect_timeout = Some(connect_timeout);
        self
    }

    /// Enable or disable debug logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.overrides.debug = Some(debug);
        self
    }

    /// Fill unset values from the `POODLE_*` environment variables.
    pub fn with_env(mut self) -> Self {
        self.use_env = true;
        self
    }

    /// Resolve the configuration without building a client.
    pub fn config(&self) -> Config {
        if self.use_env {
            load_config(&self.overrides, |key| std::env::var(key).ok())
        } else {
            load_config(&self.overrides, |_| None)
        }
    }

    /// Build the client.
    ///
    /// # Examples
    /// ```no_run
    /// # use poodle_client::Client;
    /// # use std::time::Duration;
    /// # fn main() -> Result<(), poodle_client::Error> {
    /// let client = Client::builder()
    ///     .api_key("your_api_key")
    ///     .timeout(Duration::from_secs(45))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Client> {
        Client::with_config(self.config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::config::DEFAULT_BASE_URL;

    #[tokio::test]
    async fn test_new_client_uses_defaults() {
        let client = Client::new("test_api_key_123").unwrap();
        let config = client.config().await;

        assert_eq!(config.api_key, "test_api_key_123");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!client.is_debug().await);
    }

    #[tokio::test]
    async fn test_with_config_keeps_values() {
        let config = Config {
            api_key: "custom_api_key".into(),
            base_url: "https://custom.api.com".into(),
            timeout: Duration::from_secs(45),
            connect_timeout: Duration::from_secs(15),
            debug: true,
        };
        let client = Client::with_config(config.clone()).unwrap();

        assert_eq!(client.config().await, config);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = Client::with_config(Config::default()).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let err = Client::builder()
            .api_key("key")
            .timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("timeout"));
    }

    #[tokio::test]
    async fn test_debug_toggle() {
        let client = Client::new("test_api_key").unwrap();

        client.set_debug(true).await;
        assert!(client.is_debug().await);

        client.set_debug(false).await;
        assert!(!client.is_debug().await);
    }

    #[tokio::test]
    async fn test_config_returns_copies() {
        let client = Client::new("test_api_key").unwrap();

        let mut first = client.config().await;
        let second = client.config().await;
        assert_eq!(first, second);

        first.api_key = "changed".into();
        first.debug = true;
        assert_eq!(client.config().await.api_key, "test_api_key");
        assert!(!client.is_debug().await);
    }

    #[test]
    fn test_builder_resolves_explicit_values() {
        let config = Client::builder()
            .api_key("key")
            .base_url("http://localhost:8080")
            .connect_timeout(Duration::from_secs(2))
            .debug(true)
            .config();

        assert_eq!(config.api_key, "key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
        assert!(config.debug);
    }
}
