//! HTTP transport for the send-email endpoint.

use crate::Result;
use crate::config::Config;
use crate::error::Error;
use crate::models::{Email, SendResponse};
use crate::response::classify;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use tracing::{Instrument, debug, info_span, warn};

/// Issues exactly one request per send; no retries.
#[derive(Debug)]
pub(crate) struct Transport {
    http: reqwest::Client,
}

impl Transport {
    /// Build the underlying HTTP client with the configured timeouts.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|err| Error::network(format!("Failed to build HTTP client: {err}"), ""))?;

        Ok(Self { http })
    }

    /// Validate, send and classify one email.
    pub(crate) async fn send_email(&self, config: &Config, email: &Email) -> Result<SendResponse> {
        email.validate()?;

        let url = config.send_email_url();
        let span = info_span!("send_email", url = %url);
        self.dispatch(config, email, &url).instrument(span).await
    }

    async fn dispatch(&self, config: &Config, email: &Email, url: &str) -> Result<SendResponse> {
        let body = serde_json::to_vec(email)
            .map_err(|_| Error::network("Failed to encode request body", ""))?;
        let headers = request_headers(config, url)?;

        if config.debug {
            debug!(
                method = "POST",
                url,
                body = %String::from_utf8_lossy(&body),
                "poodle API request"
            );
        }

        let response = self
            .http
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, "send-email request failed");
                if err.is_timeout() {
                    Error::connection_timeout(config.timeout.as_secs(), url)
                } else {
                    Error::network(format!("Request failed: {err}"), url)
                }
            })?;

        let status = response.status();
        let response_headers = response.headers().clone();
        let response_body = response.bytes().await.map_err(|err| {
            warn!(error = %err, "reading send-email response failed");
            if err.is_timeout() {
                Error::connection_timeout(config.timeout.as_secs(), url)
            } else {
                Error::network("Failed to read response body", url)
            }
        })?;

        if config.debug {
            debug!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&response_body),
                "poodle API response"
            );
        }

        classify(status, &response_headers, &response_body, url)
    }
}

fn request_headers(config: &Config, url: &str) -> Result<HeaderMap> {
    let invalid = |_| Error::network("Failed to create request", url);

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", config.api_key)).map_err(invalid)?,
    );
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&config.user_agent()).map_err(invalid)?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_headers() {
        let config = Config::new("test_api_key");
        let headers = request_headers(&config, "https://x/v1/send-email").unwrap();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer test_api_key");
        assert_eq!(headers[USER_AGENT], config.user_agent().as_str());
    }

    #[test]
    fn test_unencodable_api_key_is_network_error() {
        let config = Config::new("bad\nkey");
        let err = request_headers(&config, "https://x/v1/send-email").unwrap_err();

        assert_eq!(err, Error::network("Failed to create request", "https://x/v1/send-email"));
    }
}
