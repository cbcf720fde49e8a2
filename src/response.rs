//! Maps raw send-email responses to a [`SendResponse`] or an [`Error`].

use crate::Result;
use crate::error::{Error, FieldErrors, SubscriptionErrorType};
use crate::models::SendResponse;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use std::str::FromStr;

/// Error body shared by every non-202 response.
///
/// Fields are optional so that `null` or missing keys parse as empty.
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiErrorBody {
    /// A JSON `null` body parses as an empty error body.
    fn parse(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Option<Self>>(body)
            .ok()
            .map(Option::unwrap_or_default)
    }

    fn message(&self) -> String {
        self.message.clone().unwrap_or_default()
    }

    fn error(&self) -> String {
        self.error.clone().unwrap_or_default()
    }
}

/// Classify a response from the send-email endpoint.
///
/// `url` is the request URL, recorded on errors that carry one. Exactly one
/// outcome is produced: `202` parses into a [`SendResponse`], every other
/// status becomes an [`Error`] variant. Malformed error bodies fall back to
/// default messages; only an unparsable `202` body surfaces as a
/// [`Error::Network`].
pub fn classify(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    url: &str,
) -> Result<SendResponse> {
    match status {
        StatusCode::ACCEPTED => serde_json::from_slice::<Option<SendResponse>>(body)
            .map(Option::unwrap_or_default)
            .map_err(|_| Error::network("Failed to parse response", url)),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Err(validation_error(body)),
        StatusCode::UNAUTHORIZED => Err(authentication_error(body)),
        StatusCode::PAYMENT_REQUIRED => Err(subscription_error(body)),
        StatusCode::FORBIDDEN => Err(account_suspended_error(body)),
        StatusCode::TOO_MANY_REQUESTS => Err(rate_limit_error(headers, body)),
        _ => Err(http_error(status, body, url)),
    }
}

fn validation_error(body: &[u8]) -> Error {
    let Some(parsed) = ApiErrorBody::parse(body) else {
        let mut errors = FieldErrors::new();
        errors.insert("request".into(), vec!["Invalid request format".into()]);
        return Error::validation("Validation failed", errors);
    };

    let message = parsed.message();
    let mut errors = FieldErrors::new();
    errors.insert("request".into(), vec![message.clone()]);

    let details = parsed.error();
    if !details.is_empty() {
        errors.insert("details".into(), vec![details]);
    }

    Error::validation(message, errors)
}

fn authentication_error(body: &[u8]) -> Error {
    let message = ApiErrorBody::parse(body)
        .map(|parsed| parsed.message())
        .unwrap_or_default();
    Error::authentication(message)
}

fn subscription_error(body: &[u8]) -> Error {
    match ApiErrorBody::parse(body) {
        Some(parsed) => {
            let message = parsed.message();
            let error_type = SubscriptionErrorType::from_message(&message);
            Error::subscription(message, error_type)
        }
        None => Error::subscription("Subscription error", SubscriptionErrorType::Unknown),
    }
}

fn account_suspended_error(body: &[u8]) -> Error {
    match ApiErrorBody::parse(body) {
        Some(parsed) => Error::account_suspended(parsed.message(), parsed.error()),
        None => Error::account_suspended("Account suspended", "unknown"),
    }
}

fn rate_limit_error(headers: &HeaderMap, body: &[u8]) -> Error {
    let message = ApiErrorBody::parse(body).unwrap_or_default().message();

    Error::rate_limit(
        message,
        header_number(headers, "retry-after"),
        header_number(headers, "ratelimit-limit"),
        header_number(headers, "ratelimit-remaining"),
        header_number(headers, "ratelimit-reset"),
    )
}

fn http_error(status: StatusCode, body: &[u8], url: &str) -> Error {
    let message = ApiErrorBody::parse(body)
        .map(|parsed| parsed.message())
        .unwrap_or_default();

    Error::http(
        status.as_u16(),
        message,
        url,
        String::from_utf8_lossy(body),
    )
}

/// Numeric header value, or zero when absent or malformed.
///
/// `HeaderMap` lookups are case-insensitive.
fn header_number<T: FromStr + Default>(headers: &HeaderMap, name: &str) -> T {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or_default()
}
