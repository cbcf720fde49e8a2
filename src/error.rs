//! Error types for the Poodle client.
//!
//! Every failed send produces exactly one [`Error`] variant. Each variant
//! carries a human-readable message plus the fields specific to that kind of
//! failure, and exposes an HTTP-like status code and a structured context map
//! for programmatic inspection.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Validation failures keyed by field name.
///
/// Each field maps to one or more human-readable reasons.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Classification of a `402 Payment Required` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionErrorType {
    /// The subscription has expired.
    SubscriptionExpired,
    /// The trial allowance is used up.
    TrialLimitReached,
    /// The plan's sending limit is reached.
    LimitReached,
    /// The message did not match any known pattern.
    Unknown,
}

impl SubscriptionErrorType {
    /// Classify an API message by substring, first match wins:
    /// `expired`, then `trial`, then `limit`.
    pub fn from_message(message: &str) -> Self {
        if message.contains("expired") {
            Self::SubscriptionExpired
        } else if message.contains("trial") {
            Self::TrialLimitReached
        } else if message.contains("limit") {
            Self::LimitReached
        } else {
            Self::Unknown
        }
    }

    /// Wire name of the classification.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubscriptionExpired => "subscription_expired",
            Self::TrialLimitReached => "trial_limit_reached",
            Self::LimitReached => "limit_reached",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SubscriptionErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distinguishes plain transport failures from timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkErrorKind {
    /// Connection refused, DNS failure, I/O error or an unusable body.
    Transport,
    /// The request exceeded the configured total timeout.
    ConnectionTimeout {
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
}

/// Errors that can occur while sending an email through Poodle.
///
/// Branch on the variant to reach the failure-specific fields; use
/// [`Error::status_code`], [`Error::error_type`] and [`Error::context`] for
/// uniform handling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The email failed local validation, or the API answered 400/422.
    ///
    /// Also returned when a client is built from an invalid configuration.
    #[error("{message}")]
    Validation {
        /// Summary message.
        message: String,
        /// Reasons keyed by field name.
        errors: FieldErrors,
    },

    /// The API rejected the API key (401).
    #[error("{message}")]
    Authentication {
        /// Message from the API or the default.
        message: String,
    },

    /// The account is suspended (403).
    #[error("{message}")]
    AccountSuspended {
        /// Message from the API or the default.
        message: String,
        /// Suspension reason reported by the API.
        reason: String,
    },

    /// The subscription does not allow sending (402).
    #[error("{message}")]
    Subscription {
        /// Message from the API or the default.
        message: String,
        /// Classification derived from the message.
        error_type: SubscriptionErrorType,
    },

    /// Too many requests (429).
    #[error("{message}")]
    RateLimit {
        /// Message from the API or a synthesized one.
        message: String,
        /// Seconds to wait before retrying, from `Retry-After`.
        retry_after: i64,
        /// Request allowance, from `RateLimit-Limit`.
        limit: i64,
        /// Remaining requests, from `RateLimit-Remaining`.
        remaining: i64,
        /// Window reset as epoch seconds, from `RateLimit-Reset`.
        reset: i64,
    },

    /// The request never produced a usable response.
    #[error("{message}")]
    Network {
        /// Description of the failure.
        message: String,
        /// Target URL, empty when not known.
        url: String,
        /// Plain transport failure or timeout.
        kind: NetworkErrorKind,
    },

    /// Any other non-success status.
    #[error("{message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Message from the API or `HTTP {status} error`.
        message: String,
        /// Request URL.
        url: String,
        /// Raw response body.
        response_body: String,
    },
}

impl Error {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self::Validation {
            message: or_default(message.into(), || "Validation failed".to_string()),
            errors,
        }
    }

    /// Create a validation error for a single field and reason.
    pub fn validation_field(field: &str, reason: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![reason.to_string()]);
        Self::validation(reason, errors)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: or_default(message.into(), || "Invalid or missing API key".to_string()),
        }
    }

    /// Create an account-suspended error.
    pub fn account_suspended(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AccountSuspended {
            message: or_default(message.into(), || "Account suspended".to_string()),
            reason: reason.into(),
        }
    }

    /// Create a subscription error.
    pub fn subscription(message: impl Into<String>, error_type: SubscriptionErrorType) -> Self {
        Self::Subscription {
            message: or_default(message.into(), || "Subscription error".to_string()),
            error_type,
        }
    }

    /// Create a rate-limit error, synthesizing a message when none is given.
    pub fn rate_limit(
        message: impl Into<String>,
        retry_after: i64,
        limit: i64,
        remaining: i64,
        reset: i64,
    ) -> Self {
        Self::RateLimit {
            message: or_default(message.into(), || {
                format!("Rate limit exceeded. Retry after {retry_after} seconds.")
            }),
            retry_after,
            limit,
            remaining,
            reset,
        }
    }

    /// Create a transport-level network error.
    pub fn network(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Network {
            message: or_default(message.into(), || "Network error occurred".to_string()),
            url: url.into(),
            kind: NetworkErrorKind::Transport,
        }
    }

    /// Create a network error for a request that exceeded its timeout.
    pub fn connection_timeout(timeout_secs: u64, url: impl Into<String>) -> Self {
        Self::Network {
            message: format!("Connection timeout after {timeout_secs} seconds"),
            url: url.into(),
            kind: NetworkErrorKind::ConnectionTimeout { timeout_secs },
        }
    }

    /// Create a generic HTTP error.
    pub fn http(
        status: u16,
        message: impl Into<String>,
        url: impl Into<String>,
        response_body: impl Into<String>,
    ) -> Self {
        Self::Http {
            status,
            message: or_default(message.into(), || format!("HTTP {status} error")),
            url: url.into(),
            response_body: response_body.into(),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation { message, .. }
            | Self::Authentication { message }
            | Self::AccountSuspended { message, .. }
            | Self::Subscription { message, .. }
            | Self::RateLimit { message, .. }
            | Self::Network { message, .. }
            | Self::Http { message, .. } => message,
        }
    }

    /// HTTP-like status code; `0` for transport failures.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Authentication { .. } => 401,
            Self::Subscription { .. } => 402,
            Self::AccountSuspended { .. } => 403,
            Self::RateLimit { .. } => 429,
            Self::Network {
                kind: NetworkErrorKind::Transport,
                ..
            } => 0,
            Self::Network {
                kind: NetworkErrorKind::ConnectionTimeout { .. },
                ..
            } => 408,
            Self::Http { status, .. } => *status,
        }
    }

    /// Machine-readable classification.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::Authentication { .. } => "authentication_error",
            Self::AccountSuspended { .. } => "account_suspended",
            Self::Subscription { .. } => "subscription_error",
            Self::RateLimit { .. } => "rate_limit_exceeded",
            Self::Network {
                kind: NetworkErrorKind::Transport,
                ..
            } => "network_error",
            Self::Network {
                kind: NetworkErrorKind::ConnectionTimeout { .. },
                ..
            } => "connection_timeout",
            Self::Http { .. } => "http_error",
        }
    }

    /// Structured context for logging or programmatic inspection.
    ///
    /// Always contains `error_type`; the remaining keys depend on the variant.
    pub fn context(&self) -> Map<String, Value> {
        let mut ctx = Map::new();
        ctx.insert("error_type".into(), Value::from(self.error_type()));

        match self {
            Self::Validation { errors, .. } => {
                let errors = errors
                    .iter()
                    .map(|(field, reasons)| (field.clone(), Value::from(reasons.clone())))
                    .collect::<Map<_, _>>();
                ctx.insert("errors".into(), Value::Object(errors));
            }
            Self::Authentication { .. } => {}
            Self::AccountSuspended { reason, .. } => {
                ctx.insert("reason".into(), Value::from(reason.as_str()));
            }
            Self::Subscription { error_type, .. } => {
                ctx.insert("subscription_type".into(), Value::from(error_type.as_str()));
            }
            Self::RateLimit {
                retry_after,
                limit,
                remaining,
                reset,
                ..
            } => {
                ctx.insert("retry_after".into(), Value::from(*retry_after));
                ctx.insert("limit".into(), Value::from(*limit));
                ctx.insert("remaining".into(), Value::from(*remaining));
                ctx.insert("reset".into(), Value::from(*reset));
            }
            Self::Network { url, kind, .. } => {
                if let NetworkErrorKind::ConnectionTimeout { timeout_secs } = kind {
                    ctx.insert("timeout".into(), Value::from(*timeout_secs));
                }
                ctx.insert("url".into(), Value::from(url.as_str()));
            }
            Self::Http {
                url, response_body, ..
            } => {
                ctx.insert("url".into(), Value::from(url.as_str()));
                ctx.insert("response_body".into(), Value::from(response_body.as_str()));
            }
        }

        ctx
    }

    /// Field errors of a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// How long the API asked the caller to wait, for rate-limit errors.
    ///
    /// `None` for other errors and for a negative `Retry-After`.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimit { retry_after, .. } => {
                u64::try_from(*retry_after).ok().map(Duration::from_secs)
            }
            _ => None,
        }
    }

    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                kind: NetworkErrorKind::ConnectionTimeout { .. },
                ..
            }
        )
    }
}

fn or_default(message: String, default: impl FnOnce() -> String) -> String {
    if message.is_empty() { default() } else { message }
}
