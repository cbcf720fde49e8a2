//! # Poodle Client
//! Asynchronous client for the Poodle transactional email API. Build an [`Email`], hand it to a [`Client`], and get back either a [`SendResponse`] or a typed [`Error`] describing exactly what went wrong.
//!
//! ## Audience and uses
//! For Rust services that send transactional email (sign-up confirmations, password resets, receipts) through Poodle: configure with [`ClientBuilder`] or the `POODLE_*` environment variables, then call [`Client::send`] or one of its convenience wrappers.
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`. Diagnostics are emitted through `tracing`; install a subscriber to see them.
//!
//! ## Out of scope
//! Each send makes exactly one attempt. There is no retry, backoff, queueing or batching; every failure is returned to the caller.
//!
//! ## Errors
//! Emails are validated locally before any network traffic and rejected as [`Error::Validation`]. API responses map to [`Error::Validation`] (400/422), [`Error::Authentication`] (401), [`Error::Subscription`] (402), [`Error::AccountSuspended`] (403), [`Error::RateLimit`] (429) or [`Error::Http`] (anything else); transport failures and timeouts become [`Error::Network`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use poodle_client::{Client, Error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let client = Client::new("your_api_key")?;
//!
//!     match client
//!         .send_html(
//!             "sender@yourdomain.com",
//!             "recipient@example.com",
//!             "Hello from Poodle",
//!             "<h1>Hello!</h1>",
//!         )
//!         .await
//!     {
//!         Ok(response) => println!("Queued: {}", response.message),
//!         Err(Error::RateLimit { retry_after, .. }) => println!("Retry in {retry_after}s"),
//!         Err(err) => println!("Failed ({}): {err}", err.error_type()),
//!     }
//!     Ok(())
//! }
//! ```

mod address;
mod client;
mod config;
mod error;
mod models;
mod response;
mod transport;

pub use address::{MAX_ADDRESS_LENGTH, is_valid_email};
pub use client::{Client, ClientBuilder};
pub use config::{
    Config, ConfigOverrides, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT,
    ENV_API_KEY, ENV_BASE_URL, ENV_CONNECT_TIMEOUT, ENV_DEBUG, ENV_TIMEOUT, load_config,
};
pub use error::{Error, FieldErrors, NetworkErrorKind, SubscriptionErrorType};
pub use models::{Email, MAX_CONTENT_SIZE, SendResponse};
pub use response::classify;

/// Result type alias for Poodle operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
