//! Request and response models for the send-email endpoint.

use crate::Result;
use crate::address::is_valid_email;
use crate::error::{Error, FieldErrors};
use serde::{Deserialize, Serialize};

/// Maximum size of the HTML or text body, in bytes (10 MiB).
pub const MAX_CONTENT_SIZE: usize = 10 * 1024 * 1024;

/// An email to be sent.
///
/// At least one of `html` and `text` must be non-blank. Empty bodies are
/// left out of the request JSON entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    #[serde(default, skip_serializing_if = "is_empty_body")]
    pub html: Option<String>,
    /// Plain-text body.
    #[serde(default, skip_serializing_if = "is_empty_body")]
    pub text: Option<String>,
}

fn is_empty_body(body: &Option<String>) -> bool {
    body.as_deref().is_none_or(str::is_empty)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl Email {
    /// Create an email without a body; add one with [`Email::set_html`] or
    /// [`Email::set_text`].
    pub fn new(from: impl Into<String>, to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: subject.into(),
            html: None,
            text: None,
        }
    }

    /// Create an HTML email.
    pub fn new_html(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::new(from, to, subject)
        }
    }

    /// Create a plain-text email.
    pub fn new_text(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(from, to, subject)
        }
    }

    /// Create an email carrying both an HTML and a plain-text body.
    pub fn new_with_both(
        from: impl Into<String>,
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            html: Some(html.into()),
            text: Some(text.into()),
            ..Self::new(from, to, subject)
        }
    }

    /// Set the HTML body.
    pub fn set_html(&mut self, html: impl Into<String>) -> &mut Self {
        self.html = Some(html.into());
        self
    }

    /// Set the plain-text body.
    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = Some(text.into());
        self
    }

    /// Set both bodies.
    pub fn set_both(&mut self, html: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.set_html(html).set_text(text)
    }

    /// Returns true if the HTML body is present and not blank.
    pub fn has_html(&self) -> bool {
        self.html.as_deref().is_some_and(|html| !is_blank(html))
    }

    /// Returns true if the plain-text body is present and not blank.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|text| !is_blank(text))
    }

    /// Check every rule and report all violations at once.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] whose field errors are keyed by `from`,
    /// `to`, `subject`, `content`, `html` and `text`.
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();
        let mut reject = |field: &str, reason: &str| {
            errors
                .entry(field.to_string())
                .or_default()
                .push(reason.to_string());
        };

        if is_blank(&self.from) {
            reject("from", "From address is required");
        } else if !is_valid_email(&self.from) {
            reject("from", "From address is not a valid email");
        }

        if is_blank(&self.to) {
            reject("to", "To address is required");
        } else if !is_valid_email(&self.to) {
            reject("to", "To address is not a valid email");
        }

        if is_blank(&self.subject) {
            reject("subject", "Subject is required");
        }

        if !self.has_html() && !self.has_text() {
            reject(
                "content",
                "At least one content type (html or text) is required",
            );
        }

        // Size limits are measured in raw bytes, blank or not.
        if self.html.as_ref().is_some_and(|html| html.len() > MAX_CONTENT_SIZE) {
            reject("html", "HTML content exceeds maximum size limit");
        }

        if self.text.as_ref().is_some_and(|text| text.len() > MAX_CONTENT_SIZE) {
            reject("text", "Text content exceeds maximum size limit");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::validation("Email validation failed", errors))
        }
    }
}

/// Body of a `202 Accepted` response.
///
/// `success` is passed through as received; a `202` carrying
/// `"success": false` is still returned as a response, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendResponse {
    /// Whether the API queued the email.
    pub success: bool,
    /// Message from the API.
    pub message: String,
    /// Error detail, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendResponse {
    /// Create a response without error detail.
    pub fn new(success: bool, message: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            error: None,
        }
    }

    /// Create a response carrying error detail.
    pub fn with_error(success: bool, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success,
            message: message.into(),
            error: Some(error.into()),
        }
    }

    /// Returns true if the email was queued.
    pub fn is_successful(&self) -> bool {
        self.success
    }

    /// Returns true if the response carries a non-empty error.
    pub fn has_error(&self) -> bool {
        self.error.as_deref().is_some_and(|error| !error.is_empty())
    }

    /// Serialize to the wire JSON.
    ///
    /// # Errors
    /// Returns the serializer error; this does not happen for well-formed values.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse from wire JSON. A `null` document yields the default response.
    ///
    /// # Errors
    /// Returns the deserializer error for malformed input.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Option<Self>>(json).map(Option::unwrap_or_default)
    }
}
