//! Syntactic email address validation.

use regex::Regex;
use std::sync::LazyLock;

/// Longest address accepted, in bytes.
pub const MAX_ADDRESS_LENGTH: usize = 254;

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .unwrap_or_else(|err| panic!("address pattern must compile: {err}"))
});

/// Returns true if `address` is an acceptable `local-part@domain` address.
///
/// Surrounding whitespace is ignored. This is a purely syntactic check:
/// no DNS lookup and no internationalized addresses.
///
/// # Examples
/// ```
/// use poodle_client::is_valid_email;
///
/// assert!(is_valid_email("user+tag@example.com"));
/// assert!(!is_valid_email("test..test@example.com"));
/// ```
pub fn is_valid_email(address: &str) -> bool {
    let address = address.trim();
    if address.is_empty() || address.len() > MAX_ADDRESS_LENGTH {
        return false;
    }

    if !ADDRESS_RE.is_match(address) {
        return false;
    }

    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    if domain.starts_with(['-', '.']) || domain.ends_with(['-', '.']) || domain.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    labels
        .iter()
        .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        for address in [
            "test@example.com",
            "user.name@example.com",
            "user+tag@example.com",
            "user123@example-domain.com",
            "first_last%x@mail.example.co.uk",
            "  padded@example.com  ",
        ] {
            assert!(is_valid_email(address), "{address} should be valid");
        }
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        for address in [
            "",
            "   ",
            "invalid",
            "@example.com",
            "test@",
            "test@.com",
            "test@localhost",
            "test@example.c",
            "test@example.123",
            "two@@example.com",
            "a@b@example.com",
            "spaces in@example.com",
        ] {
            assert!(!is_valid_email(address), "{address:?} should be invalid");
        }
    }

    #[test]
    fn test_rejects_bad_dots_in_local_part() {
        assert!(!is_valid_email("test..test@example.com"));
        assert!(!is_valid_email(".test@example.com"));
        assert!(!is_valid_email("test.@example.com"));
    }

    #[test]
    fn test_rejects_bad_domain_labels() {
        assert!(!is_valid_email("test@-example.com"));
        assert!(!is_valid_email("test@example-.com"));
        assert!(!is_valid_email("test@example..com"));
        assert!(!is_valid_email("test@sub.-example.com"));
    }

    #[test]
    fn test_length_limit() {
        let domain = "@example.com";
        let at_limit = format!("{}{domain}", "a".repeat(MAX_ADDRESS_LENGTH - domain.len()));
        let over_limit = format!("{}{domain}", "a".repeat(250));

        assert_eq!(at_limit.len(), MAX_ADDRESS_LENGTH);
        assert!(is_valid_email(&at_limit));
        assert!(!is_valid_email(&over_limit));
    }
}
