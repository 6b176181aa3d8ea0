//! Email address splitting for backend user ids.

use crate::error::BackendError;

/// An email address split into its local part and domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress<'a> {
    pub local_part: &'a str,
    pub domain: &'a str,
}

impl<'a> EmailAddress<'a> {
    /// Split `local@domain`.
    ///
    /// Exactly one `@` is accepted and both sides must be non-empty. A local
    /// part of `.` or `..` is rejected: it would collapse as a URL path segment.
    pub fn parse(email: &'a str) -> Result<Self, BackendError> {
        let invalid = || BackendError::InvalidEmail(email.to_string());

        let (local_part, domain) = email.split_once('@').ok_or_else(invalid)?;

        if local_part.is_empty()
            || matches!(local_part, "." | "..")
            || domain.is_empty()
            || domain.contains('@')
        {
            return Err(invalid());
        }

        Ok(Self { local_part, domain })
    }

    /// Domains compare case-insensitively.
    pub fn is_in_domain(&self, allowed: &str) -> bool {
        self.domain.eq_ignore_ascii_case(allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let email = EmailAddress::parse("alice@example.com").unwrap();
        assert_eq!(email.local_part, "alice");
        assert_eq!(email.domain, "example.com");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in [
            "",
            "alice",
            "@example.com",
            "alice@",
            "a@b@example.com",
            ".@example.com",
            "..@example.com",
        ] {
            assert!(
                matches!(EmailAddress::parse(raw), Err(BackendError::InvalidEmail(_))),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_keeps_dots_inside_local_part() {
        let email = EmailAddress::parse("first.last@example.com").unwrap();
        assert_eq!(email.local_part, "first.last");

        let email = EmailAddress::parse("...@example.com").unwrap();
        assert_eq!(email.local_part, "...");
    }

    #[test]
    fn test_is_in_domain() {
        let email = EmailAddress::parse("alice@Example.COM").unwrap();
        assert!(email.is_in_domain("example.com"));
        assert!(!email.is_in_domain("example.org"));
        assert!(!email.is_in_domain("mail.example.com"));
    }
}
