//! Downstream identity backends.
//!
//! Each client owns one admin API and enforces its allowed domain before any
//! request leaves the process.

pub mod nextcloud;
pub mod synapse;

use std::fmt;
use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::email::EmailAddress;
use crate::error::BackendError;

pub use nextcloud::NextcloudClient;
pub use synapse::SynapseClient;

/// User agent sent to every backend.
pub const USER_AGENT: &str = "UserliWebhookListener/1.0";

/// Identity of a downstream backend, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Nextcloud,
    Synapse,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Nextcloud => "nextcloud",
            Backend::Synapse => "synapse",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the HTTP client shared by all backends.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Split `email` and check it against the backend's allowed domain.
pub(crate) fn check_domain<'a>(
    backend: Backend,
    email: &'a str,
    allowed_domain: &str,
) -> Result<EmailAddress<'a>, BackendError> {
    let address = EmailAddress::parse(email)?;

    if !address.is_in_domain(allowed_domain) {
        return Err(BackendError::DomainNotAllowed {
            backend,
            domain: address.domain.to_string(),
        });
    }

    Ok(address)
}

/// Provisioning only accepts `200 OK`.
pub(crate) fn check_provision_status(
    backend: Backend,
    status: StatusCode,
) -> Result<(), BackendError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(BackendError::UnexpectedStatus {
            backend,
            status: status.as_u16(),
        })
    }
}

/// Deprovisioning accepts `200 OK` and `404 Not Found`; a missing user is
/// already deleted.
pub(crate) fn check_deprovision_status(
    backend: Backend,
    status: StatusCode,
) -> Result<(), BackendError> {
    match status {
        StatusCode::OK | StatusCode::NOT_FOUND => Ok(()),
        other => Err(BackendError::UnexpectedStatus {
            backend,
            status: other.as_u16(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_domain() {
        let address = check_domain(Backend::Nextcloud, "alice@example.com", "example.com").unwrap();
        assert_eq!(address.local_part, "alice");

        let err = check_domain(Backend::Synapse, "alice@other.com", "example.com").unwrap_err();
        assert!(matches!(
            err,
            BackendError::DomainNotAllowed { backend: Backend::Synapse, ref domain } if domain == "other.com"
        ));
    }

    #[test]
    fn test_check_provision_status() {
        assert!(check_provision_status(Backend::Nextcloud, StatusCode::OK).is_ok());
        assert!(check_provision_status(Backend::Nextcloud, StatusCode::CREATED).is_err());
        assert!(check_provision_status(Backend::Nextcloud, StatusCode::NOT_FOUND).is_err());
    }

    #[test]
    fn test_check_deprovision_status() {
        assert!(check_deprovision_status(Backend::Synapse, StatusCode::OK).is_ok());
        assert!(check_deprovision_status(Backend::Synapse, StatusCode::NOT_FOUND).is_ok());

        let err =
            check_deprovision_status(Backend::Synapse, StatusCode::INTERNAL_SERVER_ERROR).unwrap_err();
        assert!(matches!(
            err,
            BackendError::UnexpectedStatus { backend: Backend::Synapse, status: 500 }
        ));
    }
}
