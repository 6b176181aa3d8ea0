//! Configuration module for environment variable parsing.
//!
//! All values are read once at startup. Missing required values are fatal.

use std::env;

use url::Url;

/// Configuration loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{name} has an invalid value: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Nextcloud `user_oidc` API settings.
#[derive(Debug, Clone)]
pub struct NextcloudConfig {
    /// User endpoint of the `user_oidc` app, e.g. `.../ocs/v2.php/apps/user_oidc/api/v1/user`
    pub api_url: Url,
    pub username: String,
    pub password: String,
    /// OIDC provider the users are attached to
    pub provider_id: String,
    /// Only users of this domain are provisioned
    pub domain: String,
}

/// Synapse admin API settings.
#[derive(Debug, Clone)]
pub struct SynapseConfig {
    /// Admin API base, e.g. `https://matrix.example.org/_synapse/admin/v1`
    pub api_url: Url,
    pub access_token: String,
    /// Server name; only users of this domain are deactivated
    pub domain: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,

    /// `host:port` the webhook server listens on; hostnames are resolved at bind time
    pub listen_addr: String,

    /// Shared secret for the webhook HMAC signature
    pub webhook_secret: String,

    /// Timeout for outbound backend requests in milliseconds
    pub request_timeout_ms: u64,

    pub nextcloud: NextcloudConfig,

    pub synapse: SynapseConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let listen_addr = parse_listen_addr(
            "LISTEN_ADDR",
            &optional("LISTEN_ADDR").unwrap_or_else(|| ":8080".to_string()),
        )?;

        let request_timeout_ms = match optional("REQUEST_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: "REQUEST_TIMEOUT_MS",
                value: raw,
            })?,
            None => 10_000,
        };

        Ok(Config {
            log_level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            listen_addr,
            webhook_secret: required("WEBHOOK_SECRET")?,
            request_timeout_ms,
            nextcloud: NextcloudConfig {
                api_url: parse_url(
                    "NEXTCLOUD_OIDC_USER_API_URL",
                    &required("NEXTCLOUD_OIDC_USER_API_URL")?,
                )?,
                username: required("NEXTCLOUD_ADMIN_USERNAME")?,
                password: required("NEXTCLOUD_ADMIN_PASSWORD")?,
                provider_id: required("NEXTCLOUD_OIDC_PROVIDER_ID")?,
                domain: required("NEXTCLOUD_USER_DOMAIN")?,
            },
            synapse: SynapseConfig {
                api_url: parse_url(
                    "SYNAPSE_USER_ADMIN_API_URL",
                    &required("SYNAPSE_USER_ADMIN_API_URL")?,
                )?,
                access_token: required("SYNAPSE_ADMIN_ACCESS_TOKEN")?,
                domain: required("SYNAPSE_USER_DOMAIN")?,
            },
        })
    }
}

/// Parse an http(s) base URL.
fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// Normalize a listen address. A bare `:port` binds all interfaces.
///
/// Only the port is validated here; the host is resolved when binding.
fn parse_listen_addr(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let raw = raw.trim();
    let invalid = || ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    };

    let (host, port) = raw.rsplit_once(':').ok_or_else(invalid)?;
    port.parse::<u16>().map_err(|_| invalid())?;

    if host.is_empty() {
        Ok(format!("0.0.0.0:{port}"))
    } else {
        Ok(raw.to_string())
    }
}
