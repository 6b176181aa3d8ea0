//! Nextcloud `user_oidc` user API client.
//!
//! Users are created against an OIDC provider so they can log in through
//! Userli; there is no local password.

use reqwest::{header, Client, RequestBuilder, Url};
use serde::Serialize;
use tracing::info;

use super::{check_deprovision_status, check_domain, check_provision_status, Backend};
use crate::config::NextcloudConfig;
use crate::error::BackendError;

/// Request body of `POST {api_url}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProvisionRequest<'a> {
    provider_id: &'a str,
    user_id: &'a str,
    email: &'a str,
    display_name: &'a str,
}

/// Client for the Nextcloud OIDC user registry.
#[derive(Debug, Clone)]
pub struct NextcloudClient {
    client: Client,
    config: NextcloudConfig,
}

impl NextcloudClient {
    pub fn new(config: NextcloudConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Create the OIDC user for `email`.
    pub async fn provision_user(&self, email: &str) -> Result<(), BackendError> {
        let address = check_domain(Backend::Nextcloud, email, &self.config.domain)?;
        let user_id = address.local_part;

        let body = ProvisionRequest {
            provider_id: &self.config.provider_id,
            user_id,
            email: user_id,
            display_name: user_id,
        };

        let request = self.client.post(self.config.api_url.clone()).json(&body);
        let response = self
            .prepare_request(request)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                backend: Backend::Nextcloud,
                source,
            })?;

        let status = response.status();
        info!(user_id = %user_id, status_code = status.as_u16(), "nextcloud_provision_response");

        check_provision_status(Backend::Nextcloud, status)
    }

    /// Delete the OIDC user for `email`. A missing user counts as deleted.
    pub async fn deprovision_user(&self, email: &str) -> Result<(), BackendError> {
        let address = check_domain(Backend::Nextcloud, email, &self.config.domain)?;
        let user_id = address.local_part;

        let url = self.user_url(user_id)?;
        let response = self
            .prepare_request(self.client.delete(url))
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                backend: Backend::Nextcloud,
                source,
            })?;

        let status = response.status();
        info!(user_id = %user_id, status_code = status.as_u16(), "nextcloud_deprovision_response");

        check_deprovision_status(Backend::Nextcloud, status)
    }

    /// `{api_url}/{user_id}` with the id percent-encoded as one segment.
    fn user_url(&self, user_id: &str) -> Result<Url, BackendError> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl {
                backend: Backend::Nextcloud,
                reason: "base url cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .push(user_id);
        Ok(url)
    }

    fn prepare_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header(header::ACCEPT, "application/json")
            .header("ocs-apirequest", "true")
    }
}
