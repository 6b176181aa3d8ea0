//! Synapse admin API client.

use reqwest::{header, Client, Url};
use serde::Serialize;
use tracing::info;

use super::{check_deprovision_status, check_domain, Backend};
use crate::config::SynapseConfig;
use crate::error::BackendError;

#[derive(Debug, Serialize)]
struct DeactivateRequest {
    erase: bool,
}

/// Client for the Synapse user admin API.
#[derive(Debug, Clone)]
pub struct SynapseClient {
    client: Client,
    config: SynapseConfig,
}

impl SynapseClient {
    pub fn new(config: SynapseConfig, client: Client) -> Self {
        Self { client, config }
    }

    /// Deactivate and erase the Matrix account for `email`.
    ///
    /// A missing account counts as deactivated.
    pub async fn deprovision_user(&self, email: &str) -> Result<(), BackendError> {
        let address = check_domain(Backend::Synapse, email, &self.config.domain)?;
        let user_id = format!("@{}:{}", address.local_part, self.config.domain);

        let url = self.deactivate_url(&user_id)?;
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .header(header::ACCEPT, "application/json")
            .json(&DeactivateRequest { erase: true })
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                backend: Backend::Synapse,
                source,
            })?;

        let status = response.status();
        info!(user_id = %user_id, status_code = status.as_u16(), "synapse_deprovision_response");

        check_deprovision_status(Backend::Synapse, status)
    }

    /// `{api_url}/deactivate/{user_id}`
    fn deactivate_url(&self, user_id: &str) -> Result<Url, BackendError> {
        let mut url = self.config.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::InvalidUrl {
                backend: Backend::Synapse,
                reason: "base url cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(["deactivate", user_id]);
        Ok(url)
    }
}
