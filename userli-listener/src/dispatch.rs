//! Event dispatching to the identity backends.
//!
//! ## Routing
//!
//! ```text
//! user.created → Nextcloud provision
//! user.deleted → Nextcloud deprovision + Synapse deprovision (independent)
//! other        → UnknownEventType (400)
//! ```
//!
//! Backend failures are logged and reported, never returned as errors: the
//! webhook sender has no way to recover from them.

use futures::future;
use tracing::{error, info, warn};

use crate::backend::{Backend, NextcloudClient, SynapseClient};
use crate::error::{BackendError, WebhookError};
use crate::event::{EventType, UserEvent};

/// Operation performed against a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Provision,
    Deprovision,
}

impl Action {
    fn as_str(&self) -> &'static str {
        match self {
            Action::Provision => "provision",
            Action::Deprovision => "deprovision",
        }
    }
}

/// Result of one backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutcome {
    pub backend: Backend,
    pub action: Action,
    pub error: Option<String>,
}

impl BackendOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-backend outcomes of a dispatched event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcomes: Vec<BackendOutcome>,
}

impl DispatchReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

/// Routes user events to the backend clients.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    nextcloud: NextcloudClient,
    synapse: SynapseClient,
}

impl Dispatcher {
    pub fn new(nextcloud: NextcloudClient, synapse: SynapseClient) -> Self {
        Self { nextcloud, synapse }
    }

    /// Dispatch a decoded event.
    ///
    /// Only an unrecognized event type is an error.
    pub async fn dispatch(&self, event: &UserEvent) -> Result<DispatchReport, WebhookError> {
        let email = event.email();

        let outcomes = match &event.event_type {
            EventType::UserCreated => {
                info!(email = %email, "user_created_event_received");

                let result = self.nextcloud.provision_user(email).await;
                vec![record(Backend::Nextcloud, Action::Provision, email, result)]
            }
            EventType::UserDeleted => {
                info!(email = %email, "user_deleted_event_received");

                let (nextcloud, synapse) = future::join(
                    self.nextcloud.deprovision_user(email),
                    self.synapse.deprovision_user(email),
                )
                .await;

                vec![
                    record(Backend::Nextcloud, Action::Deprovision, email, nextcloud),
                    record(Backend::Synapse, Action::Deprovision, email, synapse),
                ]
            }
            EventType::Unknown(other) => {
                warn!(event_type = %other, "unknown_event_type");
                return Err(WebhookError::UnknownEventType(other.clone()));
            }
        };

        let report = DispatchReport { outcomes };

        info!(
            event_type = %event.event_type,
            backend_calls = report.outcomes.len(),
            failures = report.failures(),
            "event_dispatch_complete"
        );

        Ok(report)
    }
}

/// Log a backend result and turn it into an outcome.
fn record(
    backend: Backend,
    action: Action,
    email: &str,
    result: Result<(), BackendError>,
) -> BackendOutcome {
    match result {
        Ok(()) => {
            info!(
                backend = backend.as_str(),
                action = action.as_str(),
                email = %email,
                "backend_call_succeeded"
            );
            BackendOutcome {
                backend,
                action,
                error: None,
            }
        }
        Err(e) => {
            match &e {
                BackendError::DomainNotAllowed { .. } | BackendError::InvalidEmail(_) => warn!(
                    backend = backend.as_str(),
                    action = action.as_str(),
                    email = %email,
                    error = %e,
                    "backend_call_rejected"
                ),
                _ => error!(
                    backend = backend.as_str(),
                    action = action.as_str(),
                    email = %email,
                    error = %e,
                    "backend_call_failed"
                ),
            }
            BackendOutcome {
                backend,
                action,
                error: Some(e.to_string()),
            }
        }
    }
}
