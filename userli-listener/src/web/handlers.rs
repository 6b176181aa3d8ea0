//! Webhook endpoint handler.
//!
//! The handler:
//! 1. Buffers the raw body and verifies its signature
//! 2. Decodes the user event
//! 3. Dispatches it to the backends
//!
//! Backend failures are only logged; the caller sees 200 once the event has
//! been accepted.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::dispatch::Dispatcher;
use crate::error::WebhookError;
use crate::event::UserEvent;
use crate::web::signature::{authenticate, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }
}

/// Webhook response.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub status: &'static str,
}

/// Userli webhook endpoint.
pub async fn userli_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookError> {
    info!(body_length = body.len(), "userli_webhook_received");

    // A header that is not visible ASCII cannot match a hex digest.
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(|v| v.to_str().unwrap_or_default());

    if let Err(e) = authenticate(&state.config.webhook_secret, &body, signature) {
        warn!(error = %e, "userli_webhook_unauthorized");
        return Err(e);
    }

    let event = UserEvent::decode(&body).map_err(|e| {
        warn!(error = %e, "userli_webhook_malformed");
        e
    })?;

    info!(
        event_type = %event.event_type,
        email = %event.email(),
        timestamp = ?event.timestamp,
        "userli_event_decoded"
    );

    state.dispatcher.dispatch(&event).await?;

    Ok((StatusCode::OK, Json(WebhookResponse { status: "processed" })))
}
