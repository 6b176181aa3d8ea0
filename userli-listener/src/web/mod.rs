//! Web server module for the Userli webhook.
//!
//! Exposes a single route, `POST /userli`, which verifies, decodes and
//! dispatches user events.

pub mod handlers;
pub mod signature;

use axum::{routing::post, Router};
use tower_http::trace::TraceLayer;

pub use handlers::{userli_webhook, AppState, WebhookResponse};
pub use signature::{compute_signature, verify_signature, SIGNATURE_HEADER};

/// Path the Userli webhook is delivered to.
pub const WEBHOOK_PATH: &str = "/userli";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, post(userli_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
