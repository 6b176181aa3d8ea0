//! Userli webhook listener.
//!
//! Receives user lifecycle webhooks from Userli and mirrors them into the
//! Nextcloud OIDC user registry and the Synapse admin API.
//!
//! ## Architecture
//!
//! ```text
//! POST /userli → signature → UserEvent → Dispatcher → { Nextcloud, Synapse }
//! ```

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod email;
pub mod error;
pub mod event;
pub mod web;

// Re-export commonly used types
pub use backend::{build_http_client, Backend, NextcloudClient, SynapseClient};
pub use config::{Config, ConfigError, NextcloudConfig, SynapseConfig};
pub use dispatch::{DispatchReport, Dispatcher};
pub use error::{BackendError, WebhookError};
pub use event::{EventType, UserEvent};
pub use web::{router, AppState};
