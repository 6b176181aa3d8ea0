//! Userli webhook event types.
//!
//! Userli posts JSON bodies of the form:
//!
//! ```json
//! {"type": "user.created", "timestamp": "2025-01-01T12:00:00Z", "data": {"email": "alice@example.org"}}
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WebhookError;

pub const EVENT_TYPE_USER_CREATED: &str = "user.created";
pub const EVENT_TYPE_USER_DELETED: &str = "user.deleted";

/// Kind of a user event.
///
/// Unrecognized type strings decode into [`EventType::Unknown`] so that
/// rejecting them stays a dispatch decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    UserCreated,
    UserDeleted,
    Unknown(String),
}

impl EventType {
    pub fn as_str(&self) -> &str {
        match self {
            EventType::UserCreated => EVENT_TYPE_USER_CREATED,
            EventType::UserDeleted => EVENT_TYPE_USER_DELETED,
            EventType::Unknown(other) => other,
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            EVENT_TYPE_USER_CREATED => EventType::UserCreated,
            EVENT_TYPE_USER_DELETED => EventType::UserDeleted,
            _ => EventType::Unknown(value),
        }
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Unknown(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User data attached to an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub email: String,
}

/// A user lifecycle event sent by Userli.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub data: UserData,
}

impl UserEvent {
    /// Decode a (verified) request body.
    pub fn decode(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
    }

    pub fn email(&self) -> &str {
        &self.data.email
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_user_created() {
        let body = br#"{"type":"user.created","timestamp":"2025-03-01T10:15:00Z","data":{"email":"alice@example.com"}}"#;

        let event = UserEvent::decode(body).unwrap();

        assert_eq!(event.event_type, EventType::UserCreated);
        assert_eq!(event.email(), "alice@example.com");
        assert_eq!(
            event.timestamp.unwrap().to_rfc3339(),
            "2025-03-01T10:15:00+00:00"
        );
    }

    #[test]
    fn test_decode_without_timestamp() {
        let body = br#"{"type":"user.deleted","data":{"email":"bob@example.com"}}"#;

        let event = UserEvent::decode(body).unwrap();

        assert_eq!(event.event_type, EventType::UserDeleted);
        assert!(event.timestamp.is_none());
    }

    #[test]
    fn test_decode_unknown_type_is_not_an_error() {
        let body = br#"{"type":"user.renamed","data":{"email":"bob@example.com"}}"#;

        let event = UserEvent::decode(body).unwrap();

        assert_eq!(event.event_type, EventType::Unknown("user.renamed".to_string()));
        assert_eq!(event.event_type.to_string(), "user.renamed");
    }

    #[test]
    fn test_decode_is_deterministic() {
        let body = br#"{"type":"user.created","timestamp":"2025-03-01T10:15:00+01:00","data":{"email":"a@example.com"}}"#;

        assert_eq!(UserEvent::decode(body).unwrap(), UserEvent::decode(body).unwrap());
    }

    #[test]
    fn test_decode_malformed() {
        let cases: [&[u8]; 5] = [
            b"invalid",
            b"",
            br#"{"type":"user.created"}"#,
            br#"{"type":"user.created","data":{"email":"a@example.com"},"timestamp":"yesterday"}"#,
            br#"{"type":42,"data":{"email":"a@example.com"}}"#,
        ];

        for body in cases {
            assert!(matches!(
                UserEvent::decode(body),
                Err(WebhookError::MalformedPayload(_))
            ));
        }
    }
}
