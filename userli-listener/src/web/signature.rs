//! Userli webhook signature verification.
//!
//! Userli signs the raw request body with HMAC-SHA256 keyed by the shared
//! webhook secret and sends the hex digest in [`SIGNATURE_HEADER`].

use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::warn;

use crate::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex-encoded body signature.
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";

/// Compute the hex-encoded HMAC-SHA256 of `body`.
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = keyed_mac(secret);
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify a webhook signature against the raw body.
///
/// Only lowercase hex is accepted so every signature has a single encoding.
/// The digest comparison is constant-time (`Mac::verify_slice`).
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let is_lower_hex = signature
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));

    let provided = match hex::decode(signature) {
        Ok(bytes) if is_lower_hex => bytes,
        _ => {
            warn!(actual_length = signature.len(), "webhook_signature_not_hex");
            return false;
        }
    };

    let mut mac = keyed_mac(secret);
    mac.update(body);

    let valid = mac.verify_slice(&provided).is_ok();

    if !valid {
        warn!(actual_length = signature.len(), "webhook_signature_mismatch");
    }

    valid
}

/// Check the signature header value (if any) for `body`.
pub fn authenticate(
    secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), WebhookError> {
    let signature = signature.ok_or(WebhookError::AuthenticationMissing)?;

    if verify_signature(secret, body, signature) {
        Ok(())
    } else {
        Err(WebhookError::AuthenticationInvalid)
    }
}

fn keyed_mac(secret: &str) -> HmacSha256 {
    <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size")
}
