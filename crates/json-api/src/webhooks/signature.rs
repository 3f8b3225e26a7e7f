//! Webhook signatures
//!
//! Deliveries carry a `Stripe-Signature: t=<unix seconds>,v1=<hex>` header.
//! The signature is an HMAC-SHA256 of `"{t}.{body}"` keyed with the
//! endpoint's webhook secret. Several `v1` entries may be present while a
//! secret is being rolled; any one of them matching is enough.

use hmac::{Hmac, Mac};
use jiff::Timestamp;
use sha2::Sha256;
use thiserror::Error;

pub(crate) const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum age (in either direction) of a signed timestamp.
pub(crate) const TOLERANCE_SECONDS: u64 = 300;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub(crate) enum SignatureError {
    #[error("signature header is malformed")]
    Malformed,

    #[error("signature timestamp is outside the tolerance window")]
    Expired,

    #[error("no signature matches the payload")]
    Mismatch,

    #[error("webhook secret is unusable")]
    InvalidSecret,
}

/// Check a signature header against the raw request body.
pub(crate) fn verify(
    secret: &str,
    header: &str,
    payload: &[u8],
    now: Timestamp,
) -> Result<(), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for pair in header.split(',') {
        let Some((key, value)) = pair.trim().split_once('=') else {
            continue;
        };

        match key {
            "t" => timestamp = value.parse::<i64>().ok(),
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::Malformed)?;

    if signatures.is_empty() {
        return Err(SignatureError::Malformed);
    }

    if now.as_second().abs_diff(timestamp) > TOLERANCE_SECONDS {
        return Err(SignatureError::Expired);
    }

    for signature in signatures {
        let Ok(expected) = hex::decode(signature) else {
            continue;
        };

        if keyed(secret, timestamp, payload)?
            .verify_slice(&expected)
            .is_ok()
        {
            return Ok(());
        }
    }

    Err(SignatureError::Mismatch)
}

fn keyed(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Hmac<Sha256>, SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|_invalid| SignatureError::InvalidSecret)?;

    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);

    Ok(mac)
}

/// Signature header for `payload`, as the processor would send it.
#[cfg(test)]
pub(crate) fn sign(
    secret: &str,
    payload: &[u8],
    at: Timestamp,
) -> Result<String, SignatureError> {
    let signature = keyed(secret, at.as_second(), payload)?
        .finalize()
        .into_bytes();

    Ok(format!("t={},v1={}", at.as_second(), hex::encode(signature)))
}
