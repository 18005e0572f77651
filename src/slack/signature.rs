//! Slack request signature verification for the Events API.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::{AppError, Result};

type HmacSha256 = Hmac<Sha256>;

/// Version prefix of Slack's signing scheme.
const VERSION: &str = "v0";

/// Requests older (or newer) than this many seconds are rejected.
pub const MAX_REQUEST_AGE_SECONDS: u64 = 300;

fn mac(secret: &str, timestamp: &str, body: &[u8]) -> Result<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| AppError::Signature(format!("invalid signing secret: {err}")))?;
    mac.update(VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Ok(mac)
}

/// Compute the `X-Slack-Signature` value for a request.
///
/// # Errors
///
/// Returns `AppError::Signature` if the secret cannot key the MAC.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> Result<String> {
    let digest = mac(secret, timestamp, body)?.finalize().into_bytes();
    Ok(format!("{VERSION}={}", hex::encode(digest)))
}

/// Verify a request against its `X-Slack-Request-Timestamp` and
/// `X-Slack-Signature` headers. `now` is the current unix time in seconds.
///
/// # Errors
///
/// Returns `AppError::Signature` when the timestamp is malformed or stale,
/// or the signature is malformed or does not match.
pub fn verify(secret: &str, timestamp: &str, signature: &str, body: &[u8], now: i64) -> Result<()> {
    let sent_at: i64 = timestamp
        .parse()
        .map_err(|_| AppError::Signature(format!("invalid timestamp {timestamp:?}")))?;
    if now.abs_diff(sent_at) > MAX_REQUEST_AGE_SECONDS {
        return Err(AppError::Signature("request timestamp is stale".into()));
    }

    let provided = signature
        .strip_prefix("v0=")
        .and_then(|hex_digest| hex::decode(hex_digest).ok())
        .ok_or_else(|| AppError::Signature("malformed signature header".into()))?;

    mac(secret, timestamp, body)?
        .verify_slice(&provided)
        .map_err(|_| AppError::Signature("signature mismatch".into()))
}
