//! Entry envelope: expiry header + payload.
//!
//! The engine stores every value as an 8-byte big-endian expiry timestamp
//! (milliseconds since the Unix epoch, `0` = no expiry) followed by the raw
//! payload. The header is fixed-size so decoding is a bounds check and a
//! slice, and big-endian so a hex dump of the key space stays readable.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Size of the expiry header in bytes.
pub const HEADER_LEN: usize = 8;

/// Wraps a payload in an envelope with an optional absolute expiry.
pub fn encode(payload: &[u8], expires_at_ms: Option<u64>) -> Vec<u8> {
    let mut entry = Vec::with_capacity(HEADER_LEN + payload.len());
    entry.extend_from_slice(&expires_at_ms.unwrap_or(0).to_be_bytes());
    entry.extend_from_slice(payload);
    entry
}

/// Splits an envelope into (expiry, payload).
///
/// # Errors
///
/// Returns [`Error::Deserialization`] if the entry is shorter than the
/// header - that can only happen if the key space was written by something
/// other than this crate.
pub fn decode(entry: &[u8]) -> Result<(Option<u64>, &[u8])> {
    if entry.len() < HEADER_LEN {
        return Err(Error::Deserialization(serde::de::Error::custom(
            "entry is shorter than the expiry header",
        )));
    }
    let mut header = [0u8; HEADER_LEN];
    header.copy_from_slice(&entry[..HEADER_LEN]);
    let raw = u64::from_be_bytes(header);
    let expires_at = if raw == 0 { None } else { Some(raw) };
    Ok((expires_at, &entry[HEADER_LEN..]))
}

/// Returns `true` if an entry with the given expiry is past it at `now_ms`.
#[inline]
pub fn is_expired(expires_at_ms: Option<u64>, now_ms: u64) -> bool {
    expires_at_ms.map(|exp| now_ms >= exp).unwrap_or(false)
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Converts a ttl into an absolute expiry relative to now.
pub fn deadline(ttl: Duration) -> u64 {
    now_ms().saturating_add(ttl.as_millis() as u64)
}
