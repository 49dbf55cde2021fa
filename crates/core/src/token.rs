//! Claims decoding for the persisted session credential.
//!
//! The credential is a `header.payload.signature` token issued by the backend. Only the payload is
//! read here, and only to learn when it expires. The signature is never checked on this side: the
//! backend verifies it on every call it serves.

use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("expected 3 dot-separated segments, found {0}")]
    SegmentCount(usize),
    #[error("payload segment is not valid base64")]
    Base64,
    #[error("payload segment is not a JSON object")]
    Json,
    #[error("payload has no numeric exp claim")]
    MissingExpiry,
}

/// Claims read from the token payload.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenClaims {
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Subject, when the backend includes one.
    pub sub: Option<String>,
}

impl TokenClaims {
    /// A token is expired once its `exp` lies strictly before `now`.
    pub fn is_expired_at(&self, now_epoch_seconds: i64) -> bool {
        self.exp < now_epoch_seconds
    }
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    exp: Option<serde_json::Number>,
    #[serde(default)]
    sub: Option<serde_json::Value>,
}

/// Decode the claims of a `header.payload.signature` token.
///
/// The payload may use either the standard or the URL-safe base64 alphabet, with or without
/// padding. Fractional `exp` values are truncated.
///
/// # Errors
///
/// Returns a [`TokenError`] describing the first structural problem found.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::SegmentCount(segments.len()));
    }

    let payload = decode_segment(segments[1])?;
    let object: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(&payload).map_err(|_| TokenError::Json)?;
    let raw: RawClaims =
        serde_json::from_value(serde_json::Value::Object(object)).map_err(|_| TokenError::Json)?;

    let exp = raw
        .exp
        .and_then(|n| n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)))
        .ok_or(TokenError::MissingExpiry)?;

    let sub = match raw.sub {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    Ok(TokenClaims { exp, sub })
}

fn decode_segment(segment: &str) -> Result<Vec<u8>, TokenError> {
    let normalised: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    if normalised.is_empty() {
        return Err(TokenError::Base64);
    }
    general_purpose::STANDARD_NO_PAD
        .decode(normalised)
        .map_err(|_| TokenError::Base64)
}
