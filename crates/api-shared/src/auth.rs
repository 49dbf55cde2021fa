//! Cookie encoding for the persisted session keys.
//!
//! The stored values (a token, a JSON profile record) contain characters that are not allowed in
//! a cookie value, so every value is carried base64url-encoded without padding.

use base64::{engine::general_purpose, Engine as _};

/// Encode a stored value for use as a cookie value.
pub fn encode_cookie_value(value: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(value)
}

/// Decode a cookie value produced by [`encode_cookie_value`].
///
/// Returns `None` for values that are not valid base64url or not UTF-8.
pub fn decode_cookie_value(value: &str) -> Option<String> {
    let bytes = general_purpose::URL_SAFE_NO_PAD.decode(value.trim()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Split a `Cookie` request header into name/value pairs.
pub fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name, value.trim().trim_matches('"')))
    })
}

/// `Set-Cookie` header value storing `value` under `name`.
pub fn set_cookie(name: &str, value: &str) -> String {
    format!(
        "{name}={}; Path=/; HttpOnly; SameSite=Lax",
        encode_cookie_value(value)
    )
}

/// `Set-Cookie` header value that removes `name`.
pub fn removal_cookie(name: &str) -> String {
    format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
