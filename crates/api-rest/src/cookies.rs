//! Cookie-backed session storage.
//!
//! Each request gets its own [`CookieStore`] seeded from the `Cookie` header. Mutations are
//! applied locally, so a handler sees its own writes, and are recorded as `Set-Cookie` values for
//! the response.

use api_shared::auth::{decode_cookie_value, parse_cookie_header, removal_cookie, set_cookie};
use axum::http::{header, HeaderMap};
use portal_core::constants::{SESSION_KEYS, THEME_KEY};
use portal_core::{KeyValueStore, MemoryStore, PortalResult};

#[derive(Debug, Default)]
pub struct CookieStore {
    entries: MemoryStore,
    set_cookies: Vec<String>,
}

impl CookieStore {
    /// Read the portal's keys out of every `Cookie` header. Unknown cookies and values that do not
    /// decode are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut entries = MemoryStore::new();
        for value in headers.get_all(header::COOKIE) {
            let Ok(raw) = value.to_str() else {
                continue;
            };
            for (name, encoded) in parse_cookie_header(raw) {
                if !is_portal_key(name) {
                    continue;
                }
                match decode_cookie_value(encoded) {
                    Some(decoded) => entries.insert(name, decoded),
                    None => tracing::debug!(cookie = name, "ignoring undecodable cookie"),
                }
            }
        }

        Self {
            entries,
            set_cookies: Vec::new(),
        }
    }

    /// `Set-Cookie` values for every mutation, in order.
    pub fn set_cookie_headers(&self) -> &[String] {
        &self.set_cookies
    }
}

fn is_portal_key(name: &str) -> bool {
    name == THEME_KEY || SESSION_KEYS.contains(&name)
}

impl KeyValueStore for CookieStore {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        self.entries.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> PortalResult<()> {
        self.entries.set(key, value)?;
        self.set_cookies.push(set_cookie(key, value));
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PortalResult<()> {
        self.entries.remove(key)?;
        self.set_cookies.push(removal_cookie(key));
        Ok(())
    }
}
