//! Constants used throughout the portal core crate.
//!
//! Storage key names are part of the persisted format and must not change between releases.

/// Storage key holding the `header.payload.signature` credential string.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON `{ "user": { ... } }` profile record.
pub const USER_DATA_KEY: &str = "userData";

/// Storage key holding the plain user id string.
pub const USER_ID_KEY: &str = "userId";

/// Storage key holding the theme preference. Not cleared by logout.
pub const THEME_KEY: &str = "theme";

/// Keys written together at login and removed together at logout.
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, USER_DATA_KEY, USER_ID_KEY];

/// Default location of the login screen.
pub const DEFAULT_LOGIN_PATH: &str = "/auth/login";

/// Query parameter carrying the originally requested path on a login redirect.
pub const NEXT_QUERY_PARAM: &str = "next";

/// Default file used by the file-backed store.
pub const DEFAULT_STORE_PATH: &str = ".portal/session.json";
