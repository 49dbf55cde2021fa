//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the services that need
//! it. Request handling never reads environment variables.

use crate::constants::{DEFAULT_LOGIN_PATH, DEFAULT_STORE_PATH};
use crate::guard::RouteGuard;
use crate::routes::{Access, RouteTable};
use crate::{PortalError, PortalResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    store_path: PathBuf,
    login_path: String,
    routes: RouteTable,
}

impl PortalConfig {
    /// Create a new `PortalConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the login path is not a plain absolute path, or if
    /// the route table does not make it public (every redirect would land on another redirect).
    pub fn new(store_path: PathBuf, login_path: String, routes: RouteTable) -> PortalResult<Self> {
        validate_login_path(&login_path)?;

        match routes.lookup(&login_path) {
            Ok(rule) if rule.access == Access::Public => {}
            _ => {
                return Err(PortalError::InvalidInput(format!(
                    "login path '{login_path}' must be a public route in the route table"
                )))
            }
        }

        Ok(Self {
            store_path,
            login_path,
            routes,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.routes.clone(), self.login_path.clone())
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            login_path: DEFAULT_LOGIN_PATH.into(),
            routes: RouteTable::default(),
        }
    }
}

/// Use the route table at `override_file` when given, otherwise the built-in table.
pub fn resolve_route_table(override_file: Option<PathBuf>) -> PortalResult<RouteTable> {
    match override_file {
        Some(path) => {
            let table = RouteTable::from_yaml_file(&path)?;
            tracing::info!(
                "loaded {} route rules from {}",
                table.rules().len(),
                path.display()
            );
            Ok(table)
        }
        None => Ok(RouteTable::default()),
    }
}

/// Parse the login path from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default login path.
pub fn login_path_from_env_value(value: Option<String>) -> PortalResult<String> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        Some(path) => {
            validate_login_path(&path)?;
            Ok(path)
        }
        None => Ok(DEFAULT_LOGIN_PATH.into()),
    }
}

/// Parse the store path from an optional string value, defaulting to [`DEFAULT_STORE_PATH`].
pub fn store_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH))
}

fn validate_login_path(path: &str) -> PortalResult<()> {
    if !path.starts_with('/') {
        return Err(PortalError::InvalidInput(format!(
            "login path must start with '/': '{path}'"
        )));
    }

    let ok = path.bytes().all(|b| {
        matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'/' | b'-' | b'_' | b'.')
    });
    if !ok {
        return Err(PortalError::InvalidInput(format!(
            "login path contains invalid characters (only alphanumeric, '/', '-', '_', '.' allowed): '{path}'"
        )));
    }

    Ok(())
}
