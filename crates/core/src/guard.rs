//! Route guard: turns the current session and a route's access rule into a decision.
//!
//! The decision is recomputed on every call. A role change made elsewhere (for example a re-login
//! in another window) is therefore seen on the next check.

use crate::constants::{DEFAULT_LOGIN_PATH, NEXT_QUERY_PARAM};
use crate::role::Role;
use crate::routes::{Access, RouteTable};
use crate::session::Session;
use crate::PortalResult;
use serde::Serialize;

/// Placeholder shown in place of a screen the visitor's role may not see.
pub const NOT_AUTHORIZED_MESSAGE: &str = "You are not authorized to view this page.";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardDecision {
    /// Render the requested screen.
    Allow,
    /// Stay on the requested URL but render the not-authorized placeholder.
    Forbidden,
    /// Send the visitor to the login screen.
    Redirect { to: String },
}

/// Whether `session` may see a route with `access`, before any redirect target is chosen.
pub fn decide(session: &Session, access: &Access) -> Decision {
    decide_for(session.role(), access)
}

/// [`decide`] for a bare role; `None` means not signed in.
pub fn decide_for(role: Option<Role>, access: &Access) -> Decision {
    match (access, role) {
        (Access::Public, _) => Decision::Allow,
        (_, None) => Decision::Redirect,
        (Access::Authenticated, Some(_)) => Decision::Allow,
        (Access::Roles(roles), Some(role)) if roles.contains(role) => Decision::Allow,
        (Access::Roles(_), Some(_)) => Decision::Forbidden,
    }
}

/// The bare three-way outcome of [`decide`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden,
    Redirect,
}

/// A route table bound to the login screen it redirects to.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    table: RouteTable,
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(RouteTable::default(), DEFAULT_LOGIN_PATH)
    }
}

impl RouteGuard {
    pub fn new(table: RouteTable, login_path: impl Into<String>) -> Self {
        Self {
            table,
            login_path: login_path.into(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Decide what to render for `path`.
    ///
    /// Redirects carry the requested path in a `next` query parameter so the login screen can
    /// send the visitor back afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PortalError::UnknownRoute`] when the table has no rule for `path`.
    pub fn check(&self, path: &str, session: &Session) -> PortalResult<GuardDecision> {
        let rule = self.table.lookup(path)?;
        let decision = match decide(session, &rule.access) {
            Decision::Allow => GuardDecision::Allow,
            Decision::Forbidden => GuardDecision::Forbidden,
            Decision::Redirect => GuardDecision::Redirect {
                to: format!(
                    "{}?{}={}",
                    self.login_path,
                    NEXT_QUERY_PARAM,
                    encode_query_value(path)
                ),
            },
        };

        tracing::debug!(
            path,
            pattern = rule.pattern.as_str(),
            role = ?session.role(),
            ?decision,
            "route guard"
        );
        Ok(decision)
    }
}

/// Percent-encode the characters that would break a query parameter value.
fn encode_query_value(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                encoded.push(byte as char)
            }
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}
