//! # Portal Core
//!
//! Session, route-guard and navigation logic for the clinic portal.
//!
//! This crate contains pure decisions over locally persisted state:
//! - Reading the stored credential and profile into a [`Session`] ([`session`])
//! - Deciding whether a screen renders, redirects to login or shows a not-authorized placeholder
//!   ([`guard`], [`routes`])
//! - Building the role-dependent menu ([`nav`])
//!
//! **No API concerns**: HTTP handlers, cookies and command-line parsing belong in `api-rest`,
//! `api-shared` and `portal-cli`. Nothing here performs network I/O.

pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod guard;
pub mod nav;
pub mod profile;
pub mod role;
pub mod routes;
pub mod session;
pub mod store;
pub mod theme;
pub mod token;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::PortalConfig;
pub use constants::DEFAULT_STORE_PATH;
pub use error::{PortalError, PortalResult};
pub use guard::{decide, decide_for, Decision, GuardDecision, RouteGuard};
pub use nav::{build_menu, role_to_entries, Menu, NavEntry, Presentation, Visibility};
pub use profile::{Credential, Identity, StoredUserData, UserProfile};
pub use role::{Role, RoleSet};
pub use routes::{Access, RouteRule, RouteTable};
pub use session::{read_session, Session, SessionStore};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use theme::Theme;
pub use token::{decode_claims, TokenClaims, TokenError};
