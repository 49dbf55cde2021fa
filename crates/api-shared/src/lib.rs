//! # API Shared
//!
//! Shared utilities and definitions for the portal APIs.
//!
//! Contains:
//! - Request/response types with OpenAPI schemas (`types` module)
//! - Shared services like `HealthService`
//! - Cookie encoding for carrying the persisted session keys over HTTP (`auth` module)
//!
//! Used by `api-rest` and the `portal-run` binary.

pub mod auth;
pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
