//! Wire types for the REST API.
//!
//! These mirror the core types but carry OpenAPI schemas; the core crate stays free of API
//! concerns.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IdentityRes {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    /// One of `user`, `recp`, `doctor`, `member`, `admin`.
    pub role: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionRes {
    pub authenticated: bool,
    pub identity: Option<IdentityRes>,
}

/// Credential handed over by the backend login flow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LoginReq {
    /// `header.payload.signature` token.
    pub token: String,
    /// Profile record: `{id, name, email, role, ...}`.
    #[schema(value_type = Object)]
    pub user: serde_json::Value,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NavEntryRes {
    pub label: String,
    pub destination: String,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuRes {
    /// `desktop` or `mobile`.
    pub presentation: String,
    pub role: Option<String>,
    pub entries: Vec<NavEntryRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GuardRes {
    pub path: String,
    /// `allow`, `forbidden` or `redirect`.
    pub outcome: String,
    /// Redirect target, present only when `outcome` is `redirect`.
    pub to: Option<String>,
    /// Placeholder text, present only when `outcome` is `forbidden`.
    pub message: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RouteRes {
    pub pattern: String,
    /// `public`, `authenticated` or `roles`.
    pub access: String,
    pub roles: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RoutesRes {
    pub routes: Vec<RouteRes>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThemeRes {
    /// `light` or `dark`.
    pub theme: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ThemeReq {
    /// `light`, `dark` or `toggle`.
    pub theme: String,
}

/// Screen descriptor returned when the guard lets the visitor through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScreenRes {
    pub path: String,
    pub pattern: String,
    pub menu: MenuRes,
}
