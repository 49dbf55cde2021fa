//! Role-conditional navigation.
//!
//! [`role_to_entries`] is the only role-to-menu mapping. Desktop and mobile menus both come from
//! it through [`build_menu`], so they cannot drift apart.

use crate::role::{Role, RoleSet};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum Visibility {
    /// Only visitors who are not signed in.
    Anonymous,
    /// Any signed-in visitor.
    Authenticated,
    /// Signed-in visitors whose role is in the set.
    Roles(RoleSet),
}

impl Visibility {
    pub fn admits(self, role: Option<Role>) -> bool {
        match (self, role) {
            (Visibility::Anonymous, role) => role.is_none(),
            (Visibility::Authenticated, role) => role.is_some(),
            (Visibility::Roles(roles), Some(role)) => roles.contains(role),
            (Visibility::Roles(_), None) => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub label: &'static str,
    pub destination: &'static str,
    pub icon: &'static str,
    pub visibility: Visibility,
}

const fn entry(
    label: &'static str,
    destination: &'static str,
    icon: &'static str,
    visibility: Visibility,
) -> NavEntry {
    NavEntry {
        label,
        destination,
        icon,
        visibility,
    }
}

/// Every entry the portal can show, in display order.
fn catalogue() -> Vec<NavEntry> {
    use Role::*;

    let front_desk = Visibility::Roles(RoleSet::of(&[Admin, Recp]));
    let self_booking = Visibility::Roles(RoleSet::of(&[User, Doctor, Member, Admin]));
    let everyone = Visibility::Roles(RoleSet::all());
    let staff = Visibility::Roles(RoleSet::of(&[Admin, Member, Recp, Doctor]));
    let admin_member = Visibility::Roles(RoleSet::of(&[Admin, Member]));

    vec![
        entry("Home", "/", "home", Visibility::Anonymous),
        entry("Login", "/auth/login", "log-in", Visibility::Anonymous),
        entry("Register", "/auth/register", "user-plus", Visibility::Anonymous),
        entry(
            "New Appointment (Existing User)",
            "/dashboard/appointments/existing-user",
            "calendar-check",
            front_desk,
        ),
        entry(
            "New Appointment (New User)",
            "/dashboard/appointments/new-user",
            "calendar-plus",
            front_desk,
        ),
        entry("Dashboard", "/dashboard", "layout-dashboard", Visibility::Authenticated),
        entry("Profile", "/profile", "user", Visibility::Authenticated),
        entry(
            "New Appointment",
            "/dashboard/appointments/new",
            "calendar-plus",
            self_booking,
        ),
        entry("Appointments", "/dashboard/appointments", "calendar", everyone),
        entry("Reports", "/dashboard/reports", "file-text", everyone),
        entry("Tests", "/dashboard/tests", "flask-conical", staff),
        entry("Medical Examinations", "/dashboard/mer", "stethoscope", staff),
        entry("Doctors", "/dashboard/doctors", "user-round", admin_member),
        entry("Users", "/dashboard/users", "users", admin_member),
        entry("Website", "/dashboard/website", "globe", admin_member),
        entry(
            "Export users",
            "/dashboard/users/export",
            "download",
            Visibility::Roles(RoleSet::of(&[Admin])),
        ),
    ]
}

/// Entries visible to `role` (`None` for a visitor who is not signed in).
pub fn role_to_entries(role: Option<Role>) -> Vec<NavEntry> {
    catalogue()
        .into_iter()
        .filter(|entry| entry.visibility.admits(role))
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presentation {
    #[default]
    Desktop,
    Mobile,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Menu {
    pub presentation: Presentation,
    pub role: Option<Role>,
    pub entries: Vec<NavEntry>,
}

pub fn build_menu(role: Option<Role>, presentation: Presentation) -> Menu {
    Menu {
        presentation,
        role,
        entries: role_to_entries(role),
    }
}
