//! Roles carried by an authenticated identity.
//!
//! There is no ordering between roles. In particular `member` is not treated as a weaker `admin`:
//! every route rule and menu entry lists the roles it admits explicitly.

use crate::{PortalError, PortalResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Recp,
    Doctor,
    Member,
    Admin,
}

impl Role {
    pub const ALL: [Role; 5] = [Role::User, Role::Recp, Role::Doctor, Role::Member, Role::Admin];

    /// The persisted tag, as found in the stored profile record.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Recp => "recp",
            Role::Doctor => "doctor",
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }

    /// Human readable name for display.
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "Patient",
            Role::Recp => "Receptionist",
            Role::Doctor => "Doctor",
            Role::Member => "Member",
            Role::Admin => "Administrator",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Role::User => 1 << 0,
            Role::Recp => 1 << 1,
            Role::Doctor => 1 << 2,
            Role::Member => 1 << 3,
            Role::Admin => 1 << 4,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PortalError;

    fn from_str(s: &str) -> PortalResult<Self> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s.trim())
            .ok_or_else(|| PortalError::UnknownRole(s.to_owned()))
    }
}

/// A set of roles, stored as a bitmask.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RoleSet(u8);

impl RoleSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        Role::ALL.into_iter().collect()
    }

    pub fn of(roles: &[Role]) -> Self {
        roles.iter().copied().collect()
    }

    pub fn contains(self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Roles in the set, in [`Role::ALL`] order.
    pub fn iter(self) -> impl Iterator<Item = Role> {
        Role::ALL.into_iter().filter(move |role| self.contains(*role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for RoleSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let roles = Vec::<Role>::deserialize(deserializer)?;
        Ok(roles.into_iter().collect())
    }
}
