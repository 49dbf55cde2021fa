//! The locally persisted user-profile record.
//!
//! Stored under `userData` as `{ "user": { "id", "name", "email", "role", ... } }`. Fields beyond
//! the four the portal relies on are kept verbatim in [`UserProfile::extra`] so a read/write cycle
//! does not lose anything the backend sent.
//!
//! Only `id` and `role` are required to read a stored record. `name` and `email` are carried as the
//! backend sent them; their shape is checked once, by [`UserProfile::validate`], when a credential
//! is handed over at login.

use crate::role::Role;
use crate::{PortalError, PortalResult};
use portal_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// The identity of the signed-in visitor, as produced by the session reader.
pub type Identity = UserProfile;

impl UserProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: Option<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email,
            role,
            extra: BTreeMap::new(),
        }
    }

    /// Check the display fields of a profile about to be stored.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] when the name is blank or the email, if any, is not
    /// of the form `local@domain`.
    pub fn validate(&self) -> PortalResult<()> {
        NonEmptyText::new(&self.name)
            .map_err(|e| PortalError::InvalidInput(format!("user name: {e}")))?;
        if let Some(email) = &self.email {
            EmailAddress::parse(email)
                .map_err(|e| PortalError::InvalidInput(format!("user email: {e}")))?;
        }
        Ok(())
    }
}

/// Exact JSON shape of the `userData` storage entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredUserData {
    pub user: UserProfile,
}

/// What the login flow hands over once the backend has accepted the visitor's credentials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub user: UserProfile,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    let id = match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    };
    if id.trim().is_empty() {
        return Err(serde::de::Error::custom("user id cannot be empty"));
    }
    Ok(id)
}
