//! Session reading and the typed session store.
//!
//! [`read_session`] is the session reader: it turns whatever is in the key-value store into a
//! [`Session`] without ever failing. Every problem it can meet (no token, a malformed token, an
//! expired token, a missing or malformed profile, an unreadable store) yields an anonymous
//! session. Nothing is cleared on the way; clearing is [`SessionStore::logout`]'s job.
//!
//! [`SessionStore`] is the single read/write API over the persisted session keys. Login writes the
//! token, the profile record and the user id together; logout removes them together.

use crate::clock::{Clock, SystemClock};
use crate::constants::{SESSION_KEYS, THEME_KEY, TOKEN_KEY, USER_DATA_KEY, USER_ID_KEY};
use crate::profile::{Credential, Identity, StoredUserData};
use crate::role::Role;
use crate::store::KeyValueStore;
use crate::theme::Theme;
use crate::token::{decode_claims, TokenError};
use crate::{PortalError, PortalResult};
use serde::Serialize;
use std::fmt;

/// Outcome of reading the persisted session.
///
/// `authenticated` is true exactly when an identity is present.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Session {
    authenticated: bool,
    identity: Option<Identity>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            identity: None,
        }
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self {
            authenticated: true,
            identity: Some(identity),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// Why a read produced an anonymous session. Only used for diagnostics.
#[derive(Debug)]
enum AnonymousReason {
    NoToken,
    Token(TokenError),
    Expired { exp: i64, now: i64 },
    NoProfile,
    MalformedProfile(serde_json::Error),
    Store(PortalError),
}

impl fmt::Display for AnonymousReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnonymousReason::NoToken => write!(f, "no stored token"),
            AnonymousReason::Token(e) => write!(f, "unreadable token: {e}"),
            AnonymousReason::Expired { exp, now } => write!(f, "token expired at {exp} (now {now})"),
            AnonymousReason::NoProfile => write!(f, "no stored user profile"),
            AnonymousReason::MalformedProfile(e) => write!(f, "malformed user profile: {e}"),
            AnonymousReason::Store(e) => write!(f, "store unavailable: {e}"),
        }
    }
}

/// Read the current session from `store`, judging expiry against `clock`.
///
/// Read-only and infallible; see the module documentation.
pub fn read_session<S, C>(store: &S, clock: &C) -> Session
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    match read_identity(store, clock) {
        Ok(identity) => Session::authenticated(identity),
        Err(AnonymousReason::Store(e)) => {
            tracing::warn!("session store read failed, treating visitor as anonymous: {e}");
            Session::anonymous()
        }
        Err(reason) => {
            tracing::debug!(%reason, "anonymous session");
            Session::anonymous()
        }
    }
}

fn read_identity<S, C>(store: &S, clock: &C) -> Result<Identity, AnonymousReason>
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    let token = store
        .get(TOKEN_KEY)
        .map_err(AnonymousReason::Store)?
        .ok_or(AnonymousReason::NoToken)?;

    let claims = decode_claims(&token).map_err(AnonymousReason::Token)?;
    let now = clock.now_epoch_seconds();
    if claims.is_expired_at(now) {
        return Err(AnonymousReason::Expired {
            exp: claims.exp,
            now,
        });
    }

    let raw_profile = store
        .get(USER_DATA_KEY)
        .map_err(AnonymousReason::Store)?
        .ok_or(AnonymousReason::NoProfile)?;
    let data: StoredUserData =
        serde_json::from_str(&raw_profile).map_err(AnonymousReason::MalformedProfile)?;

    Ok(data.user)
}

/// Typed access to the persisted session keys.
///
/// Generic over the backing store and the clock so callers can inject a file, a cookie jar or an
/// in-memory map, and tests can freeze time.
#[derive(Clone, Debug)]
pub struct SessionStore<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> SessionStore<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> SessionStore<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// See [`read_session`].
    pub fn read_session(&self) -> Session {
        read_session(&self.store, &self.clock)
    }

    /// Persist a credential issued by the backend.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidInput`] if the token is not a readable
    /// `header.payload.signature` credential or the profile fails [`UserProfile::validate`], or a
    /// store error if writing fails.
    ///
    /// [`UserProfile::validate`]: crate::profile::UserProfile::validate
    pub fn login(&mut self, credential: &Credential) -> PortalResult<()> {
        decode_claims(&credential.token).map_err(|e| {
            PortalError::InvalidInput(format!("token is not a readable credential: {e}"))
        })?;
        credential.user.validate()?;

        let user_data = serde_json::to_string(&StoredUserData {
            user: credential.user.clone(),
        })
        .map_err(PortalError::ProfileSerialization)?;

        self.store.set_many(&[
            (TOKEN_KEY, credential.token.as_str()),
            (USER_DATA_KEY, user_data.as_str()),
            (USER_ID_KEY, credential.user.id.as_str()),
        ])?;

        tracing::info!(user_id = %credential.user.id, role = %credential.user.role, "session stored");
        Ok(())
    }

    /// Remove every session key. The theme preference is left in place.
    pub fn logout(&mut self) -> PortalResult<()> {
        self.store.remove_many(&SESSION_KEYS)?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// The stored theme, or the default when none (or an unreadable one) is stored.
    pub fn theme(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(value) => Theme::from_stored(value.as_deref()),
            Err(e) => {
                tracing::warn!("theme read failed, using default: {e}");
                Theme::default()
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> PortalResult<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::profile::UserProfile;
    use crate::store::{FileStore, MemoryStore};
    use crate::token::tests::token_with_payload;

    const NOW: i64 = 1_760_000_000;
    const FAR_FUTURE: i64 = 4_102_444_800;

    fn profile(role: Role) -> UserProfile {
        UserProfile::new("64f1c", "Asha Rao", Some("asha@clinic.example".into()), role)
    }

    fn user_data_json(role: &str) -> String {
        format!(r#"{{"user":{{"id":"64f1c","name":"Asha Rao","email":"asha@clinic.example","role":"{role}"}}}}"#)
    }

    fn store_with(token: Option<&str>, user_data: Option<&str>) -> MemoryStore {
        let mut store = MemoryStore::new();
        if let Some(token) = token {
            store.set(TOKEN_KEY, token).unwrap();
        }
        if let Some(user_data) = user_data {
            store.set(USER_DATA_KEY, user_data).unwrap();
        }
        store
    }

    #[test]
    fn empty_store_is_anonymous() {
        let session = read_session(&MemoryStore::new(), &FixedClock(NOW));
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn two_segment_token_is_anonymous() {
        let store = store_with(Some("abc.def"), Some(user_data_json("admin").as_str()));
        let session = read_session(&store, &FixedClock(NOW));
        assert!(!session.is_authenticated());
        assert!(session.identity().is_none());
    }

    #[test]
    fn malformed_segment_counts_are_anonymous() {
        for token in ["", "abc", "a.b.c.d", "....", "abc.def"] {
            let store = store_with(Some(token), Some(user_data_json("admin").as_str()));
            assert!(
                !read_session(&store, &FixedClock(NOW)).is_authenticated(),
                "token {token:?} should not authenticate"
            );
        }
    }

    #[test]
    fn epoch_1970_expiry_is_anonymous() {
        let token = token_with_payload(r#"{"exp":1}"#);
        let store = store_with(Some(token.as_str()), Some(user_data_json("admin").as_str()));
        assert!(!read_session(&store, &FixedClock(NOW)).is_authenticated());
    }

    #[test]
    fn expiry_boundary() {
        let token = token_with_payload(&format!(r#"{{"exp":{NOW}}}"#));
        let store = store_with(Some(token.as_str()), Some(user_data_json("recp").as_str()));

        assert!(read_session(&store, &FixedClock(NOW)).is_authenticated());
        assert!(!read_session(&store, &FixedClock(NOW + 1)).is_authenticated());
    }

    #[test]
    fn far_future_token_with_admin_profile_authenticates() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let store = store_with(Some(token.as_str()), Some(user_data_json("admin").as_str()));

        let session = read_session(&store, &FixedClock(NOW));
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(
            session.identity().unwrap().email.as_deref(),
            Some("asha@clinic.example")
        );
    }

    #[test]
    fn backend_profile_with_loose_display_fields_authenticates() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        for user_data in [
            r#"{"user":{"id":"1","name":"Root","email":"root@localhost","role":"admin"}}"#,
            r#"{"user":{"id":"1","name":"","email":"root@localhost","role":"admin"}}"#,
            r#"{"user":{"id":"1","name":"Root","role":"admin"}}"#,
            r#"{"user":{"id":"1","name":"Root","email":null,"role":"admin"}}"#,
        ] {
            let store = store_with(Some(token.as_str()), Some(user_data));
            let session = read_session(&store, &FixedClock(NOW));
            assert!(session.is_authenticated(), "{user_data}");
            assert_eq!(session.role(), Some(Role::Admin));
        }
    }

    #[test]
    fn role_comes_from_stored_profile_for_every_role() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        for role in Role::ALL {
            let store = store_with(Some(token.as_str()), Some(user_data_json(role.as_str()).as_str()));
            assert_eq!(read_session(&store, &FixedClock(NOW)).role(), Some(role));
        }
    }

    #[test]
    fn valid_token_without_profile_is_anonymous() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let store = store_with(Some(token.as_str()), None);
        assert!(!read_session(&store, &FixedClock(NOW)).is_authenticated());
    }

    #[test]
    fn malformed_profile_is_anonymous() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let unknown_role = user_data_json("owner");
        for user_data in ["not json", r#"{"id":"1"}"#, unknown_role.as_str()] {
            let store = store_with(Some(token.as_str()), Some(user_data));
            assert!(!read_session(&store, &FixedClock(NOW)).is_authenticated());
        }
    }

    #[test]
    fn reading_twice_gives_identical_results() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let store = store_with(Some(token.as_str()), Some(user_data_json("doctor").as_str()));
        let clock = FixedClock(NOW);

        assert_eq!(read_session(&store, &clock), read_session(&store, &clock));
        assert_eq!(store.entries().len(), 2);
    }

    #[test]
    fn expired_credentials_are_not_cleared_by_reading() {
        let token = token_with_payload(r#"{"exp":1}"#);
        let store = store_with(Some(token.as_str()), Some(user_data_json("user").as_str()));

        read_session(&store, &FixedClock(NOW));
        assert!(store.get(TOKEN_KEY).unwrap().is_some());
    }

    #[test]
    fn login_writes_all_session_keys() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let mut sessions = SessionStore::with_clock(MemoryStore::new(), FixedClock(NOW));

        sessions
            .login(&Credential {
                token: token.clone(),
                user: profile(Role::Member),
            })
            .unwrap();

        let store = sessions.store();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), Some(token));
        assert_eq!(store.get(USER_ID_KEY).unwrap().as_deref(), Some("64f1c"));
        assert_eq!(sessions.read_session().role(), Some(Role::Member));
    }

    #[test]
    fn login_rejects_unreadable_token() {
        let mut sessions = SessionStore::with_clock(MemoryStore::new(), FixedClock(NOW));
        let err = sessions
            .login(&Credential {
                token: "abc.def".into(),
                user: profile(Role::User),
            })
            .unwrap_err();

        assert!(matches!(err, PortalError::InvalidInput(_)));
        assert!(sessions.store().entries().is_empty());
    }

    #[test]
    fn login_rejects_blank_name_and_writes_nothing() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let mut sessions = SessionStore::with_clock(MemoryStore::new(), FixedClock(NOW));
        let err = sessions
            .login(&Credential {
                token,
                user: UserProfile::new("1", " ", None, Role::User),
            })
            .unwrap_err();

        assert!(matches!(err, PortalError::InvalidInput(_)));
        assert!(sessions.store().entries().is_empty());
    }

    #[test]
    fn login_accepts_localhost_email() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let mut sessions = SessionStore::with_clock(MemoryStore::new(), FixedClock(NOW));
        sessions
            .login(&Credential {
                token,
                user: UserProfile::new("1", "Root", Some("root@localhost".into()), Role::Admin),
            })
            .unwrap();
        assert_eq!(sessions.read_session().role(), Some(Role::Admin));
    }

    #[test]
    fn logout_clears_session_keys_but_keeps_theme() {
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));
        let mut sessions = SessionStore::with_clock(MemoryStore::new(), FixedClock(NOW));
        sessions.set_theme(Theme::Dark).unwrap();
        sessions
            .login(&Credential {
                token,
                user: profile(Role::Admin),
            })
            .unwrap();

        sessions.logout().unwrap();

        assert_eq!(sessions.read_session(), Session::anonymous());
        for key in SESSION_KEYS {
            assert_eq!(sessions.store().get(key).unwrap(), None);
        }
        assert_eq!(sessions.theme(), Theme::Dark);
    }

    #[test]
    fn file_backed_login_is_seen_by_a_fresh_reader() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let token = token_with_payload(&format!(r#"{{"exp":{FAR_FUTURE}}}"#));

        let mut writer = SessionStore::with_clock(FileStore::new(&path), FixedClock(NOW));
        writer
            .login(&Credential {
                token,
                user: profile(Role::Recp),
            })
            .unwrap();

        let reader = SessionStore::with_clock(FileStore::new(&path), FixedClock(NOW));
        assert_eq!(reader.read_session().role(), Some(Role::Recp));

        writer.logout().unwrap();
        assert!(!reader.read_session().is_authenticated());
    }

    #[test]
    fn session_serialises_with_authenticated_flag() {
        let value = serde_json::to_value(Session::anonymous()).unwrap();
        assert_eq!(value, serde_json::json!({"authenticated": false, "identity": null}));
    }
}
