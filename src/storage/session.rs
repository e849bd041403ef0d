//! Session persistence on top of a [`KeyValueStore`]. The store is passed
//! explicitly to the components that need it (gate, API client, flows) rather
//! than reached through a global.

use super::KeyValueStore;
use crate::features::auth::types::{Session, UserProfile};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, warn};

pub const ACCESS_TOKEN_KEY: &str = "ss_access";
pub const REFRESH_TOKEN_KEY: &str = "ss_refresh";
pub const USER_KEY: &str = "ss_user";

#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persists tokens and the serialized profile.
    pub fn save(&self, session: &Session) {
        self.store
            .set(ACCESS_TOKEN_KEY, session.access_token.expose_secret());
        match &session.refresh_token {
            Some(token) => self.store.set(REFRESH_TOKEN_KEY, token.expose_secret()),
            None => self.store.remove(REFRESH_TOKEN_KEY),
        }
        match serde_json::to_string(&session.user) {
            Ok(user) => self.store.set(USER_KEY, &user),
            Err(err) => warn!("Failed to serialize user profile: {err}"),
        }
        debug!("session saved for {}", session.user.username);
    }

    /// Reads the stored session. Returns `None` when the token or the profile is
    /// missing, or when the stored profile cannot be decoded.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let access_token = self.access_token()?;
        let raw_user = self.store.get(USER_KEY).filter(|user| !user.is_empty())?;

        let user = match serde_json::from_str::<UserProfile>(&raw_user) {
            Ok(user) => user,
            Err(err) => {
                warn!("Stored user profile is corrupt, treating session as absent: {err}");
                return None;
            }
        };

        Some(Session {
            access_token,
            refresh_token: self.refresh_token(),
            user,
        })
    }

    /// True when both the access token and a profile record are stored,
    /// without validating the profile.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.access_token().is_some()
            && self.store.get(USER_KEY).is_some_and(|user| !user.is_empty())
    }

    /// Stored profile, even when the tokens have expired.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.store
            .get(USER_KEY)
            .and_then(|user| serde_json::from_str(&user).ok())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        self.secret(ACCESS_TOKEN_KEY)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        self.secret(REFRESH_TOKEN_KEY)
    }

    /// Drops both tokens after the server rejected them; the profile is kept.
    pub fn expire(&self) {
        self.store.remove(ACCESS_TOKEN_KEY);
        self.store.remove(REFRESH_TOKEN_KEY);
        debug!("session tokens expired");
    }

    /// Removes everything, used on logout.
    pub fn clear(&self) {
        self.store.clear();
        debug!("session cleared");
    }

    fn secret(&self, key: &str) -> Option<SecretString> {
        self.store
            .get(key)
            .filter(|value| !value.is_empty())
            .map(SecretString::from)
    }
}
