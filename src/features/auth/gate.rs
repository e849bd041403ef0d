//! Authentication gate for protected views. Every mount of a protected view
//! asks the gate for a session first; no fetch is issued without one.

use super::types::Session;
use crate::storage::SessionStore;
use crate::ui::routes::{Navigator, Route};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Unauthenticated,
    Checking,
    Authenticated,
}

pub struct SessionGate {
    sessions: SessionStore,
    navigator: Arc<dyn Navigator>,
    state: Mutex<GateState>,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    #[must_use]
    pub fn new(sessions: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            sessions,
            navigator,
            state: Mutex::new(GateState::Unauthenticated),
        }
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the stored session, or redirects to the login route when the
    /// token or the profile is missing or the profile cannot be read.
    pub fn enter(&self) -> Option<Session> {
        if !self.sessions.has_credentials() {
            debug!("no stored session");
            self.deny();
            return None;
        }

        self.set_state(GateState::Checking);
        match self.sessions.load() {
            Some(session) => {
                self.set_state(GateState::Authenticated);
                Some(session)
            }
            None => {
                warn!("stored session could not be restored");
                self.deny();
                None
            }
        }
    }

    /// Handles an authentication rejection from the backend: tokens are
    /// dropped, the profile stays, and the user is sent back to login.
    pub fn reject(&self) {
        info!("session rejected by server");
        self.sessions.expire();
        self.deny();
    }

    fn deny(&self) {
        self.set_state(GateState::Unauthenticated);
        self.navigator.navigate(Route::Login);
    }

    fn set_state(&self, state: GateState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }
}
