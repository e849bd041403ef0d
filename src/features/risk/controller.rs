//! Dashboard view controller. Each mount or refresh stamps its fetch with a
//! generation number; a response commits only if its generation is still the
//! latest and the view has not been unmounted. Anything else is dropped
//! without touching state.

use super::{client::get_risk_data, types::Incident, types::RiskSnapshot};
use crate::app_lib::{ApiClient, AppError, CancellationToken};
use crate::features::auth::{client as auth_client, Session, SessionGate, UserProfile};
use crate::ui::{
    notify::Notifier,
    routes::{Navigator, Route},
};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

const SESSION_EXPIRED: &str = "Session expired. Please login again.";
const LOAD_FAILED: &str = "Failed to load risk score. Check backend or network.";
const REFRESH_FAILED: &str = "Refresh failed.";

/// What the view shows.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    pub user: Option<UserProfile>,
    pub score: u8,
    pub incidents: Vec<Incident>,
    pub loading: bool,
    pub refreshing: bool,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            user: None,
            score: 0,
            incidents: Vec::new(),
            loading: true,
            refreshing: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewOutcome {
    /// A risk snapshot was committed.
    Loaded,
    /// The backend has no record for the account; the view shows an empty state.
    Empty,
    /// No usable session; the user was sent to the login route.
    Redirected,
    /// The fetch failed and the previous state was kept.
    Failed,
    /// A newer fetch was issued while this one was in flight.
    Stale,
    /// The view was unmounted.
    Cancelled,
}

#[derive(Clone, Copy, Debug)]
enum FetchKind {
    Mount,
    Refresh,
}

pub struct DashboardController {
    api: ApiClient,
    gate: SessionGate,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    state: RwLock<DashboardState>,
    generation: AtomicU64,
    cancel: CancellationToken,
}

impl DashboardController {
    /// One controller serves one mounted view. After [`unmount`] every fetch
    /// reports [`ViewOutcome::Cancelled`].
    ///
    /// [`unmount`]: DashboardController::unmount
    #[must_use]
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        let gate = SessionGate::new(api.session().clone(), navigator.clone());
        Self {
            api,
            gate,
            notifier,
            navigator,
            state: RwLock::new(DashboardState::default()),
            generation: AtomicU64::new(0),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    /// Loads the dashboard. Without a stored session no request is made.
    #[instrument(skip_all)]
    pub async fn mount(&self) -> ViewOutcome {
        let Some(session) = self.gate.enter() else {
            self.state.write().await.loading = false;
            return ViewOutcome::Redirected;
        };

        {
            let mut state = self.state.write().await;
            state.user = Some(session.user.clone());
            state.loading = true;
        }
        self.fetch(&session, FetchKind::Mount).await
    }

    /// Re-fetches with the session as stored right now.
    #[instrument(skip_all)]
    pub async fn refresh(&self) -> ViewOutcome {
        self.state.write().await.refreshing = true;

        let Some(session) = self.gate.enter() else {
            self.notifier.error(SESSION_EXPIRED);
            self.state.write().await.refreshing = false;
            return ViewOutcome::Redirected;
        };
        self.fetch(&session, FetchKind::Refresh).await
    }

    /// Marks the view as gone. Responses still in flight are discarded.
    pub fn unmount(&self) {
        debug!("dashboard unmounted");
        self.cancel.cancel();
    }

    /// Ends the session: in-flight fetches go stale, the refresh token is
    /// revoked when the server is reachable, and local state is cleared.
    #[instrument(skip_all)]
    pub async fn logout(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);

        let sessions = self.gate.sessions();
        let refresh_token = sessions.refresh_token();
        if sessions.access_token().is_some() || refresh_token.is_some() {
            if let Err(err) = auth_client::logout(&self.api, refresh_token.as_ref()).await {
                warn!("server logout failed: {err}");
            }
        }

        sessions.clear();
        info!("logged out");
        self.notifier.success("Logged out successfully.");
        self.navigator.navigate(Route::Login);
    }

    async fn fetch(&self, session: &Session, kind: FetchKind) -> ViewOutcome {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!("risk fetch generation {generation} ({kind:?})");

        let result = get_risk_data(
            &self.api,
            &session.user.email,
            Some(&session.access_token),
            &self.cancel,
        )
        .await;

        let mut state = self.state.write().await;
        if self.cancel.is_cancelled() || matches!(result, Err(AppError::Cancelled)) {
            debug!("dropping risk response for unmounted view");
            return ViewOutcome::Cancelled;
        }
        if self.generation.load(Ordering::Acquire) != generation {
            debug!("dropping stale risk response (generation {generation})");
            return ViewOutcome::Stale;
        }

        state.loading = false;
        state.refreshing = false;

        match result {
            Ok(payload) => {
                let snapshot = RiskSnapshot::from_payload(&payload);
                info!(
                    "risk score {} with {} incidents",
                    snapshot.score,
                    snapshot.incidents.len()
                );
                state.score = snapshot.score;
                state.incidents = snapshot.incidents;
                ViewOutcome::Loaded
            }
            Err(err) if err.is_not_found() => {
                debug!("no risk record for account");
                state.score = 0;
                state.incidents = Vec::new();
                ViewOutcome::Empty
            }
            Err(err) if err.is_auth_rejected() => {
                self.gate.reject();
                self.notifier.error(SESSION_EXPIRED);
                ViewOutcome::Redirected
            }
            Err(err) => {
                error!("risk fetch failed: {err}");
                self.notifier.error(&failure_message(kind, &err));
                ViewOutcome::Failed
            }
        }
    }
}

fn failure_message(kind: FetchKind, err: &AppError) -> String {
    match (kind, err.server_message()) {
        (FetchKind::Mount, Some(message)) => format!("Failed to load risk score: {message}"),
        (FetchKind::Mount, None) => LOAD_FAILED.to_string(),
        (FetchKind::Refresh, Some(message)) => format!("Refresh failed: {message}"),
        (FetchKind::Refresh, None) => REFRESH_FAILED.to_string(),
    }
}
