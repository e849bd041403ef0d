//! Login and registration flows. They validate input, call the auth endpoints,
//! persist the session and report every outcome as a toast plus a route change.
//! Errors never escape a flow; callers get a [`FlowOutcome`] instead.

use super::{
    client,
    types::{LoginRequest, LoginResult, RegisterRequest, RegisterResult},
};
use crate::app_lib::{ApiClient, AppError, FailureClass};
use crate::ui::{
    notify::Notifier,
    routes::{Navigator, Route},
};
use secrecy::ExposeSecret;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use tracing::{error, info};

const INVALID_CREDENTIALS: &str = "Invalid credentials. Try again.";
const LOGIN_OFFLINE: &str = "Network error: backend might be offline.";
const PASSWORD_MISMATCH: &str = "Passwords do not match!";
const REGISTER_RETRY: &str = "Registration failed. Please try again.";
const REGISTER_OFFLINE: &str = "Network or server error. Check backend.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    /// A submission was already in flight; nothing was sent.
    Busy,
    Failed { class: FailureClass, message: String },
}

impl FlowOutcome {
    fn failed(class: FailureClass, message: impl Into<String>) -> Self {
        FlowOutcome::Failed {
            class,
            message: message.into(),
        }
    }
}

/// Clears the busy flag when a submission ends, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct LoginFlow {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    busy: AtomicBool,
}

impl LoginFlow {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            notifier,
            navigator,
            busy: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Signs in and stores the session. On success the dashboard route is
    /// entered.
    pub async fn submit(&self, request: &LoginRequest) -> FlowOutcome {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return FlowOutcome::Busy;
        };

        if request.username_or_email.trim().is_empty()
            || request.password.expose_secret().is_empty()
        {
            return self.fail(
                FailureClass::Validation,
                "Username or email and password are required.",
            );
        }

        match client::login(&self.api, request).await {
            Ok(LoginResult::Authenticated(success)) => match success.into_session() {
                Some(session) => {
                    self.api.session().save(&session);
                    info!("signed in as {}", session.user.username);
                    self.notifier
                        .success(&format!("Welcome back, {}!", session.user.username));
                    self.navigator.navigate(Route::Dashboard);
                    FlowOutcome::Completed
                }
                None => self.fail(FailureClass::AuthRejected, INVALID_CREDENTIALS),
            },
            Ok(LoginResult::Rejected(reason)) => {
                self.fail(FailureClass::AuthRejected, format!("Login failed: {reason}"))
            }
            Ok(LoginResult::Incomplete) => self.fail(FailureClass::AuthRejected, INVALID_CREDENTIALS),
            Err(err) => {
                error!("login failed: {err}");
                let message = match &err {
                    AppError::Http { message, .. } => format!("Login failed: {message}"),
                    AppError::Network(_) | AppError::Timeout(_) => LOGIN_OFFLINE.to_string(),
                    other => format!("Login failed: {other}"),
                };
                self.fail(err.class(), message)
            }
        }
    }

    fn fail(&self, class: FailureClass, message: impl Into<String>) -> FlowOutcome {
        let message = message.into();
        self.notifier.error(&message);
        FlowOutcome::failed(class, message)
    }
}

pub struct RegisterFlow {
    api: ApiClient,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    busy: AtomicBool,
}

impl RegisterFlow {
    #[must_use]
    pub fn new(api: ApiClient, notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            notifier,
            navigator,
            busy: AtomicBool::new(false),
        }
    }

    /// Creates an account. Mismatched passwords are refused before any request
    /// is made; a created account leads to the login route.
    pub async fn submit(&self, request: &RegisterRequest) -> FlowOutcome {
        if request.password.expose_secret() != request.confirm_password.expose_secret() {
            return self.fail(FailureClass::Validation, PASSWORD_MISMATCH);
        }

        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            return FlowOutcome::Busy;
        };

        match client::register(&self.api, request).await {
            Ok(RegisterResult::Created(_)) => {
                info!("account created for {}", request.username);
                self.notifier.success("Account created successfully!");
                self.navigator.navigate(Route::Login);
                FlowOutcome::Completed
            }
            Ok(RegisterResult::Rejected(reason)) => self.fail(
                FailureClass::Server,
                format!("Registration failed: {reason}"),
            ),
            Ok(RegisterResult::Incomplete) => self.fail(FailureClass::Server, REGISTER_RETRY),
            Err(err) => {
                error!("registration failed: {err}");
                let message = match &err {
                    AppError::Http { message, .. } => format!("Registration error: {message}"),
                    _ => REGISTER_OFFLINE.to_string(),
                };
                self.fail(err.class(), message)
            }
        }
    }

    fn fail(&self, class: FailureClass, message: impl Into<String>) -> FlowOutcome {
        let message = message.into();
        self.notifier.error(&message);
        FlowOutcome::failed(class, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_lib::{AppConfig, ConfigOverrides};
    use crate::storage::{
        session::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY},
        KeyValueStore, MemoryStore, SessionStore,
    };
    use crate::ui::{notify::ToastLog, routes::RouteHistory};
    use anyhow::{Context, Result};
    use secrecy::SecretString;
    use serde_json::{json, Value};
    use std::{net::TcpListener, time::Duration};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    struct Harness {
        backing: Arc<MemoryStore>,
        toasts: Arc<ToastLog>,
        history: Arc<RouteHistory>,
        api: ApiClient,
    }

    fn harness(base_url: &str) -> Result<Harness> {
        let backing = Arc::new(MemoryStore::new());
        let config = AppConfig::from_overrides(ConfigOverrides {
            api_base_url: Some(base_url.to_string()),
            ..ConfigOverrides::default()
        })?;
        let api = ApiClient::new(&config, SessionStore::new(backing.clone()))?;
        Ok(Harness {
            backing,
            toasts: Arc::new(ToastLog::new()),
            history: Arc::new(RouteHistory::new()),
            api,
        })
    }

    impl Harness {
        fn login_flow(&self) -> LoginFlow {
            LoginFlow::new(self.api.clone(), self.toasts.clone(), self.history.clone())
        }

        fn register_flow(&self) -> RegisterFlow {
            RegisterFlow::new(self.api.clone(), self.toasts.clone(), self.history.clone())
        }
    }

    fn login_request(identifier: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username_or_email: identifier.to_string(),
            password: SecretString::from(password),
        }
    }

    fn register_request(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm),
        }
    }

    #[tokio::test]
    async fn login_stores_session_and_enters_dashboard() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let user = json!({"username": "alice", "email": "a@x.com", "id": 1});
        Mock::given(method("POST"))
            .and(path(client::LOGIN_PATH))
            .and(body_json(json!({"usernameOrEmail": "alice", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "t1",
                "refreshToken": "r1",
                "expiresIn": 900,
                "user": user
            })))
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        let outcome = h.login_flow().submit(&login_request("alice", "pw")).await;

        assert_eq!(outcome, FlowOutcome::Completed);
        assert_eq!(h.backing.get(ACCESS_TOKEN_KEY).as_deref(), Some("t1"));
        assert_eq!(h.backing.get(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));
        let stored: Value =
            serde_json::from_str(&h.backing.get(USER_KEY).context("user not stored")?)?;
        assert_eq!(stored, user);
        assert_eq!(h.history.current(), Some(Route::Dashboard));
        assert_eq!(h.toasts.toasts()[0].message, "Welcome back, alice!");
        Ok(())
    }

    #[tokio::test]
    async fn login_error_body_is_reported() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "locked"})))
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        let outcome = h.login_flow().submit(&login_request("alice", "pw")).await;

        assert_eq!(
            outcome,
            FlowOutcome::failed(FailureClass::AuthRejected, "Login failed: locked")
        );
        assert_eq!(h.backing.get(ACCESS_TOKEN_KEY), None);
        assert!(h.history.visited().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn login_without_user_is_invalid() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::LOGIN_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": "t1"})))
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        h.login_flow().submit(&login_request("alice", "pw")).await;

        assert_eq!(h.toasts.errors(), vec![INVALID_CREDENTIALS.to_string()]);
        assert_eq!(h.backing.get(ACCESS_TOKEN_KEY), None);
        Ok(())
    }

    #[tokio::test]
    async fn login_http_error_uses_server_message() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_credentials"})),
            )
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        let outcome = h.login_flow().submit(&login_request("alice", "bad")).await;

        assert_eq!(
            outcome,
            FlowOutcome::failed(FailureClass::AuthRejected, "Login failed: invalid_credentials")
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_offline_backend() -> Result<()> {
        let port = match TcpListener::bind("127.0.0.1:0") {
            Ok(listener) => listener.local_addr()?.port(),
            Err(_) => {
                eprintln!("Skipping test: cannot bind localhost");
                return Ok(());
            }
        };

        let h = harness(&format!("http://127.0.0.1:{port}"))?;
        let outcome = h.login_flow().submit(&login_request("alice", "pw")).await;

        assert_eq!(outcome, FlowOutcome::failed(FailureClass::Network, LOGIN_OFFLINE));
        Ok(())
    }

    #[tokio::test]
    async fn login_blank_identifier_sends_nothing() -> Result<()> {
        // No server: a request would fail with a network error instead.
        let h = harness("http://127.0.0.1:9")?;
        let outcome = h.login_flow().submit(&login_request("  ", "pw")).await;
        assert!(matches!(
            outcome,
            FlowOutcome::Failed {
                class: FailureClass::Validation,
                ..
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_login_is_refused() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::LOGIN_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"error": "slow"}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        let flow = h.login_flow();
        let request = login_request("alice", "pw");
        let (first, second) = tokio::join!(flow.submit(&request), async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            flow.submit(&request).await
        });

        assert!(matches!(first, FlowOutcome::Failed { .. }));
        assert_eq!(second, FlowOutcome::Busy);
        assert!(!flow.is_busy());
        Ok(())
    }

    #[tokio::test]
    async fn register_mismatch_makes_no_request() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::REGISTER_PATH))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        let outcome = h.register_flow().submit(&register_request("pw1", "pw2")).await;

        assert_eq!(
            outcome,
            FlowOutcome::failed(FailureClass::Validation, PASSWORD_MISMATCH)
        );
        assert_eq!(h.toasts.errors(), vec![PASSWORD_MISMATCH.to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn register_created_routes_to_login() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::REGISTER_PATH))
            .and(body_json(json!({
                "username": "alice",
                "email": "a@x.com",
                "password": "pw",
                "confirmPassword": "pw"
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 1, "username": "alice"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        let outcome = h.register_flow().submit(&register_request("pw", "pw")).await;

        assert_eq!(outcome, FlowOutcome::Completed);
        assert_eq!(h.history.current(), Some(Route::Login));
        // Registration does not sign in.
        assert_eq!(h.backing.get(ACCESS_TOKEN_KEY), None);
        Ok(())
    }

    #[tokio::test]
    async fn register_conflict_shows_server_error() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::REGISTER_PATH))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"error": "username_taken"})),
            )
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        let outcome = h.register_flow().submit(&register_request("pw", "pw")).await;

        assert_eq!(
            outcome,
            FlowOutcome::failed(FailureClass::Server, "Registration error: username_taken")
        );
        Ok(())
    }

    #[tokio::test]
    async fn register_rejection_in_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(client::REGISTER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "weak password"})))
            .mount(&server)
            .await;

        let h = harness(&server.uri())?;
        h.register_flow().submit(&register_request("pw", "pw")).await;

        assert_eq!(
            h.toasts.errors(),
            vec!["Registration failed: weak password".to_string()]
        );
        assert!(h.history.visited().is_empty());
        Ok(())
    }
}
