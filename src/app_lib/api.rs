//! HTTP helpers for the ShadowSentry JSON API with a consistent timeout policy
//! and error mapping. The client attaches `Authorization: Bearer <token>` from
//! the session store on every call unless the caller passes an explicit token.
//! Tokens are only ever exposed to the request builder, never to logs.

use super::{cancel::CancellationToken, config::AppConfig, errors::AppError};
use crate::storage::SessionStore;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Maximum number of error body characters surfaced to the user.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    /// Builds a client for the configured base URL.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: &AppConfig, session: SessionStore) -> Result<Self, AppError> {
        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        build_url_with_base(self.base_url.as_str(), path)
    }

    /// GET a JSON document.
    ///
    /// # Errors
    /// Returns `AppError::Network`/`Timeout` when no response arrives and
    /// `AppError::Http` for error statuses.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&SecretString>,
    ) -> Result<T, AppError> {
        self.request_json(Method::GET, path, query, None::<&()>, token, None)
            .await
    }

    /// GET a JSON document, giving up as soon as `cancel` fires.
    ///
    /// # Errors
    /// Same as [`ApiClient::get_json`], plus `AppError::Cancelled`.
    pub async fn get_json_cancellable<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&SecretString>,
        cancel: &CancellationToken,
    ) -> Result<T, AppError> {
        self.request_json(Method::GET, path, query, None::<&()>, token, Some(cancel))
            .await
    }

    /// POST a JSON body and decode the JSON response.
    ///
    /// # Errors
    /// Same as [`ApiClient::get_json`], plus `AppError::Serialization`.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        token: Option<&SecretString>,
    ) -> Result<T, AppError> {
        self.request_json(Method::POST, path, &[], Some(body), token, None)
            .await
    }

    async fn request_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        token: Option<&SecretString>,
        cancel: Option<&CancellationToken>,
    ) -> Result<T, AppError> {
        let url = self.endpoint(path);
        let mut builder = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            let payload = serde_json::to_vec(body).map_err(|err| {
                AppError::Serialization(format!("Failed to encode request: {err}"))
            })?;
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload);
        }
        builder = self.authorize(builder, token);

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(AppError::Cancelled);
        }

        debug!("{} {}", method, url);
        let span = info_span!("api.request", http.method = %method, url = %url);
        let response = send(builder).instrument(span).await?;

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(AppError::Cancelled);
        }

        handle_json_response(response).await
    }

    /// An explicit token wins over the stored one.
    fn authorize(&self, builder: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
        match token.cloned().or_else(|| self.session.access_token()) {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, AppError> {
    builder.send().await.map_err(map_request_error)
}

/// Maps transport errors, where no HTTP response was received.
fn map_request_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        AppError::Network(format!("Unable to reach the server: {err}"))
    }
}

/// Parses JSON responses and surfaces HTTP errors with the server's message.
async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|err| AppError::Parse(format!("Failed to read response: {err}")))?;

    if !status.is_success() {
        return Err(AppError::Http {
            status: status.as_u16(),
            message: error_message(status, &body),
        });
    }

    let body = if body.trim().is_empty() { "null" } else { body.as_str() };
    serde_json::from_str(body)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

/// Prefers the `error`/`message` field of a JSON error body, then the raw body,
/// then the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["error", "message"].iter().find_map(|key| {
            json.get(key)
                .and_then(Value::as_str)
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string)
        })
    });

    match from_json {
        Some(message) => sanitize_body(&message),
        None if !body.trim().is_empty() => sanitize_body(body),
        None => status
            .canonical_reason()
            .unwrap_or("Request failed.")
            .to_string(),
    }
}

/// Trims and truncates error text for user-facing messages.
fn sanitize_body(body: &str) -> String {
    body.trim().chars().take(MAX_ERROR_CHARS).collect()
}
