//! Client wrappers for the auth endpoints. These helpers centralize paths and
//! payload interpretation so flows never build requests by hand. Passwords and
//! tokens pass through here and must never be logged.

use super::types::{
    LoginRequest, LoginResponse, LoginResult, RefreshRequest, RegisterRequest, RegisterResult,
    UserProfile,
};
use crate::app_lib::{ApiClient, AppError};
use secrecy::SecretString;
use serde_json::{json, Value};
use tracing::instrument;

pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";
pub const LOGOUT_PATH: &str = "/api/v1/auth/logout";
pub const ME_PATH: &str = "/api/v1/auth/me";

/// Creates an account. Password confirmation is checked by the caller.
///
/// # Errors
/// Returns `AppError` on transport failures or error statuses.
#[instrument(skip_all, fields(username = %request.username))]
pub async fn register(api: &ApiClient, request: &RegisterRequest) -> Result<RegisterResult, AppError> {
    let body: Value = api.post_json(REGISTER_PATH, request, None).await?;
    Ok(RegisterResult::from_body(body))
}

/// Exchanges credentials for a token pair and profile.
///
/// # Errors
/// Returns `AppError` on transport failures or error statuses.
#[instrument(skip_all)]
pub async fn login(api: &ApiClient, request: &LoginRequest) -> Result<LoginResult, AppError> {
    let response: Option<LoginResponse> = api.post_json(LOGIN_PATH, request, None).await?;
    Ok(response.unwrap_or_default().into_result())
}

/// Rotates a refresh token. Not used by the dashboard flow; token renewal is
/// left to the caller.
///
/// # Errors
/// Returns `AppError` on transport failures or error statuses.
#[instrument(skip_all)]
pub async fn refresh(api: &ApiClient, refresh_token: &SecretString) -> Result<LoginResult, AppError> {
    let request = RefreshRequest {
        refresh_token: refresh_token.clone(),
    };
    let response: Option<LoginResponse> = api.post_json(REFRESH_PATH, &request, None).await?;
    Ok(response.unwrap_or_default().into_result())
}

/// Fetches the profile behind the (explicit or stored) access token.
///
/// # Errors
/// Returns `AppError::Http` with status 401 when the token is missing or invalid.
#[instrument(skip_all)]
pub async fn me(api: &ApiClient, access_token: Option<&SecretString>) -> Result<UserProfile, AppError> {
    api.get_json(ME_PATH, &[], access_token).await
}

/// Revokes the refresh token server-side.
///
/// # Errors
/// Returns `AppError` on transport failures or error statuses.
#[instrument(skip_all)]
pub async fn logout(api: &ApiClient, refresh_token: Option<&SecretString>) -> Result<(), AppError> {
    let _: Value = match refresh_token {
        Some(token) => {
            let request = RefreshRequest {
                refresh_token: token.clone(),
            };
            api.post_json(LOGOUT_PATH, &request, None).await?
        }
        None => api.post_json(LOGOUT_PATH, &json!({}), None).await?,
    };
    Ok(())
}
