//! Client wrapper for the risk endpoint.

use super::types::RawRiskPayload;
use crate::app_lib::{ApiClient, AppError, CancellationToken};
use secrecy::SecretString;
use tracing::instrument;

pub const RISK_PATH: &str = "/api/v1/incidents/risk";

/// Fetches the raw risk payload for `email`.
/// An explicit `access_token` overrides the stored one.
///
/// # Errors
/// Returns `AppError::Http` with status 401/404 for rejected or unknown
/// accounts, `AppError::Network`/`Timeout` when the server is unreachable, and
/// `AppError::Cancelled` once `cancel` fires.
#[instrument(skip(api, access_token, cancel))]
pub async fn get_risk_data(
    api: &ApiClient,
    email: &str,
    access_token: Option<&SecretString>,
    cancel: &CancellationToken,
) -> Result<RawRiskPayload, AppError> {
    api.get_json_cancellable(RISK_PATH, &[("email", email)], access_token, cancel)
        .await
}
