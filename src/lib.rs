//! # ShadowSentry client
//!
//! Terminal client for the ShadowSentry breach exposure API. It keeps a local
//! session (access token, refresh token, user profile), fetches the risk data
//! of the signed-in user and normalizes the breach records the backend returns
//! into one incident shape.
//!
//! ## Flow
//!
//! 1. **Unlock:** the lock screen routes to login.
//! 2. **Login / Register:** credentials are exchanged for a bearer token pair,
//!    which is persisted through the [`storage::SessionStore`].
//! 3. **Dashboard:** the [`features::auth::gate::SessionGate`] checks the stored
//!    session, the [`features::risk::controller::DashboardController`] fetches
//!    `/api/v1/incidents/risk` and commits a [`features::risk::types::RiskSnapshot`].
//!
//! A `401` from the risk endpoint expires the stored tokens and routes back to
//! login. Tokens are held as `SecretString` and never logged.

pub mod app_lib;
pub mod cli;
pub mod features;
pub mod storage;
pub mod ui;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
