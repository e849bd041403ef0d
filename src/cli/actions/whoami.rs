use crate::app_lib::ApiClient;
use crate::cli::globals::GlobalArgs;
use crate::features::auth::{client, UserProfile};
use anyhow::{bail, Result};
use std::fmt::Write;
use tracing::warn;

fn describe(user: &UserProfile) -> String {
    let mut out = format!("{} <{}>", user.username, user.email);
    for (key, value) in &user.extra {
        let _ = write!(out, "\n  {key}: {value}");
    }
    out
}

/// Shows the account behind the stored token, as the server sees it.
///
/// # Errors
/// Returns an error if no token is stored or the server rejects it.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let api = globals.api_client()?;
    println!("{}", profile_text(&api).await?);
    Ok(())
}

async fn profile_text(api: &ApiClient) -> Result<String> {
    if api.session().access_token().is_none() {
        bail!("not signed in: run `shadowsentry login`");
    }

    match client::me(api, None).await {
        Ok(user) => Ok(describe(&user)),
        Err(err) if err.is_auth_rejected() => {
            api.session().expire();
            bail!("Session expired. Please login again.")
        }
        Err(err) => {
            warn!("profile lookup failed: {err}");
            match api.session().user() {
                Some(user) => Ok(format!("{} (cached)", describe(&user))),
                None => Err(err.into()),
            }
        }
    }
}
