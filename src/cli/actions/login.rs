use crate::cli::{actions::dashboard, globals::GlobalArgs};
use crate::features::auth::{types::LoginRequest, FlowOutcome, LoginFlow};
use crate::ui::{Route, RouteHistory, TerminalNotifier};
use anyhow::{bail, Result};
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub identifier: String,
    pub password: SecretString,
}

/// Signs in, then opens the dashboard the flow routed to.
///
/// # Errors
/// Returns an error if the API client cannot be built or the login is refused.
pub async fn execute(args: Args) -> Result<()> {
    let api = args.globals.api_client()?;
    let history = Arc::new(RouteHistory::new());
    let flow = LoginFlow::new(api.clone(), Arc::new(TerminalNotifier), history.clone());

    let request = LoginRequest {
        username_or_email: args.identifier.trim().to_string(),
        password: args.password,
    };

    match flow.submit(&request).await {
        FlowOutcome::Completed => {
            if history.current() == Some(Route::Dashboard) {
                dashboard::show(api, false).await?;
            }
            Ok(())
        }
        FlowOutcome::Failed { class, .. } => bail!("login failed ({class:?})"),
        FlowOutcome::Busy => bail!("a login is already in progress"),
    }
}
