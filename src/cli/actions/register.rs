use crate::cli::globals::GlobalArgs;
use crate::features::auth::{types::RegisterRequest, FlowOutcome, RegisterFlow};
use crate::ui::{RouteHistory, TerminalNotifier};
use anyhow::{bail, Result};
use secrecy::SecretString;
use std::sync::Arc;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub username: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
}

/// Creates an account; signing in stays a separate step.
///
/// # Errors
/// Returns an error if the API client cannot be built or the account is not created.
pub async fn execute(args: Args) -> Result<()> {
    let api = args.globals.api_client()?;
    let flow = RegisterFlow::new(api, Arc::new(TerminalNotifier), Arc::new(RouteHistory::new()));

    let request = RegisterRequest {
        username: args.username.trim().to_string(),
        email: args.email.trim().to_string(),
        password: args.password,
        confirm_password: args.confirm_password,
    };

    match flow.submit(&request).await {
        FlowOutcome::Completed => {
            println!("Run `shadowsentry login -u {}` to sign in.", request.username);
            Ok(())
        }
        FlowOutcome::Failed { class, .. } => bail!("registration failed ({class:?})"),
        FlowOutcome::Busy => bail!("a registration is already in progress"),
    }
}
