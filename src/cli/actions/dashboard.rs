use crate::app_lib::ApiClient;
use crate::cli::globals::GlobalArgs;
use crate::features::risk::{DashboardController, ViewOutcome};
use crate::ui::{render, RouteHistory, TerminalNotifier};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub refresh: bool,
}

/// Mounts the dashboard (optionally refreshing once) and prints it.
///
/// # Errors
/// Returns an error if there is no usable session or the risk data cannot be loaded.
pub async fn show(api: ApiClient, refresh: bool) -> Result<()> {
    let controller =
        DashboardController::new(api, Arc::new(TerminalNotifier), Arc::new(RouteHistory::new()));

    let mut outcome = controller.mount().await;
    if refresh && matches!(outcome, ViewOutcome::Loaded | ViewOutcome::Empty | ViewOutcome::Failed) {
        outcome = controller.refresh().await;
    }
    debug!("dashboard outcome: {outcome:?}");

    let state = controller.snapshot().await;
    controller.unmount();

    match outcome {
        ViewOutcome::Loaded | ViewOutcome::Empty => {
            print!("{}", render::dashboard(&state));
            Ok(())
        }
        ViewOutcome::Redirected => bail!("not signed in: run `shadowsentry login`"),
        ViewOutcome::Failed => bail!("risk data unavailable"),
        ViewOutcome::Stale | ViewOutcome::Cancelled => bail!("dashboard closed before data arrived"),
    }
}

/// # Errors
/// Same as [`show`].
pub async fn execute(args: Args) -> Result<()> {
    show(args.globals.api_client()?, args.refresh).await
}
