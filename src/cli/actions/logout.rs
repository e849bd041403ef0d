use crate::cli::globals::GlobalArgs;
use crate::features::risk::DashboardController;
use crate::ui::{RouteHistory, TerminalNotifier};
use anyhow::Result;
use std::sync::Arc;

/// Signs out from the dashboard, clearing the stored session.
///
/// # Errors
/// Returns an error if the API client cannot be built.
pub async fn execute(globals: &GlobalArgs) -> Result<()> {
    let controller = DashboardController::new(
        globals.api_client()?,
        Arc::new(TerminalNotifier),
        Arc::new(RouteHistory::new()),
    );
    controller.logout().await;
    Ok(())
}
