use crate::cli::actions::{dashboard, login, logout, register, unlock, whoami, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Unlock(globals) => unlock::execute(&globals),
        Action::Login(args) => login::execute(args).await,
        Action::Register(args) => register::execute(args).await,
        Action::Dashboard(args) => dashboard::execute(args).await,
        Action::Whoami(globals) => whoami::execute(&globals).await,
        Action::Logout(globals) => logout::execute(&globals).await,
    }
}
