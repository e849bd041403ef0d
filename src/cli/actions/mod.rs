pub mod dashboard;
pub mod login;
pub mod logout;
pub mod register;
pub mod unlock;
pub mod whoami;

// Internal "interpreter" for `Action`.
mod run;

use crate::cli::globals::GlobalArgs;

#[derive(Debug)]
pub enum Action {
    Unlock(GlobalArgs),
    Login(login::Args),
    Register(register::Args),
    Dashboard(dashboard::Args),
    Whoami(GlobalArgs),
    Logout(GlobalArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
