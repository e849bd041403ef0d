use crate::cli::globals::GlobalArgs;
use crate::ui::{Navigator, Route, RouteHistory};
use anyhow::Result;
use tracing::debug;

const BANNER: &str = r"
   _____ __              __               _____            __
  / ___// /_  ____ _____/ /___ _      __ / ___/___  ____  / /________  __
  \__ \/ __ \/ __ `/ __  / __ \ | /| / / \__ \/ _ \/ __ \/ __/ ___/ / / /
 ___/ / / / / /_/ / /_/ / /_/ / |/ |/ / ___/ /  __/ / / / /_/ /  / /_/ /
/____/_/ /_/\__,_/\__,_/\____/|__/|__/ /____/\___/_/ /_/\__/_/   \__, /
                                                                /____/
";

/// The lock screen: shows the banner and moves on to login.
///
/// # Errors
/// Never fails; the signature matches the other actions.
pub fn execute(globals: &GlobalArgs) -> Result<()> {
    debug!("api: {}", globals.config.api_base_url);
    println!("{BANNER}");
    println!("Dark Web Threat Intelligence System");

    let history = RouteHistory::new();
    history.navigate(Route::Login);
    println!("Run `shadowsentry {}` to continue.", route_command(history.current()));

    Ok(())
}

fn route_command(route: Option<Route>) -> &'static str {
    match route {
        Some(Route::Register) => "register",
        Some(Route::Dashboard) => "dashboard",
        Some(Route::Login | Route::Lock) | None => "login",
    }
}
