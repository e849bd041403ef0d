use crate::app_lib::config::{ENV_API_URL, ENV_STORE, ENV_TIMEOUT_MS};
use clap::{Arg, ArgAction, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TIMEOUT_MS: &str = "timeout-ms";
pub const ARG_STORE: &str = "store";
pub const ARG_EPHEMERAL: &str = "ephemeral";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("ShadowSentry API base URL, example: https://api.shadowsentry.tld")
                .env(ENV_API_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_MS)
                .long("timeout-ms")
                .help("Request timeout in milliseconds (default: 20000)")
                .env(ENV_TIMEOUT_MS)
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_STORE)
                .long("store")
                .help("Session file (default: ~/.shadowsentry/session.json)")
                .env(ENV_STORE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_EPHEMERAL)
                .long("ephemeral")
                .help("Keep the session in memory only; ignores --store")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}
