use crate::app_lib::{AppConfig, ConfigOverrides};
use crate::cli::{
    actions::{dashboard, login, register, Action},
    commands::{self, backend},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let overrides = ConfigOverrides {
        api_base_url: matches.get_one::<String>(backend::ARG_API_URL).cloned(),
        timeout_ms: matches.get_one::<u64>(backend::ARG_TIMEOUT_MS).copied(),
        store_path: matches
            .get_one::<String>(backend::ARG_STORE)
            .map(|path| path.trim())
            .filter(|path| !path.is_empty())
            .map(PathBuf::from),
    };
    let config = AppConfig::from_overrides(overrides).context("invalid configuration")?;

    Ok(GlobalArgs::new(config, matches.get_flag(backend::ARG_EPHEMERAL)))
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// # Errors
/// Returns an error if the configuration is invalid or required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some((commands::CMD_UNLOCK, _)) => Ok(Action::Unlock(globals)),
        Some((commands::CMD_LOGIN, sub_m)) => Ok(Action::Login(login::Args {
            globals,
            identifier: required(sub_m, commands::ARG_IDENTIFIER)?,
            password: SecretString::from(required(sub_m, commands::ARG_PASSWORD)?),
        })),
        Some((commands::CMD_REGISTER, sub_m)) => Ok(Action::Register(register::Args {
            globals,
            username: required(sub_m, commands::ARG_USERNAME)?,
            email: required(sub_m, commands::ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, commands::ARG_PASSWORD)?),
            confirm_password: SecretString::from(required(
                sub_m,
                commands::ARG_CONFIRM_PASSWORD,
            )?),
        })),
        Some((commands::CMD_DASHBOARD, sub_m)) => Ok(Action::Dashboard(dashboard::Args {
            globals,
            refresh: sub_m.get_flag(commands::ARG_REFRESH),
        })),
        Some((commands::CMD_WHOAMI, _)) => Ok(Action::Whoami(globals)),
        Some((commands::CMD_LOGOUT, _)) => Ok(Action::Logout(globals)),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("no subcommand given")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::app_lib::config::{ENV_API_URL, ENV_STORE, ENV_TIMEOUT_MS};
    use secrecy::ExposeSecret;
    use std::time::Duration;

    fn dispatch(args: &[&str]) -> Result<Action> {
        temp_env::with_vars(
            [
                (ENV_API_URL, None::<&str>),
                (ENV_TIMEOUT_MS, None),
                (ENV_STORE, None),
                ("SHADOWSENTRY_PASSWORD", None),
            ],
            || handler(&commands::new().get_matches_from(args.iter().copied())),
        )
    }

    #[test]
    fn test_login_action() {
        let action = dispatch(&[
            "shadowsentry",
            "--api-url",
            " https://api.tld ",
            "--store",
            "/tmp/s.json",
            "login",
            "-u",
            "alice",
            "-p",
            "pw",
        ])
        .unwrap();

        let Action::Login(args) = action else {
            panic!("expected login action");
        };
        assert_eq!(args.identifier, "alice");
        assert_eq!(args.password.expose_secret(), "pw");
        assert_eq!(args.globals.config.api_base_url.as_str(), "https://api.tld/");
        assert_eq!(args.globals.config.store_path, PathBuf::from("/tmp/s.json"));
        assert!(!args.globals.ephemeral);
    }

    #[test]
    fn test_register_action() {
        let action = dispatch(&[
            "shadowsentry",
            "register",
            "--username",
            "alice",
            "--email",
            "a@x.com",
            "--password",
            "pw",
            "--confirm-password",
            "pw2",
        ])
        .unwrap();

        let Action::Register(args) = action else {
            panic!("expected register action");
        };
        assert_eq!(args.email, "a@x.com");
        assert_eq!(args.confirm_password.expose_secret(), "pw2");
    }

    #[test]
    fn test_dashboard_action() {
        let action =
            dispatch(&["shadowsentry", "--timeout-ms", "750", "dashboard", "--refresh"]).unwrap();

        let Action::Dashboard(args) = action else {
            panic!("expected dashboard action");
        };
        assert!(args.refresh);
        assert_eq!(args.globals.config.timeout, Duration::from_millis(750));
    }

    #[test]
    fn test_simple_actions() {
        assert!(matches!(
            dispatch(&["shadowsentry", "unlock"]).unwrap(),
            Action::Unlock(_)
        ));
        assert!(matches!(
            dispatch(&["shadowsentry", "--ephemeral", "whoami"]).unwrap(),
            Action::Whoami(globals) if globals.ephemeral
        ));
        assert!(matches!(
            dispatch(&["shadowsentry", "logout"]).unwrap(),
            Action::Logout(_)
        ));
    }

    #[test]
    fn test_invalid_api_url() {
        let result = dispatch(&["shadowsentry", "--api-url", "ftp://api.tld", "whoami"]);
        assert!(result.is_err());
    }
}
