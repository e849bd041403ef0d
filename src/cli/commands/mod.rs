pub mod backend;
pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

pub const CMD_UNLOCK: &str = "unlock";
pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_DASHBOARD: &str = "dashboard";
pub const CMD_WHOAMI: &str = "whoami";
pub const CMD_LOGOUT: &str = "logout";

pub const ARG_IDENTIFIER: &str = "identifier";
pub const ARG_USERNAME: &str = "username";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_CONFIRM_PASSWORD: &str = "confirm-password";
pub const ARG_REFRESH: &str = "refresh";

const ENV_PASSWORD: &str = "SHADOWSENTRY_PASSWORD";

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long("password")
        .help("Account password")
        .env(ENV_PASSWORD)
        .hide_env_values(true)
        .required(true)
}

fn login_command() -> Command {
    Command::new(CMD_LOGIN)
        .about("Sign in and open the dashboard")
        .arg(
            Arg::new(ARG_IDENTIFIER)
                .short('u')
                .long("identifier")
                .visible_alias("user")
                .help("Username or email")
                .required(true),
        )
        .arg(password_arg())
}

fn register_command() -> Command {
    Command::new(CMD_REGISTER)
        .about("Create an account")
        .arg(
            Arg::new(ARG_USERNAME)
                .long("username")
                .help("Username")
                .required(true),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .long("email")
                .help("Email address monitored for breaches")
                .required(true),
        )
        .arg(password_arg())
        .arg(
            Arg::new(ARG_CONFIRM_PASSWORD)
                .long("confirm-password")
                .help("Password confirmation, must match --password")
                .required(true),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("shadowsentry")
        .about("Dark Web Threat Intelligence System")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new(CMD_UNLOCK).about("Show the lock screen"))
        .subcommand(login_command())
        .subcommand(register_command())
        .subcommand(
            Command::new(CMD_DASHBOARD)
                .about("Show the risk score and incidents of the signed-in account")
                .arg(
                    Arg::new(ARG_REFRESH)
                        .long("refresh")
                        .help("Fetch again after loading")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new(CMD_WHOAMI).about("Show the signed-in account"))
        .subcommand(Command::new(CMD_LOGOUT).about("Sign out and clear the stored session"));

    let command = backend::with_args(command);
    logging::with_args(command)
}
