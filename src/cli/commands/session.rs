use crate::cli::commands::client::validator_non_empty;
use clap::{Arg, Command};

pub const CMD_LOGIN: &str = "login";
pub const CMD_REGISTER: &str = "register";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_WHOAMI: &str = "whoami";

pub const ARG_USERNAME: &str = "username";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_NICKNAME: &str = "nickname";
pub const ARG_EMAIL: &str = "email";

fn password_arg() -> Arg {
    Arg::new(ARG_PASSWORD)
        .short('p')
        .long(ARG_PASSWORD)
        .help("Account password")
        .env("PLC_PASSWORD")
        .hide_env_values(true)
        .required(true)
        .value_parser(validator_non_empty())
}

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log in and store the token pair")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .help("Account username")
                        .required(true)
                        .value_parser(validator_non_empty()),
                )
                .arg(password_arg()),
        )
        .subcommand(
            Command::new(CMD_REGISTER)
                .about("Create an account, then log in")
                .arg(
                    Arg::new(ARG_USERNAME)
                        .long(ARG_USERNAME)
                        .help("Account username")
                        .required(true)
                        .value_parser(validator_non_empty()),
                )
                .arg(
                    Arg::new(ARG_NICKNAME)
                        .long(ARG_NICKNAME)
                        .help("Display name (default: username)")
                        .value_parser(validator_non_empty()),
                )
                .arg(
                    Arg::new(ARG_EMAIL)
                        .long(ARG_EMAIL)
                        .help("Contact email")
                        .required(true)
                        .value_parser(validator_non_empty()),
                )
                .arg(password_arg()),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Forget the stored tokens"))
        .subcommand(Command::new(CMD_WHOAMI).about("Show the logged-in profile"))
}
