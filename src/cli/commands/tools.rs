use crate::cli::commands::client::{validator_millis, validator_non_empty};
use clap::{Arg, Command};
use std::path::PathBuf;

pub const CMD_GET: &str = "get";
pub const CMD_NAVIGATE: &str = "navigate";
pub const CMD_SANITIZE: &str = "sanitize";
pub const CMD_CHECK_IMAGE: &str = "check-image";

pub const ARG_PATH: &str = "path";
pub const ARG_DEADLINE: &str = "deadline-ms";
pub const ARG_FILE: &str = "file";

#[must_use]
pub fn with_subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_GET)
                .about("GET an API path with a hard deadline and print the body")
                .arg(
                    Arg::new(ARG_PATH)
                        .help("API path, example: /api/boards/")
                        .required(true)
                        .value_parser(validator_non_empty()),
                )
                .arg(
                    Arg::new(ARG_DEADLINE)
                        .long(ARG_DEADLINE)
                        .help("Deadline in milliseconds (default: 8000, minimum: 1000)")
                        .value_parser(validator_millis()),
                ),
        )
        .subcommand(
            Command::new(CMD_NAVIGATE)
                .about("Run the navigation guard for a front-end path")
                .arg(
                    Arg::new(ARG_PATH)
                        .help("Front-end path, example: /posts/new")
                        .required(true)
                        .value_parser(validator_non_empty()),
                ),
        )
        .subcommand(
            Command::new(CMD_SANITIZE).about("Sanitize HTML read from stdin and print it"),
        )
        .subcommand(
            Command::new(CMD_CHECK_IMAGE)
                .about("Check an image against the upload limits")
                .arg(
                    Arg::new(ARG_FILE)
                        .help("Image file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}
