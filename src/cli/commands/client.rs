//! Connection and storage arguments shared by every subcommand.

use crate::api::{normalize_value, DEFAULT_BASE_URL};
use clap::{builder::ValueParser, Arg, Command};
use std::path::PathBuf;

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_STORAGE: &str = "storage";
pub const ARG_TIMEOUT: &str = "timeout";

/// Trimmed, non-empty string.
#[must_use]
pub fn validator_non_empty() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<String, String> {
        normalize_value(value).ok_or_else(|| "value must not be empty".to_string())
    })
}

/// Positive millisecond count.
#[must_use]
pub fn validator_millis() -> ValueParser {
    ValueParser::from(move |value: &str| -> std::result::Result<u64, String> {
        match value.trim().parse::<u64>() {
            Ok(0) => Err("timeout must be greater than zero".to_string()),
            Ok(millis) => Ok(millis),
            Err(_) => Err(format!("invalid millisecond value: {value}")),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASE_URL)
                .short('u')
                .long(ARG_BASE_URL)
                .help("Forum backend origin, example: https://forum.example.com")
                .env("PLC_BASE_URL")
                .default_value(DEFAULT_BASE_URL)
                .global(true)
                .value_parser(validator_non_empty()),
        )
        .arg(
            Arg::new(ARG_STORAGE)
                .long(ARG_STORAGE)
                .help("Token storage file (default: <config dir>/plc/storage.json)")
                .env("PLC_STORAGE")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .long(ARG_TIMEOUT)
                .help("Per-request transport timeout in milliseconds")
                .env("PLC_TIMEOUT_MS")
                .global(true)
                .value_parser(validator_millis()),
        )
}
