use clap::{builder::ValueParser, Arg, ArgAction, Command};

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ENV_LOG_LEVEL: &str = "PLC_LOG_LEVEL";

/// Highest verbosity `-v` repetitions or `PLC_LOG_LEVEL` may select.
const MAX_VERBOSITY: u8 = 4;

const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse `PLC_LOG_LEVEL` as either a level name or its index in
/// [`LEVEL_NAMES`].
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|raw: &str| -> Result<u8, String> {
        let raw = raw.trim();
        if let Ok(index) = raw.parse::<u8>() {
            return Ok(index.min(MAX_VERBOSITY));
        }
        LEVEL_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(raw))
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("unknown log level {raw:?}, expected one of {LEVEL_NAMES:?}"))
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Raise log verbosity; repeat for more (error, warn, info, debug, trace)")
            .env(ENV_LOG_LEVEL)
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn counts_repeated_flags() {
        let matches = with_args(Command::new("plc")).get_matches_from(["plc", "-vvv"]);
        assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(3));
    }

    #[test]
    fn accepts_level_names_from_env() {
        temp_env::with_var(ENV_LOG_LEVEL, Some("debug"), || {
            let matches = with_args(Command::new("plc")).get_matches_from(["plc"]);
            assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(3));
        });
    }

    #[test]
    fn level_parser_accepts_names_and_indexes() {
        let parse = |raw: &str| {
            Command::new("plc")
                .arg(Arg::new("level").value_parser(validator_log_level()))
                .try_get_matches_from(["plc", raw])
                .map(|matches| matches.get_one::<u8>("level").copied())
        };
        assert_eq!(parse("TRACE").unwrap(), Some(4));
        assert_eq!(parse(" warn ").unwrap(), Some(1));
        assert_eq!(parse("9").unwrap(), Some(4));
        assert!(parse("loud").is_err());
    }
}
