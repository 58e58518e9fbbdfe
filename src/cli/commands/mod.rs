pub mod client;
pub mod logging;
pub mod session;
pub mod tools;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    ColorChoice, Command,
};

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

    let command = Command::new("plc")
        .about("PLC forum API client")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true);

    let command = client::with_args(command);
    let command = session::with_subcommands(command);
    let command = tools::with_subcommands(command);
    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "plc");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("PLC forum API client".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_defaults() {
        temp_env::with_vars(
            [
                ("PLC_BASE_URL", None::<&str>),
                ("PLC_STORAGE", None),
                ("PLC_TIMEOUT_MS", None),
                ("PLC_LOG_LEVEL", None),
            ],
            || {
                let matches = new().get_matches_from(vec!["plc", "whoami"]);
                assert_eq!(
                    matches.get_one::<String>(client::ARG_BASE_URL).cloned(),
                    Some(crate::api::DEFAULT_BASE_URL.to_string())
                );
                assert!(matches.get_one::<PathBuf>(client::ARG_STORAGE).is_none());
                assert!(matches.get_one::<u64>(client::ARG_TIMEOUT).is_none());
                assert_eq!(matches.subcommand_name(), Some(session::CMD_WHOAMI));
            },
        );
    }

    #[test]
    fn test_check_env() {
        temp_env::with_vars(
            [
                ("PLC_BASE_URL", Some("  https://forum.example.test  ")),
                ("PLC_STORAGE", Some("/tmp/plc-storage.json")),
                ("PLC_TIMEOUT_MS", Some("2500")),
                ("PLC_PASSWORD", Some("hunter2-hunter2")),
                ("PLC_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec!["plc", "login", "alice"]);
                assert_eq!(
                    matches.get_one::<String>(client::ARG_BASE_URL).cloned(),
                    Some("https://forum.example.test".to_string())
                );
                assert_eq!(
                    matches.get_one::<PathBuf>(client::ARG_STORAGE).cloned(),
                    Some(PathBuf::from("/tmp/plc-storage.json"))
                );
                assert_eq!(matches.get_one::<u64>(client::ARG_TIMEOUT).copied(), Some(2500));
                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(2)
                );

                let (name, login) = matches.subcommand().unwrap_or_else(|| panic!("no subcommand"));
                assert_eq!(name, session::CMD_LOGIN);
                assert_eq!(
                    login.get_one::<String>(session::ARG_PASSWORD).cloned(),
                    Some("hunter2-hunter2".to_string())
                );
            },
        );
    }

    #[test]
    fn test_rejects_empty_and_zero_values() {
        temp_env::with_vars([("PLC_BASE_URL", None::<&str>)], || {
            assert!(new()
                .try_get_matches_from(vec!["plc", "--base-url", "   ", "whoami"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["plc", "--timeout", "0", "whoami"])
                .is_err());
            assert!(new()
                .try_get_matches_from(vec!["plc", "get", "/api/x", "--deadline-ms", "abc"])
                .is_err());
        });
    }

    #[test]
    fn test_global_args_after_subcommand() {
        let matches = new().get_matches_from(vec![
            "plc",
            "get",
            "/api/boards/",
            "--deadline-ms",
            "1",
            "--base-url",
            "http://localhost:9000",
        ]);
        assert_eq!(
            matches.get_one::<String>(client::ARG_BASE_URL).cloned(),
            Some("http://localhost:9000".to_string())
        );
        let Some((tools::CMD_GET, get)) = matches.subcommand() else {
            panic!("expected get subcommand");
        };
        assert_eq!(get.get_one::<u64>(tools::ARG_DEADLINE).copied(), Some(1));
    }
}
