//! Maps validated CLI arguments to an [`Action`].

use crate::{
    cli::{
        actions::{render, request, session, Action},
        commands::{
            client::{ARG_BASE_URL, ARG_STORAGE, ARG_TIMEOUT},
            session::{
                ARG_EMAIL, ARG_NICKNAME, ARG_PASSWORD, ARG_USERNAME, CMD_LOGIN, CMD_LOGOUT,
                CMD_REGISTER, CMD_WHOAMI,
            },
            tools::{
                ARG_DEADLINE, ARG_FILE, ARG_PATH, CMD_CHECK_IMAGE, CMD_GET, CMD_NAVIGATE,
                CMD_SANITIZE,
            },
        },
        globals::{default_storage_path, GlobalArgs},
    },
    session::Registration,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = global_args(matches)?;

    let Some((name, sub)) = matches.subcommand() else {
        return Err(anyhow!("missing subcommand"));
    };

    let action = match name {
        CMD_LOGIN => Action::Login(session::LoginArgs {
            globals,
            username: required(sub, ARG_USERNAME)?,
            password: SecretString::from(required(sub, ARG_PASSWORD)?),
        }),
        CMD_REGISTER => {
            let username = required(sub, ARG_USERNAME)?;
            let nickname = sub
                .get_one::<String>(ARG_NICKNAME)
                .cloned()
                .unwrap_or_else(|| username.clone());
            Action::Register(session::RegisterArgs {
                globals,
                registration: Registration {
                    nickname,
                    username,
                    email: required(sub, ARG_EMAIL)?,
                    password: SecretString::from(required(sub, ARG_PASSWORD)?),
                },
            })
        }
        CMD_LOGOUT => Action::Logout(session::Args { globals }),
        CMD_WHOAMI => Action::Whoami(session::Args { globals }),
        CMD_GET => Action::Get(request::GetArgs {
            globals,
            path: required(sub, ARG_PATH)?,
            deadline: sub
                .get_one::<u64>(ARG_DEADLINE)
                .copied()
                .map(Duration::from_millis),
        }),
        CMD_NAVIGATE => Action::Navigate(request::NavigateArgs {
            globals,
            path: required(sub, ARG_PATH)?,
        }),
        CMD_SANITIZE => Action::Sanitize,
        CMD_CHECK_IMAGE => Action::CheckImage(render::CheckImageArgs {
            path: sub
                .get_one::<PathBuf>(ARG_FILE)
                .cloned()
                .context("missing required argument: <file>")?,
        }),
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(action)
}

fn global_args(matches: &ArgMatches) -> Result<GlobalArgs> {
    let base_url = required(matches, ARG_BASE_URL)?;
    let storage_path = match matches.get_one::<PathBuf>(ARG_STORAGE) {
        Some(path) => path.clone(),
        None => default_storage_path()?,
    };
    let timeout = matches
        .get_one::<u64>(ARG_TIMEOUT)
        .copied()
        .map(Duration::from_millis);

    Ok(GlobalArgs::new(base_url, storage_path).with_request_timeout(timeout))
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}
