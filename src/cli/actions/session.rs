use crate::{
    cli::globals::GlobalArgs,
    format::format_api_error,
    session::{Registration, SessionManager},
};
use anyhow::{anyhow, Result};
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

pub struct LoginArgs {
    pub globals: GlobalArgs,
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginArgs")
            .field("globals", &self.globals)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug)]
pub struct RegisterArgs {
    pub globals: GlobalArgs,
    pub registration: Registration,
}

/// # Errors
/// Returns the localized backend message if login fails.
pub async fn login(args: LoginArgs) -> Result<()> {
    let session = args.globals.session()?;
    session
        .login(&args.username, &args.password)
        .await
        .map_err(|err| anyhow!(format_api_error(&err, Some("登录失败。"))))?;
    print_profile(&session);
    Ok(())
}

/// # Errors
/// Returns the localized backend message if registration or login fails.
pub async fn register(args: RegisterArgs) -> Result<()> {
    let session = args.globals.session()?;
    session
        .register(&args.registration)
        .await
        .map_err(|err| anyhow!(format_api_error(&err, Some("注册失败。"))))?;
    print_profile(&session);
    if session.take_avatar_prompt() {
        println!("Tip: set an avatar from your profile page.");
    }
    Ok(())
}

/// # Errors
/// Returns an error if the token store cannot be opened.
pub fn logout(args: &Args) -> Result<()> {
    let session = args.globals.session()?;
    session.logout();
    println!("Logged out.");
    Ok(())
}

/// # Errors
/// Returns an error if the token store cannot be opened or the profile cannot be printed.
pub async fn whoami(args: Args) -> Result<()> {
    let session = args.globals.session()?;
    session.load_me().await;
    match session.me() {
        Some(me) => println!("{}", serde_json::to_string_pretty(&me)?),
        None => {
            debug!("no profile available");
            println!("Not logged in.");
        }
    }
    Ok(())
}

fn print_profile(session: &SessionManager) {
    match session.me() {
        Some(me) => println!("Logged in as {}.", me.display_name()),
        None => println!("Logged in."),
    }
}
