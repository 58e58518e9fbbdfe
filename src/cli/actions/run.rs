use crate::cli::actions::{render, request, session, Action};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Login(args) => session::login(args).await,
        Action::Register(args) => session::register(args).await,
        Action::Logout(args) => session::logout(&args),
        Action::Whoami(args) => session::whoami(args).await,
        Action::Get(args) => request::get(args).await,
        Action::Navigate(args) => request::navigate(args).await,
        Action::Sanitize => render::sanitize(),
        Action::CheckImage(args) => render::check_image(&args),
    }
}
