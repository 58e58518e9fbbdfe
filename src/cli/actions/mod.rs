pub mod render;
pub mod request;
pub mod session;

mod run;

#[derive(Debug)]
pub enum Action {
    Login(session::LoginArgs),
    Register(session::RegisterArgs),
    Logout(session::Args),
    Whoami(session::Args),
    Get(request::GetArgs),
    Navigate(request::NavigateArgs),
    Sanitize,
    CheckImage(render::CheckImageArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
