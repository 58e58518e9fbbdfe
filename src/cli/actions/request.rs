use crate::{
    api::ApiRequest,
    cli::globals::GlobalArgs,
    format::format_api_error,
    router::{Navigation, Router},
};
use anyhow::{anyhow, Result};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug)]
pub struct GetArgs {
    pub globals: GlobalArgs,
    pub path: String,
    pub deadline: Option<Duration>,
}

#[derive(Debug)]
pub struct NavigateArgs {
    pub globals: GlobalArgs,
    pub path: String,
}

/// GET a path and print the body, pretty-printed when it is JSON.
/// # Errors
/// Returns the localized backend message if the request fails.
pub async fn get(args: GetArgs) -> Result<()> {
    let session = args.globals.session()?;
    let response = session
        .api()
        .get_with_deadline(ApiRequest::get(args.path), args.deadline)
        .await
        .map_err(|err| match err.status() {
            Some(_) => anyhow!(format_api_error(&err, Some("加载失败。"))),
            None => anyhow!(err),
        })?;

    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
        Err(_) => println!("{}", response.body),
    }
    Ok(())
}

/// Print the guard decision for a front-end path.
/// # Errors
/// Returns an error if the token store cannot be opened.
pub async fn navigate(args: NavigateArgs) -> Result<()> {
    let router = Router::new(args.globals.session()?);
    match router.before_each(&args.path).await {
        Navigation::Proceed => println!("proceed {}", args.path),
        redirect => {
            let target = redirect.to_path().unwrap_or_else(|| "/".to_string());
            println!("redirect {target}");
        }
    }
    Ok(())
}
