use crate::{
    api::{ApiClient, ClientConfig},
    session::SessionManager,
    storage::{Credentials, FileStore},
};
use anyhow::{Context, Result};
use std::{path::PathBuf, sync::Arc, time::Duration};

const STORAGE_DIR: &str = "plc";
const STORAGE_FILE: &str = "storage.json";

/// Connection settings shared by every subcommand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalArgs {
    pub base_url: String,
    pub storage_path: PathBuf,
    pub request_timeout: Option<Duration>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(base_url: String, storage_path: PathBuf) -> Self {
        Self {
            base_url,
            storage_path,
            request_timeout: None,
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// # Errors
    /// Returns an error if the base URL is invalid.
    pub fn client_config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::new(&self.base_url)
            .with_context(|| format!("invalid base URL: {}", self.base_url))?;
        Ok(match self.request_timeout {
            Some(timeout) => config.with_request_timeout(timeout),
            None => config,
        })
    }

    /// Open the token store and build a session on top of it.
    /// # Errors
    /// Returns an error if the store cannot be read or the client cannot be built.
    pub fn session(&self) -> Result<Arc<SessionManager>> {
        let store = FileStore::open(&self.storage_path).with_context(|| {
            format!(
                "failed to open token storage {}",
                self.storage_path.display()
            )
        })?;
        let credentials = Credentials::new(Arc::new(store));
        let api = ApiClient::new(self.client_config()?, credentials)?;
        Ok(Arc::new(SessionManager::new(api)))
    }
}

/// `<config dir>/plc/storage.json`
/// # Errors
/// Returns an error if the platform has no config directory.
pub fn default_storage_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("unable to determine the config directory")?;
    Ok(base.join(STORAGE_DIR).join(STORAGE_FILE))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args() {
        let args = GlobalArgs::new("http://127.0.0.1:8000".to_string(), PathBuf::from("s.json"));
        assert_eq!(args.request_timeout, None);
        let config = args.client_config().unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn test_request_timeout_override() {
        let args = GlobalArgs::new("http://127.0.0.1:8000".to_string(), PathBuf::from("s.json"))
            .with_request_timeout(Some(Duration::from_millis(2500)));
        let config = args.client_config().unwrap();
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_base_url() {
        let args = GlobalArgs::new("ftp://example.test".to_string(), PathBuf::from("s.json"));
        assert!(args.client_config().is_err());
    }

    #[test]
    fn test_session_uses_storage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let args = GlobalArgs::new("http://127.0.0.1:8000".to_string(), path);
        let session = args.session().unwrap();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_default_storage_path() {
        if let Ok(path) = default_storage_path() {
            assert!(path.ends_with("plc/storage.json"));
        }
    }
}
