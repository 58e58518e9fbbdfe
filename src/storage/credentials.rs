use super::{KeyValueStore, StorageError};
use secrecy::SecretString;
use std::{fmt, sync::Arc};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const AVATAR_PROMPT_KEY: &str = "plc_avatar_prompt";

/// Typed view over the durable store holding the bearer credential pair.
///
/// At most one pair exists at a time; writes overwrite, there is no history.
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn KeyValueStore>,
}

impl Credentials {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    #[must_use]
    pub fn access_token(&self) -> Option<SecretString> {
        non_empty(self.store.get(ACCESS_TOKEN_KEY))
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<SecretString> {
        non_empty(self.store.get(REFRESH_TOKEN_KEY))
    }

    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token().is_some()
    }

    /// # Errors
    /// Returns an error if either token cannot be persisted.
    pub fn store_pair(&self, access: &str, refresh: &str) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, access)?;
        self.store.set(REFRESH_TOKEN_KEY, refresh)
    }

    /// # Errors
    /// Returns an error if the token cannot be persisted.
    pub fn set_access_token(&self, access: &str) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, access)
    }

    /// # Errors
    /// Returns an error if the token cannot be persisted.
    pub fn set_refresh_token(&self, refresh: &str) -> Result<(), StorageError> {
        self.store.set(REFRESH_TOKEN_KEY, refresh)
    }

    /// Remove both tokens. Both removals are attempted even if the first fails.
    /// # Errors
    /// Returns the first removal error.
    pub fn clear(&self) -> Result<(), StorageError> {
        let access = self.store.remove(ACCESS_TOKEN_KEY);
        let refresh = self.store.remove(REFRESH_TOKEN_KEY);
        access.and(refresh)
    }

    /// # Errors
    /// Returns an error if the flag cannot be persisted.
    pub fn set_avatar_prompt(&self) -> Result<(), StorageError> {
        self.store.set(AVATAR_PROMPT_KEY, "1")
    }

    /// Consume the post-registration avatar prompt flag.
    /// # Errors
    /// Returns an error if the flag cannot be removed.
    pub fn take_avatar_prompt(&self) -> Result<bool, StorageError> {
        let pending = self.store.get(AVATAR_PROMPT_KEY).as_deref() == Some("1");
        if pending {
            self.store.remove(AVATAR_PROMPT_KEY)?;
        }
        Ok(pending)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &self.access_token().map(|_| "***"))
            .field("refresh_token", &self.refresh_token().map(|_| "***"))
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<SecretString> {
    value
        .filter(|token| !token.trim().is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use secrecy::ExposeSecret;

    fn credentials() -> Credentials {
        Credentials::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn pair_round_trip_and_clear() {
        let creds = credentials();
        assert!(!creds.has_access_token());

        creds.store_pair("a1", "r1").unwrap();
        assert_eq!(creds.access_token().unwrap().expose_secret(), "a1");
        assert_eq!(creds.refresh_token().unwrap().expose_secret(), "r1");

        creds.clear().unwrap();
        assert!(creds.access_token().is_none());
        assert!(creds.refresh_token().is_none());
    }

    #[test]
    fn blank_tokens_count_as_absent() {
        let creds = credentials();
        creds.store_pair("  ", "").unwrap();
        assert!(!creds.has_access_token());
        assert!(creds.refresh_token().is_none());
    }

    #[test]
    fn avatar_prompt_is_one_shot() {
        let creds = credentials();
        assert!(!creds.take_avatar_prompt().unwrap());
        creds.set_avatar_prompt().unwrap();
        assert!(creds.take_avatar_prompt().unwrap());
        assert!(!creds.take_avatar_prompt().unwrap());
    }

    #[test]
    fn debug_redacts_tokens() {
        let creds = credentials();
        creds.store_pair("secret-access", "secret-refresh").unwrap();
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));
    }
}
