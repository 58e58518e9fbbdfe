use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Profile returned by `GET /api/me/`. Only the fields the client acts on are
/// typed; everything else is kept in `extra` for display.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Me {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub pid: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub plcoin: Option<i64>,
    #[serde(default)]
    pub is_banned: bool,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Me {
    /// Display name: nickname when set, username otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|nickname| !nickname.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

/// Reactive session state observed by the UI and the router guard.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub me: Option<Me>,
    pub loading: bool,
    pub error: Option<String>,
}

/// `POST /api/auth/token/` response.
#[derive(Deserialize)]
pub(crate) struct TokenPair {
    pub(crate) access: String,
    pub(crate) refresh: String,
}

/// Account creation fields for `POST /api/auth/register/`.
#[derive(Clone)]
pub struct Registration {
    pub nickname: String,
    pub username: String,
    pub email: String,
    pub password: SecretString,
}

impl Registration {
    pub(crate) fn to_body(&self) -> Value {
        json!({
            "nickname": self.nickname,
            "username": self.username,
            "email": self.email,
            "password": self.password.expose_secret(),
        })
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("nickname", &self.nickname)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn me_tolerates_partial_profiles() {
        let me: Me = serde_json::from_value(json!({
            "username": "alice",
            "is_staff": true,
            "downloads_today": 3
        }))
        .unwrap();
        assert!(me.is_staff);
        assert!(!me.is_superuser);
        assert_eq!(me.extra.get("downloads_today"), Some(&json!(3)));
        assert_eq!(me.display_name(), "alice");
    }

    #[test]
    fn display_name_prefers_nickname() {
        let me = Me {
            username: "alice".to_string(),
            nickname: Some("Alice W.".to_string()),
            ..Me::default()
        };
        assert_eq!(me.display_name(), "Alice W.");
    }

    #[test]
    fn registration_debug_hides_password() {
        let registration = Registration {
            nickname: "Al".to_string(),
            username: "alice".to_string(),
            email: "alice@example.test".to_string(),
            password: SecretString::from("hunter2-hunter2"),
        };
        assert!(!format!("{registration:?}").contains("hunter2"));
        assert_eq!(registration.to_body()["password"], "hunter2-hunter2");
    }
}
