#![allow(dead_code, clippy::unwrap_used)]

use plc_client::{
    api::{ApiClient, ClientConfig},
    session::SessionManager,
    storage::{Credentials, MemoryStore},
};
use std::{net::TcpListener, sync::Arc};
use wiremock::{Match, MockServer, Request};

pub fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Matches requests sent without an `Authorization` header.
pub struct NoAuthorization;

impl Match for NoAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub fn client(server: &MockServer) -> (ApiClient, Credentials) {
    let credentials = Credentials::new(Arc::new(MemoryStore::new()));
    let config = ClientConfig::new(&server.uri()).unwrap();
    let api = ApiClient::new(config, credentials.clone()).unwrap();
    (api, credentials)
}

pub fn session(server: &MockServer) -> (Arc<SessionManager>, Credentials) {
    let (api, credentials) = client(server);
    (Arc::new(SessionManager::new(api)), credentials)
}
