#![allow(dead_code)]

use std::sync::Arc;

use base64::Engine;
use serde_json::{json, Value};
use wiremock::MockServer;

use xee::auth::{MemoryTokenStore, Token, TokenManager, TokenSlot, TokenStore};
use xee::config::Credentials;
use xee::{XeeClient, XeeConfig};

pub const CLIENT_ID: &str = "cid";
pub const SECRET: &str = "csec";

pub fn token(access: &str, refresh: Option<&str>) -> Token {
    Token {
        access_token: access.to_string(),
        refresh_token: refresh.map(String::from),
        scope: Some("all".to_string()),
        token_type: Some("bearer".to_string()),
        expires_in: None,
        expires_at: None,
    }
}

pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({
        "accessToken": access,
        "refreshToken": refresh,
        "scope": "all",
        "tokenType": "bearer",
        "expiresIn": 3600
    })
}

/// `Basic base64(cid:csec)`
pub fn basic_header() -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{CLIENT_ID}:{SECRET}"));
    format!("Basic {encoded}")
}

pub fn credentials(server: &MockServer) -> Arc<Credentials> {
    Arc::new(Credentials::new(CLIENT_ID, SECRET, server.uri()))
}

pub fn manager(server: &MockServer, store: Arc<dyn TokenStore>) -> TokenManager {
    let slot = TokenSlot::hydrate(store, "default");
    TokenManager::new(reqwest::Client::new(), credentials(server), slot)
}

pub fn config(server: &MockServer, store: Arc<dyn TokenStore>) -> XeeConfig {
    XeeConfig::new()
        .with_client_id(CLIENT_ID)
        .with_secret_key(SECRET)
        .with_base_url(server.uri())
        .with_token_store(store)
}

/// Client already holding `access`/`refresh`.
pub fn logged_in_client(server: &MockServer, access: &str, refresh: Option<&str>) -> XeeClient {
    let store = Arc::new(MemoryTokenStore::seeded("default", token(access, refresh)));
    XeeClient::new(config(server, store)).expect("client")
}

pub fn logged_out_client(server: &MockServer) -> XeeClient {
    XeeClient::new(config(server, Arc::new(MemoryTokenStore::new()))).expect("client")
}
