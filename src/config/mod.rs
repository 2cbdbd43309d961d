//! Configuration (layered: code > env).

pub mod credentials;

pub use credentials::{CredentialProvider, Credentials};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::store::{FileTokenStore, TokenStore, TokenStoreConfig};
use crate::error::{Result, XeeError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_REDIRECTS: usize = 10;
pub const DEFAULT_PROFILE: &str = "default";

/// Session configuration.
///
/// Values set through the `with_*` methods take precedence over the
/// environment read by [`XeeConfig::from_env`].
#[derive(Clone)]
pub struct XeeConfig {
    client_id: Option<String>,
    secret_key: Option<String>,
    base_url: Option<String>,
    redirect_uri: Option<String>,
    profile: String,
    token_dir: Option<PathBuf>,
    token_store: Option<Arc<dyn TokenStore>>,
    timeout: Duration,
    max_redirects: usize,
    retry_on_unauthorized: bool,
    keep_token_on_transient_failure: bool,
}

impl fmt::Debug for XeeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XeeConfig")
            .field("client_id", &self.client_id)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("redirect_uri", &self.redirect_uri)
            .field("profile", &self.profile)
            .field("token_dir", &self.token_dir)
            .field("token_store", &self.token_store.as_ref().map(|_| ".."))
            .field("timeout", &self.timeout)
            .field("max_redirects", &self.max_redirects)
            .field("retry_on_unauthorized", &self.retry_on_unauthorized)
            .field(
                "keep_token_on_transient_failure",
                &self.keep_token_on_transient_failure,
            )
            .finish()
    }
}

impl Default for XeeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl XeeConfig {
    /// Empty config: no credentials, file-backed token store under `~/.xee`.
    pub fn new() -> Self {
        Self {
            client_id: None,
            secret_key: None,
            base_url: None,
            redirect_uri: None,
            profile: DEFAULT_PROFILE.to_string(),
            token_dir: None,
            token_store: None,
            timeout: DEFAULT_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            retry_on_unauthorized: true,
            keep_token_on_transient_failure: false,
        }
    }

    /// Load from environment variables (`XEE_CLIENT_ID`, `XEE_CLIENT_SECRET`,
    /// `XEE_BASE_URL`, `XEE_REDIRECT_URI`, `XEE_PROFILE`, `XEE_TOKEN_DIR`).
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        let mut config = Self::new();
        config.client_id = env_value("XEE_CLIENT_ID");
        config.secret_key = env_value("XEE_CLIENT_SECRET");
        config.base_url = env_value("XEE_BASE_URL");
        config.redirect_uri = env_value("XEE_REDIRECT_URI");
        if let Some(profile) = env_value("XEE_PROFILE") {
            config.profile = profile;
        }
        config.token_dir = env_value("XEE_TOKEN_DIR").map(PathBuf::from);
        config
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.client_id = Some(credentials.client_id);
        self.secret_key = Some(credentials.secret_key);
        self.base_url = Some(credentials.base_url);
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_redirect_uri(mut self, redirect_uri: impl Into<String>) -> Self {
        self.redirect_uri = Some(redirect_uri.into());
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Directory for the default file-backed token store.
    pub fn with_token_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.token_dir = Some(dir.into());
        self
    }

    /// Use a specific token store instead of the file-backed default.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Refresh and retry once when an authorized call comes back 401.
    pub fn with_retry_on_unauthorized(mut self, enabled: bool) -> Self {
        self.retry_on_unauthorized = enabled;
        self
    }

    /// Keep the stored token when an exchange or refresh fails without any
    /// HTTP response (connection refused, timeout) or with a 5xx. Off by
    /// default: every failure clears the session.
    pub fn with_keep_token_on_transient_failure(mut self, enabled: bool) -> Self {
        self.keep_token_on_transient_failure = enabled;
        self
    }

    pub fn redirect_uri(&self) -> Option<&str> {
        self.redirect_uri.as_deref()
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    pub fn retry_on_unauthorized(&self) -> bool {
        self.retry_on_unauthorized
    }

    pub fn keep_token_on_transient_failure(&self) -> bool {
        self.keep_token_on_transient_failure
    }

    /// Configured token store, or a file store under the token directory.
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        if let Some(store) = &self.token_store {
            return store.clone();
        }
        let dir = self
            .token_dir
            .clone()
            .unwrap_or_else(TokenStoreConfig::default_dir);
        Arc::new(FileTokenStore::new(TokenStoreConfig::new(dir)))
    }

    /// Fail fast when credentials are missing or malformed.
    pub fn validate(&self) -> Result<()> {
        self.credentials().map(|_| ())
    }
}

impl CredentialProvider for XeeConfig {
    fn credentials(&self) -> Result<Credentials> {
        let client_id = required(&self.client_id, "client ID (XEE_CLIENT_ID)")?;
        let secret_key = required(&self.secret_key, "secret key (XEE_CLIENT_SECRET)")?;
        let base_url = required(&self.base_url, "base URL (XEE_BASE_URL)")?;
        Credentials::new(client_id, secret_key, base_url).credentials()
    }
}

fn required(value: &Option<String>, name: &str) -> Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .ok_or_else(|| XeeError::Configuration(format!("{name} is not set")))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
