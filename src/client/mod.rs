//! The session object.
//!
//! [`XeeClient`] owns the token manager and the authenticated executor for
//! one profile. Construct one per account and share it by reference (or in
//! an `Arc`); there is no global state.

mod privacies;
mod trips;
mod users;
mod vehicles;

use std::sync::Arc;

use reqwest::Url;
use tracing::debug;

use crate::auth::{self, Token, TokenManager, TokenSlot};
use crate::config::{CredentialProvider, XeeConfig};
use crate::error::{Result, XeeError};
use crate::http::{build_client, AuthenticatedExecutor};

/// An authenticated API session.
///
/// # Example
/// ```no_run
/// use xee::{XeeClient, XeeConfig};
///
/// # async fn example() -> xee::Result<()> {
/// let client = XeeClient::new(XeeConfig::from_env())?;
/// if !client.is_authenticated() {
///     let state = xee::auth::new_state();
///     println!("open {}", client.authorization_url(&state)?);
///     return Ok(());
/// }
/// for vehicle in client.vehicles(None).await? {
///     println!("{:?}", vehicle.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct XeeClient {
    config: XeeConfig,
    credentials: Arc<dyn CredentialProvider>,
    tokens: Arc<TokenManager>,
    executor: AuthenticatedExecutor,
}

impl XeeClient {
    /// Build a session from `config`, restoring any persisted token for the
    /// configured profile.
    ///
    /// Fails with [`XeeError::Configuration`] when credentials are missing.
    pub fn new(config: XeeConfig) -> Result<Self> {
        let credentials: Arc<dyn CredentialProvider> = Arc::new(config.clone());
        Self::with_provider(config, credentials)
    }

    /// Build a session whose credentials come from `credentials` rather than
    /// from `config`. Everything else (store, profile, timeouts) is read from
    /// `config`.
    pub fn with_provider(
        config: XeeConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self> {
        credentials.credentials()?;

        let http = build_client(config.timeout())?;
        let slot = TokenSlot::hydrate(config.token_store(), config.profile());
        let tokens = Arc::new(
            TokenManager::new(http.clone(), credentials.clone(), slot)
                .with_keep_on_transient_failure(config.keep_token_on_transient_failure()),
        );
        let executor = AuthenticatedExecutor::new(http, credentials.clone(), tokens.clone())
            .with_max_redirects(config.max_redirects())
            .with_retry_on_unauthorized(config.retry_on_unauthorized());

        debug!(
            profile = %config.profile(),
            authenticated = tokens.is_authenticated(),
            "session ready"
        );
        Ok(Self {
            config,
            credentials,
            tokens,
            executor,
        })
    }

    pub fn config(&self) -> &XeeConfig {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<TokenManager> {
        &self.tokens
    }

    /// Executor for requests built outside the resource methods; see
    /// [`AuthenticatedExecutor::authorize`].
    pub fn executor(&self) -> &AuthenticatedExecutor {
        &self.executor
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    pub fn token(&self) -> Option<Arc<Token>> {
        self.tokens.token()
    }

    /// URL to send the user to for consent. Pass the same `state` to
    /// [`login_with_redirect`](Self::login_with_redirect).
    pub fn authorization_url(&self, state: &str) -> Result<Url> {
        let credentials = self.credentials.credentials()?;
        Ok(auth::authorization_url(
            &credentials,
            self.config.redirect_uri(),
            state,
        )?)
    }

    /// Exchange an authorization code for a token.
    pub async fn exchange_code(&self, code: &str) -> Result<Arc<Token>> {
        Ok(self.tokens.exchange_code(code).await?)
    }

    /// Extract the code from the OAuth callback URL and exchange it.
    pub async fn login_with_redirect(
        &self,
        callback: &str,
        expected_state: Option<&str>,
    ) -> Result<Arc<Token>> {
        let code = auth::code_from_redirect(callback, expected_state)?;
        self.exchange_code(&code).await
    }

    pub async fn refresh(&self) -> Result<Arc<Token>> {
        Ok(self.tokens.refresh().await?)
    }

    /// Revoke the access token server-side. The local token is kept.
    pub async fn revoke(&self) -> Result<()> {
        Ok(self.tokens.revoke().await?)
    }

    /// Revoke (best effort) and forget the local token.
    pub async fn logout(&self) -> Result<()> {
        Ok(self.tokens.logout().await?)
    }
}

/// Reject empty identifiers before they turn into a malformed path.
fn require_id<'a>(value: Option<&'a str>, what: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| XeeError::InvalidArgument(format!("{what} id is missing")))
}
