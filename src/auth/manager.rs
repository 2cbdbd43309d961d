use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use reqwest::header::ACCEPT;
use strum::{Display, IntoStaticStr};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::error::AuthError;
use super::slot::TokenSlot;
use super::token::{Token, TokenResponse};
use crate::config::{CredentialProvider, Credentials};

/// OAuth2 grant types sent to the token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum GrantType {
    AuthorizationCode,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Mints, refreshes, and revokes the session token.
///
/// Every token mutation goes through one async mutex, so at most one token
/// request is in flight. Callers of [`refresh`](Self::refresh) that arrive
/// while a refresh is running wait for it and receive its outcome instead of
/// starting their own.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use xee::auth::{MemoryTokenStore, TokenManager, TokenSlot};
/// use xee::config::Credentials;
///
/// # async fn example() -> Result<(), xee::auth::AuthError> {
/// let credentials = Arc::new(Credentials::new("cid", "csec", "https://api.example.com"));
/// let slot = TokenSlot::hydrate(Arc::new(MemoryTokenStore::new()), "default");
/// let manager = TokenManager::new(reqwest::Client::new(), credentials, slot);
/// let token = manager.exchange_code("code-from-redirect").await?;
/// println!("scope: {:?}", token.scope);
/// # Ok(())
/// # }
/// ```
pub struct TokenManager {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
    tokens: TokenSlot,
    writer: Mutex<LastRefresh>,
    refreshes_completed: AtomicU64,
    keep_on_transient_failure: bool,
}

#[derive(Default)]
struct LastRefresh {
    outcome: Option<Result<Arc<Token>, AuthError>>,
}

/// Why a token-endpoint call failed.
struct GrantFailure {
    status: Option<u16>,
    message: String,
}

impl GrantFailure {
    /// No HTTP response at all, or the server is having trouble.
    fn is_transient(&self) -> bool {
        match self.status {
            None => true,
            Some(status) => status >= 500,
        }
    }
}

impl TokenManager {
    pub fn new(
        http: reqwest::Client,
        credentials: Arc<dyn CredentialProvider>,
        tokens: TokenSlot,
    ) -> Self {
        Self {
            http,
            credentials,
            tokens,
            writer: Mutex::new(LastRefresh::default()),
            refreshes_completed: AtomicU64::new(0),
            keep_on_transient_failure: false,
        }
    }

    /// Keep the stored token when an exchange or refresh fails transiently.
    pub fn with_keep_on_transient_failure(mut self, enabled: bool) -> Self {
        self.keep_on_transient_failure = enabled;
        self
    }

    /// Current token snapshot, without waiting for an in-flight refresh.
    pub fn token(&self) -> Option<Arc<Token>> {
        self.tokens.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_authenticated()
    }

    /// Token to authorize a new request with. Waits for any token request in
    /// flight to settle first, so a token being replaced is never handed out.
    pub async fn current_token(&self) -> Option<Arc<Token>> {
        let _settled = self.writer.lock().await;
        self.tokens.get()
    }

    /// Exchange an authorization code for a token and store it.
    ///
    /// Any failure clears the stored token.
    pub async fn exchange_code(&self, code: &str) -> Result<Arc<Token>, AuthError> {
        let credentials = self.resolve_credentials()?;
        let _writer = self.writer.lock().await;

        let form = [
            ("grant_type", GrantType::AuthorizationCode.as_str()),
            ("code", code),
        ];
        match self.request_token(&credentials, &form).await {
            Ok(token) => match self.tokens.set(token) {
                Ok(stored) => {
                    debug!(profile = %self.tokens.profile(), "authorization code exchanged");
                    Ok(stored)
                }
                Err(err) => {
                    self.discard(None);
                    Err(AuthError::Exchange {
                        status: None,
                        message: format!("could not persist token: {err}"),
                    })
                }
            },
            Err(failure) => {
                warn!(status = ?failure.status, error = %failure.message, "authorization code exchange failed");
                self.discard(Some(&failure));
                Err(AuthError::Exchange {
                    status: failure.status,
                    message: failure.message,
                })
            }
        }
    }

    /// Exchange the stored refresh token for a new token.
    ///
    /// Fails with [`AuthError::NoRefreshToken`] without touching the network
    /// when there is nothing to refresh. Any other failure clears the stored
    /// token.
    pub async fn refresh(&self) -> Result<Arc<Token>, AuthError> {
        let observed = self.refreshes_completed.load(Ordering::Acquire);
        self.refresh_after(observed).await
    }

    /// Recover from a 401 returned for `rejected_access_token`.
    ///
    /// If the stored token has already moved on (another caller refreshed or
    /// the user logged in again), that token is returned without a network
    /// call. Otherwise this is a regular coalesced [`refresh`](Self::refresh).
    pub async fn refresh_rejected(
        &self,
        rejected_access_token: &str,
    ) -> Result<Arc<Token>, AuthError> {
        let observed = self.refreshes_completed.load(Ordering::Acquire);
        if let Some(current) = self.current_token().await {
            if current.is_usable() && current.access_token != rejected_access_token {
                debug!("token already replaced since the rejected request");
                return Ok(current);
            }
        }
        self.refresh_after(observed).await
    }

    async fn refresh_after(&self, observed: u64) -> Result<Arc<Token>, AuthError> {
        let mut writer = self.writer.lock().await;

        if self.refreshes_completed.load(Ordering::Acquire) != observed {
            if let Some(outcome) = writer.outcome.clone() {
                debug!("joined a refresh that completed while waiting");
                return outcome;
            }
        }

        let stored = self.tokens.get();
        let Some(refresh_token) = stored
            .as_deref()
            .and_then(Token::refresh_token)
            .map(str::to_string)
        else {
            return Err(AuthError::NoRefreshToken);
        };
        let credentials = self.resolve_credentials()?;

        let mut form = vec![
            ("grant_type", GrantType::RefreshToken.as_str()),
            ("refresh_token", refresh_token.as_str()),
        ];
        if let Some(scope) = stored.as_deref().and_then(|token| token.scope.as_deref()) {
            form.push(("scope", scope));
        }

        let outcome = match self.request_token(&credentials, &form).await {
            Ok(token) => self.tokens.set(token).map_err(|err| {
                self.discard(None);
                AuthError::Refresh {
                    status: None,
                    message: format!("could not persist token: {err}"),
                }
            }),
            Err(failure) => {
                warn!(status = ?failure.status, error = %failure.message, "token refresh failed");
                self.discard(Some(&failure));
                Err(AuthError::Refresh {
                    status: failure.status,
                    message: failure.message,
                })
            }
        };
        if outcome.is_ok() {
            debug!(profile = %self.tokens.profile(), "token refreshed");
        }

        writer.outcome = Some(outcome.clone());
        self.refreshes_completed.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    /// Ask the server to revoke the current access token.
    ///
    /// Local state is left alone whatever the outcome; use
    /// [`logout`](Self::logout) to also forget the token.
    pub async fn revoke(&self) -> Result<(), AuthError> {
        let credentials = self.resolve_credentials()?;
        let token = self
            .current_token()
            .await
            .filter(|token| token.is_usable())
            .ok_or(AuthError::NotLoggedIn)?;
        let url = credentials
            .endpoint(&["oauth", "revoke"])
            .map_err(|err| AuthError::Configuration(err.to_string()))?;

        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|err| AuthError::Revoke {
                status: None,
                message: err.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Revoke {
                status: Some(status.as_u16()),
                message: failure_message(status, &body),
            });
        }
        debug!(profile = %self.tokens.profile(), "token revoked");
        Ok(())
    }

    /// Revoke the token if there is one, then clear it locally no matter how
    /// the revocation went.
    pub async fn logout(&self) -> Result<(), AuthError> {
        if self.tokens.is_authenticated() {
            if let Err(err) = self.revoke().await {
                warn!(error = %err, "revocation failed; clearing local session anyway");
            }
        }
        let _writer = self.writer.lock().await;
        self.tokens.clear()
    }

    fn resolve_credentials(&self) -> Result<Credentials, AuthError> {
        self.credentials
            .credentials()
            .map_err(|err| AuthError::Configuration(err.to_string()))
    }

    fn discard(&self, failure: Option<&GrantFailure>) {
        if self.keep_on_transient_failure && failure.is_some_and(GrantFailure::is_transient) {
            warn!("keeping stored token after transient token-endpoint failure");
            return;
        }
        if let Err(err) = self.tokens.clear() {
            warn!(error = %err, "failed to clear stored token");
        }
    }

    async fn request_token(
        &self,
        credentials: &Credentials,
        form: &[(&str, &str)],
    ) -> Result<Token, GrantFailure> {
        let url = credentials
            .endpoint(&["oauth", "token"])
            .map_err(|err| GrantFailure {
                status: None,
                message: err.to_string(),
            })?;
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .basic_auth(&credentials.client_id, Some(&credentials.secret_key))
            .form(form)
            .send()
            .await
            .map_err(|err| GrantFailure {
                status: None,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GrantFailure {
                status: Some(status.as_u16()),
                message: failure_message(status, &body),
            });
        }

        let payload: TokenResponse = response.json().await.map_err(|err| GrantFailure {
            status: Some(status.as_u16()),
            message: format!("invalid token response: {err}"),
        })?;
        payload
            .into_token(Utc::now())
            .map_err(|err| GrantFailure {
                status: Some(status.as_u16()),
                message: err.to_string(),
            })
    }
}

fn failure_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        format!("status {status}")
    } else {
        format!("status {status}: {body}")
    }
}
