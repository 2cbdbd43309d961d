use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::error::AuthError;
use super::store::TokenStore;
use super::token::Token;

/// The session's current token: an in-memory snapshot backed by a durable
/// [`TokenStore`] entry.
///
/// Readers get an `Arc<Token>` snapshot; writes swap the whole snapshot under
/// a lock, so nobody ever observes a half-replaced token. Only the
/// [`TokenManager`](super::TokenManager) writes.
pub struct TokenSlot {
    store: Arc<dyn TokenStore>,
    profile: String,
    current: RwLock<Option<Arc<Token>>>,
}

impl TokenSlot {
    /// Load the persisted token for `profile`.
    ///
    /// An unreadable entry is logged and treated as "not logged in" rather
    /// than blocking the session.
    pub fn hydrate(store: Arc<dyn TokenStore>, profile: impl Into<String>) -> Self {
        let profile = profile.into();
        let token = match store.load(&profile) {
            Ok(token) => token.map(Arc::new),
            Err(err) => {
                warn!(profile = %profile, error = %err, "ignoring unreadable stored token");
                None
            }
        };
        Self {
            store,
            profile,
            current: RwLock::new(token),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Current token snapshot.
    pub fn get(&self) -> Option<Arc<Token>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Authenticated iff a token with a non-empty access token is held.
    pub fn is_authenticated(&self) -> bool {
        self.get().map(|token| token.is_usable()).unwrap_or(false)
    }

    /// Persist `token`, then publish it. Nothing is published if persisting
    /// fails.
    pub(crate) fn set(&self, token: Token) -> Result<Arc<Token>, AuthError> {
        self.store.save(&self.profile, &token)?;
        let token = Arc::new(token);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        debug!(profile = %self.profile, "stored new token");
        Ok(token)
    }

    /// Drop the in-memory token first, then the persisted entry.
    pub(crate) fn clear(&self) -> Result<(), AuthError> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        debug!(profile = %self.profile, "cleared stored token");
        self.store.clear(&self.profile)
    }
}
