use thiserror::Error;

/// Errors raised while minting, refreshing, revoking, or persisting tokens.
///
/// Variants carry the underlying cause as text so that one outcome can be
/// handed to every caller coalesced onto the same refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Authorization code exchange failed: {message}")]
    Exchange { status: Option<u16>, message: String },
    #[error("Token refresh failed: {message}")]
    Refresh { status: Option<u16>, message: String },
    #[error("No refresh token available")]
    NoRefreshToken,
    #[error("Token revocation failed: {message}")]
    Revoke { status: Option<u16>, message: String },
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Missing configuration: {0}")]
    Configuration(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AuthError {
    /// HTTP status attached to a failed token-endpoint call, if the server
    /// answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Exchange { status, .. }
            | Self::Refresh { status, .. }
            | Self::Revoke { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<toml::ser::Error> for AuthError {
    fn from(error: toml::ser::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
