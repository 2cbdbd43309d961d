//! Error types for the Xee SDK.

pub mod unified;

pub use unified::{ApiErrorDetail, ErrorCategory, RecoverySuggestion};

use thiserror::Error;

use crate::auth::AuthError;

/// Primary error type for all SDK operations.
#[derive(Error, Debug)]
pub enum XeeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Auth(AuthError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        message: String,
        details: Vec<ApiErrorDetail>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Redirect error: {0}")]
    Redirect(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl XeeError {
    /// Create an API error without structured details.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Network, decoding, and redirect failures. Token state is never touched
    /// by these.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Serialization(_) | Self::Redirect(_)
        )
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Auth(AuthError::Configuration(_)) | Self::Configuration(_) => {
                ErrorCategory::Configuration
            }
            Self::Auth(_) | Self::Unauthorized(_) => ErrorCategory::Authentication,
            Self::Network(_) | Self::Redirect(_) | Self::Io(_) => ErrorCategory::Network,
            Self::Serialization(_) => ErrorCategory::Serialization,
            Self::InvalidArgument(_) => ErrorCategory::InvalidInput,
            Self::Api { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Api,
            },
        }
    }

    /// Whether this error is potentially retryable by the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Server
        )
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::Unauthorized(_) => RecoverySuggestion::RefreshAndRetry,
            Self::Auth(AuthError::Configuration(_)) | Self::Configuration(_) => {
                RecoverySuggestion::CheckConfiguration
            }
            Self::Auth(_) => RecoverySuggestion::Reauthenticate,
            Self::InvalidArgument(_) => RecoverySuggestion::FixRequest,
            _ => match self.category() {
                ErrorCategory::Network | ErrorCategory::Server => {
                    RecoverySuggestion::RetryWithBackoff
                }
                ErrorCategory::Authentication => RecoverySuggestion::RefreshAndRetry,
                ErrorCategory::Api => RecoverySuggestion::FixRequest,
                _ => RecoverySuggestion::ContactSupport,
            },
        }
    }
}

impl From<AuthError> for XeeError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Configuration(message) => Self::Configuration(message),
            other => Self::Auth(other),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, XeeError>;
