//! Unified error classification and recovery.

use serde::{Deserialize, Serialize};

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The session is missing, rejected, or could not be (re)established.
    Authentication,
    Network,
    Server,
    Api,
    Configuration,
    Serialization,
    InvalidInput,
    Unknown,
}

/// One entry of the error array returned by the API.
///
/// The server answers failed calls with
/// `[{"type": "...", "message": "...", "tip": "..."}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

impl ApiErrorDetail {
    /// Parse the error body of a failed response, accepting a single object
    /// as well as an array of objects.
    pub fn parse_body(body: &str) -> Vec<ApiErrorDetail> {
        if let Ok(details) = serde_json::from_str::<Vec<ApiErrorDetail>>(body) {
            return details;
        }
        match serde_json::from_str::<ApiErrorDetail>(body) {
            Ok(detail) if detail.kind.is_some() || detail.message.is_some() => vec![detail],
            _ => Vec::new(),
        }
    }
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Refresh the token, then retry the call.
    RefreshAndRetry,
    /// Run the authorization-code flow again.
    Reauthenticate,
    RetryWithBackoff,
    CheckConfiguration,
    FixRequest,
    ContactSupport,
}
