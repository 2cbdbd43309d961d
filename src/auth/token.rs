use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::AuthError;

/// One OAuth2 grant as held by the session.
///
/// A token is never edited in place: a refresh yields a new value that
/// replaces the stored one.
///
/// # Example
/// ```no_run
/// use xee::auth::Token;
///
/// let token = Token {
///     access_token: "access".to_string(),
///     refresh_token: Some("refresh".to_string()),
///     scope: Some("vehicles_read".to_string()),
///     token_type: Some("bearer".to_string()),
///     expires_in: Some(3600),
///     expires_at: None,
/// };
/// assert_eq!(token.bearer(), "Bearer access");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    /// Whether this token can authorize a request at all.
    pub fn is_usable(&self) -> bool {
        !self.access_token.trim().is_empty()
    }

    /// The refresh token, if one was issued and is non-empty.
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }

    /// Whether the server-declared lifetime has elapsed. Tokens without an
    /// expiry are never considered expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }

    /// `Authorization` header value for this token.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// Token endpoint payload. The API answers in camelCase; snake_case is
/// accepted as well since that is what generic OAuth2 servers send.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    #[serde(alias = "access_token")]
    access_token: Option<String>,
    #[serde(alias = "refresh_token")]
    refresh_token: Option<String>,
    scope: Option<String>,
    #[serde(alias = "token_type")]
    token_type: Option<String>,
    #[serde(alias = "expires_in")]
    expires_in: Option<i64>,
}

impl TokenResponse {
    pub(crate) fn into_token(self, received_at: DateTime<Utc>) -> Result<Token, AuthError> {
        let access_token = self
            .access_token
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                AuthError::InvalidResponse("token response missing accessToken".to_string())
            })?;
        let expires_at = self
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| received_at + Duration::seconds(secs));
        Ok(Token {
            access_token,
            refresh_token: self.refresh_token,
            scope: self.scope,
            token_type: self.token_type,
            expires_in: self.expires_in,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn camel_case_payload_maps_to_token() {
        let payload: TokenResponse = serde_json::from_str(
            r#"{"accessToken":"tok1","refreshToken":"ref1","scope":"all","tokenType":"bearer","expiresIn":60}"#,
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap();
        let token = payload.into_token(now).unwrap();
        assert_eq!(token.access_token, "tok1");
        assert_eq!(token.refresh_token.as_deref(), Some("ref1"));
        assert_eq!(token.scope.as_deref(), Some("all"));
        assert_eq!(token.expires_at, Some(now + Duration::seconds(60)));
    }

    #[test]
    fn snake_case_payload_is_accepted() {
        let payload: TokenResponse =
            serde_json::from_str(r#"{"access_token":"tok1","refresh_token":"ref1"}"#).unwrap();
        let token = payload.into_token(Utc::now()).unwrap();
        assert_eq!(token.access_token, "tok1");
        assert_eq!(token.refresh_token(), Some("ref1"));
        assert!(token.expires_at.is_none());
    }

    #[test]
    fn missing_access_token_is_invalid() {
        let payload: TokenResponse = serde_json::from_str(r#"{"refreshToken":"ref1"}"#).unwrap();
        let err = payload.into_token(Utc::now()).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn empty_refresh_token_is_treated_as_absent() {
        let token = Token {
            access_token: "a".to_string(),
            refresh_token: Some(" ".to_string()),
            scope: None,
            token_type: None,
            expires_in: None,
            expires_at: None,
        };
        assert!(token.refresh_token().is_none());
        assert!(!token.is_expired_at(Utc::now()));
    }
}
