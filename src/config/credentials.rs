//! Client credentials and the provider seam that supplies them.

use std::fmt;

use reqwest::Url;

use crate::error::{Result, XeeError};

/// Client ID, secret key, and API base URL used by the session.
///
/// Read-only once built. `Debug` output redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub secret_key: String,
    pub base_url: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("secret_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        secret_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            secret_key: secret_key.into(),
            base_url: base_url.into(),
        }
    }

    /// Check that every field is present and the base URL is an absolute
    /// http(s) URL.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(XeeError::Configuration("client ID is not set".to_string()));
        }
        if self.secret_key.trim().is_empty() {
            return Err(XeeError::Configuration("secret key is not set".to_string()));
        }
        self.base()?;
        Ok(())
    }

    /// Parsed base URL.
    pub fn base(&self) -> Result<Url> {
        if self.base_url.trim().is_empty() {
            return Err(XeeError::Configuration("base URL is not set".to_string()));
        }
        let url = Url::parse(self.base_url.trim()).map_err(|err| {
            XeeError::Configuration(format!("invalid base URL {}: {err}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(XeeError::Configuration(format!(
                "base URL must be an absolute http(s) URL: {}",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Base URL extended with `segments`, each percent-encoded as one path
    /// segment. A trailing slash on the base URL is tolerated.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base()?;
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                XeeError::Configuration(format!("base URL cannot be a base: {}", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }
}

/// Supplies the credentials used to authenticate token requests.
///
/// Called on every token-endpoint and resource call, so implementations can
/// rotate secrets without rebuilding the session.
pub trait CredentialProvider: Send + Sync {
    fn credentials(&self) -> Result<Credentials>;
}

impl CredentialProvider for Credentials {
    fn credentials(&self) -> Result<Credentials> {
        self.validate()?;
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_segments() {
        let creds = Credentials::new("cid", "csec", "https://api.example.com");
        assert_eq!(
            creds.endpoint(&["oauth", "token"]).unwrap().as_str(),
            "https://api.example.com/oauth/token"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash_and_base_path() {
        let creds = Credentials::new("cid", "csec", "https://api.example.com/v4/");
        assert_eq!(
            creds.endpoint(&["users", "me"]).unwrap().as_str(),
            "https://api.example.com/v4/users/me"
        );
    }

    #[test]
    fn endpoint_encodes_identifiers() {
        let creds = Credentials::new("cid", "csec", "https://api.example.com");
        assert_eq!(
            creds.endpoint(&["vehicles", "a/b c"]).unwrap().as_str(),
            "https://api.example.com/vehicles/a%2Fb%20c"
        );
    }

    #[test]
    fn validate_reports_each_missing_field() {
        let missing_id = Credentials::new("", "csec", "https://api.example.com");
        let missing_secret = Credentials::new("cid", " ", "https://api.example.com");
        let missing_url = Credentials::new("cid", "csec", "");
        let bad_url = Credentials::new("cid", "csec", "ftp://api.example.com");
        for creds in [missing_id, missing_secret, missing_url, bad_url] {
            assert!(matches!(
                creds.credentials(),
                Err(XeeError::Configuration(_))
            ));
        }
    }

    #[test]
    fn debug_redacts_secret() {
        let creds = Credentials::new("cid", "super-secret", "https://api.example.com");
        let rendered = format!("{creds:?}");
        assert!(rendered.contains("cid"));
        assert!(!rendered.contains("super-secret"));
    }
}
