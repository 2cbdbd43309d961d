//! Authorization-code flow helpers: the URL the user opens and the code the
//! callback hands back.

use reqwest::Url;
use uuid::Uuid;

use super::error::AuthError;
use crate::config::Credentials;

/// Build `{base}/oauth/authorize?client_id=..[&redirect_uri=..]&state=..`.
pub fn authorization_url(
    credentials: &Credentials,
    redirect_uri: Option<&str>,
    state: &str,
) -> Result<Url, AuthError> {
    let mut url = credentials
        .endpoint(&["oauth", "authorize"])
        .map_err(|err| AuthError::Configuration(err.to_string()))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("client_id", &credentials.client_id);
        if let Some(redirect_uri) = redirect_uri.filter(|uri| !uri.trim().is_empty()) {
            query.append_pair("redirect_uri", redirect_uri.trim());
        }
        query.append_pair("state", state);
    }
    Ok(url)
}

/// Random opaque value to round-trip through the authorization server.
pub fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Pull the authorization code out of the callback URL.
///
/// Accepts either a full URL or a bare query string. When `expected_state`
/// is given the callback must echo it back.
pub fn code_from_redirect(callback: &str, expected_state: Option<&str>) -> Result<String, AuthError> {
    let url = parse_callback(callback)?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    let mut description = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "error_description" => description = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        let detail = match description {
            Some(description) => format!("{error}: {description}"),
            None => error.clone(),
        };
        return Err(if error == "access_denied" {
            AuthError::AccessDenied(detail)
        } else {
            AuthError::InvalidResponse(detail)
        });
    }

    if let Some(expected) = expected_state {
        if state.as_deref() != Some(expected) {
            return Err(AuthError::InvalidResponse(
                "state mismatch in authorization callback".to_string(),
            ));
        }
    }

    code.filter(|code| !code.is_empty())
        .ok_or_else(|| AuthError::InvalidResponse("authorization callback has no code".to_string()))
}

fn parse_callback(callback: &str) -> Result<Url, AuthError> {
    let callback = callback.trim();
    if let Ok(url) = Url::parse(callback) {
        return Ok(url);
    }
    let query = callback.trim_start_matches('?');
    Url::parse(&format!("http://localhost/?{query}"))
        .map_err(|err| AuthError::InvalidResponse(format!("invalid callback URL: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn creds() -> Credentials {
        Credentials::new("cid", "csec", "https://api.example.com/v4/")
    }

    #[test]
    fn url_carries_client_redirect_and_state() {
        let url = authorization_url(&creds(), Some("myapp://callback"), "s1").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v4/oauth/authorize?client_id=cid&redirect_uri=myapp%3A%2F%2Fcallback&state=s1"
        );
    }

    #[test]
    fn redirect_uri_is_optional() {
        let url = authorization_url(&creds(), None, "s1").unwrap();
        assert_eq!(url.query(), Some("client_id=cid&state=s1"));
    }

    #[test]
    fn states_are_unique() {
        assert_ne!(new_state(), new_state());
        assert_eq!(new_state().len(), 32);
    }

    #[test]
    fn extracts_code_and_checks_state() {
        let code =
            code_from_redirect("myapp://callback?code=abc123&state=s1", Some("s1")).unwrap();
        assert_eq!(code, "abc123");

        let bare = code_from_redirect("?code=abc123", None).unwrap();
        assert_eq!(bare, "abc123");
    }

    #[test]
    fn state_mismatch_is_rejected() {
        let err = code_from_redirect("myapp://callback?code=abc&state=other", Some("s1"))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }

    #[test]
    fn denied_consent_maps_to_access_denied() {
        let err = code_from_redirect(
            "myapp://callback?error=access_denied&error_description=User+said+no",
            None,
        )
        .unwrap_err();
        assert_eq!(err, AuthError::AccessDenied("access_denied: User said no".to_string()));
    }

    #[test]
    fn other_errors_are_invalid_responses() {
        let err = code_from_redirect("myapp://callback?error=server_error", None).unwrap_err();
        assert_eq!(err, AuthError::InvalidResponse("server_error".to_string()));
    }

    #[test]
    fn missing_code_is_invalid() {
        let err = code_from_redirect("myapp://callback?state=s1", None).unwrap_err();
        assert!(matches!(err, AuthError::InvalidResponse(_)));
    }
}
