//! Redirect resolution for manually followed hops.

use reqwest::header::HeaderValue;
use reqwest::{Method, StatusCode, Url};
use tracing::warn;

use crate::error::{Result, XeeError};

/// The request to send for the next hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    pub url: Url,
    pub method: Method,
    /// 307/308 resend the original body; the other codes drop it.
    pub keep_body: bool,
}

/// Decide whether `status` is a redirect to follow and where it leads.
///
/// Returns `Ok(None)` for statuses that are not followed (including 300 and
/// 304). A followable status without a usable `Location` is an error.
pub fn resolve(
    status: StatusCode,
    method: &Method,
    current: &Url,
    location: Option<&HeaderValue>,
) -> Result<Option<RedirectHop>> {
    let (next_method, keep_body) = match status {
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND => {
            if *method == Method::GET || *method == Method::HEAD {
                (method.clone(), false)
            } else {
                (Method::GET, false)
            }
        }
        StatusCode::SEE_OTHER => {
            if *method == Method::HEAD {
                (Method::HEAD, false)
            } else {
                (Method::GET, false)
            }
        }
        StatusCode::TEMPORARY_REDIRECT | StatusCode::PERMANENT_REDIRECT => (method.clone(), true),
        _ => return Ok(None),
    };

    let location = location.ok_or_else(|| {
        XeeError::Redirect(format!("{status} from {current} without a Location header"))
    })?;
    let location = location.to_str().map_err(|_| {
        XeeError::Redirect(format!("{status} from {current} with a non-ASCII Location"))
    })?;
    let url = current.join(location.trim()).map_err(|err| {
        XeeError::Redirect(format!("invalid Location {location:?} from {current}: {err}"))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(XeeError::Redirect(format!(
            "refusing redirect to non-http URL {url}"
        )));
    }

    if is_scheme_downgrade(current, &url) {
        warn!(from = %current, to = %url, "redirect downgrades https to http; credentials are sent in cleartext");
    }

    Ok(Some(RedirectHop {
        url,
        method: next_method,
        keep_body,
    }))
}

fn is_scheme_downgrade(from: &Url, to: &Url) -> bool {
    from.scheme() == "https" && to.scheme() == "http"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> Url {
        Url::parse("https://api.example.com/vehicles/1/trips?limit=5").unwrap()
    }

    fn location(value: &'static str) -> HeaderValue {
        HeaderValue::from_static(value)
    }

    #[test]
    fn relative_location_resolves_against_current_url() {
        let loc = location("/storage/trips.json");
        let hop = resolve(StatusCode::FOUND, &Method::GET, &current(), Some(&loc))
            .unwrap()
            .unwrap();
        assert_eq!(hop.url.as_str(), "https://api.example.com/storage/trips.json");
        assert_eq!(hop.method, Method::GET);
    }

    #[test]
    fn absolute_location_may_change_host() {
        let loc = location("https://cdn.example.net/t?sig=abc");
        let hop = resolve(StatusCode::MOVED_PERMANENTLY, &Method::GET, &current(), Some(&loc))
            .unwrap()
            .unwrap();
        assert_eq!(hop.url.host_str(), Some("cdn.example.net"));
        assert_eq!(hop.url.query(), Some("sig=abc"));
    }

    #[test]
    fn see_other_downgrades_to_get() {
        let loc = location("/privacies/9");
        let hop = resolve(StatusCode::SEE_OTHER, &Method::POST, &current(), Some(&loc))
            .unwrap()
            .unwrap();
        assert_eq!(hop.method, Method::GET);
        assert!(!hop.keep_body);
    }

    #[test]
    fn found_downgrades_non_get_methods() {
        let loc = location("/privacies/9");
        let hop = resolve(StatusCode::FOUND, &Method::PATCH, &current(), Some(&loc))
            .unwrap()
            .unwrap();
        assert_eq!(hop.method, Method::GET);
    }

    #[test]
    fn temporary_redirect_preserves_method_and_body() {
        let loc = location("/v2/vehicles/1");
        let hop = resolve(
            StatusCode::TEMPORARY_REDIRECT,
            &Method::PATCH,
            &current(),
            Some(&loc),
        )
        .unwrap()
        .unwrap();
        assert_eq!(hop.method, Method::PATCH);
        assert!(hop.keep_body);
    }

    #[test]
    fn scheme_downgrade_is_followed_and_detected() {
        let loc = location("http://mirror.example.org/trips/1");
        let hop = resolve(StatusCode::FOUND, &Method::GET, &current(), Some(&loc))
            .unwrap()
            .unwrap();
        assert_eq!(hop.url.scheme(), "http");
        assert!(is_scheme_downgrade(&current(), &hop.url));
        assert!(!is_scheme_downgrade(&hop.url, &current()));
        assert!(!is_scheme_downgrade(&current(), &current()));
    }

    #[test]
    fn not_modified_is_not_followed() {
        let loc = location("/elsewhere");
        let hop = resolve(StatusCode::NOT_MODIFIED, &Method::GET, &current(), Some(&loc)).unwrap();
        assert!(hop.is_none());
    }

    #[test]
    fn missing_location_is_an_error() {
        let err = resolve(StatusCode::FOUND, &Method::GET, &current(), None).unwrap_err();
        assert!(matches!(err, XeeError::Redirect(_)));
    }

    #[test]
    fn non_http_location_is_refused() {
        let loc = location("file:///etc/passwd");
        let err = resolve(StatusCode::FOUND, &Method::GET, &current(), Some(&loc)).unwrap_err();
        assert!(matches!(err, XeeError::Redirect(_)));
    }
}
