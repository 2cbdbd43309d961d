//! HTTP plumbing: client construction, status mapping, the redirect-aware
//! authenticated executor.

pub mod executor;
pub mod redirect;

pub use executor::{ApiRequest, AuthenticatedExecutor};

use std::time::Duration;

use reqwest::StatusCode;

use crate::error::{ApiErrorDetail, Result, XeeError};

/// Build the client shared by the token manager and the executor.
///
/// Automatic redirects are disabled: the executor follows them itself so it
/// can carry the `Authorization` header across every hop.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(10)
        .redirect(reqwest::redirect::Policy::none())
        .user_agent(concat!("xee-rust/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(XeeError::Network)
}

/// Map a non-success status and its body to an error.
pub fn status_to_error(status: StatusCode, body: &str) -> XeeError {
    let details = ApiErrorDetail::parse_body(body);
    let message = details
        .iter()
        .find_map(|detail| detail.message.clone())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        });
    if status == StatusCode::UNAUTHORIZED {
        return XeeError::Unauthorized(message);
    }
    XeeError::Api {
        status: status.as_u16(),
        message,
        details,
    }
}
