//! Authenticated request execution.
//!
//! Every resource call goes through [`AuthenticatedExecutor`]: it reads the
//! current token, sets `Authorization: Bearer ...`, follows redirects itself
//! so the header is present on every hop, and maps failures into
//! [`XeeError`].

use std::sync::Arc;

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, LOCATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::redirect;
use crate::auth::{Token, TokenManager};
use crate::config::{CredentialProvider, DEFAULT_MAX_REDIRECTS};
use crate::error::{Result, XeeError};

/// A resource call relative to the configured base URL.
///
/// # Example
/// ```
/// use xee::http::ApiRequest;
///
/// let request = ApiRequest::get(&["vehicles", "42", "privacies"])
///     .with_query("limit", "10");
/// assert_eq!(request.path(), "vehicles/42/privacies");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|segment| segment.to_string()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::GET, segments)
    }

    pub fn post(segments: &[&str]) -> Self {
        Self::new(Method::POST, segments)
    }

    pub fn put(segments: &[&str]) -> Self {
        Self::new(Method::PUT, segments)
    }

    pub fn patch(segments: &[&str]) -> Self {
        Self::new(Method::PATCH, segments)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path relative to the base URL, unencoded.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }
}

/// Sends [`ApiRequest`]s with the session's bearer token attached.
///
/// The token is read fresh for every call. Without a token the request goes
/// out unauthenticated and the server's answer is reported as-is.
pub struct AuthenticatedExecutor {
    http: reqwest::Client,
    credentials: Arc<dyn CredentialProvider>,
    tokens: Arc<TokenManager>,
    max_redirects: usize,
    retry_on_unauthorized: bool,
}

impl AuthenticatedExecutor {
    /// `http` must not follow redirects on its own; see
    /// [`build_client`](super::build_client).
    pub fn new(
        http: reqwest::Client,
        credentials: Arc<dyn CredentialProvider>,
        tokens: Arc<TokenManager>,
    ) -> Self {
        Self {
            http,
            credentials,
            tokens,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            retry_on_unauthorized: true,
        }
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Refresh and retry once when an authorized call is answered with 401.
    pub fn with_retry_on_unauthorized(mut self, enabled: bool) -> Self {
        self.retry_on_unauthorized = enabled;
        self
    }

    /// Attach the current bearer token to an arbitrary request builder.
    ///
    /// Redirects followed by the client that built `builder` are not covered;
    /// use [`send`](Self::send) for that.
    pub async fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.current_token().await.as_deref().and_then(bearer_value) {
            Some(value) => builder.header(AUTHORIZATION, value),
            None => builder,
        }
    }

    /// Send `request` and decode the JSON response.
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send `request`, following redirects, and return the successful
    /// response. Non-success statuses become errors.
    pub async fn send(&self, request: &ApiRequest) -> Result<Response> {
        let credentials = self.credentials.credentials()?;
        let segments: Vec<&str> = request.segments.iter().map(String::as_str).collect();
        let mut url = credentials.endpoint(&segments)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
        }

        let token = self.tokens.current_token().await;
        let response = self.follow(request, url.clone(), token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.retry_on_unauthorized {
            if let Some(rejected) = token.as_deref().filter(|token| {
                token.is_usable() && token.refresh_token().is_some()
            }) {
                warn!(path = %request.path(), "request rejected with 401; refreshing token and retrying once");
                let refreshed = self.tokens.refresh_rejected(&rejected.access_token).await?;
                let retried = self.follow(request, url, Some(refreshed.as_ref())).await?;
                return ensure_success(retried).await;
            }
        }

        ensure_success(response).await
    }

    /// Send one logical request, re-applying the same `Authorization` value on
    /// every redirect hop.
    async fn follow(
        &self,
        request: &ApiRequest,
        mut url: Url,
        token: Option<&Token>,
    ) -> Result<Response> {
        let authorization = token.and_then(bearer_value);
        let mut method = request.method.clone();
        let mut body = request.body.as_ref();
        let mut hops = 0usize;

        loop {
            let mut builder = self
                .http
                .request(method.clone(), url.clone())
                .header(ACCEPT, "application/json");
            if let Some(value) = &authorization {
                builder = builder.header(AUTHORIZATION, value.clone());
            }
            if let Some(json) = body {
                builder = builder.json(json);
            }

            let response = builder.send().await?;
            let status = response.status();
            let next = redirect::resolve(
                status,
                &method,
                &url,
                response.headers().get(LOCATION),
            )?;
            let Some(next) = next else {
                return Ok(response);
            };

            if hops >= self.max_redirects {
                return Err(XeeError::Redirect(format!(
                    "too many redirects (limit {}) starting from {}",
                    self.max_redirects,
                    request.path()
                )));
            }
            hops += 1;
            debug!(
                hop = hops,
                status = status.as_u16(),
                location = %next.url,
                authorized = authorization.is_some(),
                "following redirect"
            );
            url = next.url;
            method = next.method;
            if !next.keep_body {
                body = None;
            }
        }
    }
}

fn bearer_value(token: &Token) -> Option<HeaderValue> {
    if !token.is_usable() {
        return None;
    }
    let mut value = HeaderValue::from_str(&token.bearer()).ok()?;
    value.set_sensitive(true);
    Some(value)
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(super::status_to_error(status, &body))
}
