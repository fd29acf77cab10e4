// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport for the router's web interface.

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder};

use crate::error::ProtocolError;
use crate::protocol::endpoints::SESSION_COOKIE;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

// ============================================================================
// RouterConfig - Connection parameters for one router
// ============================================================================

/// Configuration for reaching a router's web interface.
///
/// # Examples
///
/// ```
/// use iptime_tracker::protocol::RouterConfig;
/// use std::time::Duration;
///
/// let config = RouterConfig::new("192.168.0.1")
///     .with_credentials("admin", "secret")
///     .with_timeout(Duration::from_secs(3));
///
/// assert_eq!(config.base_url(), "http://192.168.0.1");
/// ```
#[derive(Clone)]
pub struct RouterConfig {
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
}

impl std::fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RouterConfig {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Creates a configuration for the given router address.
    ///
    /// `http://` is prefixed when the address carries no scheme, and a
    /// trailing slash is dropped so paths can be appended directly.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(&url.into()),
            username: String::new(),
            password: String::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the router account.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the account name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the account password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates a [`RouterHttp`] transport from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL cannot be used as a header value or
    /// the HTTP client cannot be created.
    pub fn into_client(self) -> Result<RouterHttp, ProtocolError> {
        if self.base_url.len() <= "http://".len() {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(ACCEPT_LANGUAGE),
        );
        let referer = HeaderValue::from_str(&self.base_url)
            .map_err(|_| ProtocolError::InvalidAddress(self.base_url.clone()))?;
        headers.insert(header::REFERER, referer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(RouterHttp {
            base_url: self.base_url,
            client,
            timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
        })
    }
}

fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

// ============================================================================
// RouterHttp - Request plumbing
// ============================================================================

/// A response from the router: status, body and any session cookie it set.
#[derive(Debug, Clone)]
pub struct RouterResponse {
    status: u16,
    body: String,
    session_cookie: Option<String>,
}

impl RouterResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub fn new(status: u16, body: String, session_cookie: Option<String>) -> Self {
        Self {
            status,
            body,
            session_cookie,
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the `efm_session_id` cookie value if the router set one.
    #[must_use]
    pub fn session_cookie(&self) -> Option<&str> {
        self.session_cookie.as_deref()
    }
}

/// HTTP transport bound to one router.
///
/// Requests carry the browser-like default headers the firmware expects
/// and, when a token is passed, the `efm_session_id` cookie. There is no
/// cookie jar: the session owns the token and decides when to send it.
#[derive(Debug, Clone)]
pub struct RouterHttp {
    base_url: String,
    client: Client,
    timeout_ms: u64,
}

impl RouterHttp {
    /// Returns the base URL of the router.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] on transport failure, timeout, or a
    /// non-success status.
    pub async fn get(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<RouterResponse, ProtocolError> {
        tracing::debug!(url = %self.url(path), "GET");
        self.send(path, self.client.get(self.url(path)), token).await
    }

    /// Sends a URL-encoded form POST.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] on transport failure, timeout, or a
    /// non-success status.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<RouterResponse, ProtocolError> {
        tracing::debug!(url = %self.url(path), "POST form");
        let request = self
            .client
            .post(self.url(path))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(encode_form(fields));
        self.send(path, request, token).await
    }

    /// Sends a JSON POST.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] on transport failure, timeout, or a
    /// non-success status.
    pub async fn post_json(
        &self,
        path: &str,
        payload: &serde_json::Value,
        token: Option<&str>,
    ) -> Result<RouterResponse, ProtocolError> {
        tracing::debug!(url = %self.url(path), "POST json");
        self.send(path, self.client.post(self.url(path)).json(payload), token)
            .await
    }

    async fn send(
        &self,
        path: &str,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<RouterResponse, ProtocolError> {
        let request = match token {
            Some(token) => request.header(header::COOKIE, format!("{SESSION_COOKIE}={token}")),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ProtocolError::from_reqwest(e, self.timeout_ms))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let session_cookie = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_cookie_value);

        let body = response
            .text()
            .await
            .map_err(|e| ProtocolError::from_reqwest(e, self.timeout_ms))?;

        tracing::trace!(path, bytes = body.len(), "response received");

        Ok(RouterResponse::new(status.as_u16(), body, session_cookie))
    }
}

/// Encodes form fields as `application/x-www-form-urlencoded`.
fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Extracts the session token from one `Set-Cookie` header value.
fn session_cookie_value(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    (name.trim() == SESSION_COOKIE && !value.trim().is_empty()).then(|| value.trim().to_string())
}
