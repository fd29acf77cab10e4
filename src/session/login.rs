// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Login and logout for each UI variant.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, LoginError};
use crate::parser::beta;
use crate::protocol::RouterHttp;
use crate::protocol::endpoints::{BETA_SERVICE, LOGIN, LOGOUT, M_LOGIN, M_LOGOUT};
use crate::variant::UiVariant;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w{16}").expect("valid regex"));

/// Script the desktop UI answers with when the account is rejected.
const LEGACY_REJECTED: &str =
    r#"parent.parent.location = "/sess-bin/login_session.cgi?noauto=1"; //session_timeout"#;

/// Script the mobile UI answers with when the account is rejected.
const MOBILE_REJECTED: &str = r#"parent.parent.location = "/m_login.cgi?noauto=1"; //session_timeout"#;

/// Scripts the mobile login answers with when the firmware has no mobile UI.
const MOBILE_ROOT_REDIRECTS: [&str; 2] = [
    r#"<html><script> top.location = "/";</script></html>"#,
    r#"<html><script> if(parent && parent.parent) parent.parent.location = "/";</script></html>"#,
];

/// Returns the session token embedded in a login response.
///
/// The desktop and mobile handlers answer with a small script that sets
/// the cookie; the token is the first run of sixteen word characters.
#[must_use]
pub fn extract_token(body: &str) -> Option<String> {
    TOKEN_RE.find(body).map(|m| m.as_str().to_string())
}

/// Explains why a desktop or mobile login response holds no token.
#[must_use]
pub fn classify_failure(body: &str, variant: UiVariant) -> LoginError {
    match variant {
        UiVariant::Legacy if body.contains(LEGACY_REJECTED) => LoginError::BadCredentials,
        UiVariant::Mobile if body.contains(MOBILE_REJECTED) => LoginError::BadCredentials,
        UiVariant::Mobile if MOBILE_ROOT_REDIRECTS.iter().any(|s| body.contains(s)) => {
            LoginError::VariantMismatch
        }
        _ => LoginError::NoToken,
    }
}

/// Shortens a token for logging.
pub(crate) fn token_hint(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    format!("{prefix}...")
}

/// Logs in and returns the session token.
///
/// # Errors
///
/// Returns [`Error::Protocol`] when the request fails and [`Error::Login`]
/// when the router does not hand out a token.
pub async fn login(
    http: &RouterHttp,
    variant: UiVariant,
    username: &str,
    password: &str,
) -> Result<String, Error> {
    let result = match variant {
        UiVariant::Legacy | UiVariant::Mobile => {
            let path = if variant == UiVariant::Legacy { LOGIN } else { M_LOGIN };
            let response = http
                .post_form(path, &[("username", username), ("passwd", password)], None)
                .await?;
            let body = response.body();

            match classify_failure(body, variant) {
                LoginError::NoToken => extract_token(body).ok_or_else(|| {
                    tracing::debug!(url = http.base_url(), body, "login response without token");
                    LoginError::NoToken
                }),
                reason => Err(reason),
            }
        }
        UiVariant::Beta => {
            let response = http
                .post_json(BETA_SERVICE, &beta::login_request(username, password), None)
                .await?;
            match response.session_cookie() {
                Some(token) => Ok(token.to_string()),
                None => beta::login_token(response.body()),
            }
        }
    };

    match &result {
        Ok(token) => tracing::debug!(
            url = http.base_url(),
            %variant,
            token = %token_hint(token),
            "login succeeded"
        ),
        Err(LoginError::BadCredentials) => tracing::error!(
            url = http.base_url(),
            %variant,
            "login rejected, check the router account"
        ),
        Err(reason) => tracing::warn!(url = http.base_url(), %variant, %reason, "login failed"),
    }

    result.map_err(Error::Login)
}

/// Ends the session on the router. Failures are logged and ignored.
pub async fn logout(http: &RouterHttp, variant: UiVariant, token: &str) {
    let result = match variant {
        UiVariant::Legacy => http.get(LOGOUT, Some(token)).await,
        UiVariant::Mobile => http.get(M_LOGOUT, Some(token)).await,
        UiVariant::Beta => {
            http.post_json(
                BETA_SERVICE,
                &beta::request(beta::LOGOUT_METHOD, serde_json::Value::Null),
                Some(token),
            )
            .await
        }
    };

    if let Err(e) = result {
        tracing::debug!(url = http.base_url(), %variant, error = %e, "logout request failed");
    }
}
