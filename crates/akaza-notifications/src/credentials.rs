//! Credential resolution for stream requests

use std::fmt;

use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use cookie::Cookie;

/// Session cookie set by the web app after login
pub const AUTH_COOKIE_NAME: &str = "authToken";

/// Value forwarded when the request carries no credential at all.
/// Matches what the browser app has always sent upstream in that case.
const MISSING_TOKEN_PLACEHOLDER: &str = "Bearer undefined";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Header,
    Cookie,
    Missing,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Header => write!(f, "header"),
            CredentialSource::Cookie => write!(f, "cookie"),
            CredentialSource::Missing => write!(f, "missing"),
        }
    }
}

/// The `Authorization` value to send upstream, and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    value: HeaderValue,
    source: CredentialSource,
}

impl Credential {
    pub fn header_value(&self) -> &HeaderValue {
        &self.value
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn is_missing(&self) -> bool {
        self.source == CredentialSource::Missing
    }
}

/// Resolve the upstream credential for an inbound request.
///
/// A non-blank `Authorization` header wins and is forwarded byte-for-byte.
/// Otherwise the `authToken` cookie becomes `Bearer <token>`. With neither,
/// the result is `Bearer undefined` tagged as [`CredentialSource::Missing`].
pub fn resolve_credential(headers: &HeaderMap) -> Credential {
    let header = headers
        .get(AUTHORIZATION)
        .filter(|v| !v.as_bytes().iter().all(u8::is_ascii_whitespace));

    if let Some(value) = header {
        return Credential {
            value: value.clone(),
            source: CredentialSource::Header,
        };
    }

    if let Some(value) = auth_cookie(headers)
        .and_then(|token| HeaderValue::from_str(&format!("Bearer {}", token)).ok())
    {
        return Credential {
            value,
            source: CredentialSource::Cookie,
        };
    }

    Credential {
        value: HeaderValue::from_static(MISSING_TOKEN_PLACEHOLDER),
        source: CredentialSource::Missing,
    }
}

/// Percent-decoded `authToken` value with surrounding double quotes removed
fn auth_cookie(headers: &HeaderMap) -> Option<String> {
    // There can be several Cookie headers
    for cookie_header in headers.get_all(COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in Cookie::split_parse_encoded(cookie_str).filter_map(Result::ok) {
                if cookie.name() == AUTH_COOKIE_NAME {
                    return Some(cookie.value_trimmed().to_string())
                        .filter(|token| !token.is_empty());
                }
            }
        }
    }
    None
}
