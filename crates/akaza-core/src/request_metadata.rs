use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;

const UNKNOWN_ADDR: &str = "unknown";

/// Best-effort address of the client that made the request.
///
/// Resolution order: first hop of `X-Forwarded-For`, then `X-Real-IP`, then
/// the peer address recorded by `into_make_service_with_connect_info`.
/// Never rejects; falls back to `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl ClientAddr {
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        forwarded
            .or_else(real_ip)
            .map(|ip| ClientAddr(ip.to_string()))
    }

    pub fn unknown() -> Self {
        ClientAddr(UNKNOWN_ADDR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S> FromRequestParts<S> for ClientAddr
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(addr) = Self::from_headers(&parts.headers) {
            return Ok(addr);
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| ClientAddr(addr.ip().to_string()));

        Ok(peer.unwrap_or_else(Self::unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    async fn extract(request: Request<Body>) -> ClientAddr {
        let (mut parts, _) = request.into_parts();
        ClientAddr::from_request_parts(&mut parts, &())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_prefers_first_forwarded_hop() {
        let request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract(request).await.as_str(), "203.0.113.7");
    }

    #[tokio::test]
    async fn test_falls_back_to_real_ip() {
        let request = Request::builder()
            .header("x-real-ip", "198.51.100.2")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract(request).await.as_str(), "198.51.100.2");
    }

    #[tokio::test]
    async fn test_uses_connect_info_peer() {
        let mut request = Request::builder().body(Body::empty()).unwrap();
        let peer: SocketAddr = "192.0.2.10:54321".parse().unwrap();
        request.extensions_mut().insert(ConnectInfo(peer));

        assert_eq!(extract(request).await.as_str(), "192.0.2.10");
    }

    #[tokio::test]
    async fn test_unknown_without_any_source() {
        let request = Request::builder().body(Body::empty()).unwrap();

        assert_eq!(extract(request).await, ClientAddr::unknown());
    }
}
