//! Caller metadata captured alongside each exchange.

use std::net::SocketAddr;

use reqwest::header::{HeaderMap, USER_AGENT};

pub const X_REAL_IP: &str = "x-real-ip";
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Who the exchange is attributed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub ip_address: String,
    pub user_agent: Option<String>,
}

impl CallerContext {
    /// Build a context from a request's headers and, when there is one, the
    /// transport-level peer.
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        Self {
            ip_address: resolve_client_ip(headers, peer),
            user_agent: header_value(headers, USER_AGENT.as_str()),
        }
    }
}

/// First non-empty of `X-Real-IP`, `X-Forwarded-For`, then the peer address.
/// Returns an empty string when none is available.
pub fn resolve_client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    header_value(headers, X_REAL_IP)
        .or_else(|| header_value(headers, X_FORWARDED_FOR))
        .or_else(|| peer.map(|addr| addr.to_string()))
        .unwrap_or_default()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some(SocketAddr::from(([10, 1, 2, 3], 40000)))
    }

    #[test]
    fn test_real_ip_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("203.0.113.7"));
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("198.51.100.1"));
        assert_eq!(resolve_client_ip(&headers, peer()), "203.0.113.7");
    }

    #[test]
    fn test_forwarded_for_beats_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("198.51.100.1, 10.0.0.1"));
        assert_eq!(resolve_client_ip(&headers, peer()), "198.51.100.1, 10.0.0.1");
    }

    #[test]
    fn test_empty_header_falls_through() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static(""));
        assert_eq!(resolve_client_ip(&headers, peer()), "10.1.2.3:40000");
    }

    #[test]
    fn test_opaque_header_bytes_keep_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_bytes(b"203.0.113.7\xff").unwrap());
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("198.51.100.1"));
        assert_eq!(resolve_client_ip(&headers, peer()), "203.0.113.7\u{fffd}");
    }

    #[test]
    fn test_no_source_is_empty() {
        assert_eq!(resolve_client_ip(&HeaderMap::new(), None), "");
    }

    #[test]
    fn test_context_picks_up_user_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.5.0"));
        let ctx = CallerContext::from_headers(&headers, peer());
        assert_eq!(ctx.user_agent.as_deref(), Some("curl/8.5.0"));
        assert_eq!(ctx.ip_address, "10.1.2.3:40000");
    }
}
