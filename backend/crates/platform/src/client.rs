//! Client identification utilities
//!
//! Resolves the address a request originated from when the API sits behind
//! a reverse proxy.

use axum::http::HeaderMap;
use std::net::IpAddr;

/// Value used when no source address can be determined
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Headers consulted, in order of preference
const FORWARDING_HEADERS: &[&str] = &["x-forwarded-for", "x-real-ip", "remote-addr"];

/// Extract the client address as reported by headers or the socket
///
/// Preference order:
/// 1. first entry of `X-Forwarded-For`
/// 2. `X-Real-IP`
/// 3. `Remote-Addr`
/// 4. the direct connection address
/// 5. [`UNKNOWN_CLIENT`]
///
/// Header values are trimmed but not parsed, so proxies that forward
/// hostnames or `ip:port` pairs are reported as sent.
pub fn client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> String {
    FORWARDING_HEADERS
        .iter()
        .filter_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        .map(|value| value.split(',').next().unwrap_or_default().trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .or_else(|| direct_ip.map(|ip| ip.to_string()))
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_forwarded_for_first_entry_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(" 203.0.113.7 , 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));

        assert_eq!(client_ip(&headers, None), "203.0.113.7");
    }

    #[test]
    fn test_falls_back_to_real_ip_then_remote_addr() {
        let mut headers = HeaderMap::new();
        headers.insert("remote-addr", HeaderValue::from_static("192.0.2.9"));
        assert_eq!(client_ip(&headers, None), "192.0.2.9");

        headers.insert("x-real-ip", HeaderValue::from_static(" 198.51.100.2 "));
        assert_eq!(client_ip(&headers, None), "198.51.100.2");
    }

    #[test]
    fn test_empty_header_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static(""));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(client_ip(&headers, None), "198.51.100.2");
    }

    #[test]
    fn test_direct_address_then_unknown() {
        let headers = HeaderMap::new();
        let direct: IpAddr = "127.0.0.1".parse().unwrap();
        assert_eq!(client_ip(&headers, Some(direct)), "127.0.0.1");
        assert_eq!(client_ip(&headers, None), UNKNOWN_CLIENT);
    }
}
