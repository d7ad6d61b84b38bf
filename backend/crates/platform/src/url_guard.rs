//! Outbound URL validation (SSRF guard)
//!
//! Landing pages, redirect targets and webhook callbacks are user supplied.
//! [`validate_url`] rejects anything that could make the platform fetch or
//! redirect into its own network.
//!
//! Host checks operate on the parsed host, so shorthand forms such as
//! `http://127.1` or `http://0x7f000001` are normalized before comparison.

use std::net::IpAddr;
use std::sync::LazyLock;

use ipnet::IpNet;
use thiserror::Error;
use url::{Host, Url};

/// Schemes that are never acceptable
pub const DANGEROUS_SCHEMES: &[&str] = &["file", "ftp", "gopher", "dict"];

/// Private, loopback, and link-local ranges that must never be targets.
static BLOCKED_RANGES: LazyLock<Vec<IpNet>> = LazyLock::new(|| {
    [
        "0.0.0.0/8",      // "this" network
        "127.0.0.0/8",    // IPv4 loopback
        "10.0.0.0/8",     // RFC-1918 private
        "172.16.0.0/12",  // RFC-1918 private
        "192.168.0.0/16", // RFC-1918 private
        "169.254.0.0/16", // link-local / cloud metadata
        "::/128",         // unspecified
        "::1/128",        // IPv6 loopback
        "fc00::/7",       // IPv6 unique-local
        "fe80::/10",      // IPv6 link-local
    ]
    .iter()
    .filter_map(|r| r.parse().ok())
    .collect()
});

/// Why a URL was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    #[error("URL could not be parsed")]
    Malformed,

    #[error("URL scheme `{0}` is not allowed")]
    DangerousScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("URL targets a private, loopback, or link-local host")]
    PrivateHost,

    #[error("URL host `{0}` is not in the allowed domains")]
    DomainNotAllowed(String),
}

/// Validate a URL against SSRF risks
///
/// Rules (in order):
/// 1. Must parse as an absolute URL.
/// 2. Scheme must not be one of [`DANGEROUS_SCHEMES`].
/// 3. Must have a host (`javascript:` and `data:` URLs have none).
/// 4. Host must not be a private/loopback/link-local address or `localhost`.
/// 5. When `allowed_domains` is non-empty, the host must equal one of them or
///    be a subdomain of one.
pub fn validate_url(url: &str, allowed_domains: &[String]) -> Result<(), UrlRejection> {
    let parsed = Url::parse(url.trim()).map_err(|_| UrlRejection::Malformed)?;

    let scheme = parsed.scheme();
    if DANGEROUS_SCHEMES.contains(&scheme) {
        return Err(UrlRejection::DangerousScheme(scheme.to_string()));
    }

    let host = parsed.host().ok_or(UrlRejection::MissingHost)?;

    let hostname = match host {
        Host::Ipv4(ip) => {
            if is_private_ip(IpAddr::V4(ip)) {
                return Err(UrlRejection::PrivateHost);
            }
            ip.to_string()
        }
        Host::Ipv6(ip) => {
            let blocked = is_private_ip(IpAddr::V6(ip))
                || ip
                    .to_ipv4_mapped()
                    .is_some_and(|v4| is_private_ip(IpAddr::V4(v4)));
            if blocked {
                return Err(UrlRejection::PrivateHost);
            }
            ip.to_string()
        }
        Host::Domain(domain) => {
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            if domain.is_empty() {
                return Err(UrlRejection::MissingHost);
            }
            if domain == "localhost" || domain.ends_with(".localhost") {
                return Err(UrlRejection::PrivateHost);
            }
            domain
        }
    };

    if !allowed_domains.is_empty() && !is_allowed_domain(&hostname, allowed_domains) {
        return Err(UrlRejection::DomainNotAllowed(hostname));
    }

    Ok(())
}

/// Boolean form of [`validate_url`]
pub fn is_safe_url(url: &str, allowed_domains: &[String]) -> bool {
    validate_url(url, allowed_domains).is_ok()
}

/// Whether an address falls into a blocked range
pub fn is_private_ip(ip: IpAddr) -> bool {
    BLOCKED_RANGES.iter().any(|net| net.contains(&ip))
}

fn is_allowed_domain(hostname: &str, allowed_domains: &[String]) -> bool {
    allowed_domains.iter().any(|allowed| {
        let allowed = allowed.trim().trim_start_matches('.').to_ascii_lowercase();
        !allowed.is_empty()
            && (hostname == allowed
                || hostname
                    .strip_suffix(allowed.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_accepts_public_https_url() {
        assert!(validate_url("https://exemplo-loja.com/black-friday", &[]).is_ok());
        assert!(is_safe_url("http://cursosdigitais.com/marketing?aff=user_2", &[]));
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(validate_url("not a url", &[]), Err(UrlRejection::Malformed));
        assert_eq!(validate_url("/relative/path", &[]), Err(UrlRejection::Malformed));
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        for url in [
            "file:///etc/passwd",
            "ftp://files.example.com/a",
            "gopher://example.com:70/_x",
            "dict://example.com:11211/stat",
        ] {
            assert!(
                matches!(validate_url(url, &[]), Err(UrlRejection::DangerousScheme(_))),
                "{url}"
            );
        }
    }

    #[test]
    fn test_rejects_hostless_urls() {
        assert_eq!(
            validate_url("javascript:alert(1)", &[]),
            Err(UrlRejection::MissingHost)
        );
        assert_eq!(
            validate_url("data:text/html,<script>x</script>", &[]),
            Err(UrlRejection::MissingHost)
        );
    }

    #[test]
    fn test_rejects_private_ipv4() {
        for url in [
            "http://127.0.0.1/admin",
            "http://10.1.2.3/",
            "http://172.16.0.1/",
            "http://172.31.255.255/",
            "http://192.168.1.1/",
            "http://169.254.169.254/latest/meta-data/",
            "http://0.0.0.0:8080/",
        ] {
            assert_eq!(validate_url(url, &[]), Err(UrlRejection::PrivateHost), "{url}");
        }
    }

    #[test]
    fn test_accepts_public_ipv4_outside_private_ranges() {
        assert!(validate_url("http://172.32.0.1/", &[]).is_ok());
        assert!(validate_url("http://8.8.8.8/", &[]).is_ok());
    }

    #[test]
    fn test_rejects_shorthand_loopback() {
        assert_eq!(validate_url("http://127.1/", &[]), Err(UrlRejection::PrivateHost));
        assert_eq!(
            validate_url("http://0x7f000001/", &[]),
            Err(UrlRejection::PrivateHost)
        );
    }

    #[test]
    fn test_rejects_ipv6_private() {
        assert_eq!(validate_url("http://[::1]/", &[]), Err(UrlRejection::PrivateHost));
        assert_eq!(validate_url("http://[fd00::1]/", &[]), Err(UrlRejection::PrivateHost));
        assert_eq!(validate_url("http://[fe80::1]/", &[]), Err(UrlRejection::PrivateHost));
        assert_eq!(
            validate_url("http://[::ffff:192.168.0.1]/", &[]),
            Err(UrlRejection::PrivateHost)
        );
    }

    #[test]
    fn test_rejects_localhost_names() {
        assert_eq!(
            validate_url("http://localhost:3000/", &[]),
            Err(UrlRejection::PrivateHost)
        );
        assert_eq!(
            validate_url("http://api.localhost/", &[]),
            Err(UrlRejection::PrivateHost)
        );
        assert_eq!(
            validate_url("http://LOCALHOST./", &[]),
            Err(UrlRejection::PrivateHost)
        );
    }

    #[test]
    fn test_allowlist_matches_domain_and_subdomains() {
        let allowed = domains(&["exemplo-loja.com"]);
        assert!(validate_url("https://exemplo-loja.com/x", &allowed).is_ok());
        assert!(validate_url("https://www.exemplo-loja.com/x", &allowed).is_ok());
        assert_eq!(
            validate_url("https://evilexemplo-loja.com/x", &allowed),
            Err(UrlRejection::DomainNotAllowed("evilexemplo-loja.com".to_string()))
        );
        assert!(matches!(
            validate_url("https://attacker.example.org/", &allowed),
            Err(UrlRejection::DomainNotAllowed(_))
        ));
    }

    #[test]
    fn test_private_check_runs_before_allowlist() {
        let allowed = domains(&["localhost"]);
        assert_eq!(
            validate_url("http://localhost/", &allowed),
            Err(UrlRejection::PrivateHost)
        );
    }
}
