//! Checkout handoff URL gating.
//!
//! The checkout URL comes from the commerce platform's response body, so it
//! is treated as untrusted input: navigation is only ever handed a URL that
//! uses TLS and points at an allow-listed host.

use url::Url;

/// Validate a checkout handoff URL against the allow-listed host patterns.
///
/// Returns the parsed URL only when the scheme is `https` and the host
/// matches one of the patterns (`*.example.com` matches subdomains of
/// `example.com`, anything else must match exactly).
pub fn validate_checkout_url(raw: &str, allowed_hosts: &[String]) -> Option<Url> {
    let url = Url::parse(raw).ok()?;

    if url.scheme() != "https" {
        return None;
    }

    let host = url.host_str()?.to_ascii_lowercase();
    allowed_hosts
        .iter()
        .any(|pattern| host_matches(&host, &pattern.to_ascii_lowercase()))
        .then_some(url)
}

fn host_matches(host: &str, pattern: &str) -> bool {
    match pattern.strip_prefix("*.") {
        Some(suffix) => host.ends_with(&format!(".{suffix}")),
        None => host == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_allows_https_on_wildcard_subdomain() {
        let allowed = hosts(&["*.myshopify.com"]);
        let url = validate_checkout_url("https://shop.myshopify.com/checkouts/abc123", &allowed);
        assert!(url.is_some());
    }

    #[test]
    fn test_allows_exact_host() {
        let allowed = hosts(&["checkout.shop.example.com"]);
        assert!(validate_checkout_url("https://checkout.shop.example.com/c/1", &allowed).is_some());
    }

    #[test]
    fn test_rejects_plain_http() {
        let allowed = hosts(&["*.myshopify.com"]);
        assert!(validate_checkout_url("http://shop.myshopify.com/checkouts/abc", &allowed).is_none());
    }

    #[test]
    fn test_rejects_unknown_host() {
        let allowed = hosts(&["*.myshopify.com"]);
        assert!(validate_checkout_url("https://evil.example.com/checkouts/abc", &allowed).is_none());
    }

    #[test]
    fn test_rejects_suffix_lookalike_host() {
        // "evilmyshopify.com" must not satisfy "*.myshopify.com"
        let allowed = hosts(&["*.myshopify.com"]);
        assert!(validate_checkout_url("https://evilmyshopify.com/checkouts/abc", &allowed).is_none());
    }

    #[test]
    fn test_wildcard_does_not_match_bare_apex() {
        let allowed = hosts(&["*.myshopify.com"]);
        assert!(validate_checkout_url("https://myshopify.com/checkouts/abc", &allowed).is_none());
    }

    #[test]
    fn test_rejects_garbage_and_other_schemes() {
        let allowed = hosts(&["*.myshopify.com"]);
        assert!(validate_checkout_url("not a url", &allowed).is_none());
        assert!(validate_checkout_url("javascript:alert(1)", &allowed).is_none());
        assert!(validate_checkout_url("ftp://shop.myshopify.com/x", &allowed).is_none());
    }

    #[test]
    fn test_host_comparison_is_case_insensitive() {
        let allowed = hosts(&["*.MyShopify.com"]);
        assert!(validate_checkout_url("https://Shop.myshopify.com/checkouts/a", &allowed).is_some());
    }
}
