//! Protocol link codecs
//!
//! One module per protocol family, each holding the parser and the generator
//! for that family side by side. Every parser implements [`ProtocolParser`] so
//! the [`ProtocolRegistry`] can route a raw link to it by scheme.

pub mod http;
pub mod hysteria2;
pub mod juicity;
pub mod shadowsocks;
pub mod shadowsocksr;
pub mod socks5;
pub mod trojan;
pub mod tuic;
mod v2ray;
pub mod vless;
pub mod vmess;

pub use http::HttpParser;
pub use hysteria2::Hysteria2Parser;
pub use juicity::JuicityParser;
pub use shadowsocks::ShadowsocksParser;
pub use shadowsocksr::ShadowsocksRParser;
pub use socks5::Socks5Parser;
pub use trojan::TrojanParser;
pub use tuic::TuicParser;
pub use v2ray::V2rayParser;
pub use vmess::{VmessProbe, vmess_probe_order};

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use anyhow::{Result, anyhow};
use tracing::debug;

use crate::record::ProxyLink;

/// Link prefixes recognised by the built-in parsers, in dispatch order
pub const SHARE_LINK_PREFIXES: &[&str] = &[
    "http://",
    "https://",
    "socks5://",
    "ss://",
    "ssr://",
    "trojan://",
    "trojan-go://",
    "tuic://",
    "juicity://",
    "hysteria2://",
    "hy2://",
    "anytls://",
    "vmess://",
    "vless://",
];

// ============================================================================
// Protocol Parser Trait
// ============================================================================

/// Trait for parsing the links of one protocol family
pub trait ProtocolParser: Send + Sync {
    /// Schemes this parser handles, without `://` (e.g. `["trojan", "trojan-go"]`)
    fn schemes(&self) -> &[&'static str];

    /// Parses a link into a tagged record
    fn parse(&self, link: &str) -> Result<ProxyLink>;

    /// Checks if this parser can handle the given link
    fn can_parse(&self, link: &str) -> bool {
        self.schemes().iter().any(|scheme| {
            link.strip_prefix(scheme)
                .is_some_and(|rest| rest.starts_with("://"))
        })
    }
}

// ============================================================================
// Protocol Registry
// ============================================================================

static BUILTIN: LazyLock<ProtocolRegistry> = LazyLock::new(ProtocolRegistry::with_builtin_parsers);

/// Ordered set of protocol parsers; the first parser accepting a prefix wins
#[derive(Default)]
pub struct ProtocolRegistry {
    parsers: Vec<Arc<dyn ProtocolParser>>,
    by_scheme: HashMap<&'static str, usize>,
}

impl ProtocolRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with all built-in parsers registered
    pub fn with_builtin_parsers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(HttpParser));
        registry.register(Arc::new(Socks5Parser));
        registry.register(Arc::new(ShadowsocksParser));
        registry.register(Arc::new(ShadowsocksRParser));
        registry.register(Arc::new(TrojanParser));
        registry.register(Arc::new(TuicParser));
        registry.register(Arc::new(JuicityParser));
        registry.register(Arc::new(Hysteria2Parser));
        registry.register(Arc::new(V2rayParser));
        registry
    }

    /// Shared registry holding the built-in parsers
    pub fn builtin() -> &'static ProtocolRegistry {
        &BUILTIN
    }

    /// Registers a protocol parser after the existing ones
    pub fn register(&mut self, parser: Arc<dyn ProtocolParser>) {
        let index = self.parsers.len();
        for scheme in parser.schemes() {
            self.by_scheme.insert(*scheme, index);
        }
        self.parsers.push(parser);
    }

    /// Gets the parser registered for the given scheme
    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn ProtocolParser>> {
        self.by_scheme.get(scheme).map(|&i| &self.parsers[i])
    }

    /// Finds the first parser whose prefix matches the link
    pub fn find(&self, link: &str) -> Option<&Arc<dyn ProtocolParser>> {
        self.parsers.iter().find(|p| p.can_parse(link))
    }

    /// Parses a link, reporting why it was rejected
    pub fn try_dispatch(&self, link: &str) -> Result<ProxyLink> {
        let link = link.trim();
        let parser = self.find(link).ok_or_else(|| {
            anyhow!(
                "No parser registered for link scheme: {}",
                extract_scheme(link).unwrap_or("<none>")
            )
        })?;
        parser.parse(link)
    }

    /// Parses a link, returning `None` for unknown schemes and malformed links alike
    pub fn dispatch(&self, link: &str) -> Option<ProxyLink> {
        match self.try_dispatch(link) {
            Ok(parsed) => {
                debug!(
                    "Parsed {} link -> '{}'",
                    parsed.kind(),
                    parsed.name()
                );
                Some(parsed)
            }
            Err(e) => {
                debug!("Rejected link: {:#}", e);
                None
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Converts a parse result into the `Option` contract, logging the cause
pub(crate) fn lenient<T>(label: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(record) => Some(record),
        Err(e) => {
            debug!("Failed to parse {} link: {:#}", label, e);
            None
        }
    }
}

/// Parses host:port string, handling IPv6 addresses in brackets
///
/// Without brackets the port is taken after the last `:`, so colon-bearing
/// hosts survive.
pub fn parse_host_port(hostport: &str) -> Result<(String, u16)> {
    if hostport.starts_with('[') {
        let bracket_end = hostport
            .find(']')
            .ok_or_else(|| anyhow!("Invalid IPv6 address: missing closing bracket"))?;

        let host = hostport[1..bracket_end].to_string();
        let port_str = hostport
            .get(bracket_end + 1..)
            .and_then(|rest| rest.strip_prefix(':'))
            .ok_or_else(|| anyhow!("Missing port after IPv6 address"))?;

        let port: u16 = port_str
            .parse()
            .map_err(|_| anyhow!("Invalid port number: {}", port_str))?;
        return Ok((host, port));
    }

    let colon_pos = hostport
        .rfind(':')
        .ok_or_else(|| anyhow!("Invalid host:port format: missing colon"))?;

    let host = hostport[..colon_pos].to_string();
    if host.is_empty() {
        anyhow::bail!("Invalid host:port format: empty host");
    }
    let port_str = &hostport[colon_pos + 1..];
    let port: u16 = port_str
        .parse()
        .map_err(|_| anyhow!("Invalid port number: {}", port_str))?;

    Ok((host, port))
}

/// Extracts the scheme from a link
pub fn extract_scheme(link: &str) -> Result<&str> {
    let (scheme, _) = link
        .split_once("://")
        .ok_or_else(|| anyhow!("Invalid link: missing scheme separator ://"))?;
    if scheme.is_empty() {
        anyhow::bail!("Invalid link: missing scheme");
    }
    Ok(scheme)
}

/// Splits `body#fragment` at the first `#`, percent-decoding the fragment
pub(crate) fn split_fragment(body: &str) -> (&str, String) {
    match body.find('#') {
        Some(pos) => (
            &body[..pos],
            super::link_url::decode_component(&body[pos + 1..]),
        ),
        None => (body, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ProtocolKind;

    #[test]
    fn test_protocol_registry_new() {
        let registry = ProtocolRegistry::new();
        assert!(registry.parsers.is_empty());
        assert!(registry.dispatch("socks5://example.com:1080").is_none());
    }

    #[test]
    fn test_protocol_registry_with_builtin_parsers() {
        let registry = ProtocolRegistry::with_builtin_parsers();
        for scheme in [
            "http", "https", "socks5", "ss", "ssr", "trojan", "trojan-go", "tuic", "juicity",
            "hysteria2", "hy2", "anytls", "vmess", "vless",
        ] {
            assert!(registry.get(scheme).is_some(), "missing parser for {}", scheme);
        }
    }

    #[test]
    fn test_prefixes_match_registry() {
        let registry = ProtocolRegistry::builtin();
        for prefix in SHARE_LINK_PREFIXES {
            let link = format!("{}x", prefix);
            assert!(registry.find(&link).is_some(), "no parser for {}", prefix);
        }
    }

    #[test]
    fn test_can_parse_requires_separator() {
        assert!(ShadowsocksParser.can_parse("ss://abc"));
        assert!(!ShadowsocksParser.can_parse("ssr://abc"));
        assert!(ShadowsocksRParser.can_parse("ssr://abc"));
        assert!(TrojanParser.can_parse("trojan-go://abc"));
        assert!(!TrojanParser.can_parse("trojanx://abc"));
    }

    #[test]
    fn test_dispatch_unknown_scheme() {
        let registry = ProtocolRegistry::builtin();
        assert!(registry.dispatch("unknown://x").is_none());
        assert!(registry.dispatch("").is_none());
        let err = registry.try_dispatch("unknown://x").unwrap_err();
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_dispatch_trims_whitespace() {
        let registry = ProtocolRegistry::builtin();
        let parsed = registry.dispatch("  socks5://example.com:1080#a \n").unwrap();
        assert_eq!(parsed.kind(), ProtocolKind::Socks5);
    }

    #[test]
    fn test_dispatch_malformed_is_none() {
        let registry = ProtocolRegistry::builtin();
        assert!(registry.dispatch("ss://%%%").is_none());
        assert!(registry.try_dispatch("ss://%%%").is_err());
    }

    #[test]
    fn test_extract_scheme() {
        assert_eq!(extract_scheme("ss://abc").unwrap(), "ss");
        assert_eq!(extract_scheme("trojan-go://x").unwrap(), "trojan-go");
        assert!(extract_scheme("not-a-link").is_err());
        assert!(extract_scheme("://missing").is_err());
    }

    #[test]
    fn test_parse_host_port_ipv4() {
        let (host, port) = parse_host_port("example.com:8080").unwrap();
        assert_eq!(host, "example.com");
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_host_port_ipv6() {
        let (host, port) = parse_host_port("[2001:db8::1]:443").unwrap();
        assert_eq!(host, "2001:db8::1");
        assert_eq!(port, 443);
    }

    #[test]
    fn test_parse_host_port_last_colon() {
        let (host, port) = parse_host_port("fe80::1:8388").unwrap();
        assert_eq!(host, "fe80::1");
        assert_eq!(port, 8388);
    }

    #[test]
    fn test_parse_host_port_invalid() {
        assert!(parse_host_port("example.com").is_err());
        assert!(parse_host_port("example.com:invalid").is_err());
        assert!(parse_host_port("example.com:65536").is_err());
        assert!(parse_host_port("[::1:8080").is_err());
        assert!(parse_host_port(":8080").is_err());
    }

    #[test]
    fn test_split_fragment() {
        assert_eq!(split_fragment("abc#my%20node"), ("abc", "my node".to_string()));
        assert_eq!(split_fragment("abc"), ("abc", String::new()));
        assert_eq!(split_fragment("abc#a#b"), ("abc", "a#b".to_string()));
    }
}
