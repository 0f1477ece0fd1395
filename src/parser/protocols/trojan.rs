//! Trojan and Trojan-Go protocol links
//!
//! Format: trojan://password@host:port?sni=..&allowInsecure=1#name
//!         trojan-go://password@host:port?sni=..&type=ws&host=..&path=..&encryption=ss;cipher;pw#name

use anyhow::{Result, bail};
use tracing::trace;

use crate::parser::link_url::LinkUrl;
use crate::record::{ProxyLink, TrojanMethod, TrojanObfs, TrojanRecord};
use crate::url_builder::{QueryValue, UrlParts};

use super::{ProtocolParser, lenient};

// ============================================================================
// Trojan Parser
// ============================================================================

/// Parser for Trojan (trojan://) and Trojan-Go (trojan-go://) links
pub struct TrojanParser;

impl ProtocolParser for TrojanParser {
    fn schemes(&self) -> &[&'static str] {
        &["trojan", "trojan-go"]
    }

    fn parse(&self, link: &str) -> Result<ProxyLink> {
        try_parse(link).map(ProxyLink::Trojan)
    }
}

/// Parses a Trojan or Trojan-Go link, reporting why it was rejected
pub fn try_parse(link: &str) -> Result<TrojanRecord> {
    trace!("Parsing Trojan link");
    let url = LinkUrl::parse_with_scheme(link, "Trojan", &["trojan", "trojan-go"])?;

    if url.username.is_empty() {
        bail!("Trojan link missing password");
    }

    let mut record = TrojanRecord {
        password: url.username.clone(),
        server: url.host.clone(),
        port: url.port.unwrap_or(443),
        name: url.name.clone(),
        peer: url.param_any(&["sni", "peer"]).unwrap_or_default().to_string(),
        allow_insecure: url.flag("allowInsecure"),
        ..Default::default()
    };

    if url.scheme == "trojan-go" {
        apply_trojan_go(&mut record, &url);
    }

    Ok(record)
}

/// Reads the Trojan-Go transport and encryption parameters
fn apply_trojan_go(record: &mut TrojanRecord, url: &LinkUrl) {
    if url.param("type") == Some("ws") {
        record.obfs = TrojanObfs::Websocket;
        record.host = url.param_or("host", "");
        record.path = url.param_or("path", "/");
    }

    if let Some(encryption) = url.param("encryption")
        && let Some(("ss", rest)) = encryption.split_once(';')
        && let Some((cipher, password)) = rest.split_once(';')
    {
        record.method = TrojanMethod::Shadowsocks;
        record.ss_cipher = cipher.to_string();
        record.ss_password = password.to_string();
    } else {
        trace!("Trojan-Go link without shadowsocks encryption");
    }
}

/// Parses a Trojan or Trojan-Go link
pub fn parse(link: &str) -> Option<TrojanRecord> {
    lenient("Trojan", try_parse(link))
}

// ============================================================================
// Trojan Generator
// ============================================================================

/// Generates a Trojan link, switching to `trojan-go://` when the record uses
/// Trojan-Go transport or encryption
///
/// In Trojan-Go mode `allowInsecure` is not written.
pub fn generate(record: &TrojanRecord) -> String {
    let trojan_go = record.is_trojan_go();
    let scheme = if trojan_go { "trojan-go" } else { "trojan" };

    let mut parts = UrlParts::new(scheme, &record.server, record.port)
        .userinfo(&record.password, "")
        .param("sni", &record.peer)
        .fragment(&record.name);

    if !trojan_go {
        let insecure = if record.allow_insecure { QueryValue::Int(1) } else { QueryValue::Absent };
        return parts.param("allowInsecure", insecure).build();
    }

    let websocket = record.obfs == TrojanObfs::Websocket;
    parts = parts.param("type", if websocket { "ws" } else { "original" });
    if websocket {
        parts = parts
            .param("host", &record.host)
            .param("path", if record.path.is_empty() { "/" } else { record.path.as_str() });
    }
    if record.method == TrojanMethod::Shadowsocks {
        parts = parts.param(
            "encryption",
            format!("ss;{};{}", record.ss_cipher, record.ss_password),
        );
    }
    parts.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trojan_basic() {
        let record = parse("trojan://password123@example.com:443?sni=example.com#my-trojan").unwrap();
        assert_eq!(record.password, "password123");
        assert_eq!(record.server, "example.com");
        assert_eq!(record.port, 443);
        assert_eq!(record.name, "my-trojan");
        assert_eq!(record.peer, "example.com");
        assert_eq!(record.method, TrojanMethod::Origin);
        assert_eq!(record.obfs, TrojanObfs::None);
    }

    #[test]
    fn test_trojan_minimal_defaults() {
        let record = parse("trojan://pw@example.com").unwrap();
        assert_eq!(record.port, 443);
        assert_eq!(record.peer, "");
        assert!(!record.allow_insecure);
        assert_eq!(record.host, "");
        assert_eq!(record.path, "/");
        assert_eq!(record.ss_cipher, "aes-128-gcm");
        assert_eq!(record.ss_password, "");
        assert_eq!(record.name, "");
    }

    #[test]
    fn test_trojan_legacy_peer() {
        let record = parse("trojan://pw@example.com:443?peer=cdn.example.com&allowInsecure=1").unwrap();
        assert_eq!(record.peer, "cdn.example.com");
        assert!(record.allow_insecure);
    }

    #[test]
    fn test_trojan_allow_insecure_values() {
        assert!(parse("trojan://pw@example.com:443?allowInsecure=true").unwrap().allow_insecure);
        assert!(!parse("trojan://pw@example.com:443?allowInsecure=0").unwrap().allow_insecure);
    }

    #[test]
    fn test_trojan_ignores_trojan_go_params() {
        let record = parse("trojan://pw@example.com:443?type=ws&encryption=ss%3Baes-128-gcm%3Bx").unwrap();
        assert_eq!(record.obfs, TrojanObfs::None);
        assert_eq!(record.method, TrojanMethod::Origin);
    }

    #[test]
    fn test_trojan_encoded_password() {
        let record = parse("trojan://p%40ss%3Aword@example.com:443").unwrap();
        assert_eq!(record.password, "p@ss:word");
    }

    #[test]
    fn test_trojan_go_websocket_and_ss() {
        let record = parse(
            "trojan-go://pw@example.com:443?sni=a.com&type=ws&host=ws.example.com&path=%2Fgo&encryption=ss%3Baes-256-gcm%3Bss%3Bpass#go",
        )
        .unwrap();
        assert_eq!(record.obfs, TrojanObfs::Websocket);
        assert_eq!(record.host, "ws.example.com");
        assert_eq!(record.path, "/go");
        assert_eq!(record.method, TrojanMethod::Shadowsocks);
        assert_eq!(record.ss_cipher, "aes-256-gcm");
        assert_eq!(record.ss_password, "ss;pass");
        assert_eq!(record.peer, "a.com");
    }

    #[test]
    fn test_trojan_go_defaults() {
        let record = parse("trojan-go://pw@example.com:443?type=ws").unwrap();
        assert_eq!(record.obfs, TrojanObfs::Websocket);
        assert_eq!(record.path, "/");
        assert_eq!(record.method, TrojanMethod::Origin);

        let original = parse("trojan-go://pw@example.com:443?type=original").unwrap();
        assert_eq!(original.obfs, TrojanObfs::None);
    }

    #[test]
    fn test_trojan_invalid() {
        assert!(parse("trojan://example.com:443").is_none());
        assert!(parse("trojan://pw@:443").is_none());
        assert!(parse("trojan://pw@example.com:70000").is_none());
        assert!(parse("vless://pw@example.com:443").is_none());
    }

    #[test]
    fn test_trojan_generate() {
        let record = TrojanRecord {
            password: "password123".to_string(),
            server: "example.com".to_string(),
            port: 443,
            name: "my-trojan".to_string(),
            peer: "example.com".to_string(),
            allow_insecure: true,
            ..Default::default()
        };
        assert_eq!(
            generate(&record),
            "trojan://password123@example.com:443?sni=example.com&allowInsecure=1#my-trojan"
        );
        assert_eq!(parse(&generate(&record)).unwrap(), record);
    }

    #[test]
    fn test_trojan_go_generate_round_trip() {
        let record = TrojanRecord {
            password: "pw".to_string(),
            server: "example.com".to_string(),
            port: 8443,
            name: "go".to_string(),
            peer: "a.com".to_string(),
            obfs: TrojanObfs::Websocket,
            host: "ws.example.com".to_string(),
            path: "/go".to_string(),
            method: TrojanMethod::Shadowsocks,
            ss_cipher: "aes-256-gcm".to_string(),
            ss_password: "secret".to_string(),
            ..Default::default()
        };
        let link = generate(&record);
        assert!(link.starts_with("trojan-go://pw@example.com:8443?sni=a.com&type=ws"));
        assert_eq!(parse(&link).unwrap(), record);
    }

    #[test]
    fn test_trojan_go_generate_drops_allow_insecure() {
        // Trojan-Go output never carries allowInsecure, even when it is set
        let record = TrojanRecord {
            password: "pw".to_string(),
            server: "example.com".to_string(),
            allow_insecure: true,
            method: TrojanMethod::Shadowsocks,
            ss_password: "x".to_string(),
            ..Default::default()
        };
        let link = generate(&record);
        assert!(link.starts_with("trojan-go://"));
        assert!(link.contains("type=original"));
        assert!(!link.contains("allowInsecure"));
        assert!(!parse(&link).unwrap().allow_insecure);
    }
}
