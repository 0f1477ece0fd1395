//! Hysteria2 and AnyTLS protocol links
//!
//! Format: hysteria2://auth@host:port?obfs=salamander&obfs-password=..&sni=..&insecure=1&pinSHA256=..#name
//!         hy2://auth@host:port?...#name
//!         anytls://password@host:port?sni=..&insecure=1#name

use anyhow::Result;
use tracing::trace;

use crate::parser::link_url::LinkUrl;
use crate::record::{Hysteria2Flavor, Hysteria2Record, ProxyLink};
use crate::url_builder::{QueryValue, UrlParts};

use super::{ProtocolParser, lenient};

const SCHEMES: &[&str] = &["hysteria2", "hy2", "anytls"];

/// Parser for Hysteria2 (hysteria2:// or hy2://) and AnyTLS (anytls://) links
pub struct Hysteria2Parser;

impl ProtocolParser for Hysteria2Parser {
    fn schemes(&self) -> &[&'static str] {
        SCHEMES
    }

    fn parse(&self, link: &str) -> Result<ProxyLink> {
        try_parse(link).map(ProxyLink::Hysteria2)
    }
}

/// Parses a Hysteria2 or AnyTLS link, reporting why it was rejected
pub fn try_parse(link: &str) -> Result<Hysteria2Record> {
    let url = LinkUrl::parse_with_scheme(link, "Hysteria2", SCHEMES)?;
    trace!("Parsing Hysteria2 link (scheme: {})", url.scheme);

    let protocol = if url.scheme == "anytls" {
        Hysteria2Flavor::AnyTls
    } else {
        Hysteria2Flavor::Hysteria2
    };

    // The auth token is opaque; an unescaped ':' splits it into user and password
    let auth = match &url.password {
        Some(password) => format!("{}:{}", url.username, password),
        None => url.username.clone(),
    };

    Ok(Hysteria2Record {
        protocol,
        auth,
        port: url.port.unwrap_or(443),
        obfs: url.param_or("obfs", ""),
        obfs_password: url
            .param_any(&["obfs-password", "obfsPassword"])
            .unwrap_or_default()
            .to_string(),
        sni: url.param_or("sni", ""),
        allow_insecure: url.flag("insecure"),
        pin_sha256: url.param_or("pinSHA256", ""),
        server: url.host,
        name: url.name,
    })
}

/// Parses a Hysteria2 or AnyTLS link
pub fn parse(link: &str) -> Option<Hysteria2Record> {
    lenient("Hysteria2", try_parse(link))
}

/// Generates a Hysteria2 or AnyTLS link
///
/// The auth token is percent-encoded as a whole and query parameters are only
/// written when set.
pub fn generate(record: &Hysteria2Record) -> String {
    let insecure = if record.allow_insecure {
        QueryValue::Int(1)
    } else {
        QueryValue::Absent
    };

    let mut parts = UrlParts::new(record.protocol.as_str(), &record.server, record.port)
        .userinfo(&record.auth, "");
    if record.protocol == Hysteria2Flavor::Hysteria2 {
        parts = parts
            .param("obfs", &record.obfs)
            .param("obfs-password", &record.obfs_password);
    }
    parts
        .param("sni", &record.sni)
        .param("insecure", insecure)
        .param("pinSHA256", &record.pin_sha256)
        .fragment(&record.name)
        .build()
}
