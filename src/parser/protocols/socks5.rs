//! SOCKS5 proxy links
//!
//! Format: socks5://[user:pass@]host[:port]#name

use anyhow::Result;
use tracing::trace;

use crate::parser::link_url::LinkUrl;
use crate::record::{ProxyLink, Socks5Record};
use crate::url_builder::UrlParts;

use super::{ProtocolParser, lenient};

const DEFAULT_PORT: u16 = 1080;

/// Parser for SOCKS5 (socks5://) links
pub struct Socks5Parser;

impl ProtocolParser for Socks5Parser {
    fn schemes(&self) -> &[&'static str] {
        &["socks5"]
    }

    fn parse(&self, link: &str) -> Result<ProxyLink> {
        try_parse(link).map(ProxyLink::Socks5)
    }
}

/// Parses a SOCKS5 link, reporting why it was rejected
pub fn try_parse(link: &str) -> Result<Socks5Record> {
    trace!("Parsing SOCKS5 link");
    let url = LinkUrl::parse_with_scheme(link, "SOCKS5", &["socks5"])?;

    Ok(Socks5Record {
        port: url.port.unwrap_or(DEFAULT_PORT),
        username: url.username.clone(),
        password: url.password_or_empty(),
        host: url.host,
        name: url.name,
    })
}

/// Parses a SOCKS5 link
pub fn parse(link: &str) -> Option<Socks5Record> {
    lenient("SOCKS5", try_parse(link))
}

/// Generates a SOCKS5 link; credentials only when both are set
pub fn generate(record: &Socks5Record) -> String {
    let mut parts = UrlParts::new("socks5", &record.host, record.port).fragment(&record.name);
    if !record.username.is_empty() && !record.password.is_empty() {
        parts = parts.userinfo(&record.username, &record.password);
    }
    parts.build()
}
