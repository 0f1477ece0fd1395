//! HTTP/HTTPS proxy links
//!
//! Format: http[s]://[user:pass@]host[:port]#name

use std::str::FromStr;

use anyhow::{Result, anyhow};
use tracing::trace;

use crate::parser::link_url::LinkUrl;
use crate::record::{HttpRecord, HttpScheme, ProxyLink};
use crate::url_builder::UrlParts;

use super::{ProtocolParser, lenient};

/// Parser for HTTP (http://) and HTTPS (https://) proxy links
pub struct HttpParser;

impl ProtocolParser for HttpParser {
    fn schemes(&self) -> &[&'static str] {
        &["http", "https"]
    }

    fn parse(&self, link: &str) -> Result<ProxyLink> {
        try_parse(link).map(ProxyLink::Http)
    }
}

/// Parses an HTTP proxy link, reporting why it was rejected
pub fn try_parse(link: &str) -> Result<HttpRecord> {
    trace!("Parsing HTTP link");
    let url = LinkUrl::parse_with_scheme(link, "HTTP", &["http", "https"])?;

    let protocol = HttpScheme::from_str(&url.scheme).map_err(|e| anyhow!("{}", e))?;

    Ok(HttpRecord {
        protocol,
        port: url.port.unwrap_or_else(|| protocol.default_port()),
        username: url.username.clone(),
        password: url.password_or_empty(),
        host: url.host,
        name: url.name,
    })
}

/// Parses an HTTP proxy link
pub fn parse(link: &str) -> Option<HttpRecord> {
    lenient("HTTP", try_parse(link))
}

/// Generates an HTTP proxy link
///
/// Credentials are only written when both username and password are set.
pub fn generate(record: &HttpRecord) -> String {
    let mut parts = UrlParts::new(record.protocol.as_str(), &record.host, record.port)
        .fragment(&record.name);
    if !record.username.is_empty() && !record.password.is_empty() {
        parts = parts.userinfo(&record.username, &record.password);
    }
    parts.build()
}
