//! ShadowsocksR protocol links
//!
//! Format: ssr://BASE64(server:port:proto:method:obfs:BASE64(password)/?obfsparam=..&protoparam=..&remarks=..)
//! Every query value is itself Base64.

use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use tracing::trace;

use crate::parser::base64::{decode_base64_str, encode_base64_url};
use crate::record::{ProxyLink, ShadowsocksRRecord, SsrCipher, SsrObfs, SsrProtocol};

use super::{ProtocolParser, lenient};

/// Parser for ShadowsocksR (ssr://) links
pub struct ShadowsocksRParser;

impl ProtocolParser for ShadowsocksRParser {
    fn schemes(&self) -> &[&'static str] {
        &["ssr"]
    }

    fn parse(&self, link: &str) -> Result<ProxyLink> {
        try_parse(link).map(ProxyLink::ShadowsocksR)
    }
}

/// Parses a ShadowsocksR link, reporting why it was rejected
pub fn try_parse(link: &str) -> Result<ShadowsocksRRecord> {
    trace!("Parsing ShadowsocksR link");
    let encoded = link
        .trim()
        .strip_prefix("ssr://")
        .ok_or_else(|| anyhow!("Invalid ShadowsocksR link: missing ssr:// prefix"))?;

    let decoded = decode_base64_str(encoded).context("Failed to decode ShadowsocksR link")?;

    let (main_part, query) = match decoded.split_once("/?") {
        Some((main, query)) => (main, query),
        None => (decoded.as_str(), ""),
    };

    // The server may itself contain ':', so count fields from the end
    let fields: Vec<&str> = main_part.split(':').collect();
    if fields.len() < 6 {
        bail!(
            "Invalid ShadowsocksR link: expected 6 colon-separated fields, got {}",
            fields.len()
        );
    }
    let (server_fields, tail) = fields.split_at(fields.len() - 5);
    let server = server_fields.join(":");
    if server.is_empty() {
        bail!("Invalid ShadowsocksR link: empty server");
    }

    let port: u16 = tail[0]
        .parse()
        .map_err(|_| anyhow!("Invalid ShadowsocksR port: {}", tail[0]))?;
    let proto = SsrProtocol::from_str(tail[1]).map_err(|e| anyhow!("{}", e))?;
    let method = SsrCipher::from_str(tail[2]).map_err(|e| anyhow!("{}", e))?;
    let obfs = SsrObfs::from_str(tail[3]).map_err(|e| anyhow!("{}", e))?;
    let password =
        decode_base64_str(tail[4]).context("Failed to decode ShadowsocksR password")?;

    let mut record = ShadowsocksRRecord {
        server,
        port,
        proto,
        method,
        obfs,
        password,
        ..Default::default()
    };

    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let target = match key {
            "remarks" => &mut record.name,
            "protoparam" => &mut record.proto_param,
            "obfsparam" => &mut record.obfs_param,
            _ => continue,
        };
        *target = decode_base64_str(value)
            .with_context(|| format!("Failed to decode ShadowsocksR {}", key))?;
    }

    Ok(record)
}

/// Parses a ShadowsocksR link
pub fn parse(link: &str) -> Option<ShadowsocksRRecord> {
    lenient("ShadowsocksR", try_parse(link))
}

/// Generates a ShadowsocksR link
pub fn generate(record: &ShadowsocksRRecord) -> String {
    let body = format!(
        "{}:{}:{}:{}:{}:{}/?remarks={}&protoparam={}&obfsparam={}",
        record.server,
        record.port,
        record.proto,
        record.method,
        record.obfs,
        encode_base64_url(&record.password),
        encode_base64_url(&record.name),
        encode_base64_url(&record.proto_param),
        encode_base64_url(&record.obfs_param),
    );
    format!("ssr://{}", encode_base64_url(&body))
}
