//! VLESS protocol links
//!
//! Format: vless://uuid@host:port?type=..&security=..&flow=..#name
//!
//! Encryption is always `none`, and `allowInsecure` is never taken from the
//! link: a share link must not be able to switch off certificate checks.

use anyhow::Result;

use crate::record::{V2rayProtocol, V2rayRecord};

use super::lenient;
use super::v2ray::{generate_url_grammar, parse_url_grammar};

/// Parses a VLESS link, reporting why it was rejected
pub fn try_parse(link: &str) -> Result<V2rayRecord> {
    parse_url_grammar(link, V2rayProtocol::Vless)
}

/// Parses a VLESS link
pub fn parse(link: &str) -> Option<V2rayRecord> {
    lenient("VLESS", try_parse(link))
}

/// Generates a VLESS link
pub fn generate(record: &V2rayRecord) -> String {
    generate_url_grammar(record, V2rayProtocol::Vless)
}
