//! Shadowsocks protocol links
//!
//! Supports both SIP002 and the legacy format, plus SIP003 plugins:
//! - SIP002: ss://BASE64(method:password)@host:port[/][?plugin=...]#name
//! - SIP002 with plain userinfo: ss://method:password@host:port#name
//! - Legacy: ss://BASE64(method:password@host:port)#name

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use tracing::{trace, warn};

use crate::parser::base64::{decode_base64_str, encode_base64};
use crate::parser::link_url::decode_component;
use crate::record::{ObfsMode, ProxyLink, ShadowsocksCipher, ShadowsocksPlugin, ShadowsocksRecord};
use crate::url_builder::{encode_component, uri_host};

use super::{ProtocolParser, lenient, parse_host_port, split_fragment};

// ============================================================================
// Shadowsocks Parser
// ============================================================================

/// Parser for Shadowsocks (ss://) links
pub struct ShadowsocksParser;

impl ProtocolParser for ShadowsocksParser {
    fn schemes(&self) -> &[&'static str] {
        &["ss"]
    }

    fn parse(&self, link: &str) -> Result<ProxyLink> {
        try_parse(link).map(ProxyLink::Shadowsocks)
    }
}

/// Parses a Shadowsocks link, reporting why it was rejected
pub fn try_parse(link: &str) -> Result<ShadowsocksRecord> {
    trace!("Parsing Shadowsocks link");
    let body = link
        .trim()
        .strip_prefix("ss://")
        .ok_or_else(|| anyhow!("Invalid Shadowsocks link: missing ss:// prefix"))?;

    let (main_part, name) = split_fragment(body);

    // Userinfo is Base64 and never contains '@', so the last one separates it
    if let Some(at_pos) = main_part.rfind('@') {
        trace!("Parsing as SIP002 format (found @ separator)");
        return parse_sip002(&main_part[..at_pos], &main_part[at_pos + 1..], name);
    }

    trace!("Parsing as legacy Base64 format");
    parse_legacy(main_part, name)
}

/// Parses a Shadowsocks link
pub fn parse(link: &str) -> Option<ShadowsocksRecord> {
    lenient("Shadowsocks", try_parse(link))
}

/// Parses `userinfo@host:port[/][?query]`
fn parse_sip002(userinfo: &str, rest: &str, name: String) -> Result<ShadowsocksRecord> {
    let (hostport_raw, query) = match rest.split_once('?') {
        Some((hostport, query)) => (hostport, Some(query)),
        None => (rest, None),
    };
    let (server, port) = parse_host_port(hostport_raw.trim_end_matches('/'))?;
    let (method, password) = parse_userinfo(userinfo)?;

    let mut record = ShadowsocksRecord {
        method,
        password,
        server,
        port,
        name,
        ..Default::default()
    };

    if let Some(plugin) = query.and_then(plugin_param) {
        apply_plugin(&mut record, &plugin)?;
    }

    Ok(record)
}

/// Parses legacy format: BASE64(method:password@host:port)
fn parse_legacy(main_part: &str, name: String) -> Result<ShadowsocksRecord> {
    let decoded = decode_base64_str(main_part.trim_end_matches('/'))
        .context("Failed to decode legacy Shadowsocks link")?;

    let at_pos = decoded
        .rfind('@')
        .ok_or_else(|| anyhow!("Invalid legacy Shadowsocks format: missing @"))?;

    let (server, port) = parse_host_port(&decoded[at_pos + 1..])?;
    let (method, password) = split_method_password(&decoded[..at_pos])?;

    Ok(ShadowsocksRecord {
        method,
        password,
        server,
        port,
        name,
        ..Default::default()
    })
}

/// Decodes userinfo: Base64(method:password), possibly percent-encoded, or plain method:password
fn parse_userinfo(userinfo: &str) -> Result<(ShadowsocksCipher, String)> {
    let unescaped = decode_component(userinfo);

    for candidate in [userinfo, unescaped.as_str()] {
        if let Ok(decoded) = decode_base64_str(candidate)
            && decoded.contains(':')
        {
            return split_method_password(&decoded);
        }
    }

    trace!("Shadowsocks userinfo is not Base64, reading it as method:password");
    split_method_password(&unescaped)
}

fn split_method_password(userinfo: &str) -> Result<(ShadowsocksCipher, String)> {
    let (method, password) = userinfo
        .split_once(':')
        .ok_or_else(|| anyhow!("Invalid Shadowsocks userinfo: missing method:password separator"))?;
    let method = ShadowsocksCipher::from_str(method).map_err(|e| anyhow!("{}", e))?;
    Ok((method, password.to_string()))
}

/// Extracts the decoded `plugin` value from a query string
fn plugin_param(query: &str) -> Option<String> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("plugin="))
        .map(|raw| decode_component(&raw.replace('+', " ")))
        .filter(|value| !value.is_empty())
}

/// Applies a SIP003 plugin value (`name;opt=val;flag;...`) to the record
fn apply_plugin(record: &mut ShadowsocksRecord, value: &str) -> Result<()> {
    let mut fields = value.split(';').map(str::trim);
    let plugin_name = fields.next().unwrap_or_default();

    record.plugin = match plugin_name {
        "simple-obfs" | "obfs-local" => ShadowsocksPlugin::SimpleObfs,
        "v2ray-plugin" => ShadowsocksPlugin::V2rayPlugin,
        other => {
            warn!(
                plugin = other,
                "Unsupported SIP003 plugin; only 'simple-obfs' and 'v2ray-plugin' are kept"
            );
            return Ok(());
        }
    };

    for field in fields.filter(|f| !f.is_empty()) {
        let (key, val) = field.split_once('=').unwrap_or((field, ""));
        match (record.plugin, key) {
            (ShadowsocksPlugin::V2rayPlugin, "tls") => record.tls = "tls".to_string(),
            (ShadowsocksPlugin::V2rayPlugin, "mode") if !val.is_empty() => {
                record.mode = val.to_string()
            }
            (ShadowsocksPlugin::V2rayPlugin, "host") => record.host = val.to_string(),
            (ShadowsocksPlugin::V2rayPlugin, "path") => record.path = val.to_string(),
            (ShadowsocksPlugin::SimpleObfs, "obfs") if !val.is_empty() => {
                record.obfs = ObfsMode::from_str(val).map_err(|e| anyhow!("{}", e))?
            }
            (ShadowsocksPlugin::SimpleObfs, "obfs-host") => record.host = val.to_string(),
            (ShadowsocksPlugin::SimpleObfs, "obfs-path") => record.path = val.to_string(),
            (_, "impl") => record.impl_ = val.to_string(),
            _ => trace!("Ignoring Shadowsocks plugin option '{}'", field),
        }
    }

    Ok(())
}

// ============================================================================
// Shadowsocks Generator
// ============================================================================

/// Generates a SIP002 link with Base64 userinfo
pub fn generate(record: &ShadowsocksRecord) -> String {
    let userinfo = encode_base64(&format!("{}:{}", record.method, record.password));
    let mut link = format!(
        "ss://{}@{}:{}",
        userinfo,
        uri_host(&record.server),
        record.port
    );

    if let Some(plugin) = plugin_value(record) {
        link.push_str("/?plugin=");
        link.push_str(&encode_component(&plugin));
    }

    if !record.name.is_empty() {
        link.push('#');
        link.push_str(&encode_component(&record.name));
    }

    link
}

/// Builds the SIP003 plugin value, `None` without a plugin
fn plugin_value(record: &ShadowsocksRecord) -> Option<String> {
    let mut opts: Vec<String> = vec![record.plugin.as_str().to_string()];
    let mut push = |key: &str, value: &str| {
        if !value.is_empty() {
            opts.push(format!("{}={}", key, value));
        }
    };

    match record.plugin {
        ShadowsocksPlugin::None => return None,
        ShadowsocksPlugin::V2rayPlugin => {
            push("mode", &record.mode);
            push("host", &record.host);
            push("path", &record.path);
            push("impl", &record.impl_);
            if record.tls == "tls" {
                opts.insert(1, "tls".to_string());
            }
        }
        ShadowsocksPlugin::SimpleObfs => {
            push("obfs", record.obfs.as_str());
            push("obfs-host", &record.host);
            push("obfs-path", &record.path);
            push("impl", &record.impl_);
        }
    }

    Some(opts.join(";"))
}
