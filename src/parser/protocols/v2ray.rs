//! Shared V2Ray link grammar
//!
//! VMess (modern form) and VLESS both use
//! `scheme://uuid@host:port?type=..&security=..&...#name`. The query layout,
//! network normalization and path resolution live here.

use anyhow::{Result, bail};
use tracing::trace;

use crate::parser::link_url::LinkUrl;
use crate::record::{ProxyLink, V2rayProtocol, V2rayRecord};
use crate::url_builder::{QueryValue, UrlParts};

use super::{ProtocolParser, vless, vmess};

/// Parser for the V2Ray family, sub-dispatching on `vmess://` and `vless://`
pub struct V2rayParser;

impl ProtocolParser for V2rayParser {
    fn schemes(&self) -> &[&'static str] {
        &["vmess", "vless"]
    }

    fn parse(&self, link: &str) -> Result<ProxyLink> {
        let record = if link.starts_with("vmess://") {
            vmess::try_parse(link)?
        } else {
            vless::try_parse(link)?
        };
        Ok(ProxyLink::V2ray(record))
    }
}

// ============================================================================
// Network Helpers
// ============================================================================

/// Maps network aliases onto their internal names (`http` is HTTP/2)
pub(super) fn normalize_network(net: &str) -> String {
    match net.trim() {
        "" => "tcp".to_string(),
        "http" => "h2".to_string(),
        other => other.to_string(),
    }
}

/// Query key carrying the record's `path` for a network
pub(super) fn path_key(net: &str) -> &'static str {
    match net {
        "grpc" => "serviceName",
        "kcp" | "mkcp" => "seed",
        _ => "path",
    }
}

pub(super) fn is_xhttp(net: &str) -> bool {
    net == "xhttp" || net == "splithttp"
}

// ============================================================================
// URL Grammar
// ============================================================================

/// Parses `scheme://uuid@host:port?params#name`
pub(super) fn parse_url_grammar(link: &str, protocol: V2rayProtocol) -> Result<V2rayRecord> {
    let label = match protocol {
        V2rayProtocol::Vmess => "VMess",
        V2rayProtocol::Vless => "VLESS",
    };
    trace!("Parsing {} link with URL grammar", label);
    let url = LinkUrl::parse_with_scheme(link, label, &[protocol.as_str()])?;

    if url.username.is_empty() {
        bail!("{} link missing UUID", label);
    }

    let mut record = V2rayRecord::new(protocol);
    record.id = url.username.clone();
    record.add = url.host.clone();
    record.port = url.port.unwrap_or(443);
    record.ps = url.name.clone();

    record.net = normalize_network(url.param("type").unwrap_or("tcp"));
    record.type_ = url.param_or("headerType", "none");
    record.host = url.param_or("host", "");
    record.path = url
        .param_any(&[path_key(&record.net), "path"])
        .unwrap_or_default()
        .to_string();
    record.tls = url.param_or("security", "none");
    record.flow = url.param_or("flow", "none");
    record.sni = url.param_or("sni", "");
    record.fp = url.param_or("fp", "");
    record.alpn = url.param_or("alpn", "");
    record.ech = url.param_or("ech", "");
    record.pbk = url.param_or("pbk", "");
    record.sid = url.param_or("sid", "");
    record.spx = url.param_or("spx", "");
    record.pqv = url.param_or("pqv", "");

    if record.net == "grpc" {
        record.grpc_mode = url.param_or("mode", "gun");
        record.grpc_authority = url.param_or("authority", "");
    } else if is_xhttp(&record.net) {
        record.xhttp_mode = url.param_or("mode", "auto");
        record.xhttp_extra = url.param_or("extra", "");
    }

    match protocol {
        V2rayProtocol::Vmess => {
            record.scy = url.param_or("encryption", "auto");
            record.aid = url
                .param_any(&["aid", "alterId"])
                .and_then(|aid| aid.parse().ok())
                .unwrap_or(0);
            record.allow_insecure = url.flag("allowInsecure") || url.flag("insecure");
        }
        // VLESS links never carry trust decisions; allowInsecure stays off
        V2rayProtocol::Vless => {}
    }

    Ok(record)
}

/// Generates `scheme://uuid@host:port?params#name` for the given protocol
pub(super) fn generate_url_grammar(record: &V2rayRecord, protocol: V2rayProtocol) -> String {
    let vmess = protocol == V2rayProtocol::Vmess;
    let net = if record.net == "h2" { "http" } else { record.net.as_str() };

    let mut parts = UrlParts::new(protocol.as_str(), &record.add, record.port)
        .userinfo(&record.id, "")
        .param("type", net)
        .param(
            "encryption",
            if vmess { record.scy.as_str() } else { "none" },
        )
        .param("security", &record.tls);

    if vmess && record.aid > 0 {
        parts = parts.param("aid", record.aid);
    }
    if !vmess && record.flow != "none" {
        parts = parts.param("flow", &record.flow);
    }
    if record.type_ != "none" {
        parts = parts.param("headerType", &record.type_);
    }

    parts = parts
        .param("host", &record.host)
        .param(path_key(&record.net), &record.path);

    if record.net == "grpc" {
        parts = parts
            .param("mode", &record.grpc_mode)
            .param("authority", &record.grpc_authority);
    } else if is_xhttp(&record.net) {
        parts = parts
            .param("mode", &record.xhttp_mode)
            .param("extra", &record.xhttp_extra);
    }

    parts = parts
        .param("sni", &record.sni)
        .param("fp", &record.fp)
        .param("alpn", &record.alpn)
        .param("ech", &record.ech);

    if record.tls == "reality" {
        parts = parts
            .param("pbk", &record.pbk)
            .param("sid", &record.sid)
            .param("spx", &record.spx)
            .param("pqv", &record.pqv);
    }

    if vmess && record.allow_insecure {
        parts = parts.param("allowInsecure", QueryValue::Int(1));
    }

    parts.fragment(&record.ps).build()
}
