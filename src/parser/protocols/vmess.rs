//! VMess protocol links
//!
//! Two incompatible shapes share the `vmess://` scheme:
//!
//! - legacy: `vmess://BASE64({"v":"2","ps":"name","add":"host","port":443,...})`
//! - modern: `vmess://uuid@host:port?type=ws&security=tls&...#name`
//!
//! Parsing runs an ordered list of [`VmessProbe`]s and keeps the first success.
//! Generation writes either shape depending on [`VmessLinkStyle`].

use std::fmt;

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::VmessLinkStyle;
use crate::parser::base64::{decode_base64_str, encode_base64, is_base64_text};
use crate::parser::link_url::{decode_component, is_truthy};
use crate::record::{V2rayProtocol, V2rayRecord};

use super::v2ray::{
    generate_url_grammar, is_xhttp, normalize_network, parse_url_grammar, path_key,
};
use super::{lenient, split_fragment};

// ============================================================================
// Probe Order
// ============================================================================

/// One candidate grammar for a `vmess://` link
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VmessProbe {
    /// `vmess://uuid@host:port?params#name`
    Url,
    /// `vmess://BASE64(JSON)`
    Base64Json,
}

impl fmt::Display for VmessProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VmessProbe::Url => write!(f, "url"),
            VmessProbe::Base64Json => write!(f, "base64-json"),
        }
    }
}

impl VmessProbe {
    /// Runs this probe against a full `vmess://` link
    pub fn run(&self, link: &str) -> Result<V2rayRecord> {
        match self {
            VmessProbe::Url => parse_url_grammar(link, V2rayProtocol::Vmess),
            VmessProbe::Base64Json => parse_base64_json(link),
        }
    }
}

/// Returns the probes to try for a link body (text after `vmess://`), in order
///
/// A body with `@` that is not pure base64 looks like the URL grammar and is
/// tried that way first. Everything else is tried as base64 JSON first, with
/// the URL grammar as the fallback.
pub fn vmess_probe_order(body: &str) -> [VmessProbe; 2] {
    let (payload, _) = split_fragment(body);
    if payload.contains('@') && !is_base64_text(payload) {
        [VmessProbe::Url, VmessProbe::Base64Json]
    } else {
        [VmessProbe::Base64Json, VmessProbe::Url]
    }
}

// ============================================================================
// VMess Parser
// ============================================================================

/// Parses a VMess link in either shape, reporting every failed probe
pub fn try_parse(link: &str) -> Result<V2rayRecord> {
    let link = link.trim();
    let body = link
        .strip_prefix("vmess://")
        .ok_or_else(|| anyhow!("Invalid VMess link: missing vmess:// prefix"))?;
    if body.is_empty() {
        bail!("VMess link has empty body");
    }

    let mut failures = Vec::new();
    for probe in vmess_probe_order(body) {
        match probe.run(link) {
            Ok(record) => {
                trace!("VMess link accepted by {} probe", probe);
                return Ok(record);
            }
            Err(e) => {
                trace!("VMess {} probe failed: {:#}", probe, e);
                failures.push(format!("{}: {:#}", probe, e));
            }
        }
    }
    Err(anyhow!("Unrecognized VMess link ({})", failures.join("; ")))
}

/// Parses a VMess link in either shape
pub fn parse(link: &str) -> Option<V2rayRecord> {
    lenient("VMess", try_parse(link))
}

// ============================================================================
// Legacy JSON
// ============================================================================

/// Legacy VMess JSON payload as found in the wild
///
/// Numbers and booleans show up both as JSON scalars and as strings, so every
/// field goes through a lenient deserializer.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct VmessJson {
    #[serde(deserialize_with = "lenient_string")]
    v: String,
    #[serde(deserialize_with = "lenient_string")]
    ps: String,
    #[serde(deserialize_with = "lenient_string")]
    add: String,
    #[serde(deserialize_with = "lenient_string")]
    port: String,
    #[serde(deserialize_with = "lenient_string")]
    id: String,
    #[serde(deserialize_with = "lenient_string")]
    aid: String,
    #[serde(deserialize_with = "lenient_string")]
    scy: String,
    #[serde(deserialize_with = "lenient_string")]
    net: String,
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    header_type: String,
    #[serde(deserialize_with = "lenient_string")]
    host: String,
    #[serde(deserialize_with = "lenient_string")]
    path: String,
    #[serde(rename = "serviceName", deserialize_with = "lenient_string")]
    service_name: String,
    #[serde(deserialize_with = "lenient_string")]
    seed: String,
    #[serde(deserialize_with = "lenient_string")]
    mode: String,
    #[serde(deserialize_with = "lenient_string")]
    authority: String,
    #[serde(deserialize_with = "lenient_string")]
    extra: String,
    #[serde(deserialize_with = "lenient_string")]
    tls: String,
    #[serde(deserialize_with = "lenient_string")]
    sni: String,
    #[serde(deserialize_with = "lenient_string")]
    alpn: String,
    #[serde(deserialize_with = "lenient_string")]
    fp: String,
    #[serde(deserialize_with = "lenient_string")]
    ech: String,
    #[serde(deserialize_with = "lenient_string")]
    flow: String,
    #[serde(deserialize_with = "lenient_string")]
    pbk: String,
    #[serde(deserialize_with = "lenient_string")]
    sid: String,
    #[serde(deserialize_with = "lenient_string")]
    spx: String,
    #[serde(deserialize_with = "lenient_string")]
    pqv: String,
    #[serde(rename = "allowInsecure", deserialize_with = "lenient_string")]
    allow_insecure: String,
}

/// Returns `value` unless it is blank, in which case `default`
fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Parses `vmess://BASE64(JSON)[#name]`
fn parse_base64_json(link: &str) -> Result<V2rayRecord> {
    let body = link
        .trim()
        .strip_prefix("vmess://")
        .ok_or_else(|| anyhow!("Invalid VMess link: missing vmess:// prefix"))?;
    let (payload, fragment) = split_fragment(body);

    // Some producers percent-encode the base64 payload
    let decoded = decode_base64_str(payload)
        .or_else(|_| decode_base64_str(&decode_component(payload)))
        .context("Failed to decode VMess base64 payload")?;
    trace!("Decoded VMess JSON: {}", decoded);

    let json: VmessJson =
        serde_json::from_str(decoded.trim()).context("Failed to parse VMess JSON")?;

    if json.add.is_empty() {
        bail!("VMess JSON missing server address");
    }
    if json.id.is_empty() {
        bail!("VMess JSON missing user id");
    }

    let port = if json.port.trim().is_empty() {
        443
    } else {
        json.port
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid VMess port: {}", json.port))?
    };

    let net = normalize_network(&json.net);
    let path = match path_key(&net) {
        "serviceName" if !json.service_name.is_empty() => json.service_name,
        "seed" if !json.seed.is_empty() => json.seed,
        _ => json.path,
    };

    let mut record = V2rayRecord::new(V2rayProtocol::Vmess);
    record.ps = if json.ps.is_empty() { fragment } else { json.ps };
    record.add = json.add;
    record.port = port;
    record.id = json.id;
    record.aid = json.aid.trim().parse().unwrap_or(0);
    record.scy = or_default(json.scy, "auto");
    record.type_ = or_default(json.header_type, "none");
    record.host = json.host;
    record.path = path;
    record.tls = or_default(json.tls, "none");
    record.sni = json.sni;
    record.alpn = json.alpn;
    record.fp = json.fp;
    record.ech = json.ech;
    record.flow = or_default(json.flow, "none");
    record.pbk = json.pbk;
    record.sid = json.sid;
    record.spx = json.spx;
    record.pqv = json.pqv;
    record.allow_insecure = is_truthy(json.allow_insecure.trim());
    record.v = or_default(json.v, "2");

    if net == "grpc" {
        record.grpc_mode = or_default(json.mode, "gun");
        record.grpc_authority = json.authority;
    } else if is_xhttp(&net) {
        record.xhttp_mode = or_default(json.mode, "auto");
        record.xhttp_extra = json.extra;
    }
    record.net = net;

    Ok(record)
}

// ============================================================================
// VMess Generator
// ============================================================================

/// Legacy JSON written by the generator
///
/// Empty strings are skipped so only fields meaningful for the transport appear.
#[derive(Serialize, Debug)]
struct VmessJsonOut<'a> {
    v: &'a str,
    ps: &'a str,
    add: &'a str,
    port: String,
    id: &'a str,
    aid: String,
    scy: &'a str,
    net: &'a str,
    #[serde(rename = "type", skip_serializing_if = "str::is_empty")]
    header_type: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    host: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    path: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    mode: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    authority: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    extra: &'a str,
    tls: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    sni: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    alpn: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    fp: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    ech: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pbk: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    sid: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    spx: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pqv: &'a str,
    #[serde(rename = "allowInsecure", skip_serializing_if = "std::ops::Not::not")]
    allow_insecure: bool,
}

/// Networks whose transport uses the `path` field
const PATH_NETWORKS: &[&str] = &[
    "ws",
    "h2",
    "grpc",
    "kcp",
    "mkcp",
    "httpupgrade",
    "xhttp",
    "splithttp",
    "quic",
];

/// Networks that carry header camouflage in `type`
const HEADER_TYPE_NETWORKS: &[&str] = &["tcp", "kcp", "mkcp", "quic"];

/// Generates a VMess link in the requested shape
pub fn generate(record: &V2rayRecord, style: VmessLinkStyle) -> String {
    match style {
        VmessLinkStyle::Legacy => generate_legacy(record),
        VmessLinkStyle::Modern => generate_url_grammar(record, V2rayProtocol::Vmess),
    }
}

/// Generates `vmess://BASE64(JSON)` with transport-irrelevant fields cleared
fn generate_legacy(record: &V2rayRecord) -> String {
    let net = record.net.as_str();
    let http_header = net == "tcp" && record.type_ == "http";
    let uses_path = PATH_NETWORKS.contains(&net) || http_header;
    let reality = record.tls == "reality";
    let grpc = net == "grpc";
    let xhttp = is_xhttp(net);

    let json = VmessJsonOut {
        v: if record.v.is_empty() { "2" } else { &record.v },
        ps: &record.ps,
        add: &record.add,
        port: record.port.to_string(),
        id: &record.id,
        aid: record.aid.to_string(),
        scy: if record.scy.is_empty() { "auto" } else { &record.scy },
        net,
        header_type: if HEADER_TYPE_NETWORKS.contains(&net) { &record.type_ } else { "" },
        host: if uses_path { &record.host } else { "" },
        path: if uses_path { &record.path } else { "" },
        mode: if grpc {
            record.grpc_mode.as_str()
        } else if xhttp {
            record.xhttp_mode.as_str()
        } else {
            ""
        },
        authority: if grpc { &record.grpc_authority } else { "" },
        extra: if xhttp { &record.xhttp_extra } else { "" },
        tls: if record.tls.is_empty() { "none" } else { &record.tls },
        sni: &record.sni,
        alpn: &record.alpn,
        fp: &record.fp,
        ech: &record.ech,
        pbk: if reality { &record.pbk } else { "" },
        sid: if reality { &record.sid } else { "" },
        spx: if reality { &record.spx } else { "" },
        pqv: if reality { &record.pqv } else { "" },
        allow_insecure: record.allow_insecure,
    };

    // Serializing borrowed strings into a String cannot fail
    let payload = serde_json::to_string(&json).unwrap_or_default();
    format!("vmess://{}", encode_base64(&payload))
}

// ============================================================================
// Deserialization Helpers
// ============================================================================

/// Accepts a string, number, boolean or null and yields its text form
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        String(String),
        Integer(i64),
        Float(f64),
        Bool(bool),
        Null,
    }

    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::String(s)) => s,
        Some(Scalar::Integer(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
        Some(Scalar::Null) | None => String::new(),
    })
}
