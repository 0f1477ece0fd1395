//! Record shared by VMess and VLESS
//!
//! Field names follow the VMess JSON share format (`ps`, `add`, `id`, ...)
//! since that is the shape most clients exchange.

use serde::{Deserialize, Serialize};

string_enum! {
    /// V2Ray protocols sharing [`V2rayRecord`]
    #[derive(Default)]
    pub enum V2rayProtocol {
        #[default]
        Vmess => "vmess",
        Vless => "vless",
    }
}

impl V2rayProtocol {
    /// Encryption used when the link does not name one
    pub fn default_security(&self) -> &'static str {
        match self {
            V2rayProtocol::Vmess => "auto",
            V2rayProtocol::Vless => "none",
        }
    }
}

/// VMess or VLESS server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct V2rayRecord {
    pub protocol: V2rayProtocol,
    /// Display name
    pub ps: String,
    /// Server address
    pub add: String,
    pub port: u16,
    /// User UUID
    pub id: String,
    /// VMess alter id
    pub aid: u32,
    /// Encryption; always `none` for VLESS
    pub scy: String,
    /// Transport network (`tcp`, `ws`, `h2`, `grpc`, `kcp`, ...)
    pub net: String,
    /// Header camouflage type
    #[serde(rename = "type")]
    pub type_: String,
    pub host: String,
    /// Path, gRPC service name or mKCP seed depending on `net`
    pub path: String,
    pub grpc_mode: String,
    pub grpc_authority: String,
    pub xhttp_mode: String,
    pub xhttp_extra: String,
    /// Transport security (`none`, `tls`, `reality`, `xtls`)
    pub tls: String,
    pub fp: String,
    pub sni: String,
    pub alpn: String,
    pub ech: String,
    pub flow: String,
    pub pbk: String,
    pub sid: String,
    pub spx: String,
    pub pqv: String,
    pub allow_insecure: bool,
    pub v: String,
}

impl V2rayRecord {
    /// Creates a record with the defaults for the given protocol
    pub fn new(protocol: V2rayProtocol) -> Self {
        Self {
            protocol,
            scy: protocol.default_security().to_string(),
            ..Default::default()
        }
    }
}

impl Default for V2rayRecord {
    fn default() -> Self {
        Self {
            protocol: V2rayProtocol::Vmess,
            ps: String::new(),
            add: String::new(),
            port: 443,
            id: String::new(),
            aid: 0,
            scy: "auto".to_string(),
            net: "tcp".to_string(),
            type_: "none".to_string(),
            host: String::new(),
            path: String::new(),
            grpc_mode: "gun".to_string(),
            grpc_authority: String::new(),
            xhttp_mode: "auto".to_string(),
            xhttp_extra: String::new(),
            tls: "none".to_string(),
            fp: String::new(),
            sni: String::new(),
            alpn: String::new(),
            ech: String::new(),
            flow: "none".to_string(),
            pbk: String::new(),
            sid: String::new(),
            spx: String::new(),
            pqv: String::new(),
            allow_insecure: false,
            v: "2".to_string(),
        }
    }
}
