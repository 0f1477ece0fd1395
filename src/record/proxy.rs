//! Records for the URI-shaped protocols: HTTP, SOCKS5, Trojan, TUIC, Juicity
//! and Hysteria2/AnyTLS.

use serde::{Deserialize, Serialize};

// ============================================================================
// HTTP / SOCKS5
// ============================================================================

string_enum! {
    /// Scheme of an HTTP proxy link
    #[derive(Default)]
    pub enum HttpScheme {
        #[default]
        Http => "http",
        Https => "https",
    }
}

impl HttpScheme {
    /// Port used when the link does not carry one
    pub fn default_port(&self) -> u16 {
        match self {
            HttpScheme::Http => 80,
            HttpScheme::Https => 443,
        }
    }
}

/// HTTP or HTTPS proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HttpRecord {
    pub protocol: HttpScheme,
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl Default for HttpRecord {
    fn default() -> Self {
        Self {
            protocol: HttpScheme::Http,
            username: String::new(),
            password: String::new(),
            host: String::new(),
            port: HttpScheme::Http.default_port(),
            name: String::new(),
        }
    }
}

/// SOCKS5 proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Socks5Record {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

impl Default for Socks5Record {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            host: String::new(),
            port: 1080,
            name: String::new(),
        }
    }
}

// ============================================================================
// Trojan / Trojan-Go
// ============================================================================

string_enum! {
    /// Trojan-Go transport obfuscation
    #[derive(Default)]
    pub enum TrojanObfs {
        #[default]
        None => "none",
        Websocket => "websocket",
    }
}

string_enum! {
    /// Trojan-Go inner encryption
    #[derive(Default)]
    pub enum TrojanMethod {
        #[default]
        Origin => "origin",
        Shadowsocks => "shadowsocks",
    }
}

/// Trojan or Trojan-Go server
///
/// A record turns into a Trojan-Go link as soon as it leaves the plain
/// `origin`/`none` combination.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TrojanRecord {
    pub password: String,
    pub server: String,
    pub port: u16,
    pub name: String,
    /// TLS server name (`sni`, or the legacy `peer` key)
    pub peer: String,
    pub allow_insecure: bool,
    pub obfs: TrojanObfs,
    /// WebSocket host, only meaningful with [`TrojanObfs::Websocket`]
    pub host: String,
    /// WebSocket path, only meaningful with [`TrojanObfs::Websocket`]
    pub path: String,
    pub method: TrojanMethod,
    pub ss_cipher: String,
    pub ss_password: String,
}

impl TrojanRecord {
    pub fn is_trojan_go(&self) -> bool {
        self.method != TrojanMethod::Origin || self.obfs != TrojanObfs::None
    }
}

impl Default for TrojanRecord {
    fn default() -> Self {
        Self {
            password: String::new(),
            server: String::new(),
            port: 443,
            name: String::new(),
            peer: String::new(),
            allow_insecure: false,
            obfs: TrojanObfs::None,
            host: String::new(),
            path: "/".to_string(),
            method: TrojanMethod::Origin,
            ss_cipher: "aes-128-gcm".to_string(),
            ss_password: String::new(),
        }
    }
}

// ============================================================================
// TUIC / Juicity
// ============================================================================

/// TUIC v5 server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TuicRecord {
    pub uuid: String,
    pub password: String,
    pub server: String,
    pub port: u16,
    pub name: String,
    pub congestion_control: String,
    pub alpn: String,
    pub sni: String,
    #[serde(rename = "allowInsecure")]
    pub allow_insecure: bool,
    pub disable_sni: bool,
    pub udp_relay_mode: String,
}

impl Default for TuicRecord {
    fn default() -> Self {
        Self {
            uuid: String::new(),
            password: String::new(),
            server: String::new(),
            port: 443,
            name: String::new(),
            congestion_control: "bbr".to_string(),
            alpn: "h3".to_string(),
            sni: String::new(),
            allow_insecure: false,
            disable_sni: false,
            udp_relay_mode: "native".to_string(),
        }
    }
}

/// Juicity server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct JuicityRecord {
    pub uuid: String,
    pub password: String,
    pub server: String,
    pub port: u16,
    pub name: String,
    pub congestion_control: String,
    pub pinned_certchain_sha256: String,
    pub sni: String,
    #[serde(rename = "allowInsecure")]
    pub allow_insecure: bool,
}

impl Default for JuicityRecord {
    fn default() -> Self {
        Self {
            uuid: String::new(),
            password: String::new(),
            server: String::new(),
            port: 443,
            name: String::new(),
            congestion_control: "bbr".to_string(),
            pinned_certchain_sha256: String::new(),
            sni: String::new(),
            allow_insecure: false,
        }
    }
}

// ============================================================================
// Hysteria2 / AnyTLS
// ============================================================================

string_enum! {
    /// Protocols sharing the Hysteria2 record shape
    #[derive(Default)]
    pub enum Hysteria2Flavor {
        #[default]
        Hysteria2 => "hysteria2",
        AnyTls => "anytls",
    }
}

/// Hysteria2 or AnyTLS server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Hysteria2Record {
    pub protocol: Hysteria2Flavor,
    /// Opaque authentication token; may itself contain `:` or `@`
    pub auth: String,
    pub server: String,
    pub port: u16,
    pub name: String,
    pub obfs: String,
    pub obfs_password: String,
    pub sni: String,
    pub allow_insecure: bool,
    #[serde(rename = "pinSHA256")]
    pub pin_sha256: String,
}

impl Default for Hysteria2Record {
    fn default() -> Self {
        Self {
            protocol: Hysteria2Flavor::Hysteria2,
            auth: String::new(),
            server: String::new(),
            port: 443,
            name: String::new(),
            obfs: String::new(),
            obfs_password: String::new(),
            sni: String::new(),
            allow_insecure: false,
            pin_sha256: String::new(),
        }
    }
}
