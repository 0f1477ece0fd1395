//! Records for Shadowsocks and ShadowsocksR

use serde::{Deserialize, Serialize};

// ============================================================================
// Shadowsocks
// ============================================================================

string_enum! {
    /// Ciphers accepted in `ss://` links
    ///
    /// Stream ciphers are deprecated upstream but still common in older
    /// subscriptions.
    #[derive(Default)]
    pub enum ShadowsocksCipher {
        #[default]
        Aes128Gcm => "aes-128-gcm",
        Aes256Gcm => "aes-256-gcm",
        Chacha20Poly1305 => "chacha20-poly1305",
        Chacha20IetfPoly1305 => "chacha20-ietf-poly1305",
        Xchacha20IetfPoly1305 => "xchacha20-ietf-poly1305",
        Blake3Aes128Gcm => "2022-blake3-aes-128-gcm",
        Blake3Aes256Gcm => "2022-blake3-aes-256-gcm",
        Blake3Chacha20Poly1305 => "2022-blake3-chacha20-poly1305",
        Aes128Cfb => "aes-128-cfb",
        Aes192Cfb => "aes-192-cfb",
        Aes256Cfb => "aes-256-cfb",
        Aes128Ctr => "aes-128-ctr",
        Aes192Ctr => "aes-192-ctr",
        Aes256Ctr => "aes-256-ctr",
        Camellia128Cfb => "camellia-128-cfb",
        Camellia192Cfb => "camellia-192-cfb",
        Camellia256Cfb => "camellia-256-cfb",
        BfCfb => "bf-cfb",
        Rc4Md5 => "rc4-md5",
        Chacha20 => "chacha20",
        Chacha20Ietf => "chacha20-ietf",
        Salsa20 => "salsa20",
        Plain => "plain",
        None => "none",
    }
}

string_enum! {
    /// SIP003 plugin attached to a Shadowsocks server
    #[derive(Default)]
    pub enum ShadowsocksPlugin {
        #[default]
        None => "",
        SimpleObfs => "simple-obfs",
        V2rayPlugin => "v2ray-plugin",
    }
}

string_enum! {
    /// simple-obfs camouflage mode
    #[derive(Default)]
    pub enum ObfsMode {
        #[default]
        Http => "http",
        Tls => "tls",
    }
}

/// Shadowsocks server, optionally wrapped by a SIP003 plugin
///
/// `host` and `path` are shared by both plugins: they carry `obfs-host` and
/// `obfs-path` for simple-obfs, and `host` and `path` for v2ray-plugin.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ShadowsocksRecord {
    pub method: ShadowsocksCipher,
    pub password: String,
    pub server: String,
    pub port: u16,
    pub name: String,
    pub plugin: ShadowsocksPlugin,
    /// simple-obfs mode
    pub obfs: ObfsMode,
    /// `"tls"` when v2ray-plugin runs over TLS, otherwise empty
    pub tls: String,
    pub path: String,
    /// v2ray-plugin transport mode
    pub mode: String,
    pub host: String,
    #[serde(rename = "impl")]
    pub impl_: String,
}

impl Default for ShadowsocksRecord {
    fn default() -> Self {
        Self {
            method: ShadowsocksCipher::Aes128Gcm,
            password: String::new(),
            server: String::new(),
            port: 8388,
            name: String::new(),
            plugin: ShadowsocksPlugin::None,
            obfs: ObfsMode::Http,
            tls: String::new(),
            path: String::new(),
            mode: "websocket".to_string(),
            host: String::new(),
            impl_: String::new(),
        }
    }
}

// ============================================================================
// ShadowsocksR
// ============================================================================

string_enum! {
    /// Stream ciphers accepted in `ssr://` links
    #[derive(Default)]
    pub enum SsrCipher {
        #[default]
        Aes128Cfb => "aes-128-cfb",
        Aes192Cfb => "aes-192-cfb",
        Aes256Cfb => "aes-256-cfb",
        Aes128Ctr => "aes-128-ctr",
        Aes192Ctr => "aes-192-ctr",
        Aes256Ctr => "aes-256-ctr",
        Aes128Ofb => "aes-128-ofb",
        Aes192Ofb => "aes-192-ofb",
        Aes256Ofb => "aes-256-ofb",
        DesCfb => "des-cfb",
        BfCfb => "bf-cfb",
        Cast5Cfb => "cast5-cfb",
        Rc4Md5 => "rc4-md5",
        Chacha20 => "chacha20",
        Chacha20Ietf => "chacha20-ietf",
        Salsa20 => "salsa20",
        Camellia128Cfb => "camellia-128-cfb",
        Camellia192Cfb => "camellia-192-cfb",
        Camellia256Cfb => "camellia-256-cfb",
        IdeaCfb => "idea-cfb",
        Rc2Cfb => "rc2-cfb",
        SeedCfb => "seed-cfb",
        None => "none",
    }
}

string_enum! {
    /// ShadowsocksR protocol plugin
    #[derive(Default)]
    pub enum SsrProtocol {
        #[default]
        Origin => "origin",
        VerifySha1 => "verify_sha1",
        AuthSha1V4 => "auth_sha1_v4",
        AuthAes128Md5 => "auth_aes128_md5",
        AuthAes128Sha1 => "auth_aes128_sha1",
        AuthChainA => "auth_chain_a",
        AuthChainB => "auth_chain_b",
    }
}

string_enum! {
    /// ShadowsocksR obfuscation plugin
    #[derive(Default)]
    pub enum SsrObfs {
        #[default]
        Plain => "plain",
        HttpSimple => "http_simple",
        HttpPost => "http_post",
        RandomHead => "random_head",
        Tls12TicketAuth => "tls1.2_ticket_auth",
    }
}

/// ShadowsocksR server
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ShadowsocksRRecord {
    pub server: String,
    pub port: u16,
    pub proto: SsrProtocol,
    pub method: SsrCipher,
    pub obfs: SsrObfs,
    pub password: String,
    pub name: String,
    pub proto_param: String,
    pub obfs_param: String,
}

impl Default for ShadowsocksRRecord {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: 8388,
            proto: SsrProtocol::Origin,
            method: SsrCipher::Aes128Cfb,
            obfs: SsrObfs::Plain,
            password: String::new(),
            name: String::new(),
            proto_param: String::new(),
            obfs_param: String::new(),
        }
    }
}
