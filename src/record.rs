//! Share-link records
//!
//! This module defines the typed records produced by the link parsers and
//! consumed by the link generators. Every protocol family gets its own record
//! type, and [`ProxyLink`] ties them together as a tagged union so a record of
//! one family can never be mistaken for another.

use serde::{Deserialize, Serialize};

/// Declares a closed, string-valued enum with serde names, `as_str`,
/// `Display` and a case-insensitive `FromStr`.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(::serde::Serialize, ::serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the wire name of this variant
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::record::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    _ => Err($crate::record::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

mod proxy;
mod shadowsocks;
mod v2ray;

pub use proxy::{
    HttpRecord, HttpScheme, Hysteria2Flavor, Hysteria2Record, JuicityRecord, Socks5Record,
    TrojanMethod, TrojanObfs, TrojanRecord, TuicRecord,
};
pub use shadowsocks::{
    ObfsMode, ShadowsocksCipher, ShadowsocksPlugin, ShadowsocksRRecord, ShadowsocksRecord,
    SsrCipher, SsrObfs, SsrProtocol,
};
pub use v2ray::{V2rayProtocol, V2rayRecord};

// ============================================================================
// Errors
// ============================================================================

/// Error returned when a string does not name a variant of a closed enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    /// Name of the enum type that rejected the value
    pub kind: &'static str,
    /// The rejected value
    pub value: String,
}

impl std::fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown {} value '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

// ============================================================================
// Protocol Kind
// ============================================================================

string_enum! {
    /// Fine-grained protocol of a share link
    pub enum ProtocolKind {
        Http => "http",
        Https => "https",
        Socks5 => "socks5",
        Shadowsocks => "ss",
        ShadowsocksR => "ssr",
        Trojan => "trojan",
        TrojanGo => "trojan-go",
        Tuic => "tuic",
        Juicity => "juicity",
        Hysteria2 => "hysteria2",
        AnyTls => "anytls",
        Vmess => "vmess",
        Vless => "vless",
    }
}

// ============================================================================
// Proxy Link
// ============================================================================

/// A parsed share link, tagged by protocol family
///
/// Serializes as `{"kind": "<family>", "data": {...}}`. Families group
/// protocols that share one record shape (http/https, trojan/trojan-go,
/// hysteria2/anytls, vmess/vless); [`ProxyLink::kind`] gives the exact protocol.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "kind", content = "data")]
pub enum ProxyLink {
    #[serde(rename = "http")]
    Http(HttpRecord),
    #[serde(rename = "socks5")]
    Socks5(Socks5Record),
    #[serde(rename = "ss")]
    Shadowsocks(ShadowsocksRecord),
    #[serde(rename = "ssr")]
    ShadowsocksR(ShadowsocksRRecord),
    #[serde(rename = "trojan")]
    Trojan(TrojanRecord),
    #[serde(rename = "tuic")]
    Tuic(TuicRecord),
    #[serde(rename = "juicity")]
    Juicity(JuicityRecord),
    #[serde(rename = "hysteria2")]
    Hysteria2(Hysteria2Record),
    #[serde(rename = "v2ray")]
    V2ray(V2rayRecord),
}

impl ProxyLink {
    /// Returns the exact protocol this record describes
    pub fn kind(&self) -> ProtocolKind {
        match self {
            ProxyLink::Http(r) => match r.protocol {
                HttpScheme::Http => ProtocolKind::Http,
                HttpScheme::Https => ProtocolKind::Https,
            },
            ProxyLink::Socks5(_) => ProtocolKind::Socks5,
            ProxyLink::Shadowsocks(_) => ProtocolKind::Shadowsocks,
            ProxyLink::ShadowsocksR(_) => ProtocolKind::ShadowsocksR,
            ProxyLink::Trojan(r) => {
                if r.is_trojan_go() {
                    ProtocolKind::TrojanGo
                } else {
                    ProtocolKind::Trojan
                }
            }
            ProxyLink::Tuic(_) => ProtocolKind::Tuic,
            ProxyLink::Juicity(_) => ProtocolKind::Juicity,
            ProxyLink::Hysteria2(r) => match r.protocol {
                Hysteria2Flavor::Hysteria2 => ProtocolKind::Hysteria2,
                Hysteria2Flavor::AnyTls => ProtocolKind::AnyTls,
            },
            ProxyLink::V2ray(r) => match r.protocol {
                V2rayProtocol::Vmess => ProtocolKind::Vmess,
                V2rayProtocol::Vless => ProtocolKind::Vless,
            },
        }
    }

    /// Returns the display name carried by the link
    pub fn name(&self) -> &str {
        match self {
            ProxyLink::Http(r) => &r.name,
            ProxyLink::Socks5(r) => &r.name,
            ProxyLink::Shadowsocks(r) => &r.name,
            ProxyLink::ShadowsocksR(r) => &r.name,
            ProxyLink::Trojan(r) => &r.name,
            ProxyLink::Tuic(r) => &r.name,
            ProxyLink::Juicity(r) => &r.name,
            ProxyLink::Hysteria2(r) => &r.name,
            ProxyLink::V2ray(r) => &r.ps,
        }
    }

    /// Returns the remote host and port
    pub fn address(&self) -> (&str, u16) {
        match self {
            ProxyLink::Http(r) => (&r.host, r.port),
            ProxyLink::Socks5(r) => (&r.host, r.port),
            ProxyLink::Shadowsocks(r) => (&r.server, r.port),
            ProxyLink::ShadowsocksR(r) => (&r.server, r.port),
            ProxyLink::Trojan(r) => (&r.server, r.port),
            ProxyLink::Tuic(r) => (&r.server, r.port),
            ProxyLink::Juicity(r) => (&r.server, r.port),
            ProxyLink::Hysteria2(r) => (&r.server, r.port),
            ProxyLink::V2ray(r) => (&r.add, r.port),
        }
    }
}
