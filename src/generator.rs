//! Share link generation
//!
//! Turns a [`ProxyLink`] back into a share link. Each protocol module owns its
//! own generator; this module routes a tagged record to it and applies the
//! [`CodecConfig`] policies.

use tracing::trace;

use crate::config::{CodecConfig, VmessLinkStyle};
use crate::parser::protocols::{
    http, hysteria2, juicity, shadowsocks, shadowsocksr, socks5, trojan, tuic, vless, vmess,
};
use crate::record::{ProxyLink, V2rayProtocol};

/// Generates the share link for a record
///
/// Never fails for a structurally valid record; validating field values is
/// left to the caller.
pub fn generate(link: &ProxyLink, config: &CodecConfig) -> String {
    trace!("Generating {} link for '{}'", link.kind(), link.name());
    match link {
        ProxyLink::Http(r) => http::generate(r),
        ProxyLink::Socks5(r) => socks5::generate(r),
        ProxyLink::Shadowsocks(r) => shadowsocks::generate(r),
        ProxyLink::ShadowsocksR(r) => shadowsocksr::generate(r),
        ProxyLink::Trojan(r) => trojan::generate(r),
        ProxyLink::Tuic(r) => tuic::generate(r),
        ProxyLink::Juicity(r) => juicity::generate(r),
        ProxyLink::Hysteria2(r) => hysteria2::generate(r),
        ProxyLink::V2ray(r) => match r.protocol {
            V2rayProtocol::Vmess => vmess::generate(r, config.vmess_link_style),
            V2rayProtocol::Vless => vless::generate(r),
        },
    }
}

impl ProxyLink {
    /// Generates the share link with the default configuration
    ///
    /// VMess records come out in the legacy Base64 JSON form.
    pub fn to_link(&self) -> String {
        generate(self, &CodecConfig::default())
    }

    /// Generates the share link, writing VMess in the given form
    pub fn to_link_with_style(&self, style: VmessLinkStyle) -> String {
        generate(
            self,
            &CodecConfig {
                vmess_link_style: style,
            },
        )
    }
}
