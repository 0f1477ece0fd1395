//! End-to-end tests for share link parsing and generation.
//!
//! These tests go through the public dispatcher and generator, covering the
//! behaviours callers rely on: exact field values, documented defaults,
//! round trips and the handling of the two VMess link shapes.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use nodelink::config::{CodecConfig, VmessLinkStyle};
use nodelink::parser::protocols::{
    http, hysteria2, juicity, shadowsocks, shadowsocksr, socks5, trojan, tuic, vless, vmess,
};
use nodelink::record::{
    HttpRecord, HttpScheme, Hysteria2Flavor, ShadowsocksCipher, ShadowsocksPlugin,
    ShadowsocksRRecord, Socks5Record, SsrCipher, SsrObfs, SsrProtocol, TrojanMethod, TrojanObfs,
    V2rayProtocol,
};
use nodelink::{ProtocolKind, ProxyLink, dispatch, generate, import_links};

// ============================================================================
// Exact Parse Results
// ============================================================================

#[test]
fn test_http_parse_exact() {
    let record = http::parse("http://example.com:8080#my-proxy").unwrap();
    assert_eq!(
        record,
        HttpRecord {
            protocol: HttpScheme::Http,
            host: "example.com".to_string(),
            port: 8080,
            username: String::new(),
            password: String::new(),
            name: "my-proxy".to_string(),
        }
    );
}

#[test]
fn test_socks5_parse_exact() {
    let record = socks5::parse("socks5://example.com:1080#my-socks").unwrap();
    assert_eq!(
        record,
        Socks5Record {
            host: "example.com".to_string(),
            port: 1080,
            username: String::new(),
            password: String::new(),
            name: "my-socks".to_string(),
        }
    );
}

#[test]
fn test_shadowsocks_parse_exact() {
    let link = format!(
        "ss://{}@example.com:8388#my-ss",
        STANDARD.encode("aes-256-gcm:password")
    );
    let record = shadowsocks::parse(&link).unwrap();
    assert_eq!(record.method, ShadowsocksCipher::Aes256Gcm);
    assert_eq!(record.password, "password");
    assert_eq!(record.server, "example.com");
    assert_eq!(record.port, 8388);
    assert_eq!(record.name, "my-ss");
}

#[test]
fn test_trojan_parse_exact() {
    let record = trojan::parse("trojan://password123@example.com:443?sni=example.com#my-trojan")
        .unwrap();
    assert_eq!(record.password, "password123");
    assert_eq!(record.server, "example.com");
    assert_eq!(record.port, 443);
    assert_eq!(record.name, "my-trojan");
    assert_eq!(record.peer, "example.com");
    assert_eq!(record.method, TrojanMethod::Origin);
    assert_eq!(record.obfs, TrojanObfs::None);
}

// ============================================================================
// Dispatcher
// ============================================================================

#[test]
fn test_dispatch_unknown_scheme_is_none() {
    assert!(dispatch("unknown://x").is_none());
    assert!(dispatch("not a link").is_none());
}

#[test]
fn test_dispatch_malformed_is_none() {
    assert!(dispatch("ss://!!!").is_none());
    assert!(dispatch("ssr://@@@").is_none());
    assert!(dispatch("socks5://example.com:99999").is_none());
    assert!(dispatch("vmess://").is_none());
}

#[test]
fn test_dispatch_kinds() {
    let cases = [
        ("http://example.com:80", ProtocolKind::Http),
        ("https://example.com", ProtocolKind::Https),
        ("socks5://example.com", ProtocolKind::Socks5),
        ("trojan://pw@example.com", ProtocolKind::Trojan),
        ("trojan-go://pw@example.com?type=ws", ProtocolKind::TrojanGo),
        ("tuic://uuid:pw@example.com", ProtocolKind::Tuic),
        ("juicity://uuid:pw@example.com", ProtocolKind::Juicity),
        ("hysteria2://auth@example.com", ProtocolKind::Hysteria2),
        ("hy2://auth@example.com", ProtocolKind::Hysteria2),
        ("anytls://auth@example.com", ProtocolKind::AnyTls),
        ("vmess://uuid@example.com:443", ProtocolKind::Vmess),
        ("vless://uuid@example.com:443", ProtocolKind::Vless),
    ];
    for (link, kind) in cases {
        assert_eq!(dispatch(link).unwrap().kind(), kind, "{}", link);
    }
}

#[test]
fn test_proxy_link_json_shape() {
    let node = dispatch("socks5://example.com:1080#s").unwrap();
    let json: serde_json::Value = serde_json::to_value(&node).unwrap();
    assert_eq!(json["kind"], "socks5");
    assert_eq!(json["data"]["host"], "example.com");
    assert_eq!(json["data"]["port"], 1080);

    let back: ProxyLink = serde_json::from_value(json).unwrap();
    assert_eq!(back, node);
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_http_round_trip() {
    for link in [
        "http://example.com:8080#my-proxy",
        "http://proxy.local:3128#office",
        "https://secure.example.com:8443#tls_proxy",
    ] {
        let first = http::parse(link).unwrap();
        let second = http::parse(&http::generate(&first)).unwrap();
        assert_eq!(first, second, "{}", link);
    }
}

#[test]
fn test_ssr_round_trip() {
    let record = ShadowsocksRRecord {
        server: "ssr.example.com".to_string(),
        port: 12345,
        proto: SsrProtocol::AuthAes128Md5,
        method: SsrCipher::Chacha20Ietf,
        obfs: SsrObfs::Tls12TicketAuth,
        password: "s3cr3t:pw".to_string(),
        name: "ssr node".to_string(),
        proto_param: "100:abc".to_string(),
        obfs_param: "cdn.example.com".to_string(),
    };

    let parsed = shadowsocksr::parse(&shadowsocksr::generate(&record)).unwrap();
    assert_eq!(parsed.server, record.server);
    assert_eq!(parsed.port, record.port);
    assert_eq!(parsed.proto, record.proto);
    assert_eq!(parsed.method, record.method);
    assert_eq!(parsed.obfs, record.obfs);
    assert_eq!(parsed.password, record.password);
}

#[test]
fn test_ssr_parse_hand_built_link() {
    let body = format!(
        "example.com:8388:origin:aes-256-cfb:plain:{}/?remarks={}",
        URL_SAFE_NO_PAD.encode("password"),
        URL_SAFE_NO_PAD.encode("node")
    );
    let link = format!("ssr://{}", URL_SAFE_NO_PAD.encode(body));
    let node = dispatch(&link).unwrap();
    let ProxyLink::ShadowsocksR(record) = node else {
        panic!("Expected ShadowsocksR record");
    };
    assert_eq!(record.server, "example.com");
    assert_eq!(record.method, SsrCipher::Aes256Cfb);
    assert_eq!(record.password, "password");
    assert_eq!(record.name, "node");
}

#[test]
fn test_dispatch_generate_round_trips() {
    let links = [
        "socks5://user:pw@example.com:1080#s",
        "trojan://pw@example.com:443?sni=a.com&allowInsecure=1#t",
        "trojan-go://pw@example.com:443?sni=a.com&type=ws&host=cdn.com&path=%2Fws&encryption=ss%3Baes-256-gcm%3Bsspw#tg",
        "tuic://uuid:pw@example.com:443?congestion_control=cubic&alpn=h3&udp_relay_mode=quic#tu",
        "juicity://uuid:pw@example.com:443?pinned_certchain_sha256=abc#j",
        "hysteria2://auth@example.com:443?obfs=salamander&obfs-password=x&sni=a.com#hy",
        "anytls://auth@example.com:443?sni=a.com#any",
        "vless://uuid@example.com:443?type=grpc&serviceName=svc&security=reality&pbk=k&sid=s#vl",
    ];
    for link in links {
        let node = dispatch(link).unwrap();
        let regenerated = node.to_link();
        assert_eq!(dispatch(&regenerated).unwrap(), node, "{} -> {}", link, regenerated);
    }
}

#[test]
fn test_shadowsocks_plugin_round_trip_through_dispatch() {
    let userinfo = URL_SAFE_NO_PAD.encode("chacha20-ietf-poly1305:pw");
    let link = format!(
        "ss://{}@example.com:8388/?plugin=v2ray-plugin%3Btls%3Bhost%3Dcdn.com%3Bpath%3D%2Fws#ss",
        userinfo
    );
    let node = dispatch(&link).unwrap();
    let ProxyLink::Shadowsocks(record) = &node else {
        panic!("Expected Shadowsocks record");
    };
    assert_eq!(record.plugin, ShadowsocksPlugin::V2rayPlugin);
    assert_eq!(record.tls, "tls");
    assert_eq!(record.host, "cdn.com");
    assert_eq!(record.path, "/ws");
    assert_eq!(dispatch(&node.to_link()).unwrap(), node);
}

// ============================================================================
// VMess Shapes
// ============================================================================

#[test]
fn test_vmess_legacy_and_modern_describe_same_node() {
    let json = r#"{"v":"2","ps":"same-node","add":"example.com","port":"443","id":"b831381d-6324-4d53-ad4f-8cda48b30811","aid":"0","scy":"auto","net":"ws","type":"none","host":"cdn.example.com","path":"/ray","tls":"tls","sni":"cdn.example.com"}"#;
    let legacy = format!("vmess://{}", STANDARD.encode(json));
    let modern = "vmess://b831381d-6324-4d53-ad4f-8cda48b30811@example.com:443?type=ws&encryption=auto&security=tls&host=cdn.example.com&path=%2Fray&sni=cdn.example.com#same-node";

    let from_legacy = vmess::parse(&legacy).unwrap();
    let from_modern = vmess::parse(modern).unwrap();
    assert_eq!(from_legacy, from_modern);
    assert_eq!(from_legacy.protocol, V2rayProtocol::Vmess);
    assert_eq!(from_legacy.path, "/ray");
}

#[test]
fn test_vmess_generation_policy() {
    let node = dispatch("vmess://uuid@example.com:443?type=tcp#n").unwrap();

    let legacy = generate(&node, &CodecConfig::default());
    let payload = legacy.strip_prefix("vmess://").unwrap();
    assert!(STANDARD.decode(payload).is_ok());

    let modern = generate(
        &node,
        &CodecConfig {
            vmess_link_style: VmessLinkStyle::Modern,
        },
    );
    assert!(modern.starts_with("vmess://uuid@example.com:443"));

    assert_eq!(dispatch(&legacy).unwrap(), node);
    assert_eq!(dispatch(&modern).unwrap(), node);
}

#[test]
fn test_vless_never_reads_allow_insecure() {
    let record = vless::parse("vless://uuid@example.com:443?security=tls&allowInsecure=1").unwrap();
    assert!(!record.allow_insecure);
    assert_eq!(record.scy, "none");
}

#[test]
fn test_trojan_go_drops_allow_insecure_on_generate() {
    let mut record = trojan::parse("trojan://pw@example.com:443?allowInsecure=1").unwrap();
    assert!(record.allow_insecure);
    assert!(trojan::generate(&record).contains("allowInsecure=1"));

    record.obfs = TrojanObfs::Websocket;
    let link = trojan::generate(&record);
    assert!(link.starts_with("trojan-go://"));
    assert!(!link.contains("allowInsecure"));
}

// ============================================================================
// Minimal Links Get Defaults
// ============================================================================

#[test]
fn test_minimal_links_fill_defaults() {
    let http = http::parse("https://example.com").unwrap();
    assert_eq!(http.port, 443);
    assert_eq!(http.name, "");

    let socks = socks5::parse("socks5://example.com").unwrap();
    assert_eq!(socks.port, 1080);

    let ss = shadowsocks::parse(&format!(
        "ss://{}@example.com",
        STANDARD.encode("aes-128-gcm:pw")
    ))
    .unwrap();
    assert_eq!(ss.port, 8388);
    assert_eq!(ss.plugin, ShadowsocksPlugin::None);
    assert_eq!(ss.mode, "websocket");

    let trojan = trojan::parse("trojan://pw@example.com").unwrap();
    assert_eq!(trojan.port, 443);
    assert_eq!(trojan.path, "/");
    assert_eq!(trojan.ss_cipher, "aes-128-gcm");
    assert!(!trojan.allow_insecure);

    let tuic = tuic::parse("tuic://uuid:pw@example.com").unwrap();
    assert_eq!(tuic.port, 443);
    assert_eq!(tuic.congestion_control, "bbr");
    assert_eq!(tuic.alpn, "h3");
    assert_eq!(tuic.udp_relay_mode, "native");

    let juicity = juicity::parse("juicity://uuid:pw@example.com").unwrap();
    assert_eq!(juicity.port, 443);
    assert_eq!(juicity.congestion_control, "bbr");

    let hy2 = hysteria2::parse("hy2://auth@example.com").unwrap();
    assert_eq!(hy2.protocol, Hysteria2Flavor::Hysteria2);
    assert_eq!(hy2.port, 443);
    assert_eq!(hy2.obfs, "");

    let vless = vless::parse("vless://uuid@example.com").unwrap();
    assert_eq!(vless.port, 443);
    assert_eq!(vless.net, "tcp");
    assert_eq!(vless.type_, "none");
    assert_eq!(vless.tls, "none");
    assert_eq!(vless.grpc_mode, "gun");
    assert_eq!(vless.xhttp_mode, "auto");
    assert_eq!(vless.v, "2");

    let vmess = vmess::parse(&format!(
        "vmess://{}",
        STANDARD.encode(r#"{"add":"example.com","id":"uuid"}"#)
    ))
    .unwrap();
    assert_eq!(vmess.port, 443);
    assert_eq!(vmess.aid, 0);
    assert_eq!(vmess.scy, "auto");
    assert_eq!(vmess.net, "tcp");
    assert_eq!(vmess.flow, "none");
}

// ============================================================================
// Bulk Import
// ============================================================================

#[test]
fn test_import_base64_subscription() {
    let plain = [
        "socks5://example.com:1080#a",
        "unknown://nope",
        "trojan://pw@example.com:443#b",
    ]
    .join("\n");
    let report = import_links(&STANDARD.encode(plain)).unwrap();

    assert_eq!(report.nodes.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].line, 2);
    assert_eq!(report.failures[0].link, "unknown://nope");
}

#[test]
fn test_ipv6_address_shape_is_uniform() {
    let ss = dispatch(&format!(
        "ss://{}@[2001:db8::1]:8388#ss",
        STANDARD.encode("aes-256-cfb:pw")
    ))
    .unwrap();
    let trojan = dispatch("trojan://pw@[2001:db8::1]:443#t").unwrap();
    let vless = dispatch("vless://uuid@[2001:db8::1]:443#v").unwrap();

    assert_eq!(ss.address(), ("2001:db8::1", 8388));
    assert_eq!(trojan.address(), ("2001:db8::1", 443));
    assert_eq!(vless.address(), ("2001:db8::1", 443));
    assert!(trojan.to_link().starts_with("trojan://pw@[2001:db8::1]:443"));
}
