//! Share Link Parsing Module
//!
//! This module provides functionality for:
//! - Parsing protocol share links (http, socks5, ss, ssr, trojan, tuic, juicity, hysteria2, vmess, vless)
//! - Dispatching a raw link to the right protocol parser by scheme prefix
//! - Bulk import of subscription bodies (plain or Base64 link lists)

pub mod base64;
pub mod detection;
pub mod link_url;
pub mod protocols;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::record::ProxyLink;

pub use detection::{SubscriptionType, decode_subscription_content, detect_subscription_type};
pub use protocols::{ProtocolParser, ProtocolRegistry};

// ============================================================================
// Dispatch
// ============================================================================

/// Parses any supported share link
///
/// Unknown schemes and malformed links both yield `None`; use [`try_dispatch`]
/// or a protocol module's `try_parse` to learn why a link was rejected.
pub fn dispatch(raw: &str) -> Option<ProxyLink> {
    ProtocolRegistry::builtin().dispatch(raw)
}

/// Parses any supported share link, reporting why it was rejected
pub fn try_dispatch(raw: &str) -> Result<ProxyLink> {
    ProtocolRegistry::builtin().try_dispatch(raw)
}

// ============================================================================
// Bulk Import
// ============================================================================

/// A line that could not be imported
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImportFailure {
    /// 1-based line number in the (decoded) content
    pub line: usize,
    /// The raw link text
    pub link: String,
    pub reason: String,
}

/// Outcome of importing a list of share links
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub nodes: Vec<ProxyLink>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    /// Returns whether every non-comment line parsed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Imports a subscription body: one link per line, optionally Base64-wrapped
///
/// Blank lines and `#` comments are skipped. A bad line is recorded in
/// [`ImportReport::failures`] and does not stop the import.
pub fn import_links(content: &str) -> Result<ImportReport> {
    import_links_with_registry(content, ProtocolRegistry::builtin())
}

/// Imports a subscription body using a custom registry
pub fn import_links_with_registry(
    content: &str,
    registry: &ProtocolRegistry,
) -> Result<ImportReport> {
    let subscription_type = detect_subscription_type(content);
    debug!("Detected subscription type: {}", subscription_type);

    let decoded = decode_subscription_content(content)?;
    let mut report = ImportReport::default();

    for (index, line) in decoded.lines().enumerate() {
        let link = line.trim();
        if link.is_empty() || link.starts_with('#') {
            continue;
        }

        match registry.try_dispatch(link) {
            Ok(node) => report.nodes.push(node),
            Err(e) => {
                debug!("Skipping line {}: {:#}", index + 1, e);
                report.failures.push(ImportFailure {
                    line: index + 1,
                    link: link.to_string(),
                    reason: format!("{:#}", e),
                });
            }
        }
    }

    debug!(
        "Import complete: {} nodes, {} failures",
        report.nodes.len(),
        report.failures.len()
    );
    Ok(report)
}
