//! Subscription content detection
//!
//! Subscription bodies are either a plain list of share links (one per line)
//! or the same list wrapped in Base64. This module tells them apart and
//! unwraps the Base64 form.

use anyhow::Result;
use tracing::debug;

use super::base64::{decode_base64_str, is_base64_text};
use super::protocols::SHARE_LINK_PREFIXES;

// ============================================================================
// Subscription Type Detection
// ============================================================================

/// Detected subscription content type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionType {
    /// Base64 encoded link list
    Base64LinkList,
    /// Plain text link list (one link per line)
    PlainLinkList,
    /// Unknown format
    Unknown,
}

impl std::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionType::Base64LinkList => write!(f, "Base64 Link List"),
            SubscriptionType::PlainLinkList => write!(f, "Plain Link List"),
            SubscriptionType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Detects the type of subscription content
pub fn detect_subscription_type(content: &str) -> SubscriptionType {
    let trimmed = content.trim();
    debug!(
        "Detecting subscription type, content length: {} bytes",
        content.len()
    );

    if is_plain_link_list(trimmed) {
        debug!("Detected plain link list format");
        return SubscriptionType::PlainLinkList;
    }

    if is_base64_content(trimmed) {
        debug!("Detected Base64 encoded link list format");
        return SubscriptionType::Base64LinkList;
    }

    debug!("Unable to detect subscription format");
    SubscriptionType::Unknown
}

/// Checks if a string starts with a known share-link scheme
pub fn is_share_link(s: &str) -> bool {
    SHARE_LINK_PREFIXES.iter().any(|p| s.starts_with(p))
}

/// Checks if the first meaningful line is a share link
fn is_plain_link_list(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .is_some_and(is_share_link)
}

/// Checks if content is Base64 that decodes to at least one share link
fn is_base64_content(content: &str) -> bool {
    let cleaned: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() < 4 || !is_base64_text(&cleaned) {
        return false;
    }

    decode_base64_str(&cleaned)
        .map(|decoded| decoded.lines().any(|line| is_share_link(line.trim())))
        .unwrap_or(false)
}

/// Returns the subscription as plain text, unwrapping Base64 if needed
pub fn decode_subscription_content(content: &str) -> Result<String> {
    match detect_subscription_type(content) {
        SubscriptionType::Base64LinkList => decode_base64_str(content.trim()),
        _ => Ok(content.to_string()),
    }
}
