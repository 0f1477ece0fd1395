//! Command-line input helpers
//!
//! Resolves what the user passed on the command line into text: a literal
//! share link, a local file, a subscription URL, or stdin.

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;
use tracing::debug;

use crate::get_version;
use crate::parser::detection::is_share_link;
use crate::record::ProxyLink;

// ============================================================================
// Path Utilities
// ============================================================================

/// Expand ~ to home directory in path
pub fn expand_tilde(path: &str) -> String {
    if (path.starts_with("~/") || path == "~")
        && let Some(home) = dirs_home()
    {
        return path.replacen('~', &home, 1);
    }
    path.to_string()
}

/// Get home directory path
fn dirs_home() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok()
    }
}

// ============================================================================
// HTTP Utilities
// ============================================================================

/// Fetch text content from a URL
pub async fn fetch_text(url: &str) -> Result<String> {
    debug!("Fetching URL: {}", url);

    let client = reqwest::Client::builder()
        .user_agent(format!("nodelink/{}", get_version()))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch URL: {}", url))?;

    let status = response.status();
    if !status.is_success() {
        bail!("HTTP request failed with status {}: {}", status, url);
    }

    let text = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from: {}", url))?;

    Ok(text)
}

// ============================================================================
// Input Loading
// ============================================================================

/// Returns whether the input names a subscription to download
///
/// `http://` and `https://` are also proxy link schemes; an input is only
/// fetched when it has a path or query beyond the bare authority.
pub fn is_subscription_url(input: &str) -> bool {
    let Some(rest) = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
    else {
        return false;
    };
    let rest = rest.split('#').next().unwrap_or_default();
    rest.trim_end_matches('/').contains(['/', '?'])
}

/// Loads the text to parse for `parse <INPUT>`
///
/// A subscription URL is downloaded, a share link is used as is, anything
/// else is read as a file path.
pub async fn load_links(input: &str) -> Result<String> {
    let input = input.trim();
    if is_subscription_url(input) {
        return fetch_text(input).await;
    }
    if is_share_link(input) {
        return Ok(input.to_string());
    }
    let path = expand_tilde(input);
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read links file: {}", path))
}

/// Reads a file, or stdin when no path is given
pub async fn read_file_or_stdin(file: Option<&str>) -> Result<String> {
    match file {
        Some(file) => {
            let path = expand_tilde(file);
            tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read records file: {}", path))
        }
        None => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read records from stdin")?;
            Ok(content)
        }
    }
}

/// Parses JSON records given either as an array or one object per line
pub fn parse_records(content: &str) -> Result<Vec<ProxyLink>> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("Failed to parse JSON record array");
    }

    trimmed
        .lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Failed to parse JSON record on line {}", index + 1))
        })
        .collect()
}
