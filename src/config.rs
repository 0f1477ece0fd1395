//! Codec configuration
//!
//! The codec itself is pure; the only knob is which VMess link form the
//! generator writes. The configuration is read from a TOML file by the
//! command-line front end and passed explicitly to [`crate::generator`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Config Types
// ============================================================================

/// Form used when generating `vmess://` links
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VmessLinkStyle {
    /// `vmess://BASE64(JSON)`, understood by every client
    #[default]
    Legacy,
    /// `vmess://uuid@host:port?params#name`
    Modern,
}

/// Codec configuration parsed from a TOML file
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    /// VMess link form written by the generator, default `legacy`
    #[serde(default)]
    pub vmess_link_style: VmessLinkStyle,
}

impl CodecConfig {
    /// Parse codec config from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse codec config TOML")
    }

    /// Load codec config from file path
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read codec config from {:?}", path))?;
        Self::from_toml(&content)
    }
}
