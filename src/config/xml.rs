//! XML configuration support.
//! - Loads settings from config.xml (quick_xml).
//! - A missing file means built-in defaults; nothing is written.
//!
//! Notes:
//! - Unknown XML fields are rejected to surface misconfigurations early.
//! - CLI flags are applied on top of the returned Config by the caller.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};
use crate::errors::PreserveError;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    #[serde(rename = "log_level")]
    log_level: Option<String>,
    #[serde(rename = "log_file")]
    log_file: Option<String>,
    #[serde(rename = "pattern")]
    pattern: Option<String>,
}

// Map XmlConfig -> Config; blank values fall back to defaults.
fn xml_to_config(parsed: XmlConfig, path: &Path) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = parsed.log_level.as_deref() {
        let level = s.trim().parse::<LogLevel>().map_err(|e| {
            PreserveError::config(format!("{} in config '{}'", e, path.display()))
        })?;
        cfg.log_level = level;
    }
    if let Some(s) = parsed.log_file.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.log_file = Some(PathBuf::from(trimmed));
        }
    }
    if let Some(s) = parsed.pattern.as_deref() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            cfg.pattern = trimmed.to_string();
        }
    }

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents).map_err(|e| {
        PreserveError::config(format!("parse config xml '{}': {}", path.display(), e))
    })?;
    xml_to_config(parsed, path)
}

/// Load the active config: `$PRESERVE_CONFIG` or the default location.
/// Returns defaults when no file exists there.
pub fn load_config() -> Result<Config> {
    let Some(path) = default_config_path() else {
        debug!("no config location could be determined; using defaults");
        return Ok(Config::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    debug!(path = %path.display(), "loading config");
    load_config_from_xml_path(&path)
}
