//! Dispatcher-level configuration: default vault base directory and
//! default output format (spec.md SPEC_FULL.md §2 "Configuration").
//!
//! This is distinct from [`crate::profiles::model`]'s `GlobalConfig`, which
//! is the provider→default-profile map living under the vault's own base
//! directory. This file governs the toolbox binary itself.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default = "default_base_dir_string")]
    pub base_dir: String,

    #[serde(default = "default_output_format")]
    pub default_format: String,
}

fn default_base_dir_string() -> String {
    default_base_dir().display().to_string()
}

fn default_output_format() -> String {
    "text".to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir_string(),
            default_format: default_output_format(),
        }
    }
}

impl ConfigFile {
    /// Load from disk, or return the built-in default if the file doesn't
    /// exist yet — the toolbox never errors out on a missing config.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Writes a starter config file to disk, only if one doesn't already
    /// exist.
    pub fn write_default_if_missing() -> anyhow::Result<PathBuf> {
        let path = config_path();
        if path.exists() {
            return Ok(path);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, DEFAULT_CONFIG_TOML)?;
        Ok(path)
    }
}

/// Merges the config file with CLI overrides: CLI > config file > built-in
/// default.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_dir: PathBuf,
    pub default_format: String,
}

impl ResolvedConfig {
    pub fn resolve(file: &ConfigFile, base_dir_override: Option<&str>, format_override: Option<&str>) -> Self {
        Self {
            base_dir: base_dir_override
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&file.base_dir)),
            default_format: format_override
                .map(str::to_string)
                .unwrap_or_else(|| file.default_format.clone()),
        }
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolbox")
}

pub fn default_base_dir() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("toolbox")
}

const DEFAULT_CONFIG_TOML: &str = r#"# toolbox configuration
# Run `toolbox --init` to regenerate this file.

# Base directory for the cloud profile vault (master key, profiles/, config.json).
base_dir = "~/.local/share/toolbox"

# Default output format for project/twig commands when --json/--ndjson is omitted.
default_format = "text"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_config_prefers_cli_override() {
        let file = ConfigFile {
            base_dir: "/from/file".to_string(),
            default_format: "text".to_string(),
        };
        let resolved = ResolvedConfig::resolve(&file, Some("/from/cli"), Some("json"));
        assert_eq!(resolved.base_dir, PathBuf::from("/from/cli"));
        assert_eq!(resolved.default_format, "json");
    }

    #[test]
    fn resolved_config_falls_back_to_file() {
        let file = ConfigFile {
            base_dir: "/from/file".to_string(),
            default_format: "markdown".to_string(),
        };
        let resolved = ResolvedConfig::resolve(&file, None, None);
        assert_eq!(resolved.base_dir, PathBuf::from("/from/file"));
        assert_eq!(resolved.default_format, "markdown");
    }
}
