//
//  tfgit
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Settings live in a TOML file in the platform config directory:
//!
//! - **Linux**: `~/.config/tfgit/config.toml`
//! - **macOS**: `~/Library/Application Support/tfgit/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\tfgit\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [core]
//! method_override = true
//! location_discovery = false
//! prompt = "enabled"
//!
//! [hosts."dev.azure.com"]
//! url = "https://dev.azure.com/fabrikam"
//! user = "ada@fabrikam.com"
//! default_project = "Fabrikam-Fiber"
//! api_version = "2.0"
//! ```
//!
//! ## Keys
//!
//! [`Config::get`] and [`Config::set`] address core settings by bare name
//! (`method_override`) and host settings as `hosts.<host>.<field>`
//! (`hosts.dev.azure.com.default_project`).

mod hosts;

pub use hosts::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::ApiResourceVersion;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub core: CoreConfig,

    /// Per-host settings keyed by normalized host name.
    #[serde(default)]
    pub hosts: BTreeMap<String, HostConfig>,
}

/// Settings that apply to every host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Tunnel PATCH, PUT and DELETE through POST.
    #[serde(default = "default_true")]
    pub method_override: bool,

    /// Resolve endpoint locations from the server before the first request.
    #[serde(default)]
    pub location_discovery: bool,

    /// `enabled` or `disabled`.
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_true() -> bool {
    true
}

fn default_prompt() -> String {
    "enabled".to_string()
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            method_override: true,
            location_discovery: false,
            prompt: default_prompt(),
        }
    }
}

/// Settings for one host.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct HostConfig {
    /// Collection URL used when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_project: Option<String>,

    /// Forces one API version for every request to this host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl HostConfig {
    /// Parses the configured API version, if any.
    pub fn api_version(&self) -> Result<Option<ApiResourceVersion>> {
        self.api_version
            .as_deref()
            .map(|raw| {
                raw.parse::<ApiResourceVersion>()
                    .map_err(|e| anyhow::anyhow!("Invalid api_version '{}': {}", raw, e))
            })
            .transpose()
    }
}

/// Environment variable overriding `core.method_override`.
pub const METHOD_OVERRIDE_ENV: &str = "TFGIT_HTTP_METHOD_OVERRIDE";

const CORE_KEYS: &[&str] = &["method_override", "location_discovery", "prompt"];
const HOST_FIELDS: &[&str] = &["url", "user", "default_project", "api_version"];

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Writes the configuration, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(&normalize_host(host))
    }

    /// The collection URL to use when none was given: the only configured
    /// host with a `url`, if there is exactly one.
    pub fn default_collection(&self) -> Option<&str> {
        let mut urls = self.hosts.values().filter_map(|h| h.url.as_deref());
        match (urls.next(), urls.next()) {
            (Some(url), None) => Some(url),
            _ => None,
        }
    }

    /// `method_override`, unless `TFGIT_HTTP_METHOD_OVERRIDE` says otherwise.
    pub fn method_override(&self) -> bool {
        env_flag(
            std::env::var(METHOD_OVERRIDE_ENV).ok().as_deref(),
            self.core.method_override,
        )
    }

    pub fn prompts_enabled(&self) -> bool {
        self.core.prompt != "disabled"
    }

    /// Reads a setting by key.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "method_override" => Some(self.core.method_override.to_string()),
            "location_discovery" => Some(self.core.location_discovery.to_string()),
            "prompt" => Some(self.core.prompt.clone()),
            _ => {
                let (host, field) = split_host_key(key)?;
                let cfg = self.host_config(host)?;
                match field {
                    "url" => cfg.url.clone(),
                    "user" => cfg.user.clone(),
                    "default_project" => cfg.default_project.clone(),
                    "api_version" => cfg.api_version.clone(),
                    _ => None,
                }
            }
        }
    }

    /// Updates a setting by key, validating the value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "method_override" => self.core.method_override = parse_bool(key, value)?,
            "location_discovery" => self.core.location_discovery = parse_bool(key, value)?,
            "prompt" => match value {
                "enabled" | "disabled" => self.core.prompt = value.to_string(),
                _ => bail!("prompt must be 'enabled' or 'disabled'"),
            },
            _ => {
                let Some((host, field)) = split_host_key(key) else {
                    bail!("Unknown configuration key: {}", key);
                };
                if field == "api_version" {
                    value
                        .parse::<ApiResourceVersion>()
                        .map_err(|e| anyhow::anyhow!("Invalid api_version '{}': {}", value, e))?;
                }
                let cfg = self.hosts.entry(normalize_host(host)).or_default();
                let slot = match field {
                    "url" => &mut cfg.url,
                    "user" => &mut cfg.user,
                    "default_project" => &mut cfg.default_project,
                    "api_version" => &mut cfg.api_version,
                    _ => bail!("Unknown host field: {}", field),
                };
                *slot = Some(value.to_string());
            }
        }
        Ok(())
    }

    /// Resets a core setting to its default or clears a host field. A host
    /// left with no fields is removed.
    pub fn unset(&mut self, key: &str) -> Result<()> {
        let defaults = CoreConfig::default();
        match key {
            "method_override" => self.core.method_override = defaults.method_override,
            "location_discovery" => self.core.location_discovery = defaults.location_discovery,
            "prompt" => self.core.prompt = defaults.prompt,
            _ => {
                let Some((host, field)) = split_host_key(key) else {
                    bail!("Unknown configuration key: {}", key);
                };
                let host = normalize_host(host);
                if let Some(cfg) = self.hosts.get_mut(&host) {
                    match field {
                        "url" => cfg.url = None,
                        "user" => cfg.user = None,
                        "default_project" => cfg.default_project = None,
                        _ => cfg.api_version = None,
                    }
                    if *cfg == HostConfig::default() {
                        self.hosts.remove(&host);
                    }
                }
            }
        }
        Ok(())
    }

    /// All set keys with their values, core settings first.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = CORE_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (k.to_string(), v)))
            .collect();
        for host in self.hosts.keys() {
            for field in HOST_FIELDS {
                let key = format!("hosts.{}.{}", host, field);
                if let Some(value) = self.get(&key) {
                    entries.push((key, value));
                }
            }
        }
        entries
    }
}

/// Splits `hosts.<host>.<field>`. Host names contain dots, so the field is
/// whatever follows the last one.
fn split_host_key(key: &str) -> Option<(&str, &str)> {
    let rest = key.strip_prefix("hosts.")?;
    let (host, field) = rest.rsplit_once('.')?;
    if host.is_empty() || !HOST_FIELDS.contains(&field) {
        return None;
    }
    Some((host, field))
}

/// Reads a boolean environment value; unset or unrecognized keeps `default`.
fn env_flag(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => default,
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => bail!("{} must be true or false", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.core.method_override);
        assert!(!config.core.location_discovery);
        assert!(config.prompts_enabled());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("location_discovery", "true").unwrap();
        config
            .set("hosts.dev.azure.com.url", "https://dev.azure.com/fabrikam")
            .unwrap();
        config
            .set("hosts.dev.azure.com.default_project", "Fabrikam-Fiber")
            .unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(
            loaded.get("hosts.dev.azure.com.default_project").as_deref(),
            Some("Fabrikam-Fiber")
        );
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[core]\nprompt = \"disabled\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.core.method_override);
        assert!(!config.prompts_enabled());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("method_override", "maybe").is_err());
        assert!(config.set("prompt", "sometimes").is_err());
        assert!(config.set("editor", "vim").is_err());
        assert!(config.set("hosts.tfs.local.api_version", "two").is_err());
        assert!(config.set("hosts.tfs.local.colour", "red").is_err());
    }

    #[test]
    fn test_host_keys_normalize() {
        let mut config = Config::default();
        config.set("hosts.TFS.Example.com.user", "ada").unwrap();
        assert_eq!(config.host_config("tfs.example.com").unwrap().user.as_deref(), Some("ada"));
    }

    #[test]
    fn test_host_api_version() {
        let host = HostConfig {
            api_version: Some("2.0-preview.1".to_string()),
            ..Default::default()
        };
        assert_eq!(host.api_version().unwrap().unwrap().to_string(), "2.0-preview.1");
        assert!(HostConfig::default().api_version().unwrap().is_none());
    }

    #[test]
    fn test_default_collection_needs_single_url() {
        let mut config = Config::default();
        assert_eq!(config.default_collection(), None);
        config.set("hosts.dev.azure.com.url", "https://dev.azure.com/a").unwrap();
        assert_eq!(config.default_collection(), Some("https://dev.azure.com/a"));
        config.set("hosts.tfs.local.url", "https://tfs.local/tfs/Default").unwrap();
        assert_eq!(config.default_collection(), None);
    }

    #[test]
    fn test_unset_restores_defaults_and_drops_empty_hosts() {
        let mut config = Config::default();
        config.set("method_override", "false").unwrap();
        config.set("hosts.tfs.local.user", "ada").unwrap();

        config.unset("method_override").unwrap();
        config.unset("hosts.tfs.local.user").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.unset("hosts.tfs.local").is_err());
    }

    #[test]
    fn test_env_flag() {
        assert!(!env_flag(Some("0"), true));
        assert!(env_flag(Some("TRUE"), false));
        assert!(env_flag(Some("maybe"), true));
        assert!(!env_flag(None, false));
    }

    #[test]
    fn test_entries_order() {
        let mut config = Config::default();
        config.set("hosts.dev.azure.com.user", "ada").unwrap();
        let keys: Vec<String> = config.entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "method_override",
                "location_discovery",
                "prompt",
                "hosts.dev.azure.com.user"
            ]
        );
    }
}
