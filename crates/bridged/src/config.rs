//! bridge.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub bridge: BridgeSettings,
    /// Remote services probed by the composite service indicator.
    #[serde(default, rename = "service")]
    pub services: Vec<ServiceConfig>,
    /// Applications pre-registered at startup. They start `UNKNOWN`
    /// until they report their own health.
    #[serde(default, rename = "application")]
    pub applications: Vec<ApplicationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Refresh cadence for the scheduled health loop (e.g., "30s").
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    /// host:port probed over plain HTTP.
    pub address: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Probe budget (e.g., "2s").
    #[serde(default = "default_timeout")]
    pub timeout: String,
    /// Minimum compatible remote version (semver).
    pub min_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub id: String,
    pub name: String,
}

fn default_port() -> u16 {
    8080
}

fn default_refresh_interval() -> String {
    "30s".to_string()
}

fn default_path() -> String {
    "/healthcheck".to_string()
}

fn default_timeout() -> String {
    "2s".to_string()
}

impl BridgeConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: BridgeConfig = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Parse a duration string like "5s", "500ms", "2m". Plain numbers are
/// seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}
