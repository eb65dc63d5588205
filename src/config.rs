//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Everything is static for the process lifetime — there is no reload.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub monitor: MonitorConfig,
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    /// Screener endpoint without query string.
    pub base_url: String,
    /// Screener view identifier (table layout variant).
    pub view: String,
    /// Comma-separated filter expression, urlencoded into the URL.
    pub filters: String,
    /// Milliseconds between poll cycles.
    pub poll_interval_ms: u64,
    /// Rows with fewer cells than this are discarded by the parser.
    pub min_columns: usize,
}

impl MonitorConfig {
    /// The full screener URL with the filter expression encoded.
    pub fn screener_url(&self) -> String {
        format!(
            "{}?v={}&f={}",
            self.base_url,
            self.view,
            urlencoding::encode(&self.filters),
        )
    }
}

/// Snapshot store backend selection.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable SQLite file — snapshot survives restarts.
    Sqlite,
    /// Process memory — resets on restart.
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file path (sqlite backend only).
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
