// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the pingback receiver.
//!
//! Values come from an optional JSON file (`CONFIG_FILE`) and are then
//! overridden by environment variables.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the pingback receiver service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Source document fetching
    #[serde(default)]
    pub fetch: FetchConfig,

    /// HTTP ingress limits
    #[serde(default)]
    pub server: ServerConfig,

    /// Target URLs that accept pingbacks
    #[serde(default)]
    pub targets: Vec<String>,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// How source documents are fetched during verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Hard timeout for the source GET in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent to source sites
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Bytes of a source document read before the rest is dropped (default: 1 MiB)
    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: usize,
}

/// HTTP ingress configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Largest accepted request body (default: 64 KiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Take the client address from `X-Forwarded-For` (default: false)
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("pingback-receiver/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_max_source_bytes() -> usize {
    1024 * 1024
}

fn default_max_body_bytes() -> usize {
    64 * 1024
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            fetch: FetchConfig::default(),
            server: ServerConfig::default(),
            targets: Vec::new(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            max_source_bytes: default_max_source_bytes(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: default_max_body_bytes(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl FetchConfig {
    /// Get the source fetch timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load a configuration file, filling unset fields with defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Load from `CONFIG_FILE` (if set) and apply environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `BIND_ADDR`, `FETCH_TIMEOUT_SECS`, `PINGBACK_TARGETS` and
    /// `TRUST_FORWARDED_FOR` from the given lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_addr = addr;
        }

        if let Some(value) = lookup("FETCH_TIMEOUT_SECS") {
            self.fetch.timeout_secs = match value.trim().parse() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "FETCH_TIMEOUT_SECS",
                        value,
                    })
                }
            };
        }

        if let Some(value) = lookup("PINGBACK_TARGETS") {
            self.targets = value
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(value) = lookup("TRUST_FORWARDED_FOR") {
            self.server.trust_forwarded_for = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "TRUST_FORWARDED_FOR",
                        value,
                    })
                }
            };
        }

        Ok(())
    }
}
