//! Wizard configuration: where catalogs come from, where orders go, and
//! how much to log.
//!
//! Stored as JSON. Every field has a default, so an empty object (or no
//! file at all) is a valid configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::source::{source_for, CatalogSource};
use crate::submission::{Dispatcher, FileBridge, HttpBridge, SubmissionTransport};

/// Log levels accepted in `log_level`.
const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Where confirmed orders are handed off.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BridgeConfig {
    /// No host bridge: orders are acknowledged locally.
    #[default]
    Local,
    /// POST the order JSON to a URL.
    Http { url: String },
    /// Write the order JSON to a file.
    File { path: PathBuf },
}

impl BridgeConfig {
    /// Build the configured transport, if any.
    pub fn transport(&self) -> Option<Box<dyn SubmissionTransport>> {
        match self {
            Self::Local => None,
            Self::Http { url } => Some(Box::new(HttpBridge::new(url.clone()))),
            Self::File { path } => Some(Box::new(FileBridge::new(path.clone()))),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// File path or http(s) URL of the trade point catalog.
    pub trade_points: String,
    /// File path or http(s) URL of the tariff catalog.
    pub tariffs: String,
    /// Default tracing level; `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Log destination while the TUI owns the terminal.
    pub log_file: PathBuf,
    pub bridge: BridgeConfig,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            trade_points: "data/trade_points.json".to_string(),
            tariffs: "data/tariffs.json".to_string(),
            log_level: "info".to_string(),
            log_file: PathBuf::from("order-wizard.log"),
            bridge: BridgeConfig::Local,
        }
    }
}

impl WizardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise. The result is validated.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.trade_points.trim().is_empty() {
            anyhow::bail!("Trade point catalog location must be specified");
        }
        if self.tariffs.trim().is_empty() {
            anyhow::bail!("Tariff catalog location must be specified");
        }

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Unknown log level '{}' (expected one of: {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            );
        }

        if self.log_file.as_os_str().is_empty() {
            anyhow::bail!("Log file must be specified");
        }

        match &self.bridge {
            BridgeConfig::Local => {}
            BridgeConfig::Http { url } => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("Bridge URL must start with http:// or https://");
                }
            }
            BridgeConfig::File { path } => {
                if path.as_os_str().is_empty() {
                    anyhow::bail!("Bridge file path must be specified");
                }
            }
        }

        Ok(())
    }

    pub fn trade_point_source(&self) -> Box<dyn CatalogSource> {
        source_for(&self.trade_points)
    }

    pub fn tariff_source(&self) -> Box<dyn CatalogSource> {
        source_for(&self.tariffs)
    }

    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.bridge.transport())
    }
}
