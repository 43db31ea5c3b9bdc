//! Configuration management for Courier CLI
//!
//! Stores named webhooks and the default one in ~/.config/courier/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const CONFIG_DIR: &str = "courier";
const CONFIG_FILE: &str = "config.toml";

/// A named Discord webhook
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// CLI Configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_webhook: Option<String>,
    #[serde(default)]
    pub webhooks: BTreeMap<String, Webhook>,
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        Self::parse(&content)
    }

    fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory {:?}", dir))?;

        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {:?}", path))?;

        Ok(())
    }

    /// Add or replace a webhook
    pub fn add_webhook(&mut self, name: String, url: String, description: Option<String>) {
        self.webhooks.insert(name, Webhook { url, description });
    }

    /// Remove a webhook, clearing the default if it pointed there
    pub fn remove_webhook(&mut self, name: &str) -> bool {
        let removed = self.webhooks.remove(name).is_some();
        if removed && self.default_webhook.as_deref() == Some(name) {
            self.default_webhook = None;
        }
        removed
    }

    /// Set default webhook
    pub fn set_default_webhook(&mut self, name: String) -> bool {
        if self.webhooks.contains_key(&name) {
            self.default_webhook = Some(name);
            true
        } else {
            false
        }
    }

    /// URL of the named webhook, or of the default one
    pub fn webhook_url(&self, name: Option<&str>) -> Option<String> {
        let name = name.or(self.default_webhook.as_deref())?;
        self.webhooks.get(name).map(|w| w.url.clone())
    }
}
