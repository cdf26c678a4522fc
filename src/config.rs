//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application
//! configuration in TOML format with platform-specific directory
//! resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Server bind configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the profile store file.
    pub profiles_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let profiles_path = Self::default_profiles_path()
            .unwrap_or_else(|_| PathBuf::from("profiles.json"));
        Self { profiles_path }
    }
}

impl StorageConfig {
    /// Gets the default profile store path.
    ///
    /// - Linux: `~/.config/ColorSense/profiles.json`
    /// - macOS: `~/Library/Application Support/ColorSense/profiles.json`
    /// - Windows: `%APPDATA%\ColorSense\profiles.json`
    fn default_profiles_path() -> Result<PathBuf> {
        Ok(Config::config_dir()?.join("profiles.json"))
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/ColorSense/config.toml`
/// - macOS: `~/Library/Application Support/ColorSense/config.toml`
/// - Windows: `%APPDATA%\ColorSense\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server bind settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific configuration directory.
    pub fn config_dir() -> Result<PathBuf> {
        let base = dirs::config_dir().context("Could not determine config directory")?;
        Ok(base.join("ColorSense"))
    }

    /// Gets the path of the configuration file.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Checks if the config file exists on disk.
    #[must_use]
    pub fn exists() -> bool {
        Self::config_path().map(|path| path.exists()).unwrap_or(false)
    }

    /// Loads the configuration from disk.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to disk, creating the directory as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host must not be empty");
        }
        if self.storage.profiles_path.as_os_str().is_empty() {
            anyhow::bail!("storage.profiles_path must not be empty");
        }
        Ok(())
    }
}
