//! Render settings management
//!
//! Controls how snapshots are turned into JSON or YAML text. Stored in a
//! plain JSON file; a missing or unreadable file falls back to defaults.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{KeychainError, Result};

/// How binary values (codes, generic data, the secret) are written as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum BinaryEncoding {
    Hex,
    #[default]
    Base64,
    /// UTF-8 with invalid sequences replaced
    Utf8Lossy,
}

/// How dates are written as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum TimestampFormat {
    /// e.g. `2013-01-02T03:04:05+00:00`
    #[default]
    Rfc3339,
    /// The store's own form, e.g. `20130102030405Z`
    StoreFormat,
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderSettings {
    /// Settings file version
    pub version: u32,
    /// Encoding for binary values
    pub binary_encoding: BinaryEncoding,
    /// Encoding for dates
    pub timestamp_format: TimestampFormat,
    /// Whether the secret is written; when false the `password` key is null
    pub include_password: bool,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            version: 1,
            binary_encoding: BinaryEncoding::default(),
            timestamp_format: TimestampFormat::default(),
            include_password: true,
            pretty: true,
        }
    }
}

/// Settings manager
pub struct SettingsManager {
    settings_file: PathBuf,
    settings: RenderSettings,
}

impl SettingsManager {
    /// Create a settings manager reading `render.json` from `config_dir`
    pub fn new(config_dir: &Path) -> Self {
        let settings_file = config_dir.join("render.json");
        let settings = Self::load_from_file(&settings_file).unwrap_or_else(|e| {
            warn!("Ignoring unreadable settings file {:?}: {}", settings_file, e);
            RenderSettings::default()
        });

        Self {
            settings_file,
            settings,
        }
    }

    /// Per-user configuration directory
    pub fn default_dir() -> Result<PathBuf> {
        ProjectDirs::from("com", "symbia-labs", "keychain-item")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| {
                KeychainError::Settings("Could not determine config directory".to_string())
            })
    }

    /// Load settings from file
    fn load_from_file(path: &Path) -> Result<RenderSettings> {
        if !path.exists() {
            debug!("No settings file found, using defaults");
            return Ok(RenderSettings::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings: RenderSettings = serde_json::from_str(&contents)?;
        debug!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.settings_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&self.settings)?;

        // Write atomically using temp file
        let temp_path = self.settings_file.with_extension("tmp");
        std::fs::write(&temp_path, &contents)?;
        std::fs::rename(&temp_path, &self.settings_file)?;

        debug!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }

    /// Get current settings
    pub fn get(&self) -> &RenderSettings {
        &self.settings
    }

    /// Get mutable settings
    pub fn get_mut(&mut self) -> &mut RenderSettings {
        &mut self.settings
    }

    /// Update settings and save
    pub fn update(&mut self, settings: RenderSettings) -> Result<()> {
        self.settings = settings;
        self.save()
    }

    /// Reset settings to defaults and delete settings file
    pub fn reset(&mut self) -> Result<()> {
        self.settings = RenderSettings::default();

        if self.settings_file.exists() {
            std::fs::remove_file(&self.settings_file)
                .map_err(|e| KeychainError::Settings(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_settings_default() {
        let temp_dir = TempDir::new().unwrap();
        let manager = SettingsManager::new(temp_dir.path());

        let settings = manager.get();
        assert_eq!(settings.binary_encoding, BinaryEncoding::Base64);
        assert_eq!(settings.timestamp_format, TimestampFormat::Rfc3339);
        assert!(settings.include_password);
        assert!(settings.pretty);
    }

    #[test]
    fn test_settings_persistence() {
        let temp_dir = TempDir::new().unwrap();

        {
            let mut manager = SettingsManager::new(temp_dir.path());
            manager.get_mut().binary_encoding = BinaryEncoding::Hex;
            manager.get_mut().include_password = false;
            manager.save().unwrap();
        }

        {
            let manager = SettingsManager::new(temp_dir.path());
            assert_eq!(manager.get().binary_encoding, BinaryEncoding::Hex);
            assert!(!manager.get().include_password);
        }
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("render.json"),
            r#"{ "timestampFormat": "storeFormat", "binaryEncoding": "utf8Lossy" }"#,
        )
        .unwrap();

        let manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.get().timestamp_format, TimestampFormat::StoreFormat);
        assert_eq!(manager.get().binary_encoding, BinaryEncoding::Utf8Lossy);
        assert!(manager.get().pretty);
    }

    #[test]
    fn test_corrupt_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("render.json"), "not json").unwrap();

        let manager = SettingsManager::new(temp_dir.path());
        assert_eq!(manager.get(), &RenderSettings::default());
    }

    #[test]
    fn test_reset() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new(temp_dir.path());
        manager
            .update(RenderSettings {
                pretty: false,
                ..RenderSettings::default()
            })
            .unwrap();
        assert!(temp_dir.path().join("render.json").exists());

        manager.reset().unwrap();
        assert!(manager.get().pretty);
        assert!(!temp_dir.path().join("render.json").exists());
    }
}
