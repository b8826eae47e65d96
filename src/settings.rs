//! Theme preferences, owned by whoever loads them and saved on every change.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub primary_color: String,
    pub font_family: String,
    pub dark_mode: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "222.2 47.4% 11.2%".to_string(),
            font_family: "'Inter', system-ui, sans-serif".to_string(),
            dark_mode: false,
        }
    }
}

#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: ThemeSettings,
}

impl SettingsStore {
    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings file {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse settings file {}", path.display()))?
        } else {
            debug!(path = %path.display(), "no settings file, using defaults");
            ThemeSettings::default()
        };

        Ok(Self { path, settings })
    }

    pub fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_primary_color(&mut self, color: &str) -> Result<()> {
        self.settings.primary_color = color.to_string();
        self.save()
    }

    pub fn set_font_family(&mut self, font: &str) -> Result<()> {
        self.settings.font_family = font.to_string();
        self.save()
    }

    pub fn set_dark_mode(&mut self, dark: bool) -> Result<()> {
        self.settings.dark_mode = dark;
        self.save()
    }

    pub fn toggle_dark_mode(&mut self) -> Result<()> {
        self.set_dark_mode(!self.settings.dark_mode)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.settings = ThemeSettings::default();
        self.save()
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content =
            serde_yaml::to_string(&self.settings).context("Failed to serialize settings")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings file {}", self.path.display()))?;
        info!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
