use crate::settings::config::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Loads engine settings from a TOML file. Settings are read once at startup;
/// the engine never writes them back except to repair a missing or corrupt
/// file.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Loads `~/.fileops/settings.toml`, creating it if needed.
    pub fn new() -> Result<Self> {
        Self::from_path(Self::default_settings_path()?)
    }

    /// Loads settings from `path`. A missing file is created with defaults; a
    /// file that fails to parse is moved aside and replaced by defaults.
    pub fn from_path(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            Self::write_defaults(&path)?;
        }

        let settings = Self::load_from_file_with_backup(&path)?;
        Ok(Self {
            settings_path: path,
            settings,
        })
    }

    fn default_settings_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".fileops").join("settings.toml"))
    }

    fn write_defaults(path: &Path) -> Result<Settings> {
        let default_settings = Settings::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {parent:?}"))?;
        }
        let contents = toml::to_string_pretty(&default_settings)
            .context("Failed to serialize default settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write default settings to {path:?}"))?;
        Ok(default_settings)
    }

    fn load_from_file_with_backup(path: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {path:?}"))?;

        match toml::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("Settings file {path:?} is corrupt, restoring defaults: {e}");
                let backup_path = path.with_extension("toml.backup");
                fs::rename(path, &backup_path).with_context(|| {
                    format!("Failed to backup corrupted settings to {backup_path:?}")
                })?;
                Self::write_defaults(path)
            }
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    pub fn path(&self) -> &Path {
        &self.settings_path
    }
}
