//! Settings loading and saving utilities.
//!
//! Handles the application-wide presence switches and per-project overrides,
//! persisted as TOML at `<config dir>/ide-presence/settings.toml`.
//! Missing files yield defaults; malformed files are reported, not ignored.

use crate::error::{PresenceError, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const SETTINGS_DIR_NAME: &str = "ide-presence";
pub const SETTINGS_FILE_NAME: &str = "settings.toml";
pub const DEFAULT_INACTIVITY_TIMEOUT_MINUTES: u32 = 20;

/// Application-wide presence switches.
///
/// Every field is defaulted so older settings files keep parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub enabled: bool,
    pub show_unknown_image_ide: bool,
    pub show_unknown_image_file: bool,
    pub show_file_extensions: bool,
    pub hide_read_only_files: bool,
    pub show_reading_instead_of_writing: bool,
    pub show_ide_when_no_project_is_available: bool,
    pub hide_after_period_of_inactivity: bool,
    pub inactivity_timeout_minutes: u32,
    pub reset_open_time_after_inactivity: bool,
    pub show_files: bool,
    pub show_elapsed_time: bool,
    pub force_big_ide_icon: bool,
    pub debug_logging_enabled: bool,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            show_unknown_image_ide: true,
            show_unknown_image_file: true,
            show_file_extensions: true,
            hide_read_only_files: true,
            show_reading_instead_of_writing: true,
            show_ide_when_no_project_is_available: true,
            hide_after_period_of_inactivity: true,
            inactivity_timeout_minutes: DEFAULT_INACTIVITY_TIMEOUT_MINUTES,
            reset_open_time_after_inactivity: true,
            show_files: true,
            show_elapsed_time: true,
            force_big_ide_icon: false,
            debug_logging_enabled: false,
        }
    }
}

impl ApplicationSettings {
    pub fn inactivity_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.inactivity_timeout_minutes))
    }
}

/// Per-project presence overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSettings {
    pub enabled: bool,
    pub description: Option<String>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            description: None,
        }
    }
}

/// The on-disk settings structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub application: ApplicationSettings,
    /// Project name → overrides.
    pub projects: BTreeMap<String, ProjectSettings>,
}

impl SettingsFile {
    /// Overrides for a project, or defaults when none are stored.
    pub fn project(&self, name: &str) -> ProjectSettings {
        self.projects.get(name).cloned().unwrap_or_default()
    }
}

/// Returns the directory holding presence settings.
pub fn get_settings_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(SETTINGS_DIR_NAME))
}

/// Returns the path to the settings file.
pub fn get_settings_path() -> Option<PathBuf> {
    get_settings_dir().map(|d| d.join(SETTINGS_FILE_NAME))
}

/// Loads settings from the default location, returning defaults if the file doesn't exist.
pub fn load_settings() -> Result<SettingsFile> {
    let path = get_settings_path().ok_or(PresenceError::ConfigDirNotFound)?;
    load_settings_from(&path)
}

/// Loads settings from `path`, returning defaults if the file doesn't exist.
pub fn load_settings_from(path: &Path) -> Result<SettingsFile> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }

    let content = fs::read_to_string(path).map_err(|source| PresenceError::Io {
        context: format!("reading settings {}", path.display()),
        source,
    })?;

    toml::from_str(&content).map_err(|e| PresenceError::ConfigMalformed {
        path: path.to_path_buf(),
        details: e.to_string(),
    })
}

/// Saves settings to `path`, creating the parent directory when needed.
pub fn save_settings_to(path: &Path, settings: &SettingsFile) -> Result<()> {
    let content =
        toml::to_string_pretty(settings).map_err(|e| PresenceError::ConfigMalformed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| PresenceError::ConfigWriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, content).map_err(|source| PresenceError::ConfigWriteFailed {
        path: path.to_path_buf(),
        source,
    })
}
