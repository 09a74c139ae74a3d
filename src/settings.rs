use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{KmyError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
    /// Always excluded when adding a default tag, on top of `--exclude-tags`.
    #[serde(default)]
    pub excluded_tags: Vec<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_output_suffix() -> String {
    "_fixed".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            output_suffix: default_output_suffix(),
            excluded_tags: Vec::new(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("kmyfix")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// A settings file named on the command line must exist and parse.
pub fn load_explicit_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| KmyError::Settings(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content).map_err(|e| KmyError::Settings(format!("{}: {e}", path.display())))
}
