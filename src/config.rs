use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::style::HouseStyle;

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub style: HouseStyle,
    pub lists: ListsConfig,
    pub page: PageConfig,
}

/// List markers used when exporting.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListsConfig {
    pub bullet_marker: String,
    pub numbering: String,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            bullet_marker: "•".to_string(),
            numbering: "1.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub paper: String,
    pub numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            paper: "a4".to_string(),
            numbers: false,
        }
    }
}

impl Config {
    /// The config shipped with the crate (validated by the build script).
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    /// Load config from a TOML file, or return defaults if not found.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                log::warn!("ignoring invalid config {}: {}", path.display(), e);
                Self::compiled_default()
            }),
            Err(_) => Self::compiled_default(),
        }
    }
}
