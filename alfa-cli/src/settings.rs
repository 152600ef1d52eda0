//! Console settings.
//!
//! Read from `settings.json` in the config directory. `ALFA_API_URL`
//! overrides the file.

use std::fs;
use std::path::Path;

use alfa_grid::config::DEFAULT_PAGE_SIZE;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::paths::AppPaths;

pub const API_URL_VAR: &str = "ALFA_API_URL";

const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the console API.
    pub api_url: String,
    /// Rows per table page.
    pub page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Load from the settings file, if there is a config directory, and
    /// apply the environment.
    pub fn load(paths: Option<&AppPaths>) -> Result<Self, SettingsError> {
        let settings = match paths {
            Some(paths) => Self::load_from(&paths.settings_file())?,
            None => Self::default(),
        };
        Ok(settings.with_env_override(std::env::var(API_URL_VAR).ok()))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        serde_json::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    fn with_env_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            log::debug!("API URL overridden by {}", API_URL_VAR);
            self.api_url = url;
        }
        self
    }
}
