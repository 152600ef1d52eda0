use std::path::PathBuf;

use alfa_grid::ConfigError;
use thiserror::Error;

use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid table configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("set ALFA_USER and ALFA_PASSWORD to log in")]
    MissingCredentials,
    #[error("login failed")]
    LoginFailed,
    /// A service failure, already in user-facing form.
    #[error("{0}")]
    Service(String),
}
