//! Error types
//!
//! Failures are confined to session construction: a missing atlas or an
//! unreadable settings file. The per-frame simulation has no error path.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("sprite atlas not found at {path}")]
    Missing { path: PathBuf },
    #[error("failed to read sprite atlas {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sprite atlas {path} is empty")]
    Empty { path: PathBuf },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}
