use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating compiler settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings document is not valid JSON or has unknown keys.
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// The settings parsed but are inconsistent.
    #[error("Invalid settings: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
