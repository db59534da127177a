use filter_config::error::SettingsError;
use model::error::FilterError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize the predicate tree: {0}")]
    FilterDeserialize(#[from] serde_json::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(serde_json::Error),

    #[error("Failed to compile the filter: {0}")]
    Compile(#[from] FilterError),

    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),
}
