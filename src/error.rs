use crate::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the log browser library
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to read log '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Date format compiles to an invalid pattern '{pattern}': {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown date field: '{0}'. Valid fields are: day, month, year, hour, minute, second")]
    UnknownField(String),

    #[error("Failed to copy log text: {0}")]
    Clipboard(String),
}
