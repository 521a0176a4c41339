//! Error types for CLI operations

use thiserror::Error;

/// CLI errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Signing or verification failed
    #[error("{0}")]
    Handshake(#[from] duoweb::DuoWebError),

    /// Keys could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] duoweb::ConfigError),

    /// Invalid command arguments
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Short category label used in JSON error output
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Handshake(e) => e.kind(),
            Self::Config(_) => "config",
            Self::InvalidArguments(_) => "invalid_arguments",
            Self::Json(_) => "json",
            Self::Io(_) => "io",
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = std::result::Result<T, CliError>;
