// crates/retag/src/error.rs
// Standardized error types for retag

use thiserror::Error;

/// Main error type for the retag library
#[derive(Error, Debug)]
pub enum RetagError {
    #[error("no value provided")]
    NoValue,

    #[error("invalid image value '{0}': must not contain whitespace")]
    InvalidValue(String),

    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("file server connection failed: {0}")]
    Connect(String),

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("invalid match pattern: {0}")]
    InvalidPattern(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("image catalog error: {0}")]
    Catalog(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

/// Convenience type alias for Result using RetagError
pub type Result<T> = std::result::Result<T, RetagError>;

impl From<dialoguer::Error> for RetagError {
    fn from(err: dialoguer::Error) -> Self {
        RetagError::Prompt(err.to_string())
    }
}
