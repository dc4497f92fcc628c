//! Engine error types.

use thiserror::Error;

/// Errors raised while building an index or loading its configuration.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("World width must be at least 1, got {0}")]
    InvalidWorldWidth(i32),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Could not serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
