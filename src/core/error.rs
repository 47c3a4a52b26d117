//! Error types for the Terracarve engine

use thiserror::Error;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),
}
