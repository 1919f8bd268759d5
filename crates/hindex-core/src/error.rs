use thiserror::Error;

/// All the ways things can go wrong in hindex
///
/// Bad stored data and bad user input never show up here: the first falls back
/// to a fresh state, the second gets clamped. What's left is the plumbing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    CacheError(#[from] hindex_cache::CacheError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Export failed: {0}")]
    ExportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
