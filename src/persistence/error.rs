use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read cache file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to remove cache file '{0}'")]
    Remove(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode compact snapshot")]
    Encode(#[source] Box<bincode::error::EncodeError>),

    #[error("Failed to decode compact snapshot")]
    Decode(#[source] Box<bincode::error::DecodeError>),

    #[error("Failed to (de)serialize JSON snapshot")]
    Json(#[from] serde_json::Error),
}
