use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file '{}' not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid block size: {0}. Must be at least 1")]
    InvalidBlockSize(usize),

    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Invalid size '{0}'. Expected WIDTHxHEIGHT, e.g. 640x480")]
    InvalidSize(String),

    #[error("Invalid integer seed '{0}'")]
    InvalidSeed(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, EtcError>;
