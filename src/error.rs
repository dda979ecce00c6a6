// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LearnError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("sample not found: {0}")]
    NotFound(String),

    #[error("invalid sample id '{0}'")]
    InvalidSampleId(String),

    #[error("invalid rule '{pattern}': {reason}")]
    InvalidRule { pattern: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),
}

impl LearnError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json { path: path.into(), source }
    }

    pub fn invalid_rule(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule { pattern: pattern.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, LearnError>;
