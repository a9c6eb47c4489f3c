use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid quality value: {0}. Must be between 1 and 100")]
    InvalidQuality(u8),

    #[error("Unknown compression method: {0}")]
    UnknownMethod(String),

    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to encode {format} output: {reason}")]
    Encode { format: String, reason: String },

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// Coarse classification used in reports and exit handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    ConfigurationError,
    DecodeError,
    UnsupportedFormatError,
    WriteError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConfigurationError => "ConfigurationError",
            ErrorKind::DecodeError => "DecodeError",
            ErrorKind::UnsupportedFormatError => "UnsupportedFormatError",
            ErrorKind::WriteError => "WriteError",
        };
        f.write_str(name)
    }
}

impl CompressionError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Configuration(message.into())
    }

    pub fn decode<S: Into<String>>(path: impl Into<PathBuf>, reason: S) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CompressionError::Configuration(_)
            | CompressionError::InvalidQuality(_)
            | CompressionError::UnknownMethod(_)
            | CompressionError::InputNotFound(_) => ErrorKind::ConfigurationError,
            CompressionError::Decode { .. } => ErrorKind::DecodeError,
            CompressionError::UnsupportedFormat(_) => ErrorKind::UnsupportedFormatError,
            CompressionError::Encode { .. }
            | CompressionError::PngOptimization(_)
            | CompressionError::Write { .. }
            | CompressionError::DirectoryCreationFailed(_) => ErrorKind::WriteError,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
