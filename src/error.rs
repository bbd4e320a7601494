use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Broad category of a failure, reported alongside the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    IoFailure,
    ToolFailure,
    Config,
}

#[derive(Debug, Error)]
pub enum HandfontError {
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("I/O error while {context} ({}): {source}", path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write image {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{tool} failed: {message}")]
    Tool { tool: &'static str, message: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },
}

impl HandfontError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } | Self::Decode { .. } => ErrorKind::InvalidInput,
            Self::Io { .. } | Self::Encode { .. } => ErrorKind::IoFailure,
            Self::Tool { .. } => ErrorKind::ToolFailure,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub(crate) fn io(context: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            context,
            path: path.into(),
            source,
        }
    }

    pub(crate) fn tool(tool: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Tool {
            tool,
            message: message.to_string(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

pub type HandfontResult<T> = Result<T, HandfontError>;
