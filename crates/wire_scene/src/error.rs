//! # Scene Error Types
//!
//! All errors that can occur while managing or persisting a scene.

use std::path::PathBuf;

use thiserror::Error;
use wire_core::{CodecError, ConfigError, EcsError};

/// Errors that can occur in the scene layer.
#[derive(Error, Debug)]
pub enum SceneError {
    /// A file or directory could not be read or written.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// An entity file could not be decoded.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// The entity file.
        path: PathBuf,
        /// What the codec reported.
        source: CodecError,
    },

    /// An entity could not be encoded.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The registry rejected an operation.
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// The scene configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SceneError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
