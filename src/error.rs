use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to the viewer. None of them are retried.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("{path}: not a DICOM file ({reason})")]
    Format { path: PathBuf, reason: String },

    #[error("no input files were supplied")]
    EmptyInput,

    #[error("invalid window: max ({max}) must be greater than min ({min}), both within 0-255")]
    InvalidRange { min: i32, max: i32 },

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("{path}: failed to decode pixel data ({reason})")]
    Decode { path: PathBuf, reason: String },

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error("unknown file `{0}`")]
    UnknownFile(String),

    #[error("no file is selected")]
    NoSelection,

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ViewerError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Whether the error concerns a single input file rather than the batch.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::Format { .. } | Self::Decode { .. } | Self::Io { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
