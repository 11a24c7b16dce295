//! Error types for summary encoding and decoding

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum CodecError {
    /// E-CODEC-001: the input does not exist or cannot be read
    #[error("cannot read summary file {}: {source}", path.display())]
    MissingInputFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// E-CODEC-002: bad signature, truncated or invalid record
    #[error("malformed summary at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    /// E-CODEC-003: the output cannot be written
    #[error("cannot write summary file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CodecError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        CodecError::Malformed {
            offset,
            reason: reason.into(),
        }
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::MissingInputFile { .. } => "E-CODEC-001",
            CodecError::Malformed { .. } => "E-CODEC-002",
            CodecError::Write { .. } => "E-CODEC-003",
        }
    }
}
