//! Error type of the driver

use modsum_codec::CodecError;
use modsum_core::MergeError;
use modsum_indexer::IndexError;
use modsum_liveness::LivenessError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("no input files")]
    NoInputs,

    /// An input path does not exist or cannot be read
    #[error(transparent)]
    MissingInput(CodecError),

    /// An input file failed to decode
    #[error("invalid module summary {}: {source}", path.display())]
    InvalidSummary {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error(transparent)]
    Output(CodecError),

    #[error("cannot read facts file {}: {source}", path.display())]
    FactsIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid facts file {}: {source}", path.display())]
    FactsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Liveness(#[from] LivenessError),
}

impl DriverError {
    /// Wrap a codec error raised while loading `path`
    pub(crate) fn input(path: PathBuf, err: CodecError) -> Self {
        match err {
            CodecError::MissingInputFile { .. } => DriverError::MissingInput(err),
            other => DriverError::InvalidSummary {
                path,
                source: other,
            },
        }
    }

    /// The inputs contradict each other: a producer bug rather than a bad file
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            DriverError::Merge(_) | DriverError::Index(_) | DriverError::Liveness(_)
        )
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        if self.is_contract_violation() {
            2
        } else {
            1
        }
    }

    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            DriverError::NoInputs => "E-DRIVER-001",
            DriverError::MissingInput(err) | DriverError::Output(err) => err.code(),
            DriverError::InvalidSummary { source, .. } => source.code(),
            DriverError::FactsIo { .. } => "E-DRIVER-002",
            DriverError::FactsParse { .. } => "E-DRIVER-003",
            DriverError::Json(_) => "E-DRIVER-004",
            DriverError::Merge(err) => err.code(),
            DriverError::Index(err) => err.code(),
            DriverError::Liveness(err) => err.code(),
        }
    }
}
