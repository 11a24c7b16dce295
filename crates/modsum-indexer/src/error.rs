//! Error types for summary indexing

use modsum_core::MergeError;
use thiserror::Error;

/// Errors raised while indexing a module
///
/// All of them mean the front-end handed over facts that contradict each
/// other; none is recoverable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// E-INDEX-001: reflection reference keyed by a non-class, non-protocol method
    #[error("reflection reference in `{referrer}` keyed by non-class, non-protocol method `{method}`")]
    InvalidReflectionTarget { method: String, referrer: String },

    /// E-INDEX-002: a dispatch table or property names a function with no facts
    #[error("`{name}` is referenced by {referrer} but has no function summary")]
    UnknownFunction { name: String, referrer: String },

    /// E-INDEX-003: two functions share a mangled name or GUID
    #[error(transparent)]
    DuplicateFunction(#[from] MergeError),
}

impl IndexError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            IndexError::InvalidReflectionTarget { .. } => "E-INDEX-001",
            IndexError::UnknownFunction { .. } => "E-INDEX-002",
            IndexError::DuplicateFunction(_) => "E-INDEX-003",
        }
    }
}
