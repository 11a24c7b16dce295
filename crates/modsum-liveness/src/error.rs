//! Error types for the liveness analysis

use modsum_core::Guid;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LivenessError {
    /// E-LIVE-001: an edge or slot implementation names a GUID with no summary
    #[error("reference to unknown function GUID {guid}{}", referrer_suffix(.referenced_by))]
    UnknownGuid {
        guid: Guid,
        /// Label of the live function whose edge led here, `None` for roots
        referenced_by: Option<String>,
    },
}

impl LivenessError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            LivenessError::UnknownGuid { .. } => "E-LIVE-001",
        }
    }
}

fn referrer_suffix(referenced_by: &Option<String>) -> String {
    match referenced_by {
        Some(referrer) => format!(" referenced by {}", referrer),
        None => " in the root set".to_string(),
    }
}
