//! Error types for building and merging summary indices

use crate::guid::Guid;
use thiserror::Error;

/// Errors raised while inserting into or merging a [`crate::ModuleSummaryIndex`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// E-MERGE-001: two summaries claim the same GUID
    #[error("duplicate function GUID {guid}{} while merging `{module}`", name_suffix(.name))]
    DuplicateFunctionGuid {
        guid: Guid,
        name: Option<String>,
        /// Name of the index the conflicting summary came from
        module: String,
    },
}

impl MergeError {
    /// Error code for machine-readable output
    pub fn code(&self) -> &'static str {
        match self {
            MergeError::DuplicateFunctionGuid { .. } => "E-MERGE-001",
        }
    }
}

fn name_suffix(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" ({})", name),
        None => String::new(),
    }
}
