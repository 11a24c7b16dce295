//! Driver configuration

use modsum_core::ENTRY_POINT_SYMBOL;
use std::path::PathBuf;

/// Everything one link step needs to know
#[derive(Debug, Clone)]
pub struct LtoConfig {
    /// Summary files, merged in this order
    pub inputs: Vec<PathBuf>,
    /// Where the annotated combined summary is written
    pub output: PathBuf,
    /// Symbol whose liveness trace should be reported
    pub trace_symbol: Option<String>,
    /// Symbol treated as the program entry point; `None` for libraries
    pub entry_symbol: Option<String>,
}

impl LtoConfig {
    pub fn new(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output: output.into(),
            trace_symbol: None,
            entry_symbol: Some(ENTRY_POINT_SYMBOL.to_string()),
        }
    }

    pub fn with_trace_symbol(mut self, symbol: Option<String>) -> Self {
        self.trace_symbol = symbol;
        self
    }

    pub fn with_entry_symbol(mut self, symbol: Option<String>) -> Self {
        self.entry_symbol = symbol;
        self
    }
}
