//! Link-time orchestration: load, merge, analyze, write

use crate::{DriverError, LtoConfig};
use modsum_codec::{decode, read_bytes, read_summary, write_summary};
use modsum_core::{ModuleSummaryIndex, COMBINED_INDEX_NAME};
use modsum_indexer::{build_module_summary, ModuleFacts};
use modsum_liveness::{compute_roots, mark_live_functions, LivenessTrace};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Result of a successful link step
#[derive(Debug, Clone)]
pub struct LtoOutcome {
    pub functions: usize,
    pub live: usize,
    pub dead: usize,
    pub used_types: usize,
    /// Trace of the configured symbol, if it was reached
    pub trace: Option<LivenessTrace>,
}

/// Run one link step as described by `config`
///
/// Every input is read before any is decoded, so a missing file is reported
/// before processing starts. The output is only written once the analysis
/// succeeded.
pub fn run_lto(config: &LtoConfig) -> Result<LtoOutcome, DriverError> {
    if config.inputs.is_empty() {
        return Err(DriverError::NoInputs);
    }

    let mut buffers = Vec::with_capacity(config.inputs.len());
    for path in &config.inputs {
        let bytes = read_bytes(path).map_err(|err| DriverError::input(path.clone(), err))?;
        buffers.push((path, bytes));
    }

    let mut combined = ModuleSummaryIndex::new(COMBINED_INDEX_NAME);
    for (path, bytes) in buffers {
        debug!(path = %path.display(), "Loading module summary");
        let index = decode(&bytes).map_err(|err| DriverError::input(path.clone(), err))?;
        combined.merge(index)?;
    }

    let roots = compute_roots(&combined, config.entry_symbol.as_deref());
    let report = mark_live_functions(&mut combined, &roots, config.trace_symbol.as_deref())?;

    write_summary(&combined, &config.output).map_err(DriverError::Output)?;

    let outcome = LtoOutcome {
        functions: combined.len(),
        live: combined.live_functions().count(),
        dead: combined.dead_functions().count(),
        used_types: report.used_types.len(),
        trace: report.trace,
    };
    info!(
        inputs = config.inputs.len(),
        functions = outcome.functions,
        dead = outcome.dead,
        output = %config.output.display(),
        "Wrote combined summary"
    );
    Ok(outcome)
}

/// Build a module summary from a JSON facts file and write it to `output`
pub fn run_index(facts_path: &Path, output: &Path) -> Result<ModuleSummaryIndex, DriverError> {
    let json = fs::read_to_string(facts_path).map_err(|source| DriverError::FactsIo {
        path: facts_path.to_path_buf(),
        source,
    })?;
    let facts = ModuleFacts::from_json(&json).map_err(|source| DriverError::FactsParse {
        path: facts_path.to_path_buf(),
        source,
    })?;

    let index = build_module_summary(&facts)?;
    write_summary(&index, output).map_err(DriverError::Output)?;
    Ok(index)
}

/// Decode a summary file and render it as JSON
pub fn run_dump(path: &Path, pretty: bool) -> Result<String, DriverError> {
    let index = read_summary(path).map_err(|err| DriverError::input(path.to_path_buf(), err))?;
    let json = if pretty {
        serde_json::to_string_pretty(&index)?
    } else {
        serde_json::to_string(&index)?
    };
    Ok(json)
}

/// Labels of the functions a summary file leaves dead
pub fn dead_functions(path: &Path) -> Result<Vec<String>, DriverError> {
    let index = read_summary(path).map_err(|err| DriverError::input(path.to_path_buf(), err))?;
    Ok(index
        .functions()
        .filter(|f| !f.is_live())
        .map(|f| f.label())
        .collect())
}
