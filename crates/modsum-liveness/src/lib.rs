//! modsum-liveness: conservative reachability over the combined index
//!
//! A worklist mark phase in the style of a garbage collector:
//! 1. seed the worklist with the roots (preserved functions and the entry point)
//! 2. mark each popped function live, record the types it references
//! 3. push direct callees, and every registered implementation of each slot
//!    the function calls through
//!
//! The result is a fixed point: every direct callee and every slot
//! implementation reachable from a live function is live. Functions left
//! dead are candidates for elimination.
//!
//! Referencing a GUID that has no summary is a producer bug and aborts the
//! analysis with [`LivenessError::UnknownGuid`].

mod analyzer;
mod error;
mod roots;
mod trace;

pub use analyzer::{LivenessAnalyzer, LivenessReport};
pub use error::LivenessError;
pub use roots::compute_roots;
pub use trace::{LivenessTrace, TraceEntry, TraceReason};

use modsum_core::{Guid, ModuleSummaryIndex};
use std::collections::BTreeSet;
use tracing::info;

/// Mark everything reachable from `roots` as live
///
/// When `trace_target` names a function, the report carries the chain that
/// first reached it.
pub fn mark_live_functions(
    index: &mut ModuleSummaryIndex,
    roots: &BTreeSet<Guid>,
    trace_target: Option<&str>,
) -> Result<LivenessReport, LivenessError> {
    let report = LivenessAnalyzer::new(index)
        .with_trace_target(trace_target)
        .run(roots)?;

    info!(
        roots = roots.len(),
        live = report.visited,
        dead = index.len() - report.visited,
        used_types = report.used_types.len(),
        "Liveness analysis finished"
    );
    Ok(report)
}
