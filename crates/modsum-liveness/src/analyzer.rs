//! Worklist mark phase over the merged summary graph

use crate::trace::{LivenessTrace, TraceArena, TraceId, TraceReason};
use crate::LivenessError;
use modsum_core::{CallKind, Guid, ModuleSummaryIndex};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Outcome of a liveness run
#[derive(Debug, Clone, Default)]
pub struct LivenessReport {
    /// Functions whose live flag was set by this run
    pub newly_live: usize,
    /// Functions reached from the roots
    pub visited: usize,
    /// Types referenced by live functions
    pub used_types: BTreeSet<Guid>,
    /// Provenance of the traced symbol, if it was reached
    pub trace: Option<LivenessTrace>,
}

/// Marks every function reachable from a root set as live
///
/// Indirect calls are resolved conservatively: a live call through a slot
/// makes every registered implementation of that slot live.
pub struct LivenessAnalyzer<'a> {
    index: &'a mut ModuleSummaryIndex,
    trace_target: Option<&'a str>,
    arena: TraceArena,
    worklist: Vec<TraceId>,
    visited: HashSet<Guid>,
}

impl<'a> LivenessAnalyzer<'a> {
    pub fn new(index: &'a mut ModuleSummaryIndex) -> Self {
        Self {
            index,
            trace_target: None,
            arena: TraceArena::default(),
            worklist: Vec::new(),
            visited: HashSet::new(),
        }
    }

    /// Record the provenance of the function with this debug name
    pub fn with_trace_target(mut self, name: Option<&'a str>) -> Self {
        self.trace_target = name;
        self
    }

    pub fn run(mut self, roots: &BTreeSet<Guid>) -> Result<LivenessReport, LivenessError> {
        let mut report = LivenessReport::default();
        let mut traced: Option<TraceId> = None;

        // The worklist is a stack: push in reverse so the smallest GUID is
        // visited first.
        for guid in roots.iter().rev() {
            let id = self.arena.push(*guid, TraceReason::Preserved, None);
            self.worklist.push(id);
        }

        while let Some(id) = self.worklist.pop() {
            let guid = self.arena.guid(id);
            let Some(function) = self.index.function_mut(guid) else {
                return Err(self.unknown_guid(id));
            };

            if traced.is_none() && self.trace_target.is_some() && function.name() == self.trace_target {
                traced = Some(id);
            }

            if !self.visited.insert(guid) {
                continue;
            }
            if !function.is_live() {
                function.mark_live();
                report.newly_live += 1;
            }
            debug!(function = %function.label(), "Mark as live");

            report.used_types.extend(function.type_refs());
            let calls = function.calls().to_vec();

            let mut successors = Vec::new();
            for call in &calls {
                match call.kind {
                    CallKind::Direct => {
                        successors.push((call.target, TraceReason::StaticReferenced));
                    }
                    CallKind::Witness | CallKind::VTable => {
                        if let Some(slot) = call.slot() {
                            successors.extend(
                                self.index
                                    .implementations(slot)
                                    .map(|imp| (imp, TraceReason::IndirectReferenced)),
                            );
                        }
                    }
                }
            }

            // Reverse again so edges are visited in recorded order.
            for (target, reason) in successors.into_iter().rev() {
                let child = self.arena.push(target, reason, Some(id));
                self.worklist.push(child);
            }
        }

        report.visited = self.visited.len();
        report.trace = traced.map(|id| self.arena.resolve(id, self.index));
        Ok(report)
    }

    fn unknown_guid(&self, id: TraceId) -> LivenessError {
        let referenced_by = self.arena.parent(id).map(|parent| {
            let guid = self.arena.guid(parent);
            self.index
                .function(guid)
                .map(|f| f.label())
                .unwrap_or_else(|| format!("({})", guid))
        });
        LivenessError::UnknownGuid {
            guid: self.arena.guid(id),
            referenced_by,
        }
    }
}
