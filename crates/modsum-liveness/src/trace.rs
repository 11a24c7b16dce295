//! Liveness provenance
//!
//! Every worklist item is a node in an arena; a node's parent is the item
//! whose edges pushed it. Following parents from any node ends at a root.

use modsum_core::{Guid, ModuleSummaryIndex};
use std::fmt;

/// Why a function was pushed on the worklist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceReason {
    /// Member of the root set
    Preserved,
    /// Target of a direct call from its parent
    StaticReferenced,
    /// Registered implementation of a slot its parent calls through
    IndirectReferenced,
}

impl fmt::Display for TraceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceReason::Preserved => f.write_str("preserved"),
            TraceReason::StaticReferenced => f.write_str("static"),
            TraceReason::IndirectReferenced => f.write_str("indirect"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TraceId(usize);

#[derive(Debug)]
struct TraceNode {
    guid: Guid,
    reason: TraceReason,
    parent: Option<TraceId>,
}

#[derive(Debug, Default)]
pub(crate) struct TraceArena {
    nodes: Vec<TraceNode>,
}

impl TraceArena {
    pub(crate) fn push(&mut self, guid: Guid, reason: TraceReason, parent: Option<TraceId>) -> TraceId {
        let id = TraceId(self.nodes.len());
        self.nodes.push(TraceNode {
            guid,
            reason,
            parent,
        });
        id
    }

    pub(crate) fn guid(&self, id: TraceId) -> Guid {
        self.nodes[id.0].guid
    }

    pub(crate) fn parent(&self, id: TraceId) -> Option<TraceId> {
        self.nodes[id.0].parent
    }

    /// Resolve the chain starting at `id` into a standalone trace
    pub(crate) fn resolve(&self, id: TraceId, index: &ModuleSummaryIndex) -> LivenessTrace {
        let mut entries = Vec::new();
        let mut next = Some(id);
        while let Some(current) = next {
            let node = &self.nodes[current.0];
            entries.push(TraceEntry {
                guid: node.guid,
                name: index
                    .function(node.guid)
                    .and_then(|f| f.name())
                    .map(str::to_string),
                reason: node.reason,
            });
            next = node.parent;
        }
        LivenessTrace { entries }
    }
}

/// One step of a liveness trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEntry {
    pub guid: Guid,
    pub name: Option<String>,
    pub reason: TraceReason,
}

impl TraceEntry {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("**missing name**")
    }
}

/// Chain of functions explaining why the traced function is live
///
/// The first entry is the traced function, the last one a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LivenessTrace {
    entries: Vec<TraceEntry>,
}

impl LivenessTrace {
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn target(&self) -> &TraceEntry {
        &self.entries[0]
    }

    pub fn root(&self) -> &TraceEntry {
        &self.entries[self.entries.len() - 1]
    }
}

impl fmt::Display for LivenessTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.target();
        if target.name.is_some() {
            write!(f, "{}", target.display_name())?;
        } else {
            write!(f, "{} ({})", target.display_name(), target.guid)?;
        }

        if self.entries.len() == 1 {
            return writeln!(f, " is preserved");
        }

        writeln!(f, " is referenced by:")?;
        for entry in &self.entries[1..] {
            writeln!(f, " - {} ({}) [{}]", entry.display_name(), entry.guid, entry.reason)?;
        }
        Ok(())
    }
}
