//! Per-function summaries

use crate::guid::Guid;
use crate::slot::{SlotKind, VirtualSlot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How a call edge reaches its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallKind {
    /// Statically known callee; the edge target is the callee itself
    Direct,
    /// Call through a protocol requirement; the target is the slot
    Witness,
    /// Call through an overridable method; the target is the slot
    VTable,
}

impl CallKind {
    /// Slot kind for indirect calls, `None` for direct ones
    pub fn slot_kind(self) -> Option<SlotKind> {
        match self {
            CallKind::Direct => None,
            CallKind::Witness => Some(SlotKind::Witness),
            CallKind::VTable => Some(SlotKind::VTable),
        }
    }
}

/// A single outgoing reference of a function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub kind: CallKind,
    /// Callee GUID for direct calls, slot declaration GUID otherwise
    pub target: Guid,
    /// Mangled name of the callee or slot, kept for diagnostics only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub debug_name: String,
}

impl Call {
    pub fn new(kind: CallKind, target: Guid, debug_name: impl Into<String>) -> Self {
        Self {
            kind,
            target,
            debug_name: debug_name.into(),
        }
    }

    pub fn direct(target: Guid, debug_name: impl Into<String>) -> Self {
        Self::new(CallKind::Direct, target, debug_name)
    }

    /// The slot this call dispatches through, if it is indirect
    pub fn slot(&self) -> Option<VirtualSlot> {
        self.kind
            .slot_kind()
            .map(|kind| VirtualSlot::new(kind, self.target))
    }
}

/// Summary of one function: its identity, outgoing edges and liveness flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSummary {
    guid: Guid,

    /// Mangled name, when the producer kept it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Outgoing edges in the order the indexer recorded them
    calls: Vec<Call>,

    /// Types this function references
    type_refs: BTreeSet<Guid>,

    /// Marked reachable by the liveness analysis
    live: bool,

    /// Must survive regardless of reachability
    preserved: bool,
}

impl FunctionSummary {
    /// Create an empty, dead, unpreserved summary
    pub fn new(guid: Guid) -> Self {
        Self {
            guid,
            name: None,
            calls: Vec::new(),
            type_refs: BTreeSet::new(),
            live: false,
            preserved: false,
        }
    }

    /// Create a summary carrying its debug name
    pub fn with_name(guid: Guid, name: impl Into<String>) -> Self {
        let mut summary = Self::new(guid);
        summary.set_name(name);
        summary
    }

    pub fn guid(&self) -> Guid {
        self.guid
    }

    /// Debug name, `None` if the producer did not record one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the debug name; an empty name clears it
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() { None } else { Some(name) };
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn add_call(&mut self, call: Call) {
        self.calls.push(call);
    }

    pub fn type_refs(&self) -> impl Iterator<Item = Guid> + '_ {
        self.type_refs.iter().copied()
    }

    pub fn add_type_ref(&mut self, guid: Guid) {
        self.type_refs.insert(guid);
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Mark the function live. Liveness is monotonic, so there is no way to
    /// clear it again.
    pub fn mark_live(&mut self) {
        self.live = true;
    }

    pub fn is_preserved(&self) -> bool {
        self.preserved
    }

    /// Mark the function as a preserved root. Never cleared once set.
    pub fn mark_preserved(&mut self) {
        self.preserved = true;
    }

    /// Restore persisted flags when decoding a summary file
    pub fn restore_flags(&mut self, live: bool, preserved: bool) {
        self.live |= live;
        self.preserved |= preserved;
    }

    /// Human-readable label: the name if present, otherwise the GUID
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("({})", self.guid),
        }
    }
}
