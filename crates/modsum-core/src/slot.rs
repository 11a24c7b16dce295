//! Virtual dispatch slots

use crate::guid::{guid_of, Guid};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of indirection table a slot lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// Protocol requirement, dispatched through a witness table
    Witness,
    /// Overridable class method, dispatched through a vtable
    VTable,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Witness => f.write_str("witness"),
            SlotKind::VTable => f.write_str("vtable"),
        }
    }
}

/// One abstract dispatch point
///
/// Slots that share a declaration GUID but differ in kind are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VirtualSlot {
    pub kind: SlotKind,
    pub guid: Guid,
}

impl VirtualSlot {
    pub fn new(kind: SlotKind, guid: Guid) -> Self {
        Self { kind, guid }
    }

    /// Slot for a protocol requirement, keyed by its mangled name
    pub fn witness(requirement: &str) -> Self {
        Self::new(SlotKind::Witness, guid_of(requirement))
    }

    /// Slot for an overridable method, keyed by its mangled name
    pub fn vtable(method: &str) -> Self {
        Self::new(SlotKind::VTable, guid_of(method))
    }
}

impl fmt::Display for VirtualSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.guid)
    }
}
