//! The summary graph of one module, or of a whole program after merging

use crate::error::MergeError;
use crate::guid::Guid;
use crate::slot::VirtualSlot;
use crate::summary::FunctionSummary;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Function summaries plus virtual-slot implementation registrations
///
/// Maps are ordered by key so that iteration, encoding and analysis are a
/// pure function of the content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleSummaryIndex {
    name: String,

    /// One summary per function, keyed by GUID
    functions: BTreeMap<Guid, FunctionSummary>,

    /// Concrete functions that may be the dynamic target of each slot
    #[serde(with = "slot_entries")]
    implementations: BTreeMap<VirtualSlot, BTreeSet<Guid>>,
}

impl ModuleSummaryIndex {
    /// Create an empty index with the given module name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Insert a function summary, rejecting a GUID that is already present
    pub fn insert_function(&mut self, summary: FunctionSummary) -> Result<(), MergeError> {
        if let Some(existing) = self.functions.get(&summary.guid()) {
            return Err(MergeError::DuplicateFunctionGuid {
                guid: summary.guid(),
                name: summary
                    .name()
                    .or(existing.name())
                    .map(str::to_string),
                module: self.name.clone(),
            });
        }
        self.functions.insert(summary.guid(), summary);
        Ok(())
    }

    pub fn function(&self, guid: Guid) -> Option<&FunctionSummary> {
        self.functions.get(&guid)
    }

    pub fn function_mut(&mut self, guid: Guid) -> Option<&mut FunctionSummary> {
        self.functions.get_mut(&guid)
    }

    pub fn contains(&self, guid: Guid) -> bool {
        self.functions.contains_key(&guid)
    }

    /// Iterate over all function summaries in GUID order
    pub fn functions(&self) -> impl Iterator<Item = &FunctionSummary> {
        self.functions.values()
    }

    /// Register `implementation` as a possible dynamic target of `slot`
    pub fn add_implementation(&mut self, slot: VirtualSlot, implementation: Guid) {
        self.implementations
            .entry(slot)
            .or_default()
            .insert(implementation);
    }

    /// Registered implementations of `slot`, empty if none were registered
    pub fn implementations(&self, slot: VirtualSlot) -> impl Iterator<Item = Guid> + '_ {
        self.implementations
            .get(&slot)
            .into_iter()
            .flat_map(|impls| impls.iter().copied())
    }

    /// Iterate over every slot and its implementation set in slot order
    pub fn slots(&self) -> impl Iterator<Item = (VirtualSlot, &BTreeSet<Guid>)> {
        self.implementations.iter().map(|(slot, impls)| (*slot, impls))
    }

    /// Number of function summaries
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Merge another index into this one
    ///
    /// Function maps are unioned and implementation sets are unioned per slot.
    /// A GUID present in both indices rejects the whole merge and leaves
    /// `self` untouched.
    pub fn merge(&mut self, other: ModuleSummaryIndex) -> Result<(), MergeError> {
        if let Some(dup) = other.functions.values().find(|f| self.contains(f.guid())) {
            return Err(MergeError::DuplicateFunctionGuid {
                guid: dup.guid(),
                name: dup.name().map(str::to_string),
                module: other.name.clone(),
            });
        }

        self.functions.extend(other.functions);
        for (slot, impls) in other.implementations {
            self.implementations.entry(slot).or_default().extend(impls);
        }
        Ok(())
    }

    /// Merge several indices into a fresh index called `name`
    pub fn merge_all<I>(name: impl Into<String>, indices: I) -> Result<Self, MergeError>
    where
        I: IntoIterator<Item = ModuleSummaryIndex>,
    {
        let mut combined = Self::new(name);
        for index in indices {
            combined.merge(index)?;
        }
        Ok(combined)
    }

    /// GUIDs of all functions marked live
    pub fn live_functions(&self) -> impl Iterator<Item = Guid> + '_ {
        self.functions
            .values()
            .filter(|f| f.is_live())
            .map(FunctionSummary::guid)
    }

    /// GUIDs of all functions not marked live, the candidates for elimination
    pub fn dead_functions(&self) -> impl Iterator<Item = Guid> + '_ {
        self.functions
            .values()
            .filter(|f| !f.is_live())
            .map(FunctionSummary::guid)
    }
}

/// JSON object keys must be strings, so slots serialize as a list of entries
mod slot_entries {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Serialize, Deserialize)]
    struct SlotEntry {
        slot: VirtualSlot,
        implementations: BTreeSet<Guid>,
    }

    pub fn serialize<S>(
        map: &BTreeMap<VirtualSlot, BTreeSet<Guid>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(map.iter().map(|(slot, impls)| SlotEntry {
            slot: *slot,
            implementations: impls.clone(),
        }))
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<VirtualSlot, BTreeSet<Guid>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<SlotEntry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.slot, entry.implementations))
            .collect())
    }
}
