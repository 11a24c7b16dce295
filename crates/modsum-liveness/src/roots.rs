//! Root set computation

use modsum_core::{guid_of, Guid, ModuleSummaryIndex};
use std::collections::BTreeSet;
use tracing::debug;

/// Every preserved function plus the entry point, if the index has one
///
/// The set is ordered by GUID, which fixes the order roots are visited in.
pub fn compute_roots(index: &ModuleSummaryIndex, entry_symbol: Option<&str>) -> BTreeSet<Guid> {
    let mut roots: BTreeSet<Guid> = index
        .functions()
        .filter(|f| f.is_preserved())
        .map(|f| f.guid())
        .collect();

    if let Some(entry) = entry_symbol {
        let guid = guid_of(entry);
        if index.contains(guid) {
            roots.insert(guid);
        } else {
            debug!(entry, "Entry point not present in index");
        }
    }
    roots
}
