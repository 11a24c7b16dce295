//! modsum-core: identity layer and summary data model
//!
//! Every symbol in the summary graph is addressed by a [`Guid`] derived from
//! its mangled name. The graph itself is a [`ModuleSummaryIndex`]: one
//! [`FunctionSummary`] per function plus the set of concrete implementations
//! registered for each [`VirtualSlot`].
//!
//! Per-module indices are built by `modsum-indexer`, persisted by
//! `modsum-codec`, and merged into one combined index at link time before
//! `modsum-liveness` marks what survives.

mod error;
mod guid;
mod index;
mod slot;
mod summary;

pub use error::MergeError;
pub use guid::{guid_of, Guid};
pub use index::ModuleSummaryIndex;
pub use slot::{SlotKind, VirtualSlot};
pub use summary::{Call, CallKind, FunctionSummary};

/// Name of the index produced by merging per-module summaries
pub const COMBINED_INDEX_NAME: &str = "combined";

/// Symbol treated as the synthetic program entry point
pub const ENTRY_POINT_SYMBOL: &str = "main";
