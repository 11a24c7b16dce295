//! modsum - summary-based whole-program dead code elimination
//!
//! This is the root workspace crate that provides end-to-end tests.
//! The actual implementation is in the workspace member crates:
//! - [`summary`]: GUIDs and the summary graph
//! - [`indexer`]: per-module summaries from front-end facts
//! - [`codec`]: the `MODS` bitstream file format
//! - [`liveness`]: reachability over the combined index
//! - [`cli`]: the link-time driver

pub use modsum_cli as cli;
pub use modsum_codec as codec;
pub use modsum_core as summary;
pub use modsum_indexer as indexer;
pub use modsum_liveness as liveness;
