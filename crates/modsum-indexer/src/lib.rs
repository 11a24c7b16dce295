//! modsum-indexer: turns front-end facts into a module summary
//!
//! The front-end classifies every reference a function makes into a [`Fact`]
//! and describes the module's witness tables, vtables and key-path
//! properties. This crate folds those facts into a
//! [`modsum_core::ModuleSummaryIndex`]:
//! - one [`modsum_core::FunctionSummary`] per function, with its edges in body order
//! - one implementation set per virtual slot
//! - `preserved` set on everything external code could reach
//!
//! # Example
//!
//! ```ignore
//! use modsum_indexer::{build_module_summary, ModuleFacts};
//!
//! let facts = ModuleFacts::from_json(&std::fs::read_to_string("app.facts.json")?)?;
//! let index = build_module_summary(&facts)?;
//! ```

mod error;
mod facts;
mod indexer;

pub use error::IndexError;
pub use facts::{
    DeclContextKind, Fact, FunctionFacts, MethodKind, ModuleFacts, PropertyFacts,
    ReflectionComponent, VTableEntry, VTableEntryKind, VTableFacts, WitnessEntry,
    WitnessTableFacts,
};
pub use indexer::{FunctionSummaryIndexer, ModuleSummaryIndexer};

use modsum_core::ModuleSummaryIndex;
use tracing::info;

/// Build the summary index of one module
pub fn build_module_summary(facts: &ModuleFacts) -> Result<ModuleSummaryIndex, IndexError> {
    let index = ModuleSummaryIndexer::new(facts).index()?;
    info!(
        module = %index.name(),
        functions = index.len(),
        slots = index.slots().count(),
        "Built module summary"
    );
    Ok(index)
}
