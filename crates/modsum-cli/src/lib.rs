//! modsum-cli: link-time driver
//!
//! Loads the per-module summaries named in an [`LtoConfig`], merges them
//! into the combined index, marks live functions and writes the annotated
//! combined summary back out. The `modsum` binary is a thin clap front over
//! [`run_lto`], [`run_index`] and [`run_dump`].

mod config;
mod driver;
mod error;
pub mod logging;

pub use config::LtoConfig;
pub use driver::{dead_functions, run_dump, run_index, run_lto, LtoOutcome};
pub use error::DriverError;
