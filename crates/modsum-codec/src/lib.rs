//! modsum-codec: on-disk format for module summaries
//!
//! A summary file is the 4-byte signature `MODS` followed by a single
//! bit-packed record block (see [`format`] for the record layouts). GUIDs
//! and lengths use variable-width encoding so small indices stay compact
//! while full 64-bit hashes remain representable; the call-edge kind is a
//! fixed-width field.
//!
//! Decoding is strict: any malformed or truncated record rejects the whole
//! file with [`CodecError::Malformed`].

mod bitstream;
mod error;
pub mod format;
mod reader;
mod writer;

pub use error::{CodecError, Result};
pub use reader::{decode, read_bytes, read_summary};
pub use writer::{encode, write_summary};
