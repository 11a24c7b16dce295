//! Deterministic symbol identity

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 64-bit identifier of a symbol, derived from its mangled name
///
/// Two symbols with the same name always share a GUID. Distinct names are
/// assumed to hash apart; collisions are not detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Guid(pub u64);

impl Guid {
    /// Raw 64-bit value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for Guid {
    fn from(value: u64) -> Self {
        Guid(value)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the GUID for a mangled symbol name
///
/// MD5 of the name bytes, keeping the low 64 bits of the digest
/// (first eight bytes, little-endian).
pub fn guid_of(name: &str) -> Guid {
    let digest = Md5::digest(name.as_bytes());
    let mut low = [0u8; 8];
    low.copy_from_slice(&digest[..8]);
    Guid(u64::from_le_bytes(low))
}
