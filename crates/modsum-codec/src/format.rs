//! Layout of the summary file
//!
//! ```text
//! 'M' 'O' 'D' 'S'
//! ENTER_SUBBLOCK(RECORD_BLOCK_ID, abbrev width 4) <len words:32> <version:16>
//!   MODULE_METADATA  [blob name]
//!   FUNC_METADATA    [vbr16 guid, fixed1 live, fixed1 preserved, blob name]
//!   CALL_GRAPH_EDGE  [fixed32 kind, vbr16 target, blob name]   * per function
//!   TYPE_REF         [vbr16 type]                              * per function
//!   METHOD_METADATA  [fixed1 slot kind, vbr16 slot guid]
//!   METHOD_IMPL      [vbr16 impl guid]                         * per slot
//! END_BLOCK
//! ```
//!
//! Bits are packed LSB-first into little-endian 32-bit words. Every record
//! is introduced by the abbreviation ID `FIRST_RECORD_ABBREV + code`.

use modsum_core::{CallKind, SlotKind};

pub const SIGNATURE: [u8; 4] = *b"MODS";

/// Bumped whenever a record layout changes
pub const FORMAT_VERSION: u64 = 1;

pub const RECORD_BLOCK_ID: u64 = 8;

pub const TOP_LEVEL_ABBREV_WIDTH: u32 = 2;
pub const RECORD_BLOCK_ABBREV_WIDTH: u32 = 4;

pub const BLOCK_ID_WIDTH: u32 = 8;
pub const ABBREV_WIDTH_WIDTH: u32 = 4;
pub const BLOCK_LENGTH_WIDTH: u32 = 32;
pub const VERSION_WIDTH: u32 = 16;
pub const BLOB_LENGTH_WIDTH: u32 = 6;

pub const GUID_VBR_WIDTH: u32 = 16;
pub const CALL_KIND_WIDTH: u32 = 32;
pub const FLAG_WIDTH: u32 = 1;

/// Builtin abbreviation IDs
pub mod abbrev {
    pub const END_BLOCK: u64 = 0;
    pub const ENTER_SUBBLOCK: u64 = 1;
    pub const DEFINE_ABBREV: u64 = 2;
    pub const UNABBREV_RECORD: u64 = 3;
    pub const FIRST_RECORD_ABBREV: u64 = 4;
}

/// Record codes of the record block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCode {
    ModuleMetadata = 0,
    FuncMetadata = 1,
    CallGraphEdge = 2,
    MethodMetadata = 3,
    MethodImpl = 4,
    TypeRef = 5,
}

impl RecordCode {
    pub fn from_code(code: u64) -> Option<Self> {
        Some(match code {
            0 => RecordCode::ModuleMetadata,
            1 => RecordCode::FuncMetadata,
            2 => RecordCode::CallGraphEdge,
            3 => RecordCode::MethodMetadata,
            4 => RecordCode::MethodImpl,
            5 => RecordCode::TypeRef,
            _ => return None,
        })
    }

    pub fn abbrev_id(self) -> u64 {
        abbrev::FIRST_RECORD_ABBREV + self as u64
    }
}

pub fn call_kind_tag(kind: CallKind) -> u64 {
    match kind {
        CallKind::Direct => 0,
        CallKind::Witness => 1,
        CallKind::VTable => 2,
    }
}

pub fn call_kind_from_tag(tag: u64) -> Option<CallKind> {
    match tag {
        0 => Some(CallKind::Direct),
        1 => Some(CallKind::Witness),
        2 => Some(CallKind::VTable),
        _ => None,
    }
}

pub fn slot_kind_bit(kind: SlotKind) -> u64 {
    match kind {
        SlotKind::Witness => 0,
        SlotKind::VTable => 1,
    }
}

pub fn slot_kind_from_bit(bit: u64) -> SlotKind {
    if bit == 0 {
        SlotKind::Witness
    } else {
        SlotKind::VTable
    }
}
