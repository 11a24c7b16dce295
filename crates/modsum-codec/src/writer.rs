//! Summary encoding

use crate::bitstream::BitWriter;
use crate::error::{CodecError, Result};
use crate::format::*;
use modsum_core::{FunctionSummary, ModuleSummaryIndex};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Encode an index into the binary summary format
///
/// The output depends only on the index contents, so encoding the same
/// index twice yields identical bytes.
pub fn encode(index: &ModuleSummaryIndex) -> Vec<u8> {
    let mut writer = BitWriter::with_prefix(&SIGNATURE, TOP_LEVEL_ABBREV_WIDTH);
    writer.enter_subblock(RECORD_BLOCK_ID, RECORD_BLOCK_ABBREV_WIDTH);
    writer.emit(FORMAT_VERSION, VERSION_WIDTH);

    writer.emit_abbrev_id(RecordCode::ModuleMetadata.abbrev_id());
    writer.emit_blob(index.name().as_bytes());

    for function in index.functions() {
        write_function(&mut writer, function);
    }

    for (slot, impls) in index.slots() {
        writer.emit_abbrev_id(RecordCode::MethodMetadata.abbrev_id());
        writer.emit(slot_kind_bit(slot.kind), FLAG_WIDTH);
        writer.emit_vbr(slot.guid.value(), GUID_VBR_WIDTH);

        for guid in impls {
            writer.emit_abbrev_id(RecordCode::MethodImpl.abbrev_id());
            writer.emit_vbr(guid.value(), GUID_VBR_WIDTH);
        }
    }

    writer.end_block();
    writer.finish()
}

fn write_function(writer: &mut BitWriter, function: &FunctionSummary) {
    writer.emit_abbrev_id(RecordCode::FuncMetadata.abbrev_id());
    writer.emit_vbr(function.guid().value(), GUID_VBR_WIDTH);
    writer.emit(function.is_live() as u64, FLAG_WIDTH);
    writer.emit(function.is_preserved() as u64, FLAG_WIDTH);
    writer.emit_blob(function.name().unwrap_or_default().as_bytes());

    for call in function.calls() {
        writer.emit_abbrev_id(RecordCode::CallGraphEdge.abbrev_id());
        writer.emit(call_kind_tag(call.kind), CALL_KIND_WIDTH);
        writer.emit_vbr(call.target.value(), GUID_VBR_WIDTH);
        writer.emit_blob(call.debug_name.as_bytes());
    }

    for type_ref in function.type_refs() {
        writer.emit_abbrev_id(RecordCode::TypeRef.abbrev_id());
        writer.emit_vbr(type_ref.value(), GUID_VBR_WIDTH);
    }
}

/// Encode an index and write it to `path`
///
/// The bytes go to a temporary file next to `path`, which is renamed over
/// `path` once complete. On failure `path` is left as it was.
pub fn write_summary(index: &ModuleSummaryIndex, path: &Path) -> Result<()> {
    let bytes = encode(index);
    let write_error = |source: io::Error| CodecError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(&bytes).map_err(write_error)?;
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|err| write_error(err.error))?;
    debug!(
        path = %path.display(),
        module = %index.name(),
        bytes = bytes.len(),
        "Wrote module summary"
    );
    Ok(())
}
