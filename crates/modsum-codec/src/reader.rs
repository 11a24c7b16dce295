//! Summary decoding

use crate::bitstream::BitReader;
use crate::error::{CodecError, Result};
use crate::format::*;
use modsum_core::{Call, FunctionSummary, Guid, ModuleSummaryIndex, VirtualSlot};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Decode a summary file
///
/// Any structural problem rejects the whole input; a partially decoded
/// graph is never returned.
pub fn decode(bytes: &[u8]) -> Result<ModuleSummaryIndex> {
    if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(CodecError::malformed(0, "bad signature"));
    }

    let mut reader = BitReader::at_byte(bytes, SIGNATURE.len());
    let mut decoder = RecordDecoder::default();
    decoder.read_block(&mut reader)?;

    if !reader.at_end() {
        return Err(CodecError::malformed(
            reader.byte_offset(),
            "trailing data after record block",
        ));
    }
    decoder.finish(reader.byte_offset())
}

/// Read the raw contents of a summary file
pub fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| CodecError::MissingInputFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and decode the summary file at `path`
pub fn read_summary(path: &Path) -> Result<ModuleSummaryIndex> {
    let index = decode(&read_bytes(path)?)?;
    debug!(
        path = %path.display(),
        module = %index.name(),
        functions = index.len(),
        "Loaded module summary"
    );
    Ok(index)
}

#[derive(Default)]
struct RecordDecoder {
    index: ModuleSummaryIndex,
    seen_module_metadata: bool,
    /// Function that edge and type-ref records attach to
    function: Option<FunctionSummary>,
    /// Slot that implementation records attach to
    slot: Option<VirtualSlot>,
}

impl RecordDecoder {
    fn read_block(&mut self, reader: &mut BitReader<'_>) -> Result<()> {
        let offset = reader.byte_offset();
        if reader.read(TOP_LEVEL_ABBREV_WIDTH)? != abbrev::ENTER_SUBBLOCK {
            return Err(CodecError::malformed(offset, "expected record block"));
        }
        let block_id = reader.read_vbr(BLOCK_ID_WIDTH)?;
        if block_id != RECORD_BLOCK_ID {
            return Err(CodecError::malformed(
                offset,
                format!("unknown block id {}", block_id),
            ));
        }
        let abbrev_width = reader.read_vbr(ABBREV_WIDTH_WIDTH)?;
        if !(3..=32).contains(&abbrev_width) {
            return Err(CodecError::malformed(
                offset,
                format!("invalid abbreviation width {}", abbrev_width),
            ));
        }
        let abbrev_width = abbrev_width as u32;
        reader.align32();

        let words = reader.read(BLOCK_LENGTH_WIDTH)? as usize;
        let block_end = reader.bit_position() + words * 32;
        if block_end > reader.total_bits() {
            return Err(CodecError::malformed(
                reader.byte_offset(),
                format!("block length of {} words exceeds input", words),
            ));
        }

        let version = reader.read(VERSION_WIDTH)?;
        if version != FORMAT_VERSION {
            return Err(CodecError::malformed(
                reader.byte_offset(),
                format!("unsupported format version {}", version),
            ));
        }

        loop {
            let offset = reader.byte_offset();
            if reader.bit_position() >= block_end {
                return Err(CodecError::malformed(offset, "record block is not terminated"));
            }
            match reader.read(abbrev_width)? {
                abbrev::END_BLOCK => {
                    reader.align32();
                    if reader.bit_position() != block_end {
                        return Err(CodecError::malformed(offset, "block length mismatch"));
                    }
                    return Ok(());
                }
                abbrev::ENTER_SUBBLOCK => {
                    return Err(CodecError::malformed(offset, "unexpected nested block"));
                }
                abbrev::DEFINE_ABBREV | abbrev::UNABBREV_RECORD => {
                    return Err(CodecError::malformed(offset, "unsupported abbreviation"));
                }
                id => {
                    let code = id - abbrev::FIRST_RECORD_ABBREV;
                    let record = RecordCode::from_code(code).ok_or_else(|| {
                        CodecError::malformed(offset, format!("unknown record code {}", code))
                    })?;
                    self.read_record(record, reader, offset)?;
                }
            }
        }
    }

    fn read_record(
        &mut self,
        record: RecordCode,
        reader: &mut BitReader<'_>,
        offset: usize,
    ) -> Result<()> {
        match record {
            RecordCode::ModuleMetadata => {
                if self.seen_module_metadata {
                    return Err(CodecError::malformed(offset, "duplicate module metadata"));
                }
                self.seen_module_metadata = true;
                let name = read_string(reader, offset)?;
                self.index.set_name(name);
            }
            RecordCode::FuncMetadata => {
                self.flush_function(offset)?;
                self.slot = None;

                let guid = Guid(reader.read_vbr(GUID_VBR_WIDTH)?);
                let live = reader.read(FLAG_WIDTH)? != 0;
                let preserved = reader.read(FLAG_WIDTH)? != 0;
                let name = read_string(reader, offset)?;

                let mut function = FunctionSummary::with_name(guid, name);
                function.restore_flags(live, preserved);
                self.function = Some(function);
            }
            RecordCode::CallGraphEdge => {
                let tag = reader.read(CALL_KIND_WIDTH)?;
                let kind = call_kind_from_tag(tag).ok_or_else(|| {
                    CodecError::malformed(offset, format!("invalid edge kind {}", tag))
                })?;
                let target = Guid(reader.read_vbr(GUID_VBR_WIDTH)?);
                let name = read_string(reader, offset)?;
                self.current_function(offset, "call graph edge")?
                    .add_call(Call::new(kind, target, name));
            }
            RecordCode::TypeRef => {
                let guid = Guid(reader.read_vbr(GUID_VBR_WIDTH)?);
                self.current_function(offset, "type reference")?
                    .add_type_ref(guid);
            }
            RecordCode::MethodMetadata => {
                self.flush_function(offset)?;
                let kind = slot_kind_from_bit(reader.read(FLAG_WIDTH)?);
                let guid = Guid(reader.read_vbr(GUID_VBR_WIDTH)?);
                self.slot = Some(VirtualSlot::new(kind, guid));
            }
            RecordCode::MethodImpl => {
                let guid = Guid(reader.read_vbr(GUID_VBR_WIDTH)?);
                let slot = self.slot.ok_or_else(|| {
                    CodecError::malformed(offset, "method implementation outside a method record")
                })?;
                self.index.add_implementation(slot, guid);
            }
        }
        Ok(())
    }

    fn current_function(&mut self, offset: usize, what: &str) -> Result<&mut FunctionSummary> {
        self.function
            .as_mut()
            .ok_or_else(|| CodecError::malformed(offset, format!("{} outside a function record", what)))
    }

    fn flush_function(&mut self, offset: usize) -> Result<()> {
        if let Some(function) = self.function.take() {
            self.index
                .insert_function(function)
                .map_err(|err| CodecError::malformed(offset, err.to_string()))?;
        }
        Ok(())
    }

    fn finish(mut self, offset: usize) -> Result<ModuleSummaryIndex> {
        self.flush_function(offset)?;
        Ok(self.index)
    }
}

fn read_string(reader: &mut BitReader<'_>, offset: usize) -> Result<String> {
    let blob = reader.read_blob()?;
    String::from_utf8(blob.to_vec())
        .map_err(|_| CodecError::malformed(offset, "name is not valid UTF-8"))
}
