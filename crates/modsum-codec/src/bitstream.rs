//! Bit-level writer and reader for the block/record container

use crate::error::{CodecError, Result};
use crate::format::{
    abbrev, ABBREV_WIDTH_WIDTH, BLOB_LENGTH_WIDTH, BLOCK_ID_WIDTH, BLOCK_LENGTH_WIDTH,
};

struct OpenBlock {
    /// Byte offset of the length word
    length_at: usize,
    outer_abbrev_width: u32,
}

/// Packs fixed-width and variable-width fields into 32-bit words
pub struct BitWriter {
    bytes: Vec<u8>,
    acc: u64,
    nbits: u32,
    abbrev_width: u32,
    blocks: Vec<OpenBlock>,
}

impl BitWriter {
    /// Start a stream after `prefix` (the file signature), which must be
    /// word aligned
    pub fn with_prefix(prefix: &[u8], abbrev_width: u32) -> Self {
        debug_assert_eq!(prefix.len() % 4, 0);
        Self {
            bytes: prefix.to_vec(),
            acc: 0,
            nbits: 0,
            abbrev_width,
            blocks: Vec::new(),
        }
    }

    /// Emit the low `width` bits of `value`; `width` is at most 32
    pub fn emit(&mut self, value: u64, width: u32) {
        debug_assert!(width > 0 && width <= 32);
        let mask = (1u64 << width) - 1;
        debug_assert_eq!(value & !mask, 0, "value does not fit in {} bits", width);
        self.acc |= (value & mask) << self.nbits;
        self.nbits += width;
        if self.nbits >= 32 {
            self.bytes.extend_from_slice(&(self.acc as u32).to_le_bytes());
            self.acc >>= 32;
            self.nbits -= 32;
        }
    }

    /// Emit `value` in chunks of `width - 1` payload bits, the top bit of
    /// each chunk flagging a continuation
    pub fn emit_vbr(&mut self, mut value: u64, width: u32) {
        let threshold = 1u64 << (width - 1);
        while value >= threshold {
            self.emit((value & (threshold - 1)) | threshold, width);
            value >>= width - 1;
        }
        self.emit(value, width);
    }

    pub fn align32(&mut self) {
        if self.nbits > 0 {
            self.bytes.extend_from_slice(&(self.acc as u32).to_le_bytes());
            self.acc = 0;
            self.nbits = 0;
        }
    }

    pub fn emit_abbrev_id(&mut self, id: u64) {
        let width = self.abbrev_width;
        self.emit(id, width);
    }

    /// Length-prefixed byte string, padded to a word boundary
    pub fn emit_blob(&mut self, blob: &[u8]) {
        self.emit_vbr(blob.len() as u64, BLOB_LENGTH_WIDTH);
        self.align32();
        self.bytes.extend_from_slice(blob);
        while self.bytes.len() % 4 != 0 {
            self.bytes.push(0);
        }
    }

    pub fn enter_subblock(&mut self, block_id: u64, abbrev_width: u32) {
        self.emit_abbrev_id(abbrev::ENTER_SUBBLOCK);
        self.emit_vbr(block_id, BLOCK_ID_WIDTH);
        self.emit_vbr(abbrev_width as u64, ABBREV_WIDTH_WIDTH);
        self.align32();

        self.blocks.push(OpenBlock {
            length_at: self.bytes.len(),
            outer_abbrev_width: self.abbrev_width,
        });
        // Backpatched by `end_block`.
        self.emit(0, BLOCK_LENGTH_WIDTH);
        self.abbrev_width = abbrev_width;
    }

    pub fn end_block(&mut self) {
        self.emit_abbrev_id(abbrev::END_BLOCK);
        self.align32();

        let Some(block) = self.blocks.pop() else {
            debug_assert!(false, "end_block without a matching enter_subblock");
            return;
        };
        let words = ((self.bytes.len() - block.length_at - 4) / 4) as u32;
        self.bytes[block.length_at..block.length_at + 4].copy_from_slice(&words.to_le_bytes());
        self.abbrev_width = block.outer_abbrev_width;
    }

    pub fn finish(mut self) -> Vec<u8> {
        debug_assert!(self.blocks.is_empty(), "unterminated block");
        self.align32();
        self.bytes
    }
}

/// Reads fields back out of a word-packed bit stream
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Position in bits from the start of `data`
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading at a byte offset
    pub fn at_byte(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            pos: offset * 8,
        }
    }

    pub fn bit_position(&self) -> usize {
        self.pos
    }

    /// Current position as a byte offset, for diagnostics
    pub fn byte_offset(&self) -> usize {
        self.pos / 8
    }

    pub fn total_bits(&self) -> usize {
        self.data.len() * 8
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.total_bits()
    }

    fn truncated(&self, what: &str) -> CodecError {
        CodecError::malformed(self.byte_offset(), format!("truncated {}", what))
    }

    /// Read `width` bits (at most 32)
    pub fn read(&mut self, width: u32) -> Result<u64> {
        let width = width as usize;
        if self.pos + width > self.total_bits() {
            return Err(self.truncated("field"));
        }

        let mut value = 0u64;
        let mut read = 0usize;
        while read < width {
            let byte = self.data[self.pos / 8] as u64;
            let offset = self.pos % 8;
            let take = (8 - offset).min(width - read);
            let bits = (byte >> offset) & ((1u64 << take) - 1);
            value |= bits << read;
            read += take;
            self.pos += take;
        }
        Ok(value)
    }

    /// Read a variable-width value, rejecting anything wider than 64 bits
    pub fn read_vbr(&mut self, width: u32) -> Result<u64> {
        let payload_bits = width - 1;
        let continuation = 1u64 << payload_bits;
        let start = self.byte_offset();

        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let chunk = self.read(width)?;
            let payload = chunk & (continuation - 1);
            if shift >= 64 || (shift > 0 && payload >> (64 - shift) != 0) {
                return Err(CodecError::malformed(start, "variable-width value overflows 64 bits"));
            }
            value |= payload << shift;
            if chunk & continuation == 0 {
                return Ok(value);
            }
            shift += payload_bits;
        }
    }

    pub fn align32(&mut self) {
        self.pos = (self.pos + 31) & !31;
    }

    pub fn read_blob(&mut self) -> Result<&'a [u8]> {
        let len = self.read_vbr(BLOB_LENGTH_WIDTH)? as usize;
        self.align32();

        let start = self.pos / 8;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| self.truncated("blob"))?;
        self.pos = end * 8;
        self.align32();
        if self.pos > self.total_bits() {
            return Err(self.truncated("blob padding"));
        }
        Ok(&self.data[start..end])
    }
}
