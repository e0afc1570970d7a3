//! A64 instruction groups.
//!
//! Each group provides decode, lift, and disasm in its own module and plugs
//! into [`CompositeDecoder`] through [`InstructionExtension`].

mod crc32;

pub use crc32::{
    Crc32Extension, Crc32Path, OP_CRC32B, OP_CRC32CB, OP_CRC32CH, OP_CRC32CW, OP_CRC32CX,
    OP_CRC32H, OP_CRC32W, OP_CRC32X, crc32_mnemonic, crc32_variant, crc32b, crc32cb, crc32ch,
    crc32cw, crc32cx, crc32h, crc32w, crc32x, encode_crc32,
};

use arx_ir::Context;

use crate::{DecodedInstr, HostFeatures, OpId, OpInfo};

/// Extension point for instruction decoding and lifting.
pub trait InstructionExtension: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Extension ID carried by this group's `OpId`s.
    fn ext_id(&self) -> u8;

    /// Try to decode a 32-bit word at pc. Return None to fall through.
    fn decode32(&self, raw: u32, pc: u64) -> Option<DecodedInstr>;

    /// Append the instruction's operations to `ctx`. Returns false if the
    /// instruction does not belong to this group.
    fn lift(&self, ctx: &mut Context, instr: &DecodedInstr, features: HostFeatures) -> bool;

    /// Disassembly string for debugging.
    fn disasm(&self, instr: &DecodedInstr) -> String;

    /// Static metadata for an `OpId` of this group.
    fn op_info(&self, opid: OpId) -> Option<OpInfo>;
}

/// Composite decoder that chains multiple extensions.
///
/// Tries extensions in order until one handles the instruction.
pub struct CompositeDecoder {
    extensions: Vec<Box<dyn InstructionExtension>>,
}

impl CompositeDecoder {
    /// Create a new composite decoder with the given extensions.
    #[must_use]
    pub const fn new(extensions: Vec<Box<dyn InstructionExtension>>) -> Self {
        Self { extensions }
    }

    /// Create a composite decoder with every built-in group.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![Box::new(Crc32Extension)])
    }

    /// Create an empty composite decoder (no extensions).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            extensions: Vec::new(),
        }
    }

    /// Add an extension to the decoder chain.
    #[must_use]
    pub fn with_extension(mut self, ext: impl InstructionExtension + 'static) -> Self {
        self.extensions.push(Box::new(ext));
        self
    }

    /// Decode a little-endian instruction word from `bytes`.
    #[must_use]
    pub fn decode(&self, bytes: &[u8], pc: u64) -> Option<DecodedInstr> {
        let word: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        self.decode32(u32::from_le_bytes(word), pc)
    }

    /// Decode an instruction word using registered extensions.
    #[must_use]
    pub fn decode32(&self, raw: u32, pc: u64) -> Option<DecodedInstr> {
        self.extensions.iter().find_map(|ext| ext.decode32(raw, pc))
    }

    fn extension_for(&self, opid: OpId) -> Option<&dyn InstructionExtension> {
        self.extensions
            .iter()
            .find(|ext| ext.ext_id() == opid.ext)
            .map(AsRef::as_ref)
    }

    /// Lift an instruction using the extension that owns it.
    pub fn lift(&self, ctx: &mut Context, instr: &DecodedInstr, features: HostFeatures) -> bool {
        self.extension_for(instr.opid)
            .is_some_and(|ext| ext.lift(ctx, instr, features))
    }

    /// Disassemble an instruction.
    #[must_use]
    pub fn disasm(&self, instr: &DecodedInstr) -> String {
        self.extension_for(instr.opid).map_or_else(
            || format!("??? (ext={})", instr.opid.ext),
            |ext| ext.disasm(instr),
        )
    }

    /// Static metadata for an `OpId`.
    #[must_use]
    pub fn op_info(&self, opid: OpId) -> Option<OpInfo> {
        self.extension_for(opid)?.op_info(opid)
    }
}

impl Default for CompositeDecoder {
    fn default() -> Self {
        Self::standard()
    }
}
