//! Decoded instruction representation.

use crate::OpId;

/// Decoded three-register data-processing instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstr {
    /// Instruction identifier.
    pub opid: OpId,
    /// Program counter.
    pub pc: u64,
    /// Raw instruction word.
    pub raw: u32,
    /// Destination register.
    pub rd: u8,
    /// First source register.
    pub rn: u8,
    /// Second source register.
    pub rm: u8,
}

impl DecodedInstr {
    #[must_use]
    pub const fn new(opid: OpId, pc: u64, raw: u32, rd: u8, rn: u8, rm: u8) -> Self {
        Self {
            opid,
            pc,
            raw,
            rd,
            rn,
            rm,
        }
    }
}
