//! Core types for the A64 front end.

use std::fmt::Display;

/// Compact instruction identifier (2 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct OpId {
    /// Extension (`EXT_CRC32`, ...)
    pub ext: u8,
    /// Index within extension
    pub idx: u8,
}

impl OpId {
    #[must_use]
    pub const fn new(ext: u8, idx: u8) -> Self {
        Self { ext, idx }
    }

    /// Packed form (ext << 8 | idx).
    #[must_use]
    pub const fn pack(self) -> u16 {
        ((self.ext as u16) << 8) | self.idx as u16
    }
}

impl Display for OpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OpId({}, {})", self.ext, self.idx)
    }
}

// Extension constants
pub const EXT_CRC32: u8 = 0;
/// First extension ID available to out-of-tree groups.
pub const EXT_CUSTOM: u8 = 128;

/// Register encoding that reads as zero and discards writes in
/// data-processing instructions.
pub const REG_ZR: u8 = 31;

/// Static metadata for one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpInfo {
    pub opid: OpId,
    pub name: &'static str,
}

/// Register name as written in disassembly (`w3`, `x7`, `wzr`).
#[must_use]
pub fn reg_name(reg: u8, is_64: bool) -> String {
    match (reg, is_64) {
        (REG_ZR, false) => "wzr".to_string(),
        (REG_ZR, true) => "xzr".to_string(),
        (r, false) => format!("w{r}"),
        (r, true) => format!("x{r}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opid() {
        let op = OpId::new(EXT_CRC32, 5);
        assert_eq!(op.ext, EXT_CRC32);
        assert_eq!(op.idx, 5);
        assert_eq!(OpId::new(1, 2).pack(), 0x0102);
    }

    #[test]
    fn test_reg_name() {
        assert_eq!(reg_name(0, false), "w0");
        assert_eq!(reg_name(30, true), "x30");
        assert_eq!(reg_name(REG_ZR, false), "wzr");
        assert_eq!(reg_name(REG_ZR, true), "xzr");
    }
}
