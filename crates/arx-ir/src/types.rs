//! Operand types.
//!
//! Scalars are the two general-register widths; vectors are a single
//! 128-bit container addressed by lanes of 8, 16, 32 or 64 bits.

use std::fmt;

/// Type of a value produced by a graph node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperandType {
    /// 32-bit integer.
    I32,
    /// 64-bit integer.
    I64,
    /// 128-bit vector.
    V128,
}

impl OperandType {
    /// Width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::I32 => 32,
            Self::I64 => 64,
            Self::V128 => 128,
        }
    }

    /// Width in bytes.
    #[must_use]
    pub const fn bytes(self) -> u32 {
        self.bits() / 8
    }

    /// Check if this is a scalar integer type.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::I32 | Self::I64)
    }

    /// Check if this is a vector type.
    #[must_use]
    pub const fn is_vector(self) -> bool {
        matches!(self, Self::V128)
    }

    /// All-ones mask for scalar types.
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self {
            Self::I32 => 0xffff_ffff,
            Self::I64 | Self::V128 => u64::MAX,
        }
    }

    /// Short name used in graph listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::V128 => "v128",
        }
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widths() {
        assert_eq!(OperandType::I32.bits(), 32);
        assert_eq!(OperandType::I64.bytes(), 8);
        assert_eq!(OperandType::V128.bytes(), 16);
    }

    #[test]
    fn test_kinds() {
        assert!(OperandType::I32.is_integer());
        assert!(!OperandType::I64.is_vector());
        assert!(OperandType::V128.is_vector());
        assert_eq!(OperandType::I32.mask(), 0xffff_ffff);
    }
}
