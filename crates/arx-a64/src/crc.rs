//! CRC32 instruction parameters: data width and polynomial family.

use arx_ir::OperandType;

/// Width of the data operand of a CRC32 instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrcWidth {
    Byte,
    Half,
    Word,
    Double,
}

impl CrcWidth {
    /// All widths, narrowest first.
    pub const ALL: [Self; 4] = [Self::Byte, Self::Half, Self::Word, Self::Double];

    /// Width in bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Byte => 8,
            Self::Half => 16,
            Self::Word => 32,
            Self::Double => 64,
        }
    }

    /// Width in bytes.
    #[must_use]
    pub const fn bytes(self) -> u32 {
        self.bits() / 8
    }

    /// Register type the data operand is read as.
    #[must_use]
    pub const fn data_type(self) -> OperandType {
        match self {
            Self::Double => OperandType::I64,
            Self::Byte | Self::Half | Self::Word => OperandType::I32,
        }
    }

    /// Mask selecting the bits that take part in the checksum.
    #[must_use]
    pub const fn mask(self) -> u64 {
        match self {
            Self::Double => u64::MAX,
            _ => (1 << self.bits()) - 1,
        }
    }

    /// Value of the `sz` encoding field.
    #[must_use]
    pub const fn size_field(self) -> u32 {
        match self {
            Self::Byte => 0b00,
            Self::Half => 0b01,
            Self::Word => 0b10,
            Self::Double => 0b11,
        }
    }

    pub(crate) const fn from_size_field(sz: u32) -> Self {
        match sz & 0b11 {
            0b00 => Self::Byte,
            0b01 => Self::Half,
            0b10 => Self::Word,
            _ => Self::Double,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self.size_field() as usize
    }
}

/// Generator polynomial family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrcPolynomial {
    /// CRC-32 (ISO-HDLC), polynomial 0x04C11DB7.
    Iso,
    /// CRC-32C (Castagnoli), polynomial 0x1EDC6F41.
    Castagnoli,
}

impl CrcPolynomial {
    /// Both families.
    pub const ALL: [Self; 2] = [Self::Iso, Self::Castagnoli];

    /// Generator polynomial, bit-reflected.
    #[must_use]
    pub const fn reversed(self) -> u32 {
        match self {
            Self::Iso => 0xEDB8_8320,
            Self::Castagnoli => 0x82F6_3B78,
        }
    }

    /// Barrett constant: floor(x^96 / P(x)), bit-reflected.
    #[must_use]
    pub const fn mu(self) -> u64 {
        match self {
            Self::Iso => 0xB4E5_B025_F701_1641,
            Self::Castagnoli => 0x4869_EC38_DEA7_13F1,
        }
    }

    /// Reflected polynomial shifted left by one bit.
    #[must_use]
    pub const fn reduction(self) -> u64 {
        match self {
            Self::Iso => 0x1_DB71_0641,
            Self::Castagnoli => 0x1_05EC_76F0,
        }
    }

    /// Value of the `C` encoding bit.
    #[must_use]
    pub const fn c_bit(self) -> u32 {
        match self {
            Self::Iso => 0,
            Self::Castagnoli => 1,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self.c_bit() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_fields() {
        for width in CrcWidth::ALL {
            assert_eq!(CrcWidth::from_size_field(width.size_field()), width);
        }
        assert_eq!(CrcWidth::Half.mask(), 0xffff);
        assert_eq!(CrcWidth::Double.mask(), u64::MAX);
        assert_eq!(CrcWidth::Word.data_type(), OperandType::I32);
        assert_eq!(CrcWidth::Double.data_type(), OperandType::I64);
    }

    #[test]
    fn test_reduction_constant_matches_reflected_polynomial() {
        for poly in CrcPolynomial::ALL {
            assert_eq!(poly.reduction() >> 1, u64::from(poly.reversed()));
        }
    }
}
