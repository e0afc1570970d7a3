//! Field extraction helpers for A64 instruction words.

/// Extract Rd field (bits [4:0]).
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn decode_rd(instr: u32) -> u8 {
    (instr & 0x1F) as u8
}

/// Extract Rn field (bits [9:5]).
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn decode_rn(instr: u32) -> u8 {
    ((instr >> 5) & 0x1F) as u8
}

/// Extract Rm field (bits [20:16]).
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub const fn decode_rm(instr: u32) -> u8 {
    ((instr >> 16) & 0x1F) as u8
}

/// Extract sf bit (bit 31): 64-bit operation.
#[inline]
#[must_use]
pub const fn decode_sf(instr: u32) -> bool {
    instr >> 31 != 0
}

/// Extract an arbitrary field `[lo + len - 1 : lo]`.
#[inline]
#[must_use]
pub const fn decode_bits(instr: u32, lo: u32, len: u32) -> u32 {
    (instr >> lo) & ((1 << len) - 1)
}

/// Place the three register fields of a data-processing instruction.
#[inline]
#[must_use]
pub const fn encode_regs(rd: u8, rn: u8, rm: u8) -> u32 {
    ((rm as u32 & 0x1F) << 16) | ((rn as u32 & 0x1F) << 5) | (rd as u32 & 0x1F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_fields() {
        // crc32cx w0, w1, x2
        let raw = 0x9AC2_5C20;
        assert_eq!(decode_rd(raw), 0);
        assert_eq!(decode_rn(raw), 1);
        assert_eq!(decode_rm(raw), 2);
        assert!(decode_sf(raw));
        assert_eq!(decode_bits(raw, 10, 2), 0b11);
        assert_eq!(decode_bits(raw, 12, 1), 1);
    }

    #[test]
    fn test_encode_regs_roundtrip() {
        let raw = encode_regs(7, 31, 12);
        assert_eq!(decode_rd(raw), 7);
        assert_eq!(decode_rn(raw), 31);
        assert_eq!(decode_rm(raw), 12);
    }
}
