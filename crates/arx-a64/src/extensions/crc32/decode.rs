use super::{
    CrcPolynomial, CrcWidth, DecodedInstr, EXT_CRC32, OpId, decode_bits, decode_rd, decode_rm,
    decode_rn, decode_sf,
};

/// Fixed bits of the CRC32 group: `sf 0 0 11010110 Rm 010 C sz Rn Rd`.
const CRC32_MASK: u32 = 0x7FE0_E000;
const CRC32_MATCH: u32 = 0x1AC0_4000;

pub(super) fn decode_crc32(raw: u32, pc: u64) -> Option<DecodedInstr> {
    if raw & CRC32_MASK != CRC32_MATCH {
        return None;
    }

    let width = CrcWidth::from_size_field(decode_bits(raw, 10, 2));
    // sf must be set exactly for the doubleword forms.
    if decode_sf(raw) != (width == CrcWidth::Double) {
        return None;
    }
    let poly = if decode_bits(raw, 12, 1) == 0 {
        CrcPolynomial::Iso
    } else {
        CrcPolynomial::Castagnoli
    };

    Some(DecodedInstr::new(
        opid_for(width, poly),
        pc,
        raw,
        decode_rd(raw),
        decode_rn(raw),
        decode_rm(raw),
    ))
}

#[allow(clippy::cast_possible_truncation)]
pub(super) const fn opid_for(width: CrcWidth, poly: CrcPolynomial) -> OpId {
    OpId::new(EXT_CRC32, (poly.c_bit() * 4 + width.size_field()) as u8)
}
