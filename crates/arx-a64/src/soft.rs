//! Software CRC32 routines.
//!
//! Bit-exact with the A64 `CRC32*` instructions: reflected polynomials, no
//! initial or final inversion, data consumed least significant byte first.
//! These are the call targets of the fallback lifting path.

use arx_ir::{ExternFn, OperandType};

use crate::crc::{CrcPolynomial, CrcWidth};

/// Byte-at-a-time lookup table for a reflected polynomial.
#[allow(clippy::cast_possible_truncation)]
const fn make_table(poly: u32) -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u32;
        let mut bit = 0;
        while bit < 8 {
            crc = (crc >> 1) ^ (poly & (crc & 1).wrapping_neg());
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

static CRC32_TABLE: [u32; 256] = make_table(CrcPolynomial::Iso.reversed());
static CRC32C_TABLE: [u32; 256] = make_table(CrcPolynomial::Castagnoli.reversed());

/// Fold the low `bytes` bytes of `value` into `crc`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn crc32_bytewise(mut crc: u32, value: u64, bytes: u32, table: &[u32; 256]) -> u32 {
    for i in 0..bytes {
        let byte = (value >> (i * 8)) & 0xFF;
        let index = ((u64::from(crc) ^ byte) & 0xFF) as usize;
        crc = table[index] ^ (crc >> 8);
    }
    crc
}

/// Update `crc` with `value` using the given polynomial family and width.
#[must_use]
pub fn crc32(poly: CrcPolynomial, width: CrcWidth, crc: u32, value: u64) -> u32 {
    let table = match poly {
        CrcPolynomial::Iso => &CRC32_TABLE,
        CrcPolynomial::Castagnoli => &CRC32C_TABLE,
    };
    crc32_bytewise(crc, value, width.bytes(), table)
}

#[must_use]
pub fn crc32b(crc: u32, value: u8) -> u32 {
    crc32(CrcPolynomial::Iso, CrcWidth::Byte, crc, u64::from(value))
}

#[must_use]
pub fn crc32h(crc: u32, value: u16) -> u32 {
    crc32(CrcPolynomial::Iso, CrcWidth::Half, crc, u64::from(value))
}

#[must_use]
pub fn crc32w(crc: u32, value: u32) -> u32 {
    crc32(CrcPolynomial::Iso, CrcWidth::Word, crc, u64::from(value))
}

#[must_use]
pub fn crc32x(crc: u32, value: u64) -> u32 {
    crc32(CrcPolynomial::Iso, CrcWidth::Double, crc, value)
}

#[must_use]
pub fn crc32cb(crc: u32, value: u8) -> u32 {
    crc32(
        CrcPolynomial::Castagnoli,
        CrcWidth::Byte,
        crc,
        u64::from(value),
    )
}

#[must_use]
pub fn crc32ch(crc: u32, value: u16) -> u32 {
    crc32(
        CrcPolynomial::Castagnoli,
        CrcWidth::Half,
        crc,
        u64::from(value),
    )
}

#[must_use]
pub fn crc32cw(crc: u32, value: u32) -> u32 {
    crc32(
        CrcPolynomial::Castagnoli,
        CrcWidth::Word,
        crc,
        u64::from(value),
    )
}

#[must_use]
pub fn crc32cx(crc: u32, value: u64) -> u32 {
    crc32(CrcPolynomial::Castagnoli, CrcWidth::Double, crc, value)
}

// ===== Graph call targets =====

macro_rules! soft_thunk {
    ($thunk:ident, $func:ident, $data:ty) => {
        #[allow(clippy::cast_possible_truncation)]
        fn $thunk(args: &[u64]) -> u64 {
            let crc = args.first().copied().unwrap_or(0) as u32;
            let data = args.get(1).copied().unwrap_or(0) as $data;
            u64::from($func(crc, data))
        }
    };
}

soft_thunk!(crc32b_thunk, crc32b, u8);
soft_thunk!(crc32h_thunk, crc32h, u16);
soft_thunk!(crc32w_thunk, crc32w, u32);
soft_thunk!(crc32x_thunk, crc32x, u64);
soft_thunk!(crc32cb_thunk, crc32cb, u8);
soft_thunk!(crc32ch_thunk, crc32ch, u16);
soft_thunk!(crc32cw_thunk, crc32cw, u32);
soft_thunk!(crc32cx_thunk, crc32cx, u64);

const PARAMS_W: &[OperandType] = &[OperandType::I32, OperandType::I32];
const PARAMS_X: &[OperandType] = &[OperandType::I32, OperandType::I64];

/// Call targets indexed by polynomial family, then width.
const SOFT_FNS: [[ExternFn; 4]; 2] = [
    [
        ExternFn::new("crc32b", PARAMS_W, OperandType::I32, crc32b_thunk),
        ExternFn::new("crc32h", PARAMS_W, OperandType::I32, crc32h_thunk),
        ExternFn::new("crc32w", PARAMS_W, OperandType::I32, crc32w_thunk),
        ExternFn::new("crc32x", PARAMS_X, OperandType::I32, crc32x_thunk),
    ],
    [
        ExternFn::new("crc32cb", PARAMS_W, OperandType::I32, crc32cb_thunk),
        ExternFn::new("crc32ch", PARAMS_W, OperandType::I32, crc32ch_thunk),
        ExternFn::new("crc32cw", PARAMS_W, OperandType::I32, crc32cw_thunk),
        ExternFn::new("crc32cx", PARAMS_X, OperandType::I32, crc32cx_thunk),
    ],
];

/// Software routine for a width/polynomial pair, as a graph call target.
#[must_use]
pub const fn soft_fn(width: CrcWidth, poly: CrcPolynomial) -> ExternFn {
    SOFT_FNS[poly.index()][width.index()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checksum(poly: CrcPolynomial, data: &[u8]) -> u32 {
        !data
            .iter()
            .fold(!0, |crc, &b| crc32(poly, CrcWidth::Byte, crc, u64::from(b)))
    }

    #[test]
    fn test_check_values() {
        assert_eq!(checksum(CrcPolynomial::Iso, b"123456789"), 0xCBF4_3926);
        assert_eq!(
            checksum(CrcPolynomial::Castagnoli, b"123456789"),
            0xE306_9283
        );
    }

    #[test]
    fn test_known_values() {
        assert_eq!(crc32b(0, 0), 0);
        assert_eq!(crc32b(0xFFFF_FFFF, 0xFF), 0x00FF_FFFF);
        assert_eq!(crc32cw(0, 0), 0);
        assert_eq!(crc32cw(0xFFFF_FFFF, 0x1234_5678), 0x4DEC_E20C);
        assert_eq!(crc32h(0x1234_5678, 0xBEEF), 0x90D1_64A3);
        assert_eq!(crc32ch(0x1234_5678, 0xBEEF), 0xD782_20DC);
        assert_eq!(crc32x(0xFFFF_FFFF, 0x0123_4567_89AB_CDEF), 0xBBC4_1DB8);
        assert_eq!(crc32cx(0xFFFF_FFFF, 0x0123_4567_89AB_CDEF), 0x9A4F_27DC);
    }

    #[test]
    fn test_wide_matches_bytewise() {
        let value = 0x0123_4567_89AB_CDEF_u64;
        let bytewise = value
            .to_le_bytes()
            .iter()
            .fold(0x5555_AAAA, |crc, &b| crc32cb(crc, b));
        assert_eq!(crc32cx(0x5555_AAAA, value), bytewise);
    }

    #[test]
    fn test_soft_fn_table() {
        for poly in CrcPolynomial::ALL {
            for width in CrcWidth::ALL {
                let func = soft_fn(width, poly);
                assert_eq!(func.params()[1], width.data_type());
                assert_eq!(func.ret(), OperandType::I32);
                let data = 0xDEAD_BEEF_CAFE_F00D;
                assert_eq!(
                    func.invoke(&[0x1234_5678, data]),
                    u64::from(crc32(poly, width, 0x1234_5678, data & width.mask()))
                );
            }
        }
        assert_eq!(
            soft_fn(CrcWidth::Half, CrcPolynomial::Castagnoli).name(),
            "crc32ch"
        );
    }
}
