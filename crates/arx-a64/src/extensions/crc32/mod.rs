//! CRC32 and CRC32C instructions - decode, lift, disasm.
//!
//! Eight instructions update a 32-bit checksum held in Wn with 8, 16, 32, or
//! 64 bits of Wm/Xm, using either the CRC-32 or the CRC-32C polynomial.
//! Lifting emits an inline carry-less multiply sequence when the host has
//! `PCLMULQDQ` and a call to the matching software routine otherwise.

use arx_ir::Context;
use tracing::trace;

use super::InstructionExtension;
use crate::{
    CrcPolynomial, CrcWidth, DecodedInstr, EXT_CRC32, HostFeatures, OpId, OpInfo,
    encode::{decode_bits, decode_rd, decode_rm, decode_rn, decode_sf, encode_regs},
    reg_name,
};

mod decode;
mod disasm;
mod lift;

use decode::decode_crc32;
use disasm::format_crc32;

pub use lift::{Crc32Path, crc32b, crc32cb, crc32ch, crc32cw, crc32cx, crc32h, crc32w, crc32x};

// ===== OpId Constants =====
// idx = C * 4 + sz

pub const OP_CRC32B: OpId = OpId::new(EXT_CRC32, 0);
pub const OP_CRC32H: OpId = OpId::new(EXT_CRC32, 1);
pub const OP_CRC32W: OpId = OpId::new(EXT_CRC32, 2);
pub const OP_CRC32X: OpId = OpId::new(EXT_CRC32, 3);
pub const OP_CRC32CB: OpId = OpId::new(EXT_CRC32, 4);
pub const OP_CRC32CH: OpId = OpId::new(EXT_CRC32, 5);
pub const OP_CRC32CW: OpId = OpId::new(EXT_CRC32, 6);
pub const OP_CRC32CX: OpId = OpId::new(EXT_CRC32, 7);

/// Get mnemonic for a CRC32 instruction.
#[must_use]
pub const fn crc32_mnemonic(opid: OpId) -> &'static str {
    match opid.idx {
        0 => "crc32b",
        1 => "crc32h",
        2 => "crc32w",
        3 => "crc32x",
        4 => "crc32cb",
        5 => "crc32ch",
        6 => "crc32cw",
        7 => "crc32cx",
        _ => "???",
    }
}

/// Width and polynomial family of a CRC32 `OpId`.
#[must_use]
pub const fn crc32_variant(opid: OpId) -> Option<(CrcWidth, CrcPolynomial)> {
    if opid.ext != EXT_CRC32 || opid.idx > 7 {
        return None;
    }
    let width = CrcWidth::from_size_field((opid.idx & 0b11) as u32);
    let poly = if opid.idx < 4 {
        CrcPolynomial::Iso
    } else {
        CrcPolynomial::Castagnoli
    };
    Some((width, poly))
}

/// Encode a CRC32 instruction word.
#[must_use]
pub const fn encode_crc32(width: CrcWidth, poly: CrcPolynomial, rd: u8, rn: u8, rm: u8) -> u32 {
    let sf = match width {
        CrcWidth::Double => 1,
        CrcWidth::Byte | CrcWidth::Half | CrcWidth::Word => 0,
    };
    (sf << 31)
        | 0x1AC0_4000
        | (poly.c_bit() << 12)
        | (width.size_field() << 10)
        | encode_regs(rd, rn, rm)
}

// ===== Extension Implementation =====

/// A64 CRC32 instruction group (`FEAT_CRC32`).
pub struct Crc32Extension;

impl InstructionExtension for Crc32Extension {
    fn name(&self) -> &'static str {
        "CRC32"
    }

    fn ext_id(&self) -> u8 {
        EXT_CRC32
    }

    fn decode32(&self, raw: u32, pc: u64) -> Option<DecodedInstr> {
        decode_crc32(raw, pc)
    }

    fn lift(&self, ctx: &mut Context, instr: &DecodedInstr, features: HostFeatures) -> bool {
        let emit = match instr.opid {
            OP_CRC32B => crc32b,
            OP_CRC32H => crc32h,
            OP_CRC32W => crc32w,
            OP_CRC32X => crc32x,
            OP_CRC32CB => crc32cb,
            OP_CRC32CH => crc32ch,
            OP_CRC32CW => crc32cw,
            OP_CRC32CX => crc32cx,
            _ => return false,
        };
        let mnemonic = crc32_mnemonic(instr.opid);
        let path = emit(ctx, instr, features);
        trace!(
            pc = instr.pc,
            mnemonic,
            path = path.as_str(),
            nodes = ctx.graph().len(),
            "lifted"
        );
        metrics::counter!(
            "arx_crc32_lifted_total",
            "path" => path.as_str(),
            "mnemonic" => mnemonic
        )
        .increment(1);
        true
    }

    fn disasm(&self, instr: &DecodedInstr) -> String {
        format_crc32(instr)
    }

    fn op_info(&self, opid: OpId) -> Option<OpInfo> {
        OP_INFO_CRC32.iter().find(|info| info.opid == opid).copied()
    }
}

/// Table-driven `OpInfo` for the CRC32 group.
const OP_INFO_CRC32: &[OpInfo] = &[
    OpInfo {
        opid: OP_CRC32B,
        name: "crc32b",
    },
    OpInfo {
        opid: OP_CRC32H,
        name: "crc32h",
    },
    OpInfo {
        opid: OP_CRC32W,
        name: "crc32w",
    },
    OpInfo {
        opid: OP_CRC32X,
        name: "crc32x",
    },
    OpInfo {
        opid: OP_CRC32CB,
        name: "crc32cb",
    },
    OpInfo {
        opid: OP_CRC32CH,
        name: "crc32ch",
    },
    OpInfo {
        opid: OP_CRC32CW,
        name: "crc32cw",
    },
    OpInfo {
        opid: OP_CRC32CX,
        name: "crc32cx",
    },
];
