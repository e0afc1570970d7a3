use arx_ir::{Context, ExternFn, Intrinsic, OperandType};

use super::{CrcPolynomial, CrcWidth, DecodedInstr, HostFeatures};
use crate::helpers::{get_int_or_zr, set_int_or_zr, x86_get_scalar};
use crate::soft::soft_fn;

/// Code generation path taken for one instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crc32Path {
    /// Inline carry-less multiply with Barrett reduction.
    Pclmulqdq,
    /// Call to the software routine.
    Fallback,
}

impl Crc32Path {
    /// Path selected for the given host.
    #[must_use]
    pub const fn select(features: HostFeatures) -> Self {
        if features.pclmulqdq {
            Self::Pclmulqdq
        } else {
            Self::Fallback
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pclmulqdq => "pclmulqdq",
            Self::Fallback => "fallback",
        }
    }
}

/// CRC32B: CRC-32 of the low byte of Wm.
pub fn crc32b(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(ctx, op, features, CrcPolynomial::Iso, CrcWidth::Byte)
}

/// CRC32H: CRC-32 of the low halfword of Wm.
pub fn crc32h(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(ctx, op, features, CrcPolynomial::Iso, CrcWidth::Half)
}

/// CRC32W: CRC-32 of Wm.
pub fn crc32w(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(ctx, op, features, CrcPolynomial::Iso, CrcWidth::Word)
}

/// CRC32X: CRC-32 of Xm.
pub fn crc32x(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(ctx, op, features, CrcPolynomial::Iso, CrcWidth::Double)
}

/// CRC32CB: CRC-32C of the low byte of Wm.
pub fn crc32cb(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(ctx, op, features, CrcPolynomial::Castagnoli, CrcWidth::Byte)
}

/// CRC32CH: CRC-32C of the low halfword of Wm.
pub fn crc32ch(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(ctx, op, features, CrcPolynomial::Castagnoli, CrcWidth::Half)
}

/// CRC32CW: CRC-32C of Wm.
pub fn crc32cw(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(ctx, op, features, CrcPolynomial::Castagnoli, CrcWidth::Word)
}

/// CRC32CX: CRC-32C of Xm.
pub fn crc32cx(ctx: &mut Context, op: &DecodedInstr, features: HostFeatures) -> Crc32Path {
    emit_crc32(
        ctx,
        op,
        features,
        CrcPolynomial::Castagnoli,
        CrcWidth::Double,
    )
}

fn emit_crc32(
    ctx: &mut Context,
    op: &DecodedInstr,
    features: HostFeatures,
    poly: CrcPolynomial,
    width: CrcWidth,
) -> Crc32Path {
    let path = Crc32Path::select(features);
    match path {
        Crc32Path::Pclmulqdq => emit_crc32_pclmulqdq(ctx, op, poly, width),
        Crc32Path::Fallback => emit_crc32_call(ctx, op, width, soft_fn(width, poly)),
    }
    path
}

/// Barrett reduction over two carry-less multiplies.
///
/// The data (xor'd with the old CRC) is aligned to bit 64, multiplied by mu,
/// the quotient multiplied by P, and the result read from bits [95:64].
/// Widths under 32 bits xor the aligned input back in.
pub(super) fn emit_crc32_pclmulqdq(
    ctx: &mut Context,
    op: &DecodedInstr,
    poly: CrcPolynomial,
    width: CrcWidth,
) {
    let crc = get_int_or_zr(ctx, op.rn, OperandType::I32);
    let data = get_int_or_zr(ctx, op.rm, width.data_type());

    let zero = ctx.vector_zero();
    let crc = ctx.vector_insert(zero, crc, 0);

    let zero = ctx.vector_zero();
    let data = match width {
        CrcWidth::Byte => ctx.vector_insert8(zero, data, 0),
        CrcWidth::Half => ctx.vector_insert16(zero, data, 0),
        CrcWidth::Word | CrcWidth::Double => ctx.vector_insert(zero, data, 0),
    };

    let folded = ctx.add_intrinsic(Intrinsic::X86Pxor, &[crc, data]);
    let mut aligned = folded;
    if width.bits() < 64 {
        let count = ctx.const_u32((64 - width.bits()) / 8);
        aligned = ctx.add_intrinsic(Intrinsic::X86Pslldq, &[aligned, count]);
    }

    let mu = x86_get_scalar(ctx, poly.mu());
    let select = ctx.const_u32(0);
    let mut tmp = ctx.add_intrinsic(Intrinsic::X86Pclmulqdq, &[aligned, mu, select]);

    let reduction = x86_get_scalar(ctx, poly.reduction());
    let select = ctx.const_u32(0);
    tmp = ctx.add_intrinsic(Intrinsic::X86Pclmulqdq, &[tmp, reduction, select]);

    if width.bits() < 32 {
        tmp = ctx.add_intrinsic(Intrinsic::X86Pxor, &[tmp, aligned]);
    }

    let result = ctx.vector_extract(OperandType::I32, tmp, 2);
    set_int_or_zr(ctx, op.rd, result);
}

/// Call the software routine with (Wn, Wm or Xm).
pub(super) fn emit_crc32_call(
    ctx: &mut Context,
    op: &DecodedInstr,
    width: CrcWidth,
    func: ExternFn,
) {
    let n = get_int_or_zr(ctx, op.rn, OperandType::I32);
    let m = get_int_or_zr(ctx, op.rm, width.data_type());
    let d = ctx.call(func, &[n, m]);
    set_int_or_zr(ctx, op.rd, d);
}
