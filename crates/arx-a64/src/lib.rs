//! A64 front end for the CRC32 instruction group.
//!
//! This crate decodes, disassembles, and lifts the A64 `CRC32*` and
//! `CRC32C*` instructions into `arx-ir` operation graphs. Lifting consults
//! [`HostFeatures`] to choose between an inline `PCLMULQDQ` sequence and a
//! call to the software routines in [`soft`].

mod crc;
mod decode;
mod encode;
pub mod extensions;
mod features;
pub mod helpers;
pub mod soft;
mod types;

pub use crc::{CrcPolynomial, CrcWidth};
pub use decode::DecodedInstr;
pub use encode::*;
pub use extensions::*;
pub use features::HostFeatures;
pub use types::*;

use arx_ir::Context;

/// Decode an instruction using the standard A64 groups.
///
/// This is a convenience wrapper around `CompositeDecoder::standard().decode()`.
#[must_use]
pub fn decode(bytes: &[u8], pc: u64) -> Option<DecodedInstr> {
    CompositeDecoder::standard().decode(bytes, pc)
}

/// Decode a raw instruction word using the standard A64 groups.
#[must_use]
pub fn decode32(raw: u32, pc: u64) -> Option<DecodedInstr> {
    CompositeDecoder::standard().decode32(raw, pc)
}

/// Lift a decoded instruction into `ctx`. Returns false for instructions
/// outside the standard groups.
pub fn lift(ctx: &mut Context, instr: &DecodedInstr, features: HostFeatures) -> bool {
    CompositeDecoder::standard().lift(ctx, instr, features)
}
