//! arx - A64 CRC32 instruction translator
//!
//! Decodes A64 `CRC32*` / `CRC32C*` words, lifts them into operation graphs
//! for the host, and runs those graphs in a reference interpreter.
//!
//! # Example
//!
//! ```
//! use arx::{HostFeatures, RegisterFile, Translator};
//!
//! // crc32b w0, w1, w2
//! let translator = Translator::new(HostFeatures::all());
//! let mut regs = RegisterFile::new().with(1, 0xFFFF_FFFF).with(2, 0xFF);
//! translator.execute(0x1AC2_4020, &mut regs)?;
//! assert_eq!(regs.regs()[0], 0x00FF_FFFF);
//! # Ok::<(), arx::Error>(())
//! ```

// Re-export from sub-crates
pub use arx_a64::{
    CompositeDecoder, Crc32Extension, Crc32Path, CrcPolynomial, CrcWidth, DecodedInstr,
    HostFeatures, InstructionExtension, OpId, OpInfo, REG_ZR, crc32_variant, encode_crc32, soft,
};
pub use arx_ir::{
    Context, EvalError, ExternFn, Graph, GuestRegisters, Interpreter, Intrinsic, Node, Opcode,
    Operand, OperandType, RegisterFile, Value,
};

mod error;
pub mod metrics;
mod parse;
mod translator;

pub use error::{Error, Result};
pub use parse::{parse_reg, parse_word};
pub use translator::{Crosscheck, Translator, crosscheck};
