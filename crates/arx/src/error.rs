use arx_ir::EvalError;
use thiserror::Error;

/// Translator errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unrecognized instruction word {raw:#010x}")]
    UnknownInstruction { raw: u32 },
    #[error("no lifter for {disasm} ({raw:#010x})")]
    NotLifted { raw: u32, disasm: String },
    #[error("invalid instruction word '{0}'")]
    ParseWord(String),
    #[error("invalid register assignment '{0}': expected N=VALUE with N in 0..=31")]
    ParseReg(String),
    #[error("evaluation failed: {0}")]
    Eval(#[from] EvalError),
    #[error(
        "{disasm}: results disagree (pclmulqdq={hardware:#x}, fallback={fallback:#x}, software={software:#x})"
    )]
    Mismatch {
        disasm: String,
        hardware: u64,
        fallback: u64,
        software: u64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
