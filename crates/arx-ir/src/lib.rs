//! Operation graph for the arx translator.
//!
//! Nodes live in an append-only arena and are referenced by [`Operand`]
//! handles. [`Context`] appends nodes; [`Interpreter`] evaluates a finished
//! graph against a guest register file. Nothing here knows about a guest ISA;
//! A64 lifting lives in `arx-a64`.

mod context;
mod error;
mod graph;
mod interp;
mod operand;
mod types;

pub use context::*;
pub use error::EvalError;
pub use graph::*;
pub use interp::*;
pub use operand::*;
pub use types::*;
