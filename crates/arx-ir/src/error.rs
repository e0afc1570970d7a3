use thiserror::Error;

use crate::operand::Operand;
use crate::types::OperandType;

/// Graph evaluation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("{node}: operand {operand} is not defined before use")]
    UndefinedOperand { node: Operand, operand: Operand },
    #[error("{node}: operand {operand} produces no value")]
    VoidOperand { node: Operand, operand: Operand },
    #[error("{node}: expected {expected} operands, got {actual}")]
    ArgCount {
        node: Operand,
        expected: usize,
        actual: usize,
    },
    #[error("{node}: expected {expected} operand, got {actual}")]
    TypeMismatch {
        node: Operand,
        expected: &'static str,
        actual: OperandType,
    },
    #[error("{node}: immediate operand {operand} is not a constant")]
    NonConstantImmediate { node: Operand, operand: Operand },
    #[error("{node}: lane {lane} out of range for {lane_bits}-bit lanes")]
    LaneOutOfRange {
        node: Operand,
        lane: u8,
        lane_bits: u32,
    },
    #[error("{node}: node has no result type")]
    MissingType { node: Operand },
}

pub type Result<T> = std::result::Result<T, EvalError>;
