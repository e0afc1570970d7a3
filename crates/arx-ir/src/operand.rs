//! Graph nodes and the handles that reference them.

use std::fmt;

use crate::types::OperandType;

/// Handle to a node in a [`Graph`](crate::Graph).
///
/// Handles are plain indices. They stay valid for the lifetime of the graph
/// because nodes are only ever appended.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Operand(u32);

impl Operand {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the node in the graph.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Host intrinsics over 128-bit vectors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Intrinsic {
    /// Bitwise XOR of two vectors.
    X86Pxor,
    /// Byte-granular left shift. Second operand is a constant byte count.
    X86Pslldq,
    /// Carry-less multiply of two 64-bit halves. Third operand is a constant
    /// selector: bit 0 picks the half of the first vector, bit 4 the half of
    /// the second.
    X86Pclmulqdq,
}

impl Intrinsic {
    /// Mnemonic used in graph listings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X86Pxor => "x86_pxor",
            Self::X86Pslldq => "x86_pslldq",
            Self::X86Pclmulqdq => "x86_pclmulqdq",
        }
    }

    /// Number of operands, immediates included.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::X86Pxor | Self::X86Pslldq => 2,
            Self::X86Pclmulqdq => 3,
        }
    }

    /// Operand position that must be a constant, if any.
    #[must_use]
    pub const fn immediate_index(self) -> Option<usize> {
        match self {
            Self::X86Pxor => None,
            Self::X86Pslldq => Some(1),
            Self::X86Pclmulqdq => Some(2),
        }
    }
}

/// Type-erased entry point of an external function.
///
/// Arguments arrive zero-extended to 64 bits; the result is truncated to the
/// declared return type.
pub type ExternThunk = fn(&[u64]) -> u64;

/// Reference to a pure host function callable from the graph.
#[derive(Clone, Copy)]
pub struct ExternFn {
    name: &'static str,
    params: &'static [OperandType],
    ret: OperandType,
    thunk: ExternThunk,
}

impl ExternFn {
    /// Describe an external function.
    #[must_use]
    pub const fn new(
        name: &'static str,
        params: &'static [OperandType],
        ret: OperandType,
        thunk: ExternThunk,
    ) -> Self {
        Self {
            name,
            params,
            ret,
            thunk,
        }
    }

    /// Symbol name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Parameter types.
    #[must_use]
    pub const fn params(&self) -> &'static [OperandType] {
        self.params
    }

    /// Return type.
    #[must_use]
    pub const fn ret(&self) -> OperandType {
        self.ret
    }

    /// Invoke the function.
    #[must_use]
    pub fn invoke(&self, args: &[u64]) -> u64 {
        (self.thunk)(args) & self.ret.mask()
    }
}

// Two references are the same function when name and signature agree;
// thunk addresses are not stable across codegen units.
impl PartialEq for ExternFn {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.ret == other.ret
    }
}

impl Eq for ExternFn {}

impl fmt::Debug for ExternFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExternFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .finish_non_exhaustive()
    }
}

/// Node operation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Opcode {
    /// Scalar constant.
    Constant(u64),
    /// All-zero vector.
    VectorZero,
    /// Vector holding a scalar in its low lane, other lanes zero.
    VectorCreateScalar,
    /// Insert a scalar into a lane sized by the scalar's type.
    VectorInsert { lane: u8 },
    /// Insert the low byte of a scalar into a byte lane.
    VectorInsert8 { lane: u8 },
    /// Insert the low halfword of a scalar into a halfword lane.
    VectorInsert16 { lane: u8 },
    /// Extract a lane sized by the node's result type.
    VectorExtract { lane: u8 },
    /// Host intrinsic.
    Intrinsic(Intrinsic),
    /// Read a guest general register.
    LoadRegister(u8),
    /// Write a guest general register. Produces no value.
    StoreRegister(u8),
    /// Call an external function.
    Call(ExternFn),
}

/// A single operation in the graph.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    /// Operation.
    pub opcode: Opcode,
    /// Result type, `None` for nodes that only have effects.
    pub ty: Option<OperandType>,
    /// Input operands.
    pub args: Vec<Operand>,
}

impl Node {
    /// Create a node.
    #[must_use]
    pub const fn new(opcode: Opcode, ty: Option<OperandType>, args: Vec<Operand>) -> Self {
        Self { opcode, ty, args }
    }

    /// Check if the node writes guest state.
    #[must_use]
    pub const fn has_side_effects(&self) -> bool {
        matches!(self.opcode, Opcode::StoreRegister(_))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => write!(f, "const {value:#x}"),
            Self::VectorZero => f.write_str("vector_zero"),
            Self::VectorCreateScalar => f.write_str("vector_create_scalar"),
            Self::VectorInsert { lane } => write!(f, "vector_insert[{lane}]"),
            Self::VectorInsert8 { lane } => write!(f, "vector_insert8[{lane}]"),
            Self::VectorInsert16 { lane } => write!(f, "vector_insert16[{lane}]"),
            Self::VectorExtract { lane } => write!(f, "vector_extract[{lane}]"),
            Self::Intrinsic(intrinsic) => f.write_str(intrinsic.name()),
            Self::LoadRegister(reg) => write!(f, "load_register r{reg}"),
            Self::StoreRegister(reg) => write!(f, "store_register r{reg}"),
            Self::Call(func) => write!(f, "call {}", func.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(args: &[u64]) -> u64 {
        args.first().copied().unwrap_or(0)
    }

    fn other(args: &[u64]) -> u64 {
        args.first().copied().unwrap_or(0).wrapping_add(1)
    }

    #[test]
    fn test_extern_fn_truncates_result() {
        let func = ExternFn::new("id", &[OperandType::I64], OperandType::I32, first);
        assert_eq!(func.invoke(&[0x1_2345_6789]), 0x2345_6789);
    }

    #[test]
    fn test_extern_fn_eq_by_name_and_signature() {
        let a = ExternFn::new("f", &[OperandType::I32], OperandType::I32, first);
        let b = ExternFn::new("f", &[OperandType::I32], OperandType::I32, other);
        let c = ExternFn::new("g", &[OperandType::I32], OperandType::I32, first);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_intrinsic_immediates() {
        assert_eq!(Intrinsic::X86Pxor.immediate_index(), None);
        assert_eq!(Intrinsic::X86Pslldq.immediate_index(), Some(1));
        assert_eq!(Intrinsic::X86Pclmulqdq.arity(), 3);
    }

    #[test]
    fn test_opcode_display() {
        assert_eq!(Opcode::Constant(16).to_string(), "const 0x10");
        assert_eq!(
            Opcode::VectorInsert8 { lane: 0 }.to_string(),
            "vector_insert8[0]"
        );
        assert_eq!(Opcode::LoadRegister(3).to_string(), "load_register r3");
    }
}
