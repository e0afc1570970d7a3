//! Graph builder API.

use crate::graph::Graph;
use crate::operand::{ExternFn, Intrinsic, Node, Opcode, Operand};
use crate::types::OperandType;

/// Builder for an operation graph.
///
/// Every method appends exactly one node and returns its handle. The builder
/// owns its graph; callers translating unrelated code use separate contexts.
#[derive(Clone, Debug, Default)]
pub struct Context {
    graph: Graph,
}

impl Context {
    /// Create a builder with an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            graph: Graph::new(),
        }
    }

    /// Continue building on an existing graph.
    #[must_use]
    pub const fn with_graph(graph: Graph) -> Self {
        Self { graph }
    }

    /// Graph built so far.
    #[must_use]
    pub const fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Finish building and take the graph.
    #[must_use]
    pub fn into_graph(self) -> Graph {
        self.graph
    }

    fn append(&mut self, opcode: Opcode, ty: Option<OperandType>, args: Vec<Operand>) -> Operand {
        self.graph.push(Node::new(opcode, ty, args))
    }

    /// Scalar constant.
    pub fn constant(&mut self, ty: OperandType, value: u64) -> Operand {
        self.append(Opcode::Constant(value & ty.mask()), Some(ty), Vec::new())
    }

    /// 32-bit constant.
    pub fn const_u32(&mut self, value: u32) -> Operand {
        self.constant(OperandType::I32, u64::from(value))
    }

    /// 64-bit constant.
    pub fn const_u64(&mut self, value: u64) -> Operand {
        self.constant(OperandType::I64, value)
    }

    /// All-zero vector.
    pub fn vector_zero(&mut self) -> Operand {
        self.append(Opcode::VectorZero, Some(OperandType::V128), Vec::new())
    }

    /// Vector with `value` in its low lane and zero elsewhere.
    pub fn vector_create_scalar(&mut self, value: Operand) -> Operand {
        self.append(
            Opcode::VectorCreateScalar,
            Some(OperandType::V128),
            vec![value],
        )
    }

    /// Insert `value` into `vector` at `lane`. Lane size is the width of
    /// `value`'s type.
    pub fn vector_insert(&mut self, vector: Operand, value: Operand, lane: u8) -> Operand {
        self.append(
            Opcode::VectorInsert { lane },
            Some(OperandType::V128),
            vec![vector, value],
        )
    }

    /// Insert the low byte of `value` into byte `lane`.
    pub fn vector_insert8(&mut self, vector: Operand, value: Operand, lane: u8) -> Operand {
        self.append(
            Opcode::VectorInsert8 { lane },
            Some(OperandType::V128),
            vec![vector, value],
        )
    }

    /// Insert the low halfword of `value` into halfword `lane`.
    pub fn vector_insert16(&mut self, vector: Operand, value: Operand, lane: u8) -> Operand {
        self.append(
            Opcode::VectorInsert16 { lane },
            Some(OperandType::V128),
            vec![vector, value],
        )
    }

    /// Extract lane `lane` of `vector` as a scalar of type `ty`.
    pub fn vector_extract(&mut self, ty: OperandType, vector: Operand, lane: u8) -> Operand {
        self.append(Opcode::VectorExtract { lane }, Some(ty), vec![vector])
    }

    /// Apply a vector intrinsic. Immediates are passed as constant operands.
    pub fn add_intrinsic(&mut self, intrinsic: Intrinsic, args: &[Operand]) -> Operand {
        self.append(
            Opcode::Intrinsic(intrinsic),
            Some(OperandType::V128),
            args.to_vec(),
        )
    }

    /// Read guest register `reg` as type `ty`.
    pub fn load_register(&mut self, reg: u8, ty: OperandType) -> Operand {
        self.append(Opcode::LoadRegister(reg), Some(ty), Vec::new())
    }

    /// Write `value` to guest register `reg`.
    pub fn store_register(&mut self, reg: u8, value: Operand) -> Operand {
        self.append(Opcode::StoreRegister(reg), None, vec![value])
    }

    /// Call an external function.
    pub fn call(&mut self, func: ExternFn, args: &[Operand]) -> Operand {
        self.append(Opcode::Call(func), Some(func.ret()), args.to_vec())
    }
}
