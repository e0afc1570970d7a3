//! Reference interpreter for operation graphs.
//!
//! Evaluates nodes in arena order against a guest register file. Used to
//! check lifted code against the software routines it replaces.

use tracing::trace;

use crate::error::{EvalError, Result};
use crate::graph::Graph;
use crate::operand::{Intrinsic, Node, Opcode, Operand};
use crate::types::OperandType;

/// Number of guest general registers.
pub const NUM_REGS: usize = 32;

/// Guest register state seen by the interpreter.
pub trait GuestRegisters {
    /// Read a 64-bit register.
    fn read(&self, reg: u8) -> u64;

    /// Write a 64-bit register.
    fn write(&mut self, reg: u8, value: u64);
}

/// Plain array of 64-bit general registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u64; NUM_REGS],
}

impl RegisterFile {
    /// Create a register file with every register zeroed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: [0; NUM_REGS],
        }
    }

    /// Set a register, builder style.
    #[must_use]
    pub fn with(mut self, reg: u8, value: u64) -> Self {
        self.write(reg, value);
        self
    }

    /// All registers.
    #[must_use]
    pub const fn regs(&self) -> &[u64; NUM_REGS] {
        &self.regs
    }
}

impl GuestRegisters for RegisterFile {
    fn read(&self, reg: u8) -> u64 {
        self.regs.get(usize::from(reg)).copied().unwrap_or(0)
    }

    fn write(&mut self, reg: u8, value: u64) {
        if let Some(slot) = self.regs.get_mut(usize::from(reg)) {
            *slot = value;
        }
    }
}

/// Runtime value of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Value {
    I32(u32),
    I64(u64),
    V128(u128),
}

impl Value {
    /// Build a value of type `ty` from the low bits of `bits`.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub const fn from_bits(ty: OperandType, bits: u128) -> Self {
        match ty {
            OperandType::I32 => Self::I32(bits as u32),
            OperandType::I64 => Self::I64(bits as u64),
            OperandType::V128 => Self::V128(bits),
        }
    }

    /// Type of the value.
    #[must_use]
    pub const fn ty(self) -> OperandType {
        match self {
            Self::I32(_) => OperandType::I32,
            Self::I64(_) => OperandType::I64,
            Self::V128(_) => OperandType::V128,
        }
    }

    /// All bits, zero-extended.
    #[must_use]
    pub const fn bits(self) -> u128 {
        match self {
            Self::I32(v) => v as u128,
            Self::I64(v) => v as u128,
            Self::V128(v) => v,
        }
    }
}

/// Carry-less multiply of two 64-bit polynomials over GF(2).
#[must_use]
pub const fn clmul64(a: u64, b: u64) -> u128 {
    let mut result = 0u128;
    let mut i = 0;
    while i < 64 {
        if (b >> i) & 1 != 0 {
            result ^= (a as u128) << i;
        }
        i += 1;
    }
    result
}

/// Shift a vector left by whole bytes; counts above 15 clear it.
#[must_use]
pub const fn shift_left_bytes(value: u128, count: u64) -> u128 {
    if count > 15 { 0 } else { value << (count * 8) }
}

#[allow(clippy::cast_possible_truncation)]
const fn half(value: u128, high: bool) -> u64 {
    if high {
        (value >> 64) as u64
    } else {
        value as u64
    }
}

const fn lane_mask(lane_bits: u32) -> u128 {
    if lane_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << lane_bits) - 1
    }
}

/// Evaluates a graph node by node.
pub struct Interpreter<'g> {
    graph: &'g Graph,
    values: Vec<Option<Value>>,
}

impl<'g> Interpreter<'g> {
    /// Create an interpreter for `graph`.
    #[must_use]
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            values: Vec::with_capacity(graph.len()),
        }
    }

    /// Evaluate every node, applying register writes to `regs`.
    ///
    /// # Errors
    ///
    /// Returns an [`EvalError`] for the first malformed node: a bad operand
    /// reference, an operand of the wrong type or count, a non-constant
    /// immediate, or an out-of-range lane.
    pub fn run<R: GuestRegisters + ?Sized>(&mut self, regs: &mut R) -> Result<()> {
        self.values.clear();
        for (op, node) in self.graph.iter() {
            let value = self.eval(op, node, regs)?;
            trace!(node = %op, opcode = %node.opcode, ?value, "eval");
            self.values.push(value);
        }
        Ok(())
    }

    /// Value computed for `operand` by the last run.
    #[must_use]
    pub fn value(&self, operand: Operand) -> Option<Value> {
        self.values.get(operand.index()).copied().flatten()
    }

    fn arg(&self, node: Operand, operand: Operand) -> Result<Value> {
        if operand >= node {
            return Err(EvalError::UndefinedOperand { node, operand });
        }
        self.values
            .get(operand.index())
            .copied()
            .ok_or(EvalError::UndefinedOperand { node, operand })?
            .ok_or(EvalError::VoidOperand { node, operand })
    }

    fn scalar(&self, node: Operand, operand: Operand) -> Result<Value> {
        let value = self.arg(node, operand)?;
        if value.ty().is_integer() {
            Ok(value)
        } else {
            Err(EvalError::TypeMismatch {
                node,
                expected: "integer",
                actual: value.ty(),
            })
        }
    }

    fn vector(&self, node: Operand, operand: Operand) -> Result<u128> {
        match self.arg(node, operand)? {
            Value::V128(v) => Ok(v),
            other => Err(EvalError::TypeMismatch {
                node,
                expected: "v128",
                actual: other.ty(),
            }),
        }
    }

    fn immediate(&self, node: Operand, operand: Operand) -> Result<u64> {
        if operand >= node {
            return Err(EvalError::UndefinedOperand { node, operand });
        }
        match self.graph.node(operand).map(|n| n.opcode) {
            Some(Opcode::Constant(value)) => Ok(value),
            _ => Err(EvalError::NonConstantImmediate { node, operand }),
        }
    }

    fn insert(node: Operand, vector: u128, value: u128, lane_bits: u32, lane: u8) -> Result<u128> {
        if u32::from(lane) >= 128 / lane_bits {
            return Err(EvalError::LaneOutOfRange {
                node,
                lane,
                lane_bits,
            });
        }
        let mask = lane_mask(lane_bits);
        let shift = u32::from(lane) * lane_bits;
        Ok((vector & !(mask << shift)) | ((value & mask) << shift))
    }

    fn eval<R: GuestRegisters + ?Sized>(
        &self,
        op: Operand,
        node: &Node,
        regs: &mut R,
    ) -> Result<Option<Value>> {
        let expect_args = |expected: usize| {
            if node.args.len() == expected {
                Ok(())
            } else {
                Err(EvalError::ArgCount {
                    node: op,
                    expected,
                    actual: node.args.len(),
                })
            }
        };
        let ty = || node.ty.ok_or(EvalError::MissingType { node: op });

        let value = match node.opcode {
            Opcode::Constant(value) => {
                expect_args(0)?;
                Value::from_bits(ty()?, u128::from(value))
            }
            Opcode::VectorZero => {
                expect_args(0)?;
                Value::V128(0)
            }
            Opcode::VectorCreateScalar => {
                expect_args(1)?;
                Value::V128(self.scalar(op, node.args[0])?.bits())
            }
            Opcode::VectorInsert { lane } => {
                expect_args(2)?;
                let vector = self.vector(op, node.args[0])?;
                let value = self.scalar(op, node.args[1])?;
                let bits = value.ty().bits();
                Value::V128(Self::insert(op, vector, value.bits(), bits, lane)?)
            }
            Opcode::VectorInsert8 { lane } => {
                expect_args(2)?;
                let vector = self.vector(op, node.args[0])?;
                let value = self.scalar(op, node.args[1])?;
                Value::V128(Self::insert(op, vector, value.bits(), 8, lane)?)
            }
            Opcode::VectorInsert16 { lane } => {
                expect_args(2)?;
                let vector = self.vector(op, node.args[0])?;
                let value = self.scalar(op, node.args[1])?;
                Value::V128(Self::insert(op, vector, value.bits(), 16, lane)?)
            }
            Opcode::VectorExtract { lane } => {
                expect_args(1)?;
                let ty = ty()?;
                let lane_bits = ty.bits();
                if !ty.is_integer() || u32::from(lane) >= 128 / lane_bits {
                    return Err(EvalError::LaneOutOfRange {
                        node: op,
                        lane,
                        lane_bits,
                    });
                }
                let vector = self.vector(op, node.args[0])?;
                Value::from_bits(ty, vector >> (u32::from(lane) * lane_bits))
            }
            Opcode::Intrinsic(intrinsic) => {
                expect_args(intrinsic.arity())?;
                Value::V128(self.eval_intrinsic(op, intrinsic, &node.args)?)
            }
            Opcode::LoadRegister(reg) => {
                expect_args(0)?;
                let ty = ty()?;
                if !ty.is_integer() {
                    return Err(EvalError::TypeMismatch {
                        node: op,
                        expected: "integer",
                        actual: ty,
                    });
                }
                Value::from_bits(ty, u128::from(regs.read(reg)))
            }
            Opcode::StoreRegister(reg) => {
                expect_args(1)?;
                let value = self.scalar(op, node.args[0])?;
                #[allow(clippy::cast_possible_truncation)]
                regs.write(reg, value.bits() as u64);
                return Ok(None);
            }
            Opcode::Call(func) => {
                expect_args(func.params().len())?;
                let mut args = Vec::with_capacity(node.args.len());
                for (&arg, &param) in node.args.iter().zip(func.params()) {
                    let value = self.scalar(op, arg)?;
                    if value.ty() != param {
                        return Err(EvalError::TypeMismatch {
                            node: op,
                            expected: param.name(),
                            actual: value.ty(),
                        });
                    }
                    #[allow(clippy::cast_possible_truncation)]
                    args.push(value.bits() as u64);
                }
                Value::from_bits(func.ret(), u128::from(func.invoke(&args)))
            }
        };
        Ok(Some(value))
    }

    fn eval_intrinsic(&self, op: Operand, intrinsic: Intrinsic, args: &[Operand]) -> Result<u128> {
        let imm = intrinsic
            .immediate_index()
            .map_or(Ok(0), |index| self.immediate(op, args[index]))?;
        match intrinsic {
            Intrinsic::X86Pxor => Ok(self.vector(op, args[0])? ^ self.vector(op, args[1])?),
            Intrinsic::X86Pslldq => Ok(shift_left_bytes(self.vector(op, args[0])?, imm)),
            Intrinsic::X86Pclmulqdq => {
                let a = self.vector(op, args[0])?;
                let b = self.vector(op, args[1])?;
                Ok(clmul64(half(a, imm & 0x01 != 0), half(b, imm & 0x10 != 0)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::operand::ExternFn;

    #[test]
    fn test_clmul64() {
        assert_eq!(clmul64(0, 0xdead), 0);
        assert_eq!(clmul64(1, 0xdead), 0xdead);
        // (x + 1)^2 = x^2 + 1 over GF(2)
        assert_eq!(clmul64(0b11, 0b11), 0b101);
        assert_eq!(clmul64(1 << 63, 1 << 63), 1 << 126);
    }

    #[test]
    fn test_shift_left_bytes() {
        assert_eq!(shift_left_bytes(0xff, 1), 0xff00);
        assert_eq!(shift_left_bytes(0xff, 15), 0xff << 120);
        assert_eq!(shift_left_bytes(0xff, 16), 0);
    }

    #[test]
    fn test_insert_extract_lanes() {
        let mut ctx = Context::new();
        let zero = ctx.vector_zero();
        let byte = ctx.const_u32(0x1234_56ab);
        let half = ctx.const_u32(0x1234_cdef);
        let wide = ctx.const_u64(0x1122_3344_5566_7788);
        let v = ctx.vector_insert8(zero, byte, 1);
        let v = ctx.vector_insert16(v, half, 2);
        let v = ctx.vector_insert(v, wide, 1);
        let lo = ctx.vector_extract(OperandType::I32, v, 1);
        let hi = ctx.vector_extract(OperandType::I64, v, 1);
        let graph = ctx.into_graph();

        let mut interp = Interpreter::new(&graph);
        interp.run(&mut RegisterFile::new()).unwrap();
        assert_eq!(
            interp.value(v),
            Some(Value::V128(0x1122_3344_5566_7788_0000_cdef_0000_ab00))
        );
        assert_eq!(interp.value(lo), Some(Value::I32(0x0000_cdef)));
        assert_eq!(interp.value(hi), Some(Value::I64(0x1122_3344_5566_7788)));
    }

    #[test]
    fn test_pclmulqdq_selector() {
        let mut ctx = Context::new();
        let lo = ctx.const_u64(3);
        let a = ctx.vector_create_scalar(lo);
        let b_hi = ctx.const_u64(3);
        let b = ctx.vector_zero();
        let b = ctx.vector_insert(b, b_hi, 1);
        let sel_low = ctx.const_u32(0x00);
        let sel_high = ctx.const_u32(0x10);
        let low_low = ctx.add_intrinsic(Intrinsic::X86Pclmulqdq, &[a, b, sel_low]);
        let low_high = ctx.add_intrinsic(Intrinsic::X86Pclmulqdq, &[a, b, sel_high]);
        let graph = ctx.into_graph();

        let mut interp = Interpreter::new(&graph);
        interp.run(&mut RegisterFile::new()).unwrap();
        assert_eq!(interp.value(low_low), Some(Value::V128(0)));
        assert_eq!(interp.value(low_high), Some(Value::V128(0b101)));
    }

    #[test]
    fn test_register_roundtrip_truncates_and_zero_extends() {
        let mut ctx = Context::new();
        let value = ctx.load_register(1, OperandType::I32);
        ctx.store_register(2, value);
        let graph = ctx.into_graph();

        let mut regs = RegisterFile::new()
            .with(1, 0xffff_ffff_8000_0001)
            .with(2, u64::MAX);
        Interpreter::new(&graph).run(&mut regs).unwrap();
        assert_eq!(regs.read(2), 0x8000_0001);
    }

    #[test]
    fn test_call_checks_param_types() {
        static PARAMS: [OperandType; 2] = [OperandType::I32, OperandType::I64];
        fn add(args: &[u64]) -> u64 {
            args.iter().fold(0, |acc, v| acc.wrapping_add(*v))
        }
        let func = ExternFn::new("add", &PARAMS, OperandType::I32, add);

        let mut ctx = Context::new();
        let a = ctx.const_u32(1);
        let b = ctx.const_u64(0xffff_ffff);
        let sum = ctx.call(func, &[a, b]);
        let graph = ctx.into_graph();
        let mut interp = Interpreter::new(&graph);
        interp.run(&mut RegisterFile::new()).unwrap();
        assert_eq!(interp.value(sum), Some(Value::I32(0)));

        let mut ctx = Context::new();
        let a = ctx.const_u32(1);
        ctx.call(func, &[a, a]);
        let graph = ctx.into_graph();
        let err = Interpreter::new(&graph)
            .run(&mut RegisterFile::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::TypeMismatch {
                expected: "i64",
                ..
            }
        ));
    }

    #[test]
    fn test_non_constant_immediate_rejected() {
        let mut ctx = Context::new();
        let v = ctx.vector_zero();
        let count = ctx.load_register(0, OperandType::I32);
        ctx.add_intrinsic(Intrinsic::X86Pslldq, &[v, count]);
        let graph = ctx.into_graph();
        let err = Interpreter::new(&graph)
            .run(&mut RegisterFile::new())
            .unwrap_err();
        assert!(matches!(err, EvalError::NonConstantImmediate { .. }));
    }

    #[test]
    fn test_clmul_selector_must_be_constant() {
        let mut ctx = Context::new();
        let a = ctx.vector_zero();
        let b = ctx.vector_zero();
        let selector = ctx.load_register(3, OperandType::I32);
        let out = ctx.add_intrinsic(Intrinsic::X86Pclmulqdq, &[a, b, selector]);
        let graph = ctx.into_graph();
        let err = Interpreter::new(&graph)
            .run(&mut RegisterFile::new())
            .unwrap_err();
        let expected = EvalError::NonConstantImmediate {
            node: out,
            operand: selector,
        };
        assert_eq!(err, expected);

        // Vector operands are not immediates.
        let mut ctx = Context::new();
        let a = ctx.vector_zero();
        let b = ctx.vector_zero();
        let selector = ctx.const_u32(0x11);
        let out = ctx.add_intrinsic(Intrinsic::X86Pclmulqdq, &[a, b, selector]);
        let graph = ctx.into_graph();
        let mut interp = Interpreter::new(&graph);
        interp.run(&mut RegisterFile::new()).unwrap();
        assert_eq!(interp.value(out), Some(Value::V128(0)));
    }

    #[test]
    fn test_void_operand_rejected() {
        let mut ctx = Context::new();
        let value = ctx.const_u32(1);
        let store = ctx.store_register(1, value);
        ctx.vector_create_scalar(store);
        let graph = ctx.into_graph();
        let err = Interpreter::new(&graph)
            .run(&mut RegisterFile::new())
            .unwrap_err();
        assert!(matches!(err, EvalError::VoidOperand { .. }));
    }

    #[test]
    fn test_extract_lane_out_of_range() {
        let mut ctx = Context::new();
        let v = ctx.vector_zero();
        ctx.vector_extract(OperandType::I32, v, 4);
        let graph = ctx.into_graph();
        let err = Interpreter::new(&graph)
            .run(&mut RegisterFile::new())
            .unwrap_err();
        assert!(matches!(
            err,
            EvalError::LaneOutOfRange {
                lane: 4,
                lane_bits: 32,
                ..
            }
        ));
    }
}
