//! Register and constant helpers shared by the lifters.

use arx_ir::{Context, Operand, OperandType};

use crate::REG_ZR;

/// Read `reg` as `ty`, or a zero constant for the zero register.
pub fn get_int_or_zr(ctx: &mut Context, reg: u8, ty: OperandType) -> Operand {
    if reg == REG_ZR {
        ctx.constant(ty, 0)
    } else {
        ctx.load_register(reg, ty)
    }
}

/// Write `value` to `reg`; writes to the zero register are dropped.
pub fn set_int_or_zr(ctx: &mut Context, reg: u8, value: Operand) {
    if reg != REG_ZR {
        ctx.store_register(reg, value);
    }
}

/// 128-bit vector holding `value` in its low 64 bits.
pub fn x86_get_scalar(ctx: &mut Context, value: u64) -> Operand {
    let scalar = ctx.const_u64(value);
    ctx.vector_create_scalar(scalar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arx_ir::Opcode;

    #[test]
    fn test_zero_register_reads_constant() {
        let mut ctx = Context::new();
        let zero = get_int_or_zr(&mut ctx, REG_ZR, OperandType::I64);
        let reg = get_int_or_zr(&mut ctx, 3, OperandType::I32);
        let graph = ctx.into_graph();
        assert_eq!(
            graph.node(zero).map(|n| n.opcode),
            Some(Opcode::Constant(0))
        );
        assert_eq!(graph.ty(zero), Some(OperandType::I64));
        assert_eq!(
            graph.node(reg).map(|n| n.opcode),
            Some(Opcode::LoadRegister(3))
        );
    }

    #[test]
    fn test_zero_register_write_dropped() {
        let mut ctx = Context::new();
        let value = ctx.const_u32(1);
        set_int_or_zr(&mut ctx, REG_ZR, value);
        assert_eq!(ctx.graph().len(), 1);
        set_int_or_zr(&mut ctx, 0, value);
        assert_eq!(ctx.graph().len(), 2);
    }
}
