//! Forward and backward instruction semantics
//!
//! Each direction is one match over the decoded instruction. The contract
//! between the two: for any context not in a non-trivial error state, a
//! forward step followed by a backward step is the identity on the whole
//! context, stacks included. Anything forward execution destroys goes to a
//! garbage stack; everything else is inverted algebraically.
//!
//! Errors returned here are recorded on the context by the VM step loop;
//! an erroring step leaves the counter and both stacks untouched.

use crate::context::Context;
use crate::error::ContextError;
use metronome_spec::{Instruction, Reg, Word};

/// Apply one instruction in the forward direction.
pub fn execute_forward(
    instruction: &Instruction,
    ctx: &mut Context,
) -> Result<(), ContextError> {
    use Instruction::*;

    match *instruction {
        Add { rsd, rs } => {
            let addend = ctx.reg(rs);
            ctx.set_reg(rsd, ctx.reg(rsd).wrapping_add(addend));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Sub { rsd, rs } => {
            if rsd == rs {
                return Err(ContextError::SubSameRegisters);
            }
            let subtrahend = ctx.reg(rs);
            ctx.set_reg(rsd, ctx.reg(rsd).wrapping_sub(subtrahend));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Neg { rsd, .. } => {
            ctx.set_reg(rsd, ctx.reg(rsd).wrapping_neg());
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Xor { rsd, rs } => {
            let operand = ctx.reg(rs);
            ctx.set_reg(rsd, ctx.reg(rsd) ^ operand);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Addi { rsd, imm } => {
            ctx.set_reg(rsd, ctx.reg(rsd).wrapping_add(imm as Word));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Xori { rsd, imm } => {
            ctx.set_reg(rsd, ctx.reg(rsd) ^ imm as Word);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        // The bit-destroying ALU rows save the old destination value.
        And { rsd, rs } => {
            let operand = ctx.reg(rs);
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) & operand);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Or { rsd, rs } => {
            let operand = ctx.reg(rs);
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) | operand);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Nor { rsd, rs } => {
            let operand = ctx.reg(rs);
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, !(ctx.reg(rsd) | operand));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Andi { rsd, imm } => {
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) & imm as Word);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Ori { rsd, imm } => {
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) | imm as Word);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Sll { rsd, amt } => {
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) << amt);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Srl { rsd, amt } => {
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) >> amt);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Sra { rsd, amt } => {
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ((ctx.reg(rsd) as i32) >> amt) as Word);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Sllv { rsd, rs } => {
            let amt = ctx.reg(rs) & 0x1F;
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) << amt);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Srlv { rsd, rs } => {
            let amt = ctx.reg(rs) & 0x1F;
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ctx.reg(rsd) >> amt);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Srav { rsd, rs } => {
            let amt = ctx.reg(rs) & 0x1F;
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, ((ctx.reg(rsd) as i32) >> amt) as Word);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        // Rotations lose nothing; the inverse rotates the other way.
        Rl { rsd, amt } => {
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_left(amt as u32));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Rr { rsd, amt } => {
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_right(amt as u32));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Rlv { rsd, rs } => {
            let amt = ctx.reg(rs) & 0x1F;
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_left(amt));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Rrv { rsd, rs } => {
            let amt = ctx.reg(rs) & 0x1F;
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_right(amt));
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Slt { rsd, rs } => {
            let lhs = ctx.reg(rsd) as i32;
            let rhs = ctx.reg(rs) as i32;
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, (lhs < rhs) as Word);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Slti { rsd, imm } => {
            let lhs = ctx.reg(rsd) as i32;
            ctx.dp_stack.push(ctx.reg(rsd));
            ctx.set_reg(rsd, (lhs < imm) as Word);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Exchange { reg, addr } => {
            exchange(ctx, reg, addr);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Beq { ra, rb, offset } => {
            if ctx.reg(ra) == ctx.reg(rb) {
                take_branch(ctx, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Bne { ra, rb, offset } => {
            if ctx.reg(ra) != ctx.reg(rb) {
                take_branch(ctx, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Bgez { rb, offset } => {
            if (ctx.reg(rb) as i32) >= 0 {
                take_branch(ctx, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Bgtz { rb, offset } => {
            if (ctx.reg(rb) as i32) > 0 {
                take_branch(ctx, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Blez { rb, offset } => {
            if (ctx.reg(rb) as i32) <= 0 {
                take_branch(ctx, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Bltz { rb, offset } => {
            if (ctx.reg(rb) as i32) < 0 {
                take_branch(ctx, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Bgezal { link, rb, offset } => {
            if (ctx.reg(rb) as i32) >= 0 {
                take_linking_branch(ctx, link, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Bltzal { link, rb, offset } => {
            if (ctx.reg(rb) as i32) < 0 {
                take_linking_branch(ctx, link, offset)?;
            }
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        Cf => {
            ctx.pc_stack.push(ctx.counter);
            ctx.counter = ctx.counter.wrapping_add(1);
        }

        J { target } => {
            let destination = (ctx.counter & 0xFC00_0000) | target as Word;
            if !landing_on_cf(ctx, destination) {
                return Err(ContextError::MissingCf);
            }
            ctx.pc_stack.push(ctx.counter);
            ctx.counter = destination.wrapping_add(1);
        }

        Jal { link, offset } => {
            let destination = ctx.counter.wrapping_add(offset as Word);
            if !landing_on_cf(ctx, destination) {
                return Err(ContextError::MissingCf);
            }
            if ctx.reg(link) != 0 {
                return Err(ContextError::UnclearLink);
            }
            // The link register receives the address of the instruction
            // after the JAL; that is also what the PC stack records.
            ctx.counter = ctx.counter.wrapping_add(1);
            ctx.pc_stack.push(ctx.counter);
            ctx.set_reg(link, ctx.counter);
            ctx.counter = ctx.counter.wrapping_add(offset as Word);
        }

        Jalr { link, jreg } => {
            let destination = ctx.reg(jreg);
            if !landing_on_cf(ctx, destination) {
                return Err(ContextError::MissingCf);
            }
            if ctx.reg(link) != 0 {
                return Err(ContextError::UnclearLink);
            }
            ctx.pc_stack.push(ctx.counter);
            ctx.set_reg(link, ctx.counter.wrapping_add(1));
            ctx.counter = destination.wrapping_add(1);
        }

        Jr { jreg } => {
            let destination = ctx.reg(jreg);
            if !landing_on_cf(ctx, destination) {
                return Err(ContextError::MissingCf);
            }
            ctx.pc_stack.push(ctx.counter);
            ctx.counter = destination.wrapping_add(1);
        }
    }

    Ok(())
}

/// Apply one instruction in the backward direction, undoing the forward
/// step that executed it.
pub fn execute_backward(
    instruction: &Instruction,
    ctx: &mut Context,
) -> Result<(), ContextError> {
    use Instruction::*;

    match *instruction {
        Add { rsd, rs } => {
            // A self-addition doubled the register; halve it back.
            if rsd == rs {
                ctx.set_reg(rsd, ctx.reg(rsd) >> 1);
            } else {
                let addend = ctx.reg(rs);
                ctx.set_reg(rsd, ctx.reg(rsd).wrapping_sub(addend));
            }
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Sub { rsd, rs } => {
            if rsd == rs {
                return Err(ContextError::SubSameRegisters);
            }
            let subtrahend = ctx.reg(rs);
            ctx.set_reg(rsd, ctx.reg(rsd).wrapping_add(subtrahend));
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Neg { rsd, .. } => {
            ctx.set_reg(rsd, ctx.reg(rsd).wrapping_neg());
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Xor { rsd, rs } => {
            let operand = ctx.reg(rs);
            ctx.set_reg(rsd, ctx.reg(rsd) ^ operand);
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Addi { rsd, imm } => {
            ctx.set_reg(rsd, ctx.reg(rsd).wrapping_sub(imm as Word));
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Xori { rsd, imm } => {
            ctx.set_reg(rsd, ctx.reg(rsd) ^ imm as Word);
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        And { rsd, .. } | Or { rsd, .. } | Nor { rsd, .. } | Slt { rsd, .. } => {
            pop_dp(ctx, rsd)?;
        }

        Andi { rsd, .. } | Ori { rsd, .. } | Slti { rsd, .. } => {
            pop_dp(ctx, rsd)?;
        }

        Sll { rsd, .. } | Srl { rsd, .. } | Sra { rsd, .. } => {
            pop_dp(ctx, rsd)?;
        }

        Sllv { rsd, .. } | Srlv { rsd, .. } | Srav { rsd, .. } => {
            pop_dp(ctx, rsd)?;
        }

        Rl { rsd, amt } => {
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_right(amt as u32));
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Rr { rsd, amt } => {
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_left(amt as u32));
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Rlv { rsd, rs } => {
            let amt = ctx.reg(rs) & 0x1F;
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_right(amt));
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Rrv { rsd, rs } => {
            let amt = ctx.reg(rs) & 0x1F;
            ctx.set_reg(rsd, ctx.reg(rsd).rotate_left(amt));
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Exchange { reg, addr } => {
            exchange(ctx, reg, addr);
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        // Un-taken and taken branches look identical from one instruction
        // back; the PC stack is unwound by the backward CF at the target.
        Beq { .. } | Bne { .. } | Bgez { .. } | Bgtz { .. } | Blez { .. } | Bltz { .. } => {
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Bgezal { link, .. } | Bltzal { link, .. } => {
            ctx.set_reg(link, 0);
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Cf => {
            let previous = ctx.pc_stack.pop().ok_or(ContextError::PcStackEmpty)?;
            ctx.counter = previous;
        }

        J { .. } | Jr { .. } => {
            ctx.counter = ctx.counter.wrapping_sub(1);
        }

        Jal { link, .. } | Jalr { link, .. } => {
            ctx.set_reg(link, 0);
            ctx.counter = ctx.counter.wrapping_sub(1);
        }
    }

    Ok(())
}

/// Whether the word at `destination` is the CF marker.
fn landing_on_cf(ctx: &Context, destination: Word) -> bool {
    matches!(
        Instruction::decode(ctx.memory.read(destination)),
        Some(Instruction::Cf)
    )
}

/// Taken-branch bookkeeping shared by the non-linking branches.
fn take_branch(ctx: &mut Context, offset: i16) -> Result<(), ContextError> {
    let destination = ctx.counter.wrapping_add(offset as Word);
    if !landing_on_cf(ctx, destination) {
        return Err(ContextError::MissingCf);
    }
    ctx.pc_stack.push(ctx.counter);
    ctx.counter = destination;
    Ok(())
}

/// Taken-branch bookkeeping for the linking branches; the link register
/// must be clear so the return address is recoverable in reverse.
fn take_linking_branch(ctx: &mut Context, link: Reg, offset: i16) -> Result<(), ContextError> {
    let destination = ctx.counter.wrapping_add(offset as Word);
    if !landing_on_cf(ctx, destination) {
        return Err(ContextError::MissingCf);
    }
    if ctx.reg(link) != 0 {
        return Err(ContextError::UnclearLink);
    }
    ctx.set_reg(link, ctx.counter.wrapping_add(1));
    ctx.pc_stack.push(ctx.counter);
    ctx.counter = destination;
    Ok(())
}

/// Swap a register with the memory word it addresses; its own inverse.
fn exchange(ctx: &mut Context, reg: Reg, addr: Reg) {
    let address = ctx.reg(addr);
    let register_value = ctx.reg(reg);
    let memory_value = ctx.memory.read(address);
    ctx.set_reg(reg, memory_value);
    ctx.memory.write(address, register_value);
}

/// Backward step of every garbage-saving instruction: restore the old
/// destination value from the datapath stack.
fn pop_dp(ctx: &mut Context, rsd: Reg) -> Result<(), ContextError> {
    let value = ctx.dp_stack.pop().ok_or(ContextError::DpStackEmpty)?;
    ctx.set_reg(rsd, value);
    ctx.counter = ctx.counter.wrapping_sub(1);
    Ok(())
}
