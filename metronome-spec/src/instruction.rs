//! Metronome32 instruction set
//!
//! [`Instruction::decode`] classifies a word into one variant per mnemonic,
//! checking the fixed-field constraints of each row (a zeroed shift amount,
//! a zeroed register field, and so on). Words that match no row decode to
//! `None`. [`Instruction::encode`] is the inverse on classified words: it
//! reassembles the canonical word through the shape structs, so
//! `decode(encode(i)) == Some(i)` and `encode(decode(w)) == w` whenever `w`
//! classifies.

use crate::encoding::{extract_op, BType, IType, JType, RType};
use crate::opcode;
use crate::register::Reg;
use crate::Word;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified Metronome32 instruction.
///
/// Variants carry exactly the fields their row leaves free; fields the row
/// fixes (for instance the zero `shrot` of the register-operand ALU rows)
/// are reintroduced by [`encode`](Self::encode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    // ========== R-shape, register operand ==========
    Add { rsd: Reg, rs: Reg },
    Sub { rsd: Reg, rs: Reg },
    Neg { rsd: Reg, rs: Reg },
    And { rsd: Reg, rs: Reg },
    Or { rsd: Reg, rs: Reg },
    Xor { rsd: Reg, rs: Reg },
    Nor { rsd: Reg, rs: Reg },
    Slt { rsd: Reg, rs: Reg },

    // ========== R-shape, immediate shift/rotate amount ==========
    Sll { rsd: Reg, amt: u8 },
    Srl { rsd: Reg, amt: u8 },
    Sra { rsd: Reg, amt: u8 },
    Rl { rsd: Reg, amt: u8 },
    Rr { rsd: Reg, amt: u8 },

    // ========== R-shape, register shift/rotate amount ==========
    Sllv { rsd: Reg, rs: Reg },
    Srlv { rsd: Reg, rs: Reg },
    Srav { rsd: Reg, rs: Reg },
    Rlv { rsd: Reg, rs: Reg },
    Rrv { rsd: Reg, rs: Reg },

    // ========== I-shape ==========
    Addi { rsd: Reg, imm: i32 },
    Slti { rsd: Reg, imm: i32 },
    Andi { rsd: Reg, imm: i32 },
    Ori { rsd: Reg, imm: i32 },
    Xori { rsd: Reg, imm: i32 },

    // ========== J-shape ==========
    /// Come-from marker; required at every branch/jump destination.
    Cf,
    J { target: i32 },

    // ========== B-shape branches ==========
    Beq { ra: Reg, rb: Reg, offset: i16 },
    Bne { ra: Reg, rb: Reg, offset: i16 },
    Bgez { rb: Reg, offset: i16 },
    Bgtz { rb: Reg, offset: i16 },
    Blez { rb: Reg, offset: i16 },
    Bltz { rb: Reg, offset: i16 },
    Bgezal { link: Reg, rb: Reg, offset: i16 },
    Bltzal { link: Reg, rb: Reg, offset: i16 },

    // ========== B-shape jumps and memory exchange ==========
    Jal { link: Reg, offset: i16 },
    Jalr { link: Reg, jreg: Reg },
    Jr { jreg: Reg },
    /// Swap a register with the memory word it addresses.
    Exchange { reg: Reg, addr: Reg },
}

impl Instruction {
    /// Classify a 32-bit word.
    ///
    /// Returns `None` when the word matches no row of the instruction
    /// table; the caller decides whether that is a plain unknown word or
    /// the memory-default sentinel.
    pub fn decode(word: Word) -> Option<Instruction> {
        match extract_op(word) {
            opcode::OP_RTYPE => classify_r(RType::from_word(word)),
            opcode::OP_J | opcode::OP_CF => classify_j(JType::from_word(word)),
            opcode::OP_ADDI
            | opcode::OP_SLTI
            | opcode::OP_ANDI
            | opcode::OP_ORI
            | opcode::OP_XORI => classify_i(IType::from_word(word)),
            _ => classify_b(BType::from_word(word)),
        }
    }

    /// Reassemble the canonical 32-bit word for this instruction.
    pub fn encode(&self) -> Word {
        use Instruction::*;

        let rtype = |rsd: Reg, rs: Reg, shrot: u8, func: u16| {
            RType { op: opcode::OP_RTYPE, rsd, rs, shrot, func }.to_word()
        };
        let btype = |jbop: u8, ra: Reg, rb: Reg, offset: i16| {
            BType { jbop, ra, rb, offset }.to_word()
        };
        let itype =
            |op: u8, rsd: Reg, imm: i32| IType { op, rsd, immediate: imm }.to_word();

        match *self {
            Add { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_ADD),
            Sub { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_SUB),
            Neg { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_NEG),
            And { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_AND),
            Or { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_OR),
            Xor { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_XOR),
            Nor { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_NOR),
            Slt { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_SLT),

            Sll { rsd, amt } => rtype(rsd, Reg::new(0), amt, opcode::FUNC_SLL),
            Srl { rsd, amt } => rtype(rsd, Reg::new(0), amt, opcode::FUNC_SRL),
            Sra { rsd, amt } => rtype(rsd, Reg::new(0), amt, opcode::FUNC_SRA),
            Rl { rsd, amt } => rtype(rsd, Reg::new(0), amt, opcode::FUNC_RL),
            Rr { rsd, amt } => rtype(rsd, Reg::new(0), amt, opcode::FUNC_RR),

            Sllv { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_SLLV),
            Srlv { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_SRLV),
            Srav { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_SRAV),
            Rlv { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_RLV),
            Rrv { rsd, rs } => rtype(rsd, rs, 0, opcode::FUNC_RRV),

            Addi { rsd, imm } => itype(opcode::OP_ADDI, rsd, imm),
            Slti { rsd, imm } => itype(opcode::OP_SLTI, rsd, imm),
            Andi { rsd, imm } => itype(opcode::OP_ANDI, rsd, imm),
            Ori { rsd, imm } => itype(opcode::OP_ORI, rsd, imm),
            Xori { rsd, imm } => itype(opcode::OP_XORI, rsd, imm),

            Cf => JType { jcf: opcode::OP_CF, target: 0 }.to_word(),
            J { target } => JType { jcf: opcode::OP_J, target }.to_word(),

            Beq { ra, rb, offset } => btype(opcode::OP_BEQ, ra, rb, offset),
            Bne { ra, rb, offset } => btype(opcode::OP_BNE, ra, rb, offset),
            Bgez { rb, offset } => btype(opcode::OP_BGEZ, Reg::new(0), rb, offset),
            Bgtz { rb, offset } => btype(opcode::OP_BGTZ, Reg::new(0), rb, offset),
            Blez { rb, offset } => btype(opcode::OP_BLEZ, Reg::new(0), rb, offset),
            Bltz { rb, offset } => btype(opcode::OP_BLTZ, Reg::new(0), rb, offset),
            Bgezal { link, rb, offset } => btype(opcode::OP_BGEZAL, link, rb, offset),
            Bltzal { link, rb, offset } => btype(opcode::OP_BLTZAL, link, rb, offset),

            Jal { link, offset } => btype(opcode::OP_JAL, link, Reg::new(0), offset),
            Jalr { link, jreg } => btype(opcode::OP_JALR, link, jreg, 0),
            Jr { jreg } => btype(opcode::OP_JR, Reg::new(0), jreg, 0),
            Exchange { reg, addr } => btype(opcode::OP_EXCHANGE, reg, addr, 0),
        }
    }
}

fn classify_r(r: RType) -> Option<Instruction> {
    use Instruction::*;

    let RType { rsd, rs, shrot, func, .. } = r;
    let shrot_clear = shrot == 0;
    let rs_clear = rs.index() == 0;

    let instruction = match func {
        opcode::FUNC_ADD if shrot_clear => Add { rsd, rs },
        opcode::FUNC_SUB if shrot_clear => Sub { rsd, rs },
        opcode::FUNC_NEG if shrot_clear => Neg { rsd, rs },
        opcode::FUNC_AND if shrot_clear => And { rsd, rs },
        opcode::FUNC_OR if shrot_clear => Or { rsd, rs },
        opcode::FUNC_XOR if shrot_clear => Xor { rsd, rs },
        opcode::FUNC_NOR if shrot_clear => Nor { rsd, rs },
        opcode::FUNC_SLT if shrot_clear => Slt { rsd, rs },

        opcode::FUNC_SLL if rs_clear => Sll { rsd, amt: shrot },
        opcode::FUNC_SRL if rs_clear => Srl { rsd, amt: shrot },
        opcode::FUNC_SRA if rs_clear => Sra { rsd, amt: shrot },
        opcode::FUNC_RL if rs_clear => Rl { rsd, amt: shrot },
        opcode::FUNC_RR if rs_clear => Rr { rsd, amt: shrot },

        opcode::FUNC_SLLV if shrot_clear => Sllv { rsd, rs },
        opcode::FUNC_SRLV if shrot_clear => Srlv { rsd, rs },
        opcode::FUNC_SRAV if shrot_clear => Srav { rsd, rs },
        opcode::FUNC_RLV if shrot_clear => Rlv { rsd, rs },
        opcode::FUNC_RRV if shrot_clear => Rrv { rsd, rs },

        _ => return None,
    };

    Some(instruction)
}

fn classify_i(i: IType) -> Option<Instruction> {
    use Instruction::*;

    let IType { op, rsd, immediate: imm } = i;
    let instruction = match op {
        opcode::OP_ADDI => Addi { rsd, imm },
        opcode::OP_SLTI => Slti { rsd, imm },
        opcode::OP_ANDI => Andi { rsd, imm },
        opcode::OP_ORI => Ori { rsd, imm },
        opcode::OP_XORI => Xori { rsd, imm },
        _ => return None,
    };

    Some(instruction)
}

fn classify_j(j: JType) -> Option<Instruction> {
    match j.jcf {
        opcode::OP_CF if j.target == 0 => Some(Instruction::Cf),
        opcode::OP_J => Some(Instruction::J { target: j.target }),
        _ => None,
    }
}

fn classify_b(b: BType) -> Option<Instruction> {
    use Instruction::*;

    let BType { jbop, ra, rb, offset } = b;
    let ra_clear = ra.index() == 0;
    let rb_clear = rb.index() == 0;
    let offset_clear = offset == 0;

    let instruction = match jbop {
        opcode::OP_BEQ => Beq { ra, rb, offset },
        opcode::OP_BNE => Bne { ra, rb, offset },
        opcode::OP_BGEZ if ra_clear => Bgez { rb, offset },
        opcode::OP_BGTZ if ra_clear => Bgtz { rb, offset },
        opcode::OP_BLEZ if ra_clear => Blez { rb, offset },
        opcode::OP_BLTZ if ra_clear => Bltz { rb, offset },
        opcode::OP_BGEZAL => Bgezal { link: ra, rb, offset },
        opcode::OP_BLTZAL => Bltzal { link: ra, rb, offset },

        opcode::OP_JAL if rb_clear => Jal { link: ra, offset },
        opcode::OP_JALR if offset_clear => Jalr { link: ra, jreg: rb },
        opcode::OP_JR if ra_clear && offset_clear => Jr { jreg: rb },
        opcode::OP_EXCHANGE if offset_clear => Exchange { reg: ra, addr: rb },

        _ => return None,
    };

    Some(instruction)
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Add { rsd, rs } => write!(f, "add {rsd}, {rs}"),
            Sub { rsd, rs } => write!(f, "sub {rsd}, {rs}"),
            Neg { rsd, .. } => write!(f, "neg {rsd}"),
            And { rsd, rs } => write!(f, "and {rsd}, {rs}"),
            Or { rsd, rs } => write!(f, "or {rsd}, {rs}"),
            Xor { rsd, rs } => write!(f, "xor {rsd}, {rs}"),
            Nor { rsd, rs } => write!(f, "nor {rsd}, {rs}"),
            Slt { rsd, rs } => write!(f, "slt {rsd}, {rs}"),

            Sll { rsd, amt } => write!(f, "sll {rsd}, {amt}"),
            Srl { rsd, amt } => write!(f, "srl {rsd}, {amt}"),
            Sra { rsd, amt } => write!(f, "sra {rsd}, {amt}"),
            Rl { rsd, amt } => write!(f, "rl {rsd}, {amt}"),
            Rr { rsd, amt } => write!(f, "rr {rsd}, {amt}"),

            Sllv { rsd, rs } => write!(f, "sllv {rsd}, {rs}"),
            Srlv { rsd, rs } => write!(f, "srlv {rsd}, {rs}"),
            Srav { rsd, rs } => write!(f, "srav {rsd}, {rs}"),
            Rlv { rsd, rs } => write!(f, "rlv {rsd}, {rs}"),
            Rrv { rsd, rs } => write!(f, "rrv {rsd}, {rs}"),

            Addi { rsd, imm } => write!(f, "addi {rsd}, {imm}"),
            Slti { rsd, imm } => write!(f, "slti {rsd}, {imm}"),
            Andi { rsd, imm } => write!(f, "andi {rsd}, {imm}"),
            Ori { rsd, imm } => write!(f, "ori {rsd}, {imm}"),
            Xori { rsd, imm } => write!(f, "xori {rsd}, {imm}"),

            Cf => write!(f, "cf"),
            J { target } => write!(f, "j {target}"),

            Beq { ra, rb, offset } => write!(f, "beq {ra}, {rb}, {offset}"),
            Bne { ra, rb, offset } => write!(f, "bne {ra}, {rb}, {offset}"),
            Bgez { rb, offset } => write!(f, "bgez {rb}, {offset}"),
            Bgtz { rb, offset } => write!(f, "bgtz {rb}, {offset}"),
            Blez { rb, offset } => write!(f, "blez {rb}, {offset}"),
            Bltz { rb, offset } => write!(f, "bltz {rb}, {offset}"),
            Bgezal { link, rb, offset } => write!(f, "bgezal {link}, {rb}, {offset}"),
            Bltzal { link, rb, offset } => write!(f, "bltzal {link}, {rb}, {offset}"),

            Jal { link, offset } => write!(f, "jal {link}, {offset}"),
            Jalr { link, jreg } => write!(f, "jalr {link}, {jreg}"),
            Jr { jreg } => write!(f, "jr {jreg}"),
            Exchange { reg, addr } => write!(f, "exchange {reg}, {addr}"),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_classified_words_reencode_exactly(word in any::<u32>()) {
            if let Some(instruction) = Instruction::decode(word) {
                prop_assert_eq!(instruction.encode(), word);
            }
        }
    }
}
