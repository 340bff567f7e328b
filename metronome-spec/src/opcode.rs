//! # Metronome32 Opcode Definitions
//!
//! The opcode field occupies bits 31..26 of every instruction word. R-shape
//! rows all share opcode `000000` and are told apart by an 11-bit function
//! field in bits 10..0; the function codes are sparse bit patterns rather
//! than a dense enumeration.
//!
//! ## Opcode families
//! - `000000`: R-shape (ALU, shifts, rotates, comparisons)
//! - `000001`, `001101`: J-shape (J, CF)
//! - `000010`-`001100`, `101000`: B-shape (branches, jumps, EXCHANGE)
//! - `011000`-`011110`: I-shape (immediate ALU)

/// Opcode shared by every R-shape row.
pub const OP_RTYPE: u8 = 0b000000;

// ========== R-shape function codes (11 bits) ==========

pub const FUNC_ADD: u16 = 0b00000000001;
pub const FUNC_SUB: u16 = 0b00000000100;
pub const FUNC_AND: u16 = 0b00000010000;
pub const FUNC_OR: u16 = 0b00000100000;
pub const FUNC_XOR: u16 = 0b00001000000;
pub const FUNC_NOR: u16 = 0b00010000000;
pub const FUNC_NEG: u16 = 0b00100000000;
pub const FUNC_SLT: u16 = 0b10000000000;
pub const FUNC_SLL: u16 = 0b10000000001;
pub const FUNC_SRL: u16 = 0b10000000010;
pub const FUNC_SRA: u16 = 0b10000000100;
pub const FUNC_SLLV: u16 = 0b10000001000;
pub const FUNC_SRLV: u16 = 0b10000010000;
pub const FUNC_SRAV: u16 = 0b10000100000;
pub const FUNC_RL: u16 = 0b10001000000;
pub const FUNC_RR: u16 = 0b10010000000;
pub const FUNC_RLV: u16 = 0b10100000000;
pub const FUNC_RRV: u16 = 0b11000000000;

// ========== J-shape opcodes ==========

pub const OP_J: u8 = 0b000001;
pub const OP_CF: u8 = 0b001101;

// ========== B-shape opcodes ==========

pub const OP_JR: u8 = 0b000010;
pub const OP_JAL: u8 = 0b000011;
pub const OP_JALR: u8 = 0b000100;
pub const OP_BLTZ: u8 = 0b000101;
pub const OP_BGEZ: u8 = 0b000110;
pub const OP_BLTZAL: u8 = 0b000111;
pub const OP_BGEZAL: u8 = 0b001000;
pub const OP_BEQ: u8 = 0b001001;
pub const OP_BNE: u8 = 0b001010;
pub const OP_BLEZ: u8 = 0b001011;
pub const OP_BGTZ: u8 = 0b001100;
pub const OP_EXCHANGE: u8 = 0b101000;

// ========== I-shape opcodes ==========

pub const OP_ADDI: u8 = 0b011000;
pub const OP_SLTI: u8 = 0b011010;
pub const OP_ANDI: u8 = 0b011100;
pub const OP_ORI: u8 = 0b011101;
pub const OP_XORI: u8 = 0b011110;
