//! # Metronome32 Instruction Set
//!
//! 32-bit load/store instruction set built around reversible execution.
//!
//! ## Key features
//! - 32-bit architecture, word-addressed memory
//! - Four instruction shapes (R, J, B, I) sharing a 6-bit opcode field
//! - Every destructive operation either saves its overwritten value or is
//!   its own inverse, so the machine can run backwards
//! - Every branch/jump target carries a mandatory CF (come-from) marker

pub mod encoding;
pub mod instruction;
pub mod opcode;
pub mod register;

pub use encoding::{BType, IType, JType, RType};
pub use instruction::Instruction;
pub use register::{Reg, NUM_REGISTERS};

/// Canonical encoding of the CF (come-from) marker.
pub const CF_WORD: Word = 0x3400_0000;

/// Value read back from memory addresses that were never written.
pub const MEMORY_DEFAULT: Word = 0;

/// Machine word (32-bit). Instructions, register values, memory cells and
/// addresses are all words.
pub type Word = u32;

/// Word address (the memory is word-addressed, not byte-addressed).
pub type Address = u32;

/// Signed view of a word (two's complement).
pub type SWord = i32;
