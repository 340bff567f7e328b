//! # Metronome32 Runtime
//!
//! Reversible execution engine for the Metronome32 instruction set: a
//! word-addressed machine whose every forward step can be undone by a
//! backward step, restoring the program counter, all 32 registers, memory
//! and both garbage stacks bit for bit.

pub mod context;
pub mod error;
pub mod execute;
pub mod memory;
pub mod vm;

pub use context::Context;
pub use error::ContextError;
pub use memory::Memory;
pub use vm::Vm;
