//! Reversible virtual machine for Metronome32
//!
//! The machine owns a single [`Context`] and mutates it one step at a
//! time. Stepping dispatches on the direction flag and the decoded word;
//! every error is recorded on the context rather than surfaced as a Rust
//! error, so the VM boundary never panics and never returns `Err`.

use crate::context::Context;
use crate::error::ContextError;
use crate::execute::{execute_backward, execute_forward};
use crate::memory::Memory;
use metronome_spec::{Instruction, Word, MEMORY_DEFAULT};

/// A Metronome32 virtual machine.
#[derive(Debug, Clone, Default)]
pub struct Vm {
    context: Context,
}

impl Vm {
    /// Build a machine with `bytecode` loaded into memory.
    ///
    /// Word `i` of `bytecode` lands at address `load_at + i`; execution
    /// starts at `start_at`.
    pub fn new(bytecode: &[Word], start_at: Word, load_at: Word) -> Self {
        let mut memory = Memory::new();
        for (i, &word) in bytecode.iter().enumerate() {
            memory.write(load_at.wrapping_add(i as Word), word);
        }
        Vm {
            context: Context::with_memory(memory, start_at),
        }
    }

    /// Read-only view of the machine state.
    pub fn get_context(&self) -> &Context {
        &self.context
    }

    /// Replace the entire machine state.
    pub fn set_context(&mut self, context: Context) {
        self.context = context;
    }

    /// Whether execution currently runs backwards.
    pub fn reversing(&self) -> bool {
        self.context.reversing
    }

    /// Toggle the direction of execution.
    pub fn reverse(&mut self) {
        self.context.reversing = !self.context.reversing;
    }

    /// Set the direction of execution.
    pub fn set_reversing(&mut self, reversing: bool) {
        self.context.reversing = reversing;
    }

    /// Whether the machine is halted.
    pub fn halted(&self) -> bool {
        self.context.halted
    }

    /// Halt or un-halt the machine.
    ///
    /// Returns `false` iff asked to clear a halt while a non-trivial error
    /// is in effect; recovering from such an error takes
    /// [`set_context`](Self::set_context).
    pub fn halt(&mut self, set_halt: bool) -> bool {
        if self.halted() && !set_halt && !self.is_error_trivial() {
            false
        } else {
            self.context.halted = set_halt;
            true
        }
    }

    /// Current error code.
    pub fn error_code(&self) -> ContextError {
        self.context.errcode
    }

    /// Human-readable name of the current error code.
    pub fn error_name(&self) -> String {
        self.context.errcode.to_string()
    }

    /// Whether the current error state permits continued stepping.
    pub fn is_error_trivial(&self) -> bool {
        self.context.errcode.is_trivial()
    }

    /// Execute one instruction in the current direction.
    ///
    /// Returns `true` iff an instruction was executed cleanly.
    pub fn step(&mut self) -> bool {
        self.step_once()
    }

    /// Execute up to `times` instructions, stopping at the first failure.
    pub fn step_n(&mut self, times: usize) -> bool {
        let mut still_good = true;
        for _ in 0..times {
            if !still_good {
                break;
            }
            still_good = self.step_once();
        }
        still_good
    }

    fn step_once(&mut self) -> bool {
        if self.context.halted || !self.context.errcode.is_trivial() {
            return false;
        }

        // Backwards, the instruction being undone is the one just
        // executed, one word behind the counter.
        let fetch_pc = if self.context.reversing {
            self.context.counter.wrapping_sub(1)
        } else {
            self.context.counter
        };
        let word = self.context.memory.read(fetch_pc);

        let Some(instruction) = Instruction::decode(word) else {
            if word == MEMORY_DEFAULT {
                self.context.errcode = ContextError::NaiDefault;
            } else {
                tracing::debug!(pc = fetch_pc, word, "fetched word is not an instruction");
                self.context.halted = true;
                if !self.context.reversing {
                    self.context.counter = self.context.counter.wrapping_add(1);
                }
                self.context.errcode = ContextError::Nai;
            }
            return false;
        };

        tracing::trace!(
            pc = fetch_pc,
            reversing = self.context.reversing,
            %instruction,
            "step"
        );

        let outcome = if self.context.reversing {
            execute_backward(&instruction, &mut self.context)
        } else {
            execute_forward(&instruction, &mut self.context)
        };

        match outcome {
            Ok(()) => true,
            Err(errcode) => {
                tracing::debug!(pc = fetch_pc, error = %errcode, "halting");
                self.context.errcode = errcode;
                self.context.halted = true;
                false
            }
        }
    }
}
