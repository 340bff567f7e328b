//! Context error codes for the reversible VM

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error state carried on a [`Context`](crate::context::Context).
///
/// The `Display` strings are the canonical error names surfaced by
/// [`Vm::error_name`](crate::vm::Vm::error_name). Only trivial errors
/// permit continued stepping; every other variant halts the machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum ContextError {
    /// No error.
    #[default]
    #[error("nothing")]
    Nothing,

    /// The fetched word is the memory default, so the machine ran off the
    /// end of its program rather than into garbage.
    #[error("not an instruction, but memory default")]
    NaiDefault,

    /// The fetched word classifies as no instruction.
    #[error("not an instruction")]
    Nai,

    /// A backward step needed to pop the datapath garbage stack, but it
    /// was empty.
    #[error("DP stack empty")]
    DpStackEmpty,

    /// A backward CF needed to pop the program-counter garbage stack, but
    /// it was empty.
    #[error("PC stack empty")]
    PcStackEmpty,

    /// A taken jump or branch found no CF marker at its destination.
    #[error("missing CF instruction")]
    MissingCf,

    /// A link-taking jump or branch found its link register non-zero.
    #[error("link register isn't clear")]
    UnclearLink,

    /// SUB with identical source and destination registers.
    #[error("can't subtract from self")]
    SubSameRegisters,
}

impl ContextError {
    /// Trivial errors leave the machine able to continue.
    pub fn is_trivial(self) -> bool {
        matches!(self, ContextError::Nothing | ContextError::NaiDefault)
    }
}
