//! Register designators for Metronome32

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of general-purpose registers
pub const NUM_REGISTERS: usize = 32;

/// A general-purpose register designator (r0-r31).
///
/// Register 0 is an ordinary register; nothing is hardwired to zero. Any
/// register may serve as the link register of a link-taking branch.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reg(u8);

impl Reg {
    /// Builds a register designator, keeping the low five bits.
    #[inline]
    pub const fn new(index: u8) -> Self {
        Reg(index & 0x1F)
    }

    /// Index into a register file.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for Reg {
    #[inline]
    fn from(index: u32) -> Self {
        Reg::new(index as u8)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}
