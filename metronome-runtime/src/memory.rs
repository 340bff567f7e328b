//! Sparse word-addressed memory
//!
//! The full 32-bit address space is available; only written words are
//! stored. Absent addresses read as [`MEMORY_DEFAULT`], and writing the
//! default value removes the entry again, so two memories with the same
//! observable contents always compare equal.

use metronome_spec::{Address, Word, MEMORY_DEFAULT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse mapping from word address to stored word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    words: HashMap<Address, Word>,
}

impl Memory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one word; absent addresses yield [`MEMORY_DEFAULT`].
    pub fn read(&self, address: Address) -> Word {
        self.words.get(&address).copied().unwrap_or(MEMORY_DEFAULT)
    }

    /// Write one word, replacing any prior value at the address.
    pub fn write(&mut self, address: Address, value: Word) {
        if value == MEMORY_DEFAULT {
            self.words.remove(&address);
        } else {
            self.words.insert(address, value);
        }
    }

    /// Number of addresses holding a non-default word.
    pub fn populated(&self) -> usize {
        self.words.len()
    }
}

impl FromIterator<(Address, Word)> for Memory {
    fn from_iter<I: IntoIterator<Item = (Address, Word)>>(iter: I) -> Self {
        let mut memory = Memory::new();
        for (address, value) in iter {
            memory.write(address, value);
        }
        memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_reads_default() {
        let memory = Memory::new();
        assert_eq!(memory.read(0), MEMORY_DEFAULT);
        assert_eq!(memory.read(u32::MAX), MEMORY_DEFAULT);
    }

    #[test]
    fn test_sparse_read_write() {
        let mut memory: Memory = [(0, 0), (1, 1), (2, 2)].into_iter().collect();
        assert_eq!(memory.read(3), MEMORY_DEFAULT);

        for address in 0..4 {
            memory.write(address, address + 10);
        }
        for address in 0..4 {
            assert_eq!(memory.read(address), address + 10);
        }
        assert_eq!(memory.read(4), MEMORY_DEFAULT);
    }

    #[test]
    fn test_overwrite() {
        let mut memory = Memory::new();
        memory.write(7, 1);
        memory.write(7, 2);
        assert_eq!(memory.read(7), 2);
        assert_eq!(memory.populated(), 1);
    }

    #[test]
    fn test_writing_default_is_observably_absent() {
        let mut memory = Memory::new();
        memory.write(7, 42);
        memory.write(7, MEMORY_DEFAULT);
        assert_eq!(memory.read(7), MEMORY_DEFAULT);
        assert_eq!(memory, Memory::new());
    }
}
