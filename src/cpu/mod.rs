//! 6502 CPU emulation.
//!
//! LDA immediate and the LSR family over an extensible total decode table;
//! structured status flags. Bus trait used for all memory access.

pub mod cpu;
pub mod flags;
