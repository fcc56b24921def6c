//! 6502 processor status register (P), one field per flag bit.
//!
//! Kept as individual booleans rather than a packed byte so an instruction can
//! never clobber unrelated flags by overwriting the whole register.

/// Processor status flags. Bit positions follow the 6502 P register layout
/// (carry = bit 0 ... negative = bit 7).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    /// Carry: bit shifted/carried out of the last operation.
    pub c: bool,
    /// Zero: last result was $00.
    pub z: bool,
    /// Interrupt disable (no IRQ handling at this scope).
    pub i: bool,
    /// Decimal mode (ignored by the NES 2A03).
    pub d: bool,
    /// Break: set by BRK/IRQ stack frames.
    pub b: bool,
    /// Unused bit 5, hardwired to 1 when read on real hardware.
    pub u: bool,
    /// Overflow: signed overflow of the last arithmetic operation.
    pub v: bool,
    /// Negative: bit 7 of the last result.
    pub n: bool,
}

impl Status {
    /// All flags clear, the power-on state this core assumes.
    pub fn new() -> Self {
        Status::default()
    }

    /// Pack into a P-register byte for trace display. Read-only projection;
    /// there is deliberately no inverse.
    pub fn bits(&self) -> u8 {
        (self.c as u8)
            | (self.z as u8) << 1
            | (self.i as u8) << 2
            | (self.d as u8) << 3
            | (self.b as u8) << 4
            | (self.u as u8) << 5
            | (self.v as u8) << 6
            | (self.n as u8) << 7
    }
}
