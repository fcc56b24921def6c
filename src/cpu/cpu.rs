//! 6502 CPU core: registers, decode table, fetch/decode/execute loop.
//!
//! Covers LDA immediate and the LSR family plus a total decode table where
//! every unassigned opcode is an explicit no-op, so growing the instruction
//! set is purely additive. The run loop has a single state ("running"); the
//! program counter walking off the top of the address space is the only
//! termination condition.

use ansi_term::Colour::Green;

use crate::bus::{Bus, PRG_ROM_BASE};
use crate::cpu::flags::Status;
use crate::error::Error;

/// Decoded instruction. The addressing mode is part of the opcode encoding,
/// never inferred from register contents at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// $A9: load accumulator with the byte following the opcode.
    LdaImmediate,
    /// $4A: shift the accumulator right one bit.
    LsrAccumulator,
    /// $46: shift the byte at a zero-page address right one bit, in place.
    LsrZeroPage,
    /// $4E: shift the byte at an absolute address right one bit, in place.
    LsrAbsolute,
    /// Any opcode without an assigned handler. Consumes no operand bytes.
    Nop,
}

impl Op {
    /// Total decode over the 8-bit opcode space. Unassigned opcodes map to
    /// [`Op::Nop`] rather than faulting, so images full of bytes this core
    /// does not implement still run to completion.
    pub fn decode(opcode: u8) -> Op {
        match opcode {
            0xA9 => Op::LdaImmediate,
            0x4A => Op::LsrAccumulator,
            0x46 => Op::LsrZeroPage,
            0x4E => Op::LsrAbsolute,
            _ => Op::Nop,
        }
    }
}

/// 6502 register file and execution engine, generic over the memory bus.
pub struct CPU<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: Status,
    pub bus: B,
    /// Print a one-line trace per executed instruction.
    pub trace: bool,
    /// Set once the PC has incremented past $FFFF. The PC itself always stays
    /// in range; this flag is what "out-of-range PC" means here.
    exhausted: bool,
}

impl<B: Bus> CPU<B> {
    /// Registers cleared, PC at the PRG ROM base, tracing off.
    pub fn new(bus: B) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFF,
            pc: PRG_ROM_BASE,
            status: Status::new(),
            bus,
            trace: false,
            exhausted: false,
        }
    }

    /// True once the PC has walked off the top of the address space.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Run from the PRG ROM base until the address space is exhausted.
    ///
    /// Returns `Ok(())` on normal termination (the next opcode fetch would
    /// pass $FFFF). An operand fetch past $FFFF returns
    /// [`Error::AddressRange`]; register and memory state are left exactly as
    /// the last instruction set them in either case.
    pub fn run(&mut self) -> Result<(), Error> {
        self.pc = PRG_ROM_BASE;
        self.exhausted = false;
        while !self.exhausted {
            self.step()?;
        }
        Ok(())
    }

    /// One fetch-decode-execute cycle. No-op once the address space is
    /// exhausted.
    pub fn step(&mut self) -> Result<(), Error> {
        if self.exhausted {
            return Ok(());
        }

        let pc = self.pc;
        let opcode = self.bus.read(pc);
        self.advance_pc();
        let op = Op::decode(opcode);
        if self.trace {
            self.trace_op(pc, opcode);
        }
        self.execute(pc, op)
    }

    fn execute(&mut self, pc: u16, op: Op) -> Result<(), Error> {
        match op {
            Op::LdaImmediate => self.lda_immediate(pc),
            Op::LsrAccumulator => {
                self.lsr_accumulator();
                Ok(())
            }
            Op::LsrZeroPage => self.lsr_zeropage(pc),
            Op::LsrAbsolute => self.lsr_absolute(pc),
            Op::Nop => Ok(()),
        }
    }

    /// The one place the PC moves: exactly once per fetched byte.
    fn advance_pc(&mut self) {
        let (next, wrapped) = self.pc.overflowing_add(1);
        self.pc = next;
        if wrapped {
            self.exhausted = true;
        }
    }

    /// Fetch an operand byte at the PC. `pc` is the opcode address, carried
    /// into the error when the fetch would pass the top of memory.
    fn fetch_byte(&mut self, pc: u16) -> Result<u8, Error> {
        if self.exhausted {
            return Err(Error::AddressRange { pc });
        }
        let byte = self.bus.read(self.pc);
        self.advance_pc();
        Ok(byte)
    }

    /// Fetch a little-endian operand word.
    fn fetch_word(&mut self, pc: u16) -> Result<u16, Error> {
        let lo = self.fetch_byte(pc)? as u16;
        let hi = self.fetch_byte(pc)? as u16;
        Ok((hi << 8) | lo)
    }

    fn trace_op(&self, pc: u16, opcode: u8) {
        println!(
            "{} {:04X}  {:02X}  A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
            Green.bold().paint("TRACE"),
            pc,
            opcode,
            self.a,
            self.x,
            self.y,
            self.status.bits(),
            self.sp
        );
    }

    fn update_zero_and_negative_flags(&mut self, value: u8) {
        self.status.z = value == 0;
        self.status.n = value & 0x80 != 0;
    }

    fn lda_immediate(&mut self, pc: u16) -> Result<(), Error> {
        let value = self.fetch_byte(pc)?;
        self.a = value;
        self.update_zero_and_negative_flags(self.a);
        Ok(())
    }

    fn lsr_accumulator(&mut self) {
        self.status.c = self.a & 0x01 != 0;
        self.a >>= 1;
        self.update_zero_and_negative_flags(self.a);
    }

    fn lsr_zeropage(&mut self, pc: u16) -> Result<(), Error> {
        let addr = self.fetch_byte(pc)? as u16;
        self.lsr_memory(addr);
        Ok(())
    }

    fn lsr_absolute(&mut self, pc: u16) -> Result<(), Error> {
        let addr = self.fetch_word(pc)?;
        self.lsr_memory(addr);
        Ok(())
    }

    /// Shift the byte at `addr` right one bit and write it back. Bit 0 goes
    /// to carry, bit 7 of the result is always 0.
    fn lsr_memory(&mut self, addr: u16) {
        let mut value = self.bus.read(addr);
        self.status.c = value & 0x01 != 0;
        value >>= 1;
        self.bus.write(addr, value);
        self.update_zero_and_negative_flags(value);
    }
}
