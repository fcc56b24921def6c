//! Famicore: a NES (Famicom) CPU and memory core written in Rust.
//!
//! The execution substrate of an NES emulator as documented on the
//! [NESdev Wiki](https://www.nesdev.org/wiki/NES_reference_guide): a 6502
//! register/flag/execution engine, a flat 64 KiB memory bus with NROM
//! cartridge projection, and an [iNES](https://www.nesdev.org/wiki/INES)
//! header parser feeding mapper selection into the bus. Graphics, audio,
//! timing, and interrupts are left to the devices that would sit on top.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map):
//!   flat 64 KiB space; PRG ROM projected at $8000, mirrored for 16 KiB banks
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) header: magic,
//!   PRG/CHR sizing, [Mapper](https://www.nesdev.org/wiki/Mapper) number
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU): fetch/decode/execute
//!   with a total opcode table; structured status flags
//! - **error** – load-time and execution faults

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod error;
