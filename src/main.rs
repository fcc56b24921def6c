//! Famicore entry point.
//!
//! Loads an iNES image and runs the CPU core over it with tracing on.
//! Usage: famicore path/to/game.nes

use std::env;
use std::fs;

use ansi_term::Colour::{Green, Red};
use anyhow::{Context, Result};
use famicore::{bus::FlatBus, cartridge::header::Header, cpu::cpu::CPU, error::Error};

fn main() -> Result<()> {
    let path = env::args()
        .nth(1)
        .context("usage: famicore <path/to/game.nes>")?;

    let image = fs::read(&path).with_context(|| format!("failed to read ROM {path}"))?;

    // Header first: a bad image must abort before anything executes.
    let header = Header::parse(&image)?;
    header.validate()?;

    println!(
        "{} mapper {}, PRG {} KiB, CHR {} KiB, {:?} mirroring",
        Green.bold().paint("INFO"),
        header.mapper_id(),
        header.prg_rom_size() / 1024,
        header.chr_rom_size() / 1024,
        header.mirroring(),
    );

    let mut bus = FlatBus::new();
    bus.load_program(
        header.mapper_id(),
        header.prg_rom_size(),
        header.chr_rom_size(),
        &image,
    )
    .with_context(|| format!("failed to load {path}"))?;

    let mut cpu = CPU::new(bus);
    cpu.trace = true;

    match cpu.run() {
        Ok(()) => {
            println!("{} address space exhausted", Green.bold().paint("INFO"));
            Ok(())
        }
        // Expected end for programs that run operands off the top of memory.
        Err(Error::AddressRange { pc }) => {
            println!(
                "{} run ended: operand fetch past $FFFF (opcode at ${:04X})",
                Red.bold().paint("WARN"),
                pc
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
