//! Memory bus for the CPU.
//!
//! [`FlatBus`] owns the full 64 KiB address space as one flat array and
//! projects cartridge PRG ROM into it at load time, NROM style. There is no
//! per-region decoding at this scope; reads and writes go straight to the
//! backing store, so the PRG range is not write-protected either.

use crate::cartridge::header::HEADER_LEN;
use crate::error::{Error, FormatError};

/// Trait for memory access used by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);
}

/// Full CPU-visible address space: 64 KiB.
pub const MEMORY_SIZE: usize = 0x10000;

/// PRG ROM is projected at $8000 up to the top of memory.
pub const PRG_ROM_BASE: u16 = 0x8000;

/// One PRG bank: 16 KiB. A single-bank cartridge is mirrored into both halves
/// of the $8000-$FFFF range.
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// Flat 64 KiB memory bus with mapper-0 cartridge projection.
pub struct FlatBus {
    mem: [u8; MEMORY_SIZE],
    mapper_id: u8,
    prg_rom_size: usize,
    chr_rom_size: usize,
}

impl FlatBus {
    /// Zero-initialized address space, no program loaded.
    pub fn new() -> Self {
        Self {
            mem: [0; MEMORY_SIZE],
            mapper_id: 0,
            prg_rom_size: 0,
            chr_rom_size: 0,
        }
    }

    /// Project the PRG payload of `image` (header bytes included) into the
    /// address space.
    ///
    /// Mapper 0 (NROM): the `prg_rom_size` bytes following the 16-byte header
    /// are copied to $8000. A single 16 KiB bank is copied again at $C000,
    /// mirroring the hardware behavior of NROM-128 boards. Any other mapper id
    /// is an extension point and fails with [`Error::UnsupportedMapper`].
    pub fn load_program(
        &mut self,
        mapper_id: u8,
        prg_rom_size: usize,
        chr_rom_size: usize,
        image: &[u8],
    ) -> Result<(), Error> {
        match mapper_id {
            0 => {}
            _ => return Err(Error::UnsupportedMapper { mapper_id }),
        }

        // The projection window is $8000 up to the top of memory; a header
        // may legally claim more banks than fit (other mappers switch them),
        // but mapper 0 cannot.
        let window = MEMORY_SIZE - PRG_ROM_BASE as usize;
        if prg_rom_size > window {
            return Err(Error::OversizedPrgRom {
                size: prg_rom_size,
                max: window,
            });
        }

        let prg_end = HEADER_LEN + prg_rom_size;
        if image.len() < prg_end {
            return Err(FormatError::Truncated {
                expected: prg_end,
                actual: image.len(),
            }
            .into());
        }

        let base = PRG_ROM_BASE as usize;
        let prg = &image[HEADER_LEN..prg_end];
        self.mem[base..base + prg_rom_size].copy_from_slice(prg);
        if prg_rom_size == PRG_BANK_SIZE {
            // 16 KiB cartridge: second copy fills $C000-$FFFF.
            self.mem[base + PRG_BANK_SIZE..base + 2 * PRG_BANK_SIZE].copy_from_slice(prg);
        }

        self.mapper_id = mapper_id;
        self.prg_rom_size = prg_rom_size;
        self.chr_rom_size = chr_rom_size;
        Ok(())
    }

    /// Mapper id the current program was loaded with.
    pub fn mapper_id(&self) -> u8 {
        self.mapper_id
    }

    /// PRG ROM payload size in bytes.
    pub fn prg_rom_size(&self) -> usize {
        self.prg_rom_size
    }

    /// CHR ROM payload size in bytes.
    pub fn chr_rom_size(&self) -> usize {
        self.chr_rom_size
    }
}

impl Default for FlatBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for FlatBus {
    fn read(&mut self, addr: u16) -> u8 {
        self.mem[addr as usize]
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.mem[addr as usize] = data;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cartridge::header::{EOF_MARKER, MAGIC};

    fn nrom_image(prg_banks: u8, fill: u8) -> Vec<u8> {
        let mut image = vec![0u8; HEADER_LEN + prg_banks as usize * PRG_BANK_SIZE];
        image[0..3].copy_from_slice(MAGIC);
        image[3] = EOF_MARKER;
        image[4] = prg_banks;
        for byte in &mut image[HEADER_LEN..] {
            *byte = fill;
        }
        image
    }

    #[test]
    fn new_bus_is_zeroed() {
        let mut bus = FlatBus::new();
        assert_eq!(bus.read(0x0000), 0);
        assert_eq!(bus.read(0x8000), 0);
        assert_eq!(bus.read(0xFFFF), 0);
    }

    #[test]
    fn load_mirrors_single_bank() {
        let mut image = nrom_image(1, 0x00);
        for (i, byte) in image[HEADER_LEN..].iter_mut().enumerate() {
            *byte = (i % 251) as u8;
        }

        let mut bus = FlatBus::new();
        bus.load_program(0, PRG_BANK_SIZE, 0, &image).unwrap();

        for offset in 0..PRG_BANK_SIZE as u16 {
            let lo = bus.read(PRG_ROM_BASE + offset);
            let hi = bus.read(PRG_ROM_BASE + PRG_BANK_SIZE as u16 + offset);
            assert_eq!(lo, hi, "mirror mismatch at offset {:#06X}", offset);
        }
    }

    #[test]
    fn load_two_banks_without_mirroring() {
        let mut image = nrom_image(2, 0x00);
        image[HEADER_LEN] = 0x11; // first bank
        image[HEADER_LEN + PRG_BANK_SIZE] = 0x22; // second bank

        let mut bus = FlatBus::new();
        bus.load_program(0, 2 * PRG_BANK_SIZE, 0, &image).unwrap();

        assert_eq!(bus.read(0x8000), 0x11);
        assert_eq!(bus.read(0xC000), 0x22);
        assert_eq!(bus.prg_rom_size(), 2 * PRG_BANK_SIZE);
    }

    #[test]
    fn load_rejects_unsupported_mapper() {
        let image = nrom_image(1, 0);
        let mut bus = FlatBus::new();
        assert_eq!(
            bus.load_program(4, PRG_BANK_SIZE, 0, &image).unwrap_err(),
            Error::UnsupportedMapper { mapper_id: 4 }
        );
        // Nothing was projected.
        assert_eq!(bus.read(0x8000), 0);
    }

    #[test]
    fn load_rejects_short_prg_payload() {
        let image = nrom_image(1, 0xAA);
        let mut bus = FlatBus::new();
        let err = bus
            .load_program(0, 2 * PRG_BANK_SIZE, 0, &image)
            .unwrap_err();
        assert_eq!(
            err,
            Error::Format(crate::error::FormatError::Truncated {
                expected: HEADER_LEN + 2 * PRG_BANK_SIZE,
                actual: image.len(),
            })
        );
    }

    #[test]
    fn load_rejects_prg_larger_than_projection_window() {
        // Valid header, mapper 0, but three 16 KiB banks: 48 KiB cannot fit
        // the 32 KiB window at $8000. Must be a load error, not a panic.
        let image = nrom_image(3, 0x77);
        let mut bus = FlatBus::new();
        let err = bus
            .load_program(0, 3 * PRG_BANK_SIZE, 0, &image)
            .unwrap_err();
        assert_eq!(
            err,
            Error::OversizedPrgRom {
                size: 3 * PRG_BANK_SIZE,
                max: MEMORY_SIZE - PRG_ROM_BASE as usize,
            }
        );
        // Nothing was projected.
        assert_eq!(bus.read(0x8000), 0);
        assert_eq!(bus.prg_rom_size(), 0);
    }

    #[test]
    fn writes_hit_the_backing_store_even_in_rom_range() {
        let image = nrom_image(1, 0x55);
        let mut bus = FlatBus::new();
        bus.load_program(0, PRG_BANK_SIZE, 0, &image).unwrap();

        bus.write(0x8000, 0x99);
        assert_eq!(bus.read(0x8000), 0x99);
        // The mirror is a copy, not an alias.
        assert_eq!(bus.read(0xC000), 0x55);
    }
}
