//! iNES cartridge header parsing (.nes files).
//!
//! Implements the fixed 16-byte [iNES](https://www.nesdev.org/wiki/INES) header:
//! magic `"NES"` + `$1A`, PRG size in 16 KiB units, CHR size in 8 KiB units,
//! flags 6-10, five reserved padding bytes. The PRG payload follows the header
//! immediately, then the optional CHR payload.

use bitflags::bitflags;

use crate::error::FormatError;

/// Size of the fixed iNES header in bytes.
pub const HEADER_LEN: usize = 16;

/// Header bytes 0-2: ASCII "NES".
pub const MAGIC: &[u8; 3] = b"NES";

/// Header byte 3: MS-DOS end-of-file marker.
pub const EOF_MARKER: u8 = 0x1A;

/// PRG ROM is sized in 16 KiB units (header byte 4).
pub const PRG_ROM_UNIT: usize = 16 * 1024;

/// CHR ROM is sized in 8 KiB units (header byte 5).
pub const CHR_ROM_UNIT: usize = 8 * 1024;

bitflags! {
    /// iNES flags 6: mirroring, battery, trainer, four-screen, mapper low nibble.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags6: u8 {
        const MIRRORING       = 0b0000_0001;
        const BATTERY         = 0b0000_0010;
        const TRAINER         = 0b0000_0100;
        const FOUR_SCREEN     = 0b0000_1000;
        const MAPPER_LOW_MASK = 0b1111_0000;
    }
}

bitflags! {
    /// iNES flags 7: console type bits and mapper high nibble.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Flags7: u8 {
        const VS_UNISYSTEM     = 0b0000_0001;
        const PLAYCHOICE_10    = 0b0000_0010;
        const NES2_DETECTION   = 0b0000_1100;
        const MAPPER_HIGH_MASK = 0b1111_0000;
    }
}

/// Nametable mirroring mode, from flags 6 bit 0 (board solder pads on NROM).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
}

/// The 16-byte iNES header, byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Bytes 0-3: "NES" followed by $1A.
    pub signature: [u8; 4],
    /// Byte 4: PRG ROM size in 16 KiB units.
    pub prg_rom_units: u8,
    /// Byte 5: CHR ROM size in 8 KiB units (0 means the board uses CHR RAM).
    pub chr_rom_units: u8,
    /// Byte 6: mirroring, battery, trainer, mapper low nibble.
    pub flags6: u8,
    /// Byte 7: VS/PlayChoice, NES 2.0 detection, mapper high nibble.
    pub flags7: u8,
    /// Byte 8: PRG RAM size (rarely used extension).
    pub flags8: u8,
    /// Byte 9: TV system (rarely used extension).
    pub flags9: u8,
    /// Byte 10: TV system, PRG RAM presence (unofficial extension).
    pub flags10: u8,
    /// Bytes 11-15: reserved (some rippers put their name here).
    pub padding: [u8; 5],
}

impl Header {
    /// Parse the leading 16 bytes of a ROM image. Field offsets only; call
    /// [`Header::validate`] to check the magic bytes.
    pub fn parse(raw: &[u8]) -> Result<Header, FormatError> {
        if raw.len() < HEADER_LEN {
            return Err(FormatError::Truncated {
                expected: HEADER_LEN,
                actual: raw.len(),
            });
        }

        let mut signature = [0u8; 4];
        signature.copy_from_slice(&raw[0..4]);
        let mut padding = [0u8; 5];
        padding.copy_from_slice(&raw[11..16]);

        Ok(Header {
            signature,
            prg_rom_units: raw[4],
            chr_rom_units: raw[5],
            flags6: raw[6],
            flags7: raw[7],
            flags8: raw[8],
            flags9: raw[9],
            flags10: raw[10],
            padding,
        })
    }

    /// Check the magic bytes: "NES" then the $1A end-of-file marker.
    pub fn validate(&self) -> Result<(), FormatError> {
        if self.signature[0..3] != *MAGIC {
            let mut found = [0u8; 3];
            found.copy_from_slice(&self.signature[0..3]);
            return Err(FormatError::SignatureMismatch { found });
        }
        if self.signature[3] != EOF_MARKER {
            return Err(FormatError::MissingEofMarker {
                found: self.signature[3],
            });
        }
        Ok(())
    }

    /// Mapper number from flags 6-7: low nibble of byte 6, high nibble of
    /// byte 7, combined as `(flags6 >> 4) | (flags7 & 0xF0)`. This is the iNES
    /// layout; callers that want a different derivation can bypass this and
    /// hand the bus any mapper id they like.
    pub fn mapper_id(&self) -> u8 {
        (self.flags6 >> 4) | (self.flags7 & 0xF0)
    }

    /// PRG ROM payload size in bytes.
    pub fn prg_rom_size(&self) -> usize {
        self.prg_rom_units as usize * PRG_ROM_UNIT
    }

    /// CHR ROM payload size in bytes.
    pub fn chr_rom_size(&self) -> usize {
        self.chr_rom_units as usize * CHR_ROM_UNIT
    }

    /// Nametable mirroring from flags 6 bit 0: 0 = horizontal, 1 = vertical.
    pub fn mirroring(&self) -> Mirroring {
        if Flags6::from_bits_retain(self.flags6).contains(Flags6::MIRRORING) {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        }
    }

    /// Battery-backed PRG RAM present (flags 6 bit 1).
    pub fn has_battery(&self) -> bool {
        Flags6::from_bits_retain(self.flags6).contains(Flags6::BATTERY)
    }

    /// 512-byte trainer between header and PRG ROM (flags 6 bit 2). Reported
    /// only; this core does not skip trainers when loading.
    pub fn has_trainer(&self) -> bool {
        Flags6::from_bits_retain(self.flags6).contains(Flags6::TRAINER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_header(prg: u8, chr: u8, flags6: u8, flags7: u8) -> [u8; 16] {
        let mut raw = [0u8; 16];
        raw[0..3].copy_from_slice(MAGIC);
        raw[3] = EOF_MARKER;
        raw[4] = prg;
        raw[5] = chr;
        raw[6] = flags6;
        raw[7] = flags7;
        raw
    }

    #[test]
    fn parse_reads_all_fields() {
        let mut raw = raw_header(2, 1, 0x31, 0x40);
        raw[8] = 0x08;
        raw[11] = 0xAB; // ripper junk in the padding

        let header = Header::parse(&raw).unwrap();
        assert_eq!(header.signature, [b'N', b'E', b'S', 0x1A]);
        assert_eq!(header.prg_rom_units, 2);
        assert_eq!(header.chr_rom_units, 1);
        assert_eq!(header.flags6, 0x31);
        assert_eq!(header.flags7, 0x40);
        assert_eq!(header.flags8, 0x08);
        assert_eq!(header.padding, [0xAB, 0, 0, 0, 0]);
    }

    #[test]
    fn parse_rejects_short_input() {
        let err = Header::parse(&[0x4E, 0x45, 0x53]).unwrap_err();
        assert_eq!(
            err,
            FormatError::Truncated {
                expected: HEADER_LEN,
                actual: 3
            }
        );
    }

    #[test]
    fn validate_accepts_ines_magic() {
        let header = Header::parse(&raw_header(1, 0, 0, 0)).unwrap();
        assert!(header.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_signature() {
        let mut raw = raw_header(1, 0, 0, 0);
        raw[0] = b'X';
        let header = Header::parse(&raw).unwrap();
        assert_eq!(
            header.validate().unwrap_err(),
            FormatError::SignatureMismatch {
                found: [b'X', b'E', b'S']
            }
        );
    }

    #[test]
    fn validate_rejects_missing_eof_marker() {
        let mut raw = raw_header(1, 0, 0, 0);
        raw[3] = 0x00;
        let header = Header::parse(&raw).unwrap();
        assert_eq!(
            header.validate().unwrap_err(),
            FormatError::MissingEofMarker { found: 0x00 }
        );
    }

    #[test]
    fn mapper_id_combines_both_nibbles() {
        // Mapper 4 (MMC3): low nibble in flags6 bits 4-7.
        let header = Header::parse(&raw_header(1, 0, 0x40, 0x00)).unwrap();
        assert_eq!(header.mapper_id(), 4);

        // Mapper 66: 0x42 = high nibble 4 from flags7, low nibble 2 from flags6.
        let header = Header::parse(&raw_header(1, 0, 0x20, 0x40)).unwrap();
        assert_eq!(header.mapper_id(), 66);
    }

    #[test]
    fn rom_sizes_scale_by_bank_units() {
        let header = Header::parse(&raw_header(2, 1, 0, 0)).unwrap();
        assert_eq!(header.prg_rom_size(), 32 * 1024);
        assert_eq!(header.chr_rom_size(), 8 * 1024);

        let header = Header::parse(&raw_header(0, 0, 0, 0)).unwrap();
        assert_eq!(header.prg_rom_size(), 0);
        assert_eq!(header.chr_rom_size(), 0);
    }

    #[test]
    fn flags6_accessors() {
        let header = Header::parse(&raw_header(1, 0, 0b0000_0111, 0)).unwrap();
        assert_eq!(header.mirroring(), Mirroring::Vertical);
        assert!(header.has_battery());
        assert!(header.has_trainer());

        let header = Header::parse(&raw_header(1, 0, 0, 0)).unwrap();
        assert_eq!(header.mirroring(), Mirroring::Horizontal);
        assert!(!header.has_battery());
        assert!(!header.has_trainer());
    }
}
