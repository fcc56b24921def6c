//! Error taxonomy for cartridge loading and CPU execution.
//!
//! [`FormatError`] covers malformed iNES images, [`Error`] adds the mapper and
//! address-space failures. Load-time errors abort before any instruction runs;
//! [`Error::AddressRange`] mid-run is the expected end of a program that reads
//! past the top of memory.

use std::error;
use std::fmt;

/// A malformed or truncated iNES image, detected while parsing the 16-byte header
/// or slicing the PRG payload out of the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// Fewer bytes than the structure being parsed requires.
    Truncated { expected: usize, actual: usize },
    /// Header bytes 0-2 are not the ASCII magic "NES".
    SignatureMismatch { found: [u8; 3] },
    /// Header byte 3 is not the MS-DOS end-of-file marker $1A.
    MissingEofMarker { found: u8 },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::Truncated { expected, actual } => {
                write!(f, "truncated image: need {} bytes, got {}", expected, actual)
            }
            FormatError::SignatureMismatch { found } => {
                write!(f, "bad iNES signature: {:02X?} (expected \"NES\")", found)
            }
            FormatError::MissingEofMarker { found } => {
                write!(f, "missing iNES EOF marker: ${:02X} (expected $1A)", found)
            }
        }
    }
}

impl error::Error for FormatError {}

/// Any failure the core can report: bad image, unimplemented mapper, or a
/// fetch past the top of the 64 KiB address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Format(FormatError),
    /// Only mapper 0 (NROM) is implemented; everything else lands here.
    UnsupportedMapper { mapper_id: u8 },
    /// PRG payload larger than the $8000-$FFFF projection window.
    OversizedPrgRom { size: usize, max: usize },
    /// An operand fetch ran past $FFFF.
    AddressRange { pc: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format(e) => write!(f, "{}", e),
            Error::UnsupportedMapper { mapper_id } => {
                write!(f, "unsupported mapper {}", mapper_id)
            }
            Error::OversizedPrgRom { size, max } => {
                write!(f, "PRG ROM of {} bytes exceeds the {}-byte window at $8000", size, max)
            }
            Error::AddressRange { pc } => {
                write!(f, "operand fetch past end of address space (opcode at ${:04X})", pc)
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Format(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Error::Format(e)
    }
}
