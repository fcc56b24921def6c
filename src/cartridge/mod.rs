//! iNES cartridge image support.
//!
//! - **header**: The 16-byte [iNES](https://www.nesdev.org/wiki/INES) header;
//!   parsing, validation, mapper number and PRG/CHR size derivation.

pub mod header;
