use std::fs;
use std::path::Path;

use thiserror::Error;

/// The full, flat 6502 address space.
pub const MEMORY_SIZE: usize = 0x10000;

/// The hardware stack is hard coded to page $01 ($0100-$01FF).
pub const STACK_PAGE: u16 = 0x0100;

#[derive(Error, Debug)]
pub enum ImageError {
    #[error("object image must be exactly 65536 bytes, found {0}")]
    WrongSize(usize),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ImageError {
    /// Process exit code for this failure; I/O errors surface the OS errno.
    pub fn exit_code(&self) -> i32 {
        match self {
            ImageError::WrongSize(_) => 1,
            ImageError::Io(err) => err.raw_os_error().unwrap_or(1),
        }
    }
}

/// The 64 KiB execution environment. Every address is readable and writable;
/// there are no protected regions and no device mappings.
pub struct Memory {
    bytes: Box<[u8; MEMORY_SIZE]>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            bytes: Box::new([0; MEMORY_SIZE]),
        }
    }

    pub fn read_u8(&self, address: u16) -> u8 {
        self.bytes[address as usize]
    }

    pub fn set_u8(&mut self, address: u16, value: u8) {
        self.bytes[address as usize] = value;
    }

    /// Words are little endian everywhere on the 6502.
    pub fn read_u16(&self, address: u16) -> u16 {
        let low = self.read_u8(address);
        let high = self.read_u8(address.wrapping_add(1));
        u16::from_le_bytes([low, high])
    }

    pub fn set_u16(&mut self, address: u16, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.set_u8(address, low);
        self.set_u8(address.wrapping_add(1), high);
    }

    /// Read a pointer out of the zero page. The high byte of the pointer is
    /// read from `(zp + 1) mod 256`, so a pointer at $FF wraps around to $00
    /// rather than leaving the page.
    pub fn read_zero_page_u16(&self, zp: u8) -> u16 {
        let low = self.read_u8(zp as u16);
        let high = self.read_u8(zp.wrapping_add(1) as u16);
        u16::from_le_bytes([low, high])
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    /// Replace the whole image with the contents of an object file. The file
    /// must hold exactly one full 64 KiB image.
    pub fn load(&mut self, path: &Path) -> Result<(), ImageError> {
        let bytes = fs::read(path)?;
        if bytes.len() != MEMORY_SIZE {
            return Err(ImageError::WrongSize(bytes.len()));
        }
        self.bytes.copy_from_slice(&bytes);
        Ok(())
    }

    /// Write the whole image out as an object file in a single call.
    pub fn save(&self, path: &Path) -> Result<(), ImageError> {
        fs::write(path, &self.bytes[..])?;
        Ok(())
    }
}
