//! SPI request shapes.
//!
//! The MCP2515 speaks a small fixed-format command protocol: an opcode byte,
//! then depending on the opcode a register address and zero or more data
//! bytes. [`Transport`] turns those shapes into single ordered exchanges on
//! the underlying [`SpiDevice`]. No retries here; the caller owns recovery.

use std::io;

use crate::{
    cmd::Command,
    pio::{SpiDevice, SpiMode},
    regs::Register,
};

/// SPI clock frequency the chip is driven at.
pub(crate) const SPI_FREQUENCY_HZ: u32 = 10_000_000;
/// Word size of every exchange.
pub(crate) const SPI_BITS_PER_WORD: u8 = 8;

/// Ordered request/response layer over the raw SPI device.
///
/// Owned by the controller behind its bus mutex; every method is one
/// complete chip-select-framed exchange.
pub(crate) struct Transport<S> {
    spi: S,
}

impl<S: SpiDevice> Transport<S> {
    /// Takes ownership of `spi` and fixes the port parameters (10 MHz,
    /// mode 0, 8 bits per word).
    pub fn new(mut spi: S) -> io::Result<Self> {
        spi.configure(SPI_FREQUENCY_HZ, SpiMode::Mode0, SPI_BITS_PER_WORD)?;
        Ok(Transport { spi })
    }

    /// Writes one register: `[WRITE, addr, value]`, no response.
    pub fn write_register(&mut self, reg: Register, value: u8) -> io::Result<()> {
        self.spi.write(&[Command::Write as u8, reg as u8, value])
    }

    /// Reads one register: `[READ, addr, 0]`, value in the last reply byte.
    pub fn read_register(&mut self, reg: Register) -> io::Result<u8> {
        let mut frame = [Command::Read as u8, reg as u8, 0x00];
        self.spi.transfer(&mut frame)?;
        Ok(frame[2])
    }

    /// Atomic read-modify-write in hardware: `[BIT_MODIFY, addr, mask,
    /// value]`, the chip changes only the bits set in `mask`.
    pub fn modify_register(&mut self, reg: Register, mask: u8, value: u8) -> io::Result<()> {
        self.spi
            .write(&[Command::BitModify as u8, reg as u8, mask, value])
    }

    /// Full-duplex exchange of a caller-built frame, overwritten in place
    /// with the reply bytes.
    pub fn exchange(&mut self, frame: &mut [u8]) -> io::Result<()> {
        self.spi.transfer(frame)
    }

    /// Write-only frame of arbitrary length (RESET, transmit block loads).
    pub fn send(&mut self, frame: &[u8]) -> io::Result<()> {
        self.spi.write(frame)
    }
}
