//! Driver error type.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the MCP2515 driver.
#[derive(Error, Debug)]
pub enum Error {
    /// SPI or GPIO failure reported by the platform.
    #[error("peripheral I/O failed")]
    Io(#[from] io::Error),
    /// A receive buffer declared a data length above the 8-byte CAN maximum.
    /// The frame is invalid and must be dropped, not truncated.
    #[error("received frame declares {0} data bytes, CAN frames carry at most 8")]
    BadDataLength(u8),
    /// The controller has been closed and its port handles released.
    #[error("controller is closed")]
    Closed,
}
