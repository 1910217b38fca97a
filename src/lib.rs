//! # MCP2515 CAN controller driver
//!
//! Driver for the Microchip MCP2515 SPI-to-CAN bridge on hosts that expose
//! named SPI buses and GPIO lines through a peripheral-I/O layer (see
//! [`pio`]). The controller binds one SPI device and one interrupt pin,
//! configures the chip (16 MHz crystal, 1 Mb/s bus by default), and drains
//! the two receive buffers into a registered listener on every falling edge
//! of the interrupt line.
//!
//! ## Example
//!
//! ```
//! use embedded_can::StandardId;
//! use mcp2515_pio::example::ExamplePeripherals;
//! use mcp2515_pio::{CanMessage, Config, Mcp2515, TxBuffer};
//!
//! let mut platform = ExamplePeripherals::default();
//! let mut controller =
//!     Mcp2515::open(&mut platform, "SPI0.0", "BCM25", &Config::default()).unwrap();
//!
//! // Frames drained from the chip land here, on the interrupt worker.
//! controller.set_listener(|message| println!("received {:#05x}", message.raw_id()));
//!
//! let id = StandardId::new(0x042).unwrap();
//! let message = CanMessage::new(id, &[0x01, 0x02, 0x03, 0x04]).unwrap();
//! controller.send_message(TxBuffer::Tx0, &message).unwrap();
//!
//! controller.close();
//! ```

pub mod buffer;
pub mod cmd;
pub mod config;
pub mod controller;
pub mod error;
pub mod example;
pub mod message;
pub mod pio;
pub mod regs;
mod transport;

#[cfg(test)]
pub(crate) mod mocks;
#[cfg(test)]
mod tests;

pub use buffer::{RxBuffer, TxBuffer};
pub use config::{BitTiming, Config, FilterConfig};
pub use controller::{Listener, Mcp2515, RegisterDump};
pub use error::{Error, Result};
pub use message::CanMessage;
