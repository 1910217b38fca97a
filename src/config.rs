//! Controller configuration.
//!
//! The register bytes written during startup are externalized here; the
//! defaults reproduce the deployment this driver was built for byte by byte
//! (16 MHz crystal, 1 Mbps bus, two standard-ID acceptance filters on
//! receive buffer 0).

use crate::regs::{CanInte, OpMode};

/// Bit-timing register bytes, written to `CFG1`/`CFG2`/`CFG3` in
/// configuration mode.
///
/// These encode the oscillator frequency and CAN bit rate together; the
/// driver performs no timing calculation and writes the bytes verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitTiming {
    pub cfg1: u8,
    pub cfg2: u8,
    pub cfg3: u8,
}

impl BitTiming {
    /// 16 MHz oscillator, 1 Mb/s bus, wake-up filter enabled.
    pub const MHZ16_1MBPS: BitTiming = BitTiming {
        cfg1: 0x00,
        cfg2: 0xC9,
        cfg3: 0x42,
    };
}

impl Default for BitTiming {
    fn default() -> Self {
        Self::MHZ16_1MBPS
    }
}

/// Acceptance filters and masks as `SIDH:SIDL` register words.
///
/// `rxf0`/`rxf1` and `rxm0` apply to receive buffer 0; `rxm1` to buffer 1.
/// The high byte of each word lands in the `SIDH` register and the low byte
/// in `SIDL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    pub rxf0: u16,
    pub rxf1: u16,
    pub rxm0: u16,
    pub rxm1: u16,
}

impl FilterConfig {
    /// Positions an 11-bit identifier in a `SIDH:SIDL` word.
    pub const fn standard(id: u16) -> u16 {
        id << 5
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            rxf0: 0x0040,
            rxf1: 0x0060,
            rxm0: 0xC7E0,
            rxm1: 0xFFFF,
        }
    }
}

/// Configuration handed to [`Mcp2515::new`](crate::Mcp2515::new).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Bit-timing bytes for `CFG1`/`CFG2`/`CFG3`.
    pub bit_timing: BitTiming,
    /// Acceptance filter and mask words.
    pub filters: FilterConfig,
    /// Interrupt sources routed to the interrupt pin (`CANINTE`).
    pub interrupts: CanInte,
    /// Operation mode entered after configuration.
    pub mode: OpMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bit_timing: BitTiming::default(),
            filters: FilterConfig::default(),
            interrupts: CanInte::new().with_rx0ie(true),
            mode: OpMode::Normal,
        }
    }
}
