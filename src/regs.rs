//! MCP2515 registers.

use modular_bitfield::prelude::*;

/// Register address map.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    RXF0SIDH = 0x00,
    RXF0SIDL = 0x01,
    RXF0EID8 = 0x02,
    RXF0EID0 = 0x03,
    RXF1SIDH = 0x04,
    RXF1SIDL = 0x05,
    RXF1EID8 = 0x06,
    RXF1EID0 = 0x07,
    RXF2SIDH = 0x08,
    RXF2SIDL = 0x09,
    RXF2EID8 = 0x0A,
    RXF2EID0 = 0x0B,
    CANSTAT = 0x0E,
    CANCTRL = 0x0F,
    RXF3SIDH = 0x10,
    RXF3SIDL = 0x11,
    RXF3EID8 = 0x12,
    RXF3EID0 = 0x13,
    RXF4SIDH = 0x14,
    RXF4SIDL = 0x15,
    RXF4EID8 = 0x16,
    RXF4EID0 = 0x17,
    RXF5SIDH = 0x18,
    RXF5SIDL = 0x19,
    RXF5EID8 = 0x1A,
    RXF5EID0 = 0x1B,
    TEC = 0x1C,
    REC = 0x1D,
    RXM0SIDH = 0x20,
    RXM0SIDL = 0x21,
    RXM0EID8 = 0x22,
    RXM0EID0 = 0x23,
    RXM1SIDH = 0x24,
    RXM1SIDL = 0x25,
    RXM1EID8 = 0x26,
    RXM1EID0 = 0x27,
    CFG3 = 0x28,
    CFG2 = 0x29,
    CFG1 = 0x2A,
    CANINTE = 0x2B,
    CANINTF = 0x2C,
    EFLG = 0x2D,
    TXB0CTRL = 0x30,
    TXB0SIDH = 0x31,
    TXB0SIDL = 0x32,
    TXB0EID8 = 0x33,
    TXB0EID0 = 0x34,
    TXB0DLC = 0x35,
    TXB0DATA = 0x36,
    TXB1CTRL = 0x40,
    TXB1SIDH = 0x41,
    TXB1SIDL = 0x42,
    TXB1EID8 = 0x43,
    TXB1EID0 = 0x44,
    TXB1DLC = 0x45,
    TXB1DATA = 0x46,
    TXB2CTRL = 0x50,
    TXB2SIDH = 0x51,
    TXB2SIDL = 0x52,
    TXB2EID8 = 0x53,
    TXB2EID0 = 0x54,
    TXB2DLC = 0x55,
    TXB2DATA = 0x56,
    RXB0CTRL = 0x60,
    RXB0SIDH = 0x61,
    RXB0SIDL = 0x62,
    RXB0EID8 = 0x63,
    RXB0EID0 = 0x64,
    RXB0DLC = 0x65,
    RXB0DATA = 0x66,
    RXB1CTRL = 0x70,
    RXB1SIDH = 0x71,
    RXB1SIDL = 0x72,
    RXB1EID8 = 0x73,
    RXB1EID0 = 0x74,
    RXB1DLC = 0x75,
    RXB1DATA = 0x76,
}

/// `CANCTRL`: operation mode, transmit abort and clock output control.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanCtrl {
    /// CLKOUT prescaler.
    pub clkpre: ClkPre,
    /// CLKOUT enable.
    pub clken: bool,
    /// One-shot mode.
    pub osm: bool,
    /// Abort all pending transmissions.
    pub abat: bool,
    /// Requested operation mode.
    pub reqop: OpMode,
}

impl CanCtrl {
    /// Mask selecting the `reqop` bits.
    pub const MASK_REQOP: u8 = 0b1110_0000;
    /// Mask selecting the `clkpre` bits.
    pub const MASK_CLKPRE: u8 = 0b0000_0011;
}

/// `CANINTF`: interrupt flags, set by the chip and cleared by the host.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanIntf {
    pub rx0if: bool,
    pub rx1if: bool,
    pub tx0if: bool,
    pub tx1if: bool,
    pub tx2if: bool,
    pub errif: bool,
    pub wakif: bool,
    pub merrf: bool,
}

impl CanIntf {
    pub const MASK_RX0IF: u8 = 0b0000_0001;
    pub const MASK_RX1IF: u8 = 0b0000_0010;
    pub const MASK_TX0IF: u8 = 0b0000_0100;
    pub const MASK_TX1IF: u8 = 0b0000_1000;
    pub const MASK_TX2IF: u8 = 0b0001_0000;
    pub const MASK_ERRIF: u8 = 0b0010_0000;
    pub const MASK_WAKIF: u8 = 0b0100_0000;
    pub const MASK_MERRF: u8 = 0b1000_0000;
}

/// `CANINTE`: interrupt enables, same bit positions as [`CanIntf`].
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanInte {
    pub rx0ie: bool,
    pub rx1ie: bool,
    pub tx0ie: bool,
    pub tx1ie: bool,
    pub tx2ie: bool,
    pub errie: bool,
    pub wakie: bool,
    pub merre: bool,
}

/// `RXB0CTRL`: receive buffer 0 control.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rxb0Ctrl {
    /// Filter hit.
    pub filhit0: bool,
    /// Read-only copy of the BUKT bit (used internally by the MCP2515).
    #[skip(setters)]
    pub bukt1: bool,
    /// Rollover enable.
    pub bukt: bool,
    /// Received remote transfer request.
    #[skip(setters)]
    pub rxrtr: bool,
    #[skip]
    __: B1,
    /// Receive buffer operating mode.
    pub rxm: RecvBufMode,
    #[skip]
    __: B1,
}

/// Reply byte of the READ STATUS instruction: the most frequently polled
/// interrupt and transmit-request bits in one exchange.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickStatus {
    #[skip(setters)]
    pub rx0if: bool,
    #[skip(setters)]
    pub rx1if: bool,
    #[skip(setters)]
    pub tx0req: bool,
    #[skip(setters)]
    pub tx0if: bool,
    #[skip(setters)]
    pub tx1req: bool,
    #[skip(setters)]
    pub tx1if: bool,
    #[skip(setters)]
    pub tx2req: bool,
    #[skip(setters)]
    pub tx2if: bool,
}

/// Receive buffer operating mode (`RXM` bits).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, BitfieldSpecifier)]
#[bits = 2]
pub enum RecvBufMode {
    /// Receive only messages matching the acceptance filters.
    FilterOn = 0x0,
    /// Turn masks/filters off; receive any message.
    FilterOff = 0x3,
}

/// Operation mode (`REQOP`/`OPMOD` bits).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, BitfieldSpecifier)]
#[bits = 3]
pub enum OpMode {
    Normal,
    Sleep,
    Loopback,
    ListenOnly,
    Configuration,
}

/// CLKOUT pin prescaler.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, BitfieldSpecifier)]
#[bits = 2]
pub enum ClkPre {
    Div1,
    Div2,
    Div4,
    Div8,
}
