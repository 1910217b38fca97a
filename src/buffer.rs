//! Receive and transmit buffer access.

use embedded_can::{ExtendedId, Id, StandardId};
use modular_bitfield::prelude::*;

use crate::{cmd::Command, message::CanMessage, regs::Register};

/// IDE bit of the assembled 32-bit identifier field.
pub const ID_IDE: u32 = 0x0004_0000;
/// SRR bit of the assembled 32-bit identifier field: remote transmission
/// request in standard-frame encoding.
pub const ID_SRR: u32 = 0x0010_0000;

/// Receive buffer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxBuffer {
    Rx0,
    Rx1,
}

impl RxBuffer {
    /// Returns the instruction that reads the buffer's identifier block and
    /// data in one exchange.
    pub const fn read_opcode(self) -> Command {
        match self {
            RxBuffer::Rx0 => Command::ReadRx0Id,
            RxBuffer::Rx1 => Command::ReadRx1Id,
        }
    }

    /// Returns the `DLC` register for the selected buffer.
    pub const fn dlc_register(self) -> Register {
        match self {
            RxBuffer::Rx0 => Register::RXB0DLC,
            RxBuffer::Rx1 => Register::RXB1DLC,
        }
    }
}

/// Transmit buffer selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxBuffer {
    Tx0,
    Tx1,
    Tx2,
}

impl TxBuffer {
    /// Returns the `CTRL` register for the selected buffer, the start of its
    /// contiguous register block.
    pub const fn ctrl_register(self) -> Register {
        match self {
            TxBuffer::Tx0 => Register::TXB0CTRL,
            TxBuffer::Tx1 => Register::TXB1CTRL,
            TxBuffer::Tx2 => Register::TXB2CTRL,
        }
    }

    /// Returns the request-to-send instruction for the selected buffer.
    pub const fn rts_opcode(self) -> Command {
        match self {
            TxBuffer::Tx0 => Command::RtsTx0,
            TxBuffer::Tx1 => Command::RtsTx1,
            TxBuffer::Tx2 => Command::RtsTx2,
        }
    }
}

/// Folds the identifier-block bytes (`SIDH`, `SIDL`, `EID8`, `EID0`) into
/// one big-endian 32-bit word.
#[inline]
pub(crate) fn assemble_id(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Decodes an assembled identifier field into a typed ID and the RTR flag.
///
/// SRR is sampled on the raw word, before any shifting, so remote requests
/// survive the standard-ID extraction. With IDE clear the 11-bit ID occupies
/// the top bits of the word; with IDE set the 29-bit ID is recovered from
/// the SID and EID parts.
pub(crate) fn decode_id(raw: u32) -> (Id, bool) {
    let rtr = raw & ID_SRR != 0;
    let id = if raw & ID_IDE == 0 {
        Id::Standard(StandardId::new((raw >> 21) as u16).unwrap_or(StandardId::MAX))
    } else {
        let eid = ((raw >> 21) & 0x7FF) << 18 | (raw & 0x3_FFFF);
        Id::Extended(ExtendedId::new(eid).unwrap_or(ExtendedId::MAX))
    };
    (id, rtr)
}

/// Transmit identifier block: `SIDH`, `SIDL`, `EID8`, `EID0`, `DLC` in wire
/// order, as loaded contiguously after a buffer's `CTRL` register.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxIdent {
    /// Standard identifier bits 10..3.
    pub sid_high: B8,
    /// Extended identifier bits 17..16.
    pub eid_high: B2,
    #[skip]
    __: B1,
    /// Extended identifier enable.
    pub exide: bool,
    #[skip]
    __: B1,
    /// Standard identifier bits 2..0.
    pub sid_low: B3,
    /// Extended identifier bits 15..8.
    pub eid8: B8,
    /// Extended identifier bits 7..0.
    pub eid0: B8,
    /// Size of the data packet, 0-8.
    pub dlc: B4,
    #[skip]
    __: B2,
    /// Remote transmission request.
    pub rtr: bool,
    #[skip]
    __: B1,
}

impl TxIdent {
    /// Builds the identifier block for a message.
    pub fn from_message(message: &CanMessage) -> Self {
        // In standard mode `exide == false` and the 11-bit ID lands in the
        // SID fields. In extended mode the upper 11 bits go to the SID
        // fields and the lower 18 to the EID fields.
        let mut ident = TxIdent::new()
            .with_dlc(message.dlc)
            .with_rtr(message.rtr);
        match message.id {
            Id::Standard(id) => {
                let raw = id.as_raw();
                ident.set_sid_high((raw >> 3) as u8);
                ident.set_sid_low((raw & 0x07) as u8);
            }
            Id::Extended(id) => {
                let raw = id.as_raw();
                ident.set_exide(true);
                ident.set_sid_high((raw >> 21) as u8);
                ident.set_sid_low(((raw >> 18) & 0x07) as u8);
                ident.set_eid_high(((raw >> 16) & 0x03) as u8);
                ident.set_eid8((raw >> 8) as u8);
                ident.set_eid0(raw as u8);
            }
        }
        ident
    }
}
