//! MCP2515 SPI instruction set.

/// SPI instruction opcodes.
///
/// `Write`/`Read`/`BitModify` take a register address byte next on the wire.
/// The `LoadTx*`/`ReadRx*` instructions address a buffer block directly and
/// skip the address byte; the `RtsTx*` opcodes fold the buffer select into
/// the low bits of `Rts`.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Write = 0x02,
    Read = 0x03,
    BitModify = 0x05,
    LoadTx0Id = 0x40,
    LoadTx0Data = 0x41,
    LoadTx1Id = 0x42,
    LoadTx1Data = 0x43,
    LoadTx2Id = 0x44,
    LoadTx2Data = 0x45,
    Rts = 0x80,
    RtsTx0 = 0x81,
    RtsTx1 = 0x82,
    RtsTx2 = 0x84,
    ReadRx0Id = 0x90,
    ReadRx0Data = 0x92,
    ReadRx1Id = 0x94,
    ReadRx1Data = 0x96,
    ReadStatus = 0xA0,
    RxStatus = 0xB0,
    Reset = 0xC0,
}
