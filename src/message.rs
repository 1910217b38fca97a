//! CAN message model.

use embedded_can::{Frame, Id};

/// One CAN frame, detached from any driver buffer.
///
/// Identifiers are typed through [`embedded_can::Id`]; payloads are 0 to 8
/// bytes. Values handed to a listener share no storage with the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanMessage {
    /// Frame identifier.
    pub(crate) id: Id,
    /// Whether the frame is a remote transmission request.
    pub(crate) rtr: bool,
    /// Length of data in the frame.
    pub(crate) dlc: u8,
    /// Data, maximum 8 bytes.
    pub(crate) data: [u8; 8],
}

impl CanMessage {
    /// Creates a data frame. Returns `None` if `data` exceeds 8 bytes.
    pub fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > 8 {
            return None;
        }
        let mut message = CanMessage {
            id: id.into(),
            rtr: false,
            dlc: data.len() as u8, // Already asserted data.len() <= 8
            data: [0; 8],
        };
        message.data[..data.len()].copy_from_slice(data);
        Some(message)
    }

    /// Creates a remote transmission request. Returns `None` if `dlc`
    /// exceeds 8.
    pub fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > 8 {
            return None;
        }
        Some(CanMessage {
            id: id.into(),
            rtr: true,
            dlc: dlc as u8, // Already asserted dlc <= 8
            data: [0; 8],
        })
    }

    /// Frame identifier.
    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Identifier as a plain number: 11 bits for standard frames, 29 bits
    /// for extended ones.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    /// Whether the frame carries an extended (29-bit) identifier.
    #[inline]
    pub fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    /// Whether the frame is a remote transmission request.
    ///
    /// On received frames this reflects the SRR bit of the raw identifier
    /// field and is meaningful for standard-frame encoding only.
    #[inline]
    pub fn is_remote_request(&self) -> bool {
        self.rtr
    }

    /// Number of data bytes.
    #[inline]
    pub fn dlc(&self) -> usize {
        self.dlc as usize
    }

    /// Payload, trimmed to the DLC.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.dlc()]
    }
}

impl Frame for CanMessage {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        CanMessage::new(id, data)
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        CanMessage::new_remote(id, dlc)
    }

    #[inline]
    fn is_extended(&self) -> bool {
        CanMessage::is_extended(self)
    }

    #[inline]
    fn is_remote_frame(&self) -> bool {
        self.rtr
    }

    #[inline]
    fn id(&self) -> Id {
        self.id
    }

    #[inline]
    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    #[inline]
    fn data(&self) -> &[u8] {
        CanMessage::data(self)
    }
}
