use embedded_can::{ExtendedId, Frame, Id, StandardId};

use crate::message::CanMessage;

#[test]
fn data_frame_holds_payload() {
    let id = StandardId::new(0x042).unwrap();
    let message = CanMessage::new(id, &[1, 2, 3]).unwrap();

    assert_eq!(Id::Standard(id), message.id());
    assert_eq!(0x042, message.raw_id());
    assert!(!message.is_extended());
    assert!(!message.is_remote_request());
    assert_eq!(3, message.dlc());
    assert_eq!(&[1, 2, 3], message.data());
}

#[test]
fn payload_above_8_bytes_is_rejected() {
    let id = StandardId::new(0x042).unwrap();
    assert!(CanMessage::new(id, &[0; 9]).is_none());
    assert!(CanMessage::new_remote(id, 9).is_none());

    assert!(CanMessage::new(id, &[0; 8]).is_some());
    assert!(CanMessage::new_remote(id, 8).is_some());
}

#[test]
fn remote_frame_has_empty_payload() {
    let id = StandardId::new(0x100).unwrap();
    let message = CanMessage::new_remote(id, 4).unwrap();

    assert!(message.is_remote_request());
    assert_eq!(4, message.dlc());
    assert_eq!(&[0, 0, 0, 0], message.data());
}

#[test]
fn extended_frame_reports_29_bit_id() {
    let id = ExtendedId::new(0x14C9_2A2B).unwrap();
    let message = CanMessage::new(id, &[]).unwrap();

    assert!(message.is_extended());
    assert_eq!(0x14C9_2A2B, message.raw_id());
    assert_eq!(0, message.dlc());
}

#[test]
fn frame_trait_mirrors_inherent_accessors() {
    let id = StandardId::new(0x7FF).unwrap();
    let message = <CanMessage as Frame>::new(id, &[0xAA]).unwrap();

    assert_eq!(Id::Standard(id), Frame::id(&message));
    assert!(!Frame::is_remote_frame(&message));
    assert_eq!(1, Frame::dlc(&message));
    assert_eq!(&[0xAA], Frame::data(&message));

    let remote = <CanMessage as Frame>::new_remote(id, 2).unwrap();
    assert!(Frame::is_remote_frame(&remote));
}
