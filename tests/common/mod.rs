//! Symmetric decoder used only by tests.
//!
//! Production scope is encode-only; these helpers exist so the tests can
//! assert round-trips and chunk boundaries against the wire format
//! itself rather than against the encoder's own internals.

use std::collections::HashMap;

use downlink::{ScalarValue, WireType};

pub const HEADER_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub command: u8,
    pub payload: Vec<u8>,
}

/// Parse one framed packet, validating magic, command placement, and the
/// top-bit-set length field.
pub fn parse_frame(frame: &[u8]) -> Packet {
    assert!(frame.len() >= HEADER_LEN, "frame shorter than header: {frame:?}");
    assert_eq!(&frame[..2], &[0xC0, 0xDE], "bad magic in {frame:?}");
    let raw_len = u16::from_be_bytes([frame[3], frame[4]]);
    assert_eq!(raw_len & 0x8000, 0x8000, "length field top bit not set");
    let payload_len = (raw_len & 0x7FFF) as usize;
    assert_eq!(frame.len(), HEADER_LEN + payload_len, "length field mismatch");
    Packet { command: frame[2], payload: frame[HEADER_LEN..].to_vec() }
}

/// Decode a varint at `*pos`, advancing past it.
pub fn read_varint(bytes: &[u8], pos: &mut usize) -> u16 {
    let first = bytes[*pos];
    if first & 0x80 == 0 {
        *pos += 1;
        first as u16
    } else {
        let value = u16::from_be_bytes([bytes[*pos], bytes[*pos + 1]]) & 0x7FFF;
        *pos += 2;
        value
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub id: u16,
    pub wire_type: WireType,
    pub scaled: bool,
    pub name: String,
}

pub fn parse_schema(payload: &[u8]) -> Vec<SchemaEntry> {
    let mut entries = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let id = read_varint(payload, &mut pos);
        let code = payload[pos];
        pos += 1;
        let wire_type = WireType::from_code(code)
            .unwrap_or_else(|| panic!("unknown type code {code:#04x} for field {id}"));
        let scaled = code & WireType::SCALED_BIT != 0;
        let nul = payload[pos..]
            .iter()
            .position(|&b| b == 0)
            .unwrap_or_else(|| panic!("unterminated name for field {id}"));
        let name = String::from_utf8(payload[pos..pos + nul].to_vec()).expect("non-UTF8 name");
        pos += nul + 1;
        entries.push(SchemaEntry { id, wire_type, scaled, name });
    }
    entries
}

fn take<const N: usize>(payload: &[u8], pos: &mut usize) -> [u8; N] {
    let bytes: [u8; N] = payload[*pos..*pos + N].try_into().unwrap();
    *pos += N;
    bytes
}

/// Decode data entries given the id-to-type mapping from a schema packet.
pub fn parse_data(payload: &[u8], types: &HashMap<u16, WireType>) -> Vec<(u16, ScalarValue)> {
    let mut entries = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let id = read_varint(payload, &mut pos);
        let wire_type = *types.get(&id).unwrap_or_else(|| panic!("data entry for unknown id {id}"));
        let value = match wire_type {
            WireType::Int8 => ScalarValue::Int8(take::<1>(payload, &mut pos)[0] as i8),
            WireType::UInt8 => ScalarValue::UInt8(take::<1>(payload, &mut pos)[0]),
            WireType::Int16 => ScalarValue::Int16(i16::from_be_bytes(take(payload, &mut pos))),
            WireType::UInt16 => ScalarValue::UInt16(u16::from_be_bytes(take(payload, &mut pos))),
            WireType::Int32 => ScalarValue::Int32(i32::from_be_bytes(take(payload, &mut pos))),
            WireType::UInt32 => ScalarValue::UInt32(u32::from_be_bytes(take(payload, &mut pos))),
            WireType::Int64 => ScalarValue::Int64(i64::from_be_bytes(take(payload, &mut pos))),
            WireType::UInt64 => ScalarValue::UInt64(u64::from_be_bytes(take(payload, &mut pos))),
            WireType::Float32 => {
                ScalarValue::Float32(f32::from_be_bytes(take(payload, &mut pos)))
            }
            WireType::Float64 => {
                ScalarValue::Float64(f64::from_be_bytes(take(payload, &mut pos)))
            }
        };
        entries.push((id, value));
    }
    entries
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDetection {
    pub kind_tag: u8,
    pub id: u8,
    pub origin: (u16, u16),
    pub center: (u16, u16),
    pub size: (u16, u16),
    pub score: u16,
    pub angle: f32,
    pub corners: Option<[(u16, u16); 4]>,
}

pub fn parse_vision(payload: &[u8]) -> Vec<ParsedDetection> {
    let mut detections = Vec::new();
    let mut pos = 0;
    while pos < payload.len() {
        let identifier = payload[pos];
        pos += 1;
        let kind_tag = identifier >> 6;
        let id = identifier & 0x3F;
        let origin = (read_varint(payload, &mut pos), read_varint(payload, &mut pos));
        let center = (read_varint(payload, &mut pos), read_varint(payload, &mut pos));
        let size = (read_varint(payload, &mut pos), read_varint(payload, &mut pos));
        let score = read_varint(payload, &mut pos);
        let angle = f32::from_be_bytes(take(payload, &mut pos));
        let corners = (kind_tag == 0b11).then(|| {
            [(); 4].map(|()| (read_varint(payload, &mut pos), read_varint(payload, &mut pos)))
        });
        detections.push(ParsedDetection { kind_tag, id, origin, center, size, score, angle, corners });
    }
    detections
}
