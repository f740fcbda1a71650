//! Primitive wire encoding.
//!
//! Stateless packing routines for the telemetry wire format. Everything is
//! big-endian; floats go out as their raw IEEE-754 bit pattern, never as
//! text.
//!
//! ## Varint
//!
//! Small non-negative integers dominate the stream (field ids, pixel
//! coordinates, confidence scores), so they use a 1-or-2-byte encoding:
//!
//! - `0..=127` — one byte, top bit clear
//! - `128..=32767` — two bytes big-endian, value OR'd with `0x8000` so the
//!   top bit of the first byte is set
//!
//! The top bit is the decode-time discriminator, which is also why the
//! packet length field is always written with its top bit forced set:
//! a length field can never be confused with a 1-byte varint.
//!
//! ## Backpatching
//!
//! Packet headers are written with a 2-byte length placeholder before the
//! payload size is known. [`patch_length`] overwrites the placeholder at a
//! remembered offset once the payload is complete. This is a deliberate
//! two-phase protocol: reserve, remember the offset, overwrite later.

use crate::buffer::PacketBuffer;
use crate::{EncodeError, Result};
use tracing::warn;

/// Largest value the variable-length integer encoding can carry.
pub const MAX_VARINT: u16 = 0x7FFF;

/// Largest payload the 15-bit packet length field can describe.
pub const MAX_PAYLOAD_LEN: usize = 0x7FFF;

/// Width of the packet length field.
pub const LENGTH_FIELD_SIZE: usize = 2;

/// Result of attempting to pack one item into a bounded buffer.
///
/// `InsufficientSpace` is not an error: the packet emitter reacts by
/// flushing the current packet and retrying the item in a fresh one.
/// `Skipped` marks an item that is invalid on its own (and was reported)
/// without affecting the rest of the packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackOutcome {
    /// Item fully appended.
    Packed,
    /// Item would not fit in the buffer's remaining capacity; nothing was
    /// written.
    InsufficientSpace,
    /// Item rejected on its own merits; nothing was written.
    Skipped,
}

pub fn pack_u8(buf: &mut PacketBuffer, value: u8) -> Result<()> {
    buf.push(value)
}

pub fn pack_i8(buf: &mut PacketBuffer, value: i8) -> Result<()> {
    buf.push(value as u8)
}

pub fn pack_u16(buf: &mut PacketBuffer, value: u16) -> Result<()> {
    buf.extend_from_slice(&value.to_be_bytes())
}

pub fn pack_i16(buf: &mut PacketBuffer, value: i16) -> Result<()> {
    buf.extend_from_slice(&value.to_be_bytes())
}

pub fn pack_u32(buf: &mut PacketBuffer, value: u32) -> Result<()> {
    buf.extend_from_slice(&value.to_be_bytes())
}

pub fn pack_i32(buf: &mut PacketBuffer, value: i32) -> Result<()> {
    buf.extend_from_slice(&value.to_be_bytes())
}

pub fn pack_u64(buf: &mut PacketBuffer, value: u64) -> Result<()> {
    buf.extend_from_slice(&value.to_be_bytes())
}

pub fn pack_i64(buf: &mut PacketBuffer, value: i64) -> Result<()> {
    buf.extend_from_slice(&value.to_be_bytes())
}

/// Append a float as its big-endian bit pattern.
pub fn pack_f32(buf: &mut PacketBuffer, value: f32) -> Result<()> {
    pack_u32(buf, value.to_bits())
}

pub fn pack_f64(buf: &mut PacketBuffer, value: f64) -> Result<()> {
    pack_u64(buf, value.to_bits())
}

/// Append a variable-length integer.
///
/// Values past [`MAX_VARINT`] are reported and nothing is appended; the
/// caller is expected to keep its domain inside 15 bits.
pub fn pack_varint(buf: &mut PacketBuffer, value: u16) -> Result<()> {
    if value < 0x80 {
        return buf.push(value as u8);
    }
    if value <= MAX_VARINT {
        return pack_u16(buf, value | 0x8000);
    }
    warn!(value, "value too large for varint encoding, dropped");
    Err(EncodeError::value_out_of_range(value as u32, "varint"))
}

/// Encoded width of `value` as a varint, without writing anything.
pub const fn varint_size(value: u16) -> usize {
    if value < 0x80 { 1 } else { 2 }
}

/// Backpatch the 2-byte length field at `header_offset`.
///
/// The payload is everything written after the length field. Its size is
/// encoded big-endian with the top bit of the first byte forced set. A
/// payload past [`MAX_PAYLOAD_LEN`] is reported and the placeholder bytes
/// are left unpatched; such a packet must not be sent. The emitter upholds
/// this by sizing its buffers below the threshold.
pub fn patch_length(buf: &mut PacketBuffer, header_offset: usize) -> Result<()> {
    let payload_len = buf.len() - header_offset - LENGTH_FIELD_SIZE;
    if payload_len > MAX_PAYLOAD_LEN {
        warn!(payload_len, "payload too large for length field, packet left unpatched");
        return Err(EncodeError::PayloadTooLarge { payload_len });
    }
    buf.overwrite(header_offset, &((payload_len as u16) | 0x8000).to_be_bytes())
}
