//! Wire-format type codes for telemetry scalars.

use serde::{Deserialize, Serialize};

/// On-wire representation of a telemetry scalar.
///
/// Each type carries a single ASCII code byte in the schema packet; the
/// data packet then encodes the value at the type's fixed width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireType {
    /// 8-bit signed integer, code `b`
    Int8,
    /// 8-bit unsigned integer, code `B`
    UInt8,
    /// 16-bit signed integer, code `h`
    Int16,
    /// 16-bit unsigned integer, code `H`
    UInt16,
    /// 32-bit signed integer, code `i`
    Int32,
    /// 32-bit unsigned integer, code `I`
    UInt32,
    /// 64-bit signed integer, code `q`
    Int64,
    /// 64-bit unsigned integer, code `Q`
    UInt64,
    /// 32-bit IEEE-754 float, code `f`
    Float32,
    /// 64-bit IEEE-754 float, code `d`
    Float64,
}

impl WireType {
    /// Mask OR'd into the schema code byte when a field is marked scaled.
    pub const SCALED_BIT: u8 = 0x80;

    /// Returns the size in bytes of this type's data encoding.
    pub const fn size(&self) -> usize {
        match self {
            WireType::Int8 | WireType::UInt8 => 1,
            WireType::Int16 | WireType::UInt16 => 2,
            WireType::Int32 | WireType::UInt32 | WireType::Float32 => 4,
            WireType::Int64 | WireType::UInt64 | WireType::Float64 => 8,
        }
    }

    /// The ASCII code byte identifying this type in a schema packet.
    pub const fn code(&self) -> u8 {
        match self {
            WireType::Int8 => b'b',
            WireType::UInt8 => b'B',
            WireType::Int16 => b'h',
            WireType::UInt16 => b'H',
            WireType::Int32 => b'i',
            WireType::UInt32 => b'I',
            WireType::Int64 => b'q',
            WireType::UInt64 => b'Q',
            WireType::Float32 => b'f',
            WireType::Float64 => b'd',
        }
    }

    /// Inverse of [`code`](Self::code), ignoring the scaled bit.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code & !Self::SCALED_BIT {
            b'b' => Some(WireType::Int8),
            b'B' => Some(WireType::UInt8),
            b'h' => Some(WireType::Int16),
            b'H' => Some(WireType::UInt16),
            b'i' => Some(WireType::Int32),
            b'I' => Some(WireType::UInt32),
            b'q' => Some(WireType::Int64),
            b'Q' => Some(WireType::UInt64),
            b'f' => Some(WireType::Float32),
            b'd' => Some(WireType::Float64),
            _ => None,
        }
    }

    /// All supported wire types, in code order.
    pub const ALL: [WireType; 10] = [
        WireType::Int8,
        WireType::UInt8,
        WireType::Int16,
        WireType::UInt16,
        WireType::Int32,
        WireType::UInt32,
        WireType::Int64,
        WireType::UInt64,
        WireType::Float32,
        WireType::Float64,
    ];
}
