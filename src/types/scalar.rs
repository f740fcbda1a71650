//! Runtime scalar values and their pull-based sources.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::WireType;
use crate::buffer::PacketBuffer;
use crate::{Result, wire};

/// A telemetry scalar sampled from a value source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Int8(i8),
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
}

impl ScalarValue {
    pub const fn wire_type(&self) -> WireType {
        match self {
            ScalarValue::Int8(_) => WireType::Int8,
            ScalarValue::UInt8(_) => WireType::UInt8,
            ScalarValue::Int16(_) => WireType::Int16,
            ScalarValue::UInt16(_) => WireType::UInt16,
            ScalarValue::Int32(_) => WireType::Int32,
            ScalarValue::UInt32(_) => WireType::UInt32,
            ScalarValue::Int64(_) => WireType::Int64,
            ScalarValue::UInt64(_) => WireType::UInt64,
            ScalarValue::Float32(_) => WireType::Float32,
            ScalarValue::Float64(_) => WireType::Float64,
        }
    }

    /// Append this value at its type's fixed width, big-endian.
    pub fn pack(&self, buf: &mut PacketBuffer) -> Result<()> {
        match *self {
            ScalarValue::Int8(v) => wire::pack_i8(buf, v),
            ScalarValue::UInt8(v) => wire::pack_u8(buf, v),
            ScalarValue::Int16(v) => wire::pack_i16(buf, v),
            ScalarValue::UInt16(v) => wire::pack_u16(buf, v),
            ScalarValue::Int32(v) => wire::pack_i32(buf, v),
            ScalarValue::UInt32(v) => wire::pack_u32(buf, v),
            ScalarValue::Int64(v) => wire::pack_i64(buf, v),
            ScalarValue::UInt64(v) => wire::pack_u64(buf, v),
            ScalarValue::Float32(v) => wire::pack_f32(buf, v),
            ScalarValue::Float64(v) => wire::pack_f64(buf, v),
        }
    }
}

/// A zero-argument getter for one telemetry scalar, tagged by wire type.
///
/// One variant per supported scalar type keeps registration heterogeneous
/// without run-time type identification: the closure is boxed once at
/// registration, and sampling involves a single enum dispatch. Values are
/// pulled synchronously at pack time; the source is never buffered or
/// snapshotted.
pub enum ValueSource {
    Int8(Box<dyn Fn() -> i8>),
    UInt8(Box<dyn Fn() -> u8>),
    Int16(Box<dyn Fn() -> i16>),
    UInt16(Box<dyn Fn() -> u16>),
    Int32(Box<dyn Fn() -> i32>),
    UInt32(Box<dyn Fn() -> u32>),
    Int64(Box<dyn Fn() -> i64>),
    UInt64(Box<dyn Fn() -> u64>),
    Float32(Box<dyn Fn() -> f32>),
    Float64(Box<dyn Fn() -> f64>),
}

impl ValueSource {
    pub fn int8(getter: impl Fn() -> i8 + 'static) -> Self {
        ValueSource::Int8(Box::new(getter))
    }

    pub fn uint8(getter: impl Fn() -> u8 + 'static) -> Self {
        ValueSource::UInt8(Box::new(getter))
    }

    pub fn int16(getter: impl Fn() -> i16 + 'static) -> Self {
        ValueSource::Int16(Box::new(getter))
    }

    pub fn uint16(getter: impl Fn() -> u16 + 'static) -> Self {
        ValueSource::UInt16(Box::new(getter))
    }

    pub fn int32(getter: impl Fn() -> i32 + 'static) -> Self {
        ValueSource::Int32(Box::new(getter))
    }

    pub fn uint32(getter: impl Fn() -> u32 + 'static) -> Self {
        ValueSource::UInt32(Box::new(getter))
    }

    pub fn int64(getter: impl Fn() -> i64 + 'static) -> Self {
        ValueSource::Int64(Box::new(getter))
    }

    pub fn uint64(getter: impl Fn() -> u64 + 'static) -> Self {
        ValueSource::UInt64(Box::new(getter))
    }

    pub fn float32(getter: impl Fn() -> f32 + 'static) -> Self {
        ValueSource::Float32(Box::new(getter))
    }

    pub fn float64(getter: impl Fn() -> f64 + 'static) -> Self {
        ValueSource::Float64(Box::new(getter))
    }

    /// The on-wire type of values this source produces.
    pub const fn wire_type(&self) -> WireType {
        match self {
            ValueSource::Int8(_) => WireType::Int8,
            ValueSource::UInt8(_) => WireType::UInt8,
            ValueSource::Int16(_) => WireType::Int16,
            ValueSource::UInt16(_) => WireType::UInt16,
            ValueSource::Int32(_) => WireType::Int32,
            ValueSource::UInt32(_) => WireType::UInt32,
            ValueSource::Int64(_) => WireType::Int64,
            ValueSource::UInt64(_) => WireType::UInt64,
            ValueSource::Float32(_) => WireType::Float32,
            ValueSource::Float64(_) => WireType::Float64,
        }
    }

    /// Invoke the getter and tag the result.
    pub fn sample(&self) -> ScalarValue {
        match self {
            ValueSource::Int8(f) => ScalarValue::Int8(f()),
            ValueSource::UInt8(f) => ScalarValue::UInt8(f()),
            ValueSource::Int16(f) => ScalarValue::Int16(f()),
            ValueSource::UInt16(f) => ScalarValue::UInt16(f()),
            ValueSource::Int32(f) => ScalarValue::Int32(f()),
            ValueSource::UInt32(f) => ScalarValue::UInt32(f()),
            ValueSource::Int64(f) => ScalarValue::Int64(f()),
            ValueSource::UInt64(f) => ScalarValue::UInt64(f()),
            ValueSource::Float32(f) => ScalarValue::Float32(f()),
            ValueSource::Float64(f) => ScalarValue::Float64(f()),
        }
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ValueSource").field(&self.wire_type()).finish()
    }
}
