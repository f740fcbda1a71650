//! Compact framed binary telemetry encoder for embedded robot controllers.
//!
//! Downlink streams named, typed scalar values and vision-object
//! detections from a constrained device to a host over any byte-oriented
//! transport. The stream is self-describing: a schema packet enumerates
//! field ids, wire types, and names once, and recurring data packets then
//! carry only ids and values.
//!
//! # Features
//!
//! - **No heap growth**: buffers and the field registry are allocated
//!   once at construction and never reallocate
//! - **Self-describing**: hosts need no out-of-band schema
//! - **Compact**: 1-or-2-byte varints for ids and small values, dense
//!   bit-packed vision entries
//! - **Lossless chunking**: a logical packet that outgrows its buffer is
//!   split into continuation packets; items are never dropped silently or
//!   split across payloads
//!
//! # Quick Start
//!
//! ```rust
//! use downlink::{CaptureTransport, EncoderConfig, TelemetryEncoder, ValueSource};
//!
//! fn main() -> downlink::Result<()> {
//!     let mut encoder =
//!         TelemetryEncoder::new(EncoderConfig::default(), CaptureTransport::new())?;
//!
//!     encoder.register("Heading", ValueSource::float32(|| 92.5))?;
//!     encoder.register("DistFront", ValueSource::int16(|| 410))?;
//!
//!     encoder.send_schema()?;
//!     encoder.send_data()?;
//!
//!     assert_eq!(encoder.transport().frames().len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! In production, swap [`CaptureTransport`] for [`StdoutTransport`] or a
//! custom [`Transport`] implementation.

pub mod buffer;
mod config;
mod emitter;
mod error;
mod registry;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod transport;
pub mod types;
pub mod vision;
pub mod wire;

pub use buffer::PacketBuffer;
pub use config::EncoderConfig;
pub use emitter::{Command, EmitSummary, HEADER_LEN, PACKET_MAGIC, TelemetryEncoder};
pub use error::{EncodeError, Result};
pub use registry::{FieldDescriptor, FieldId, FieldRegistry};
pub use transport::{CaptureTransport, StdoutTransport, Transport};
pub use types::{ScalarValue, ValueSource, WireType};
pub use vision::{CornerPoint, VisionDetection, VisionKind};
pub use wire::PackOutcome;
