//! Packet framing and the chunked emission state machine.
//!
//! Every packet kind shares one frame and one algorithm. A frame is:
//!
//! ```text
//! Magic(0xC0 0xDE)  Command(1)  Length(2, top bit set, big-endian)  Payload
//! ```
//!
//! and an emission cycle runs `prepare -> pack items -> backpatch ->
//! flush`. When an item does not fit in the buffer's remaining capacity,
//! the current packet is finished and flushed as-is, a **continuation
//! packet** with the same command is prepared in the same buffer, and the
//! item is retried. An item that cannot fit even in a fresh buffer is
//! dropped for the cycle and reported; nothing is ever silently lost or
//! split across two payloads.
//!
//! For a fixed registry (or detection set) and buffer capacity, the
//! number of packets and the position of every chunk boundary are
//! deterministic.
//!
//! [`TelemetryEncoder`] owns the registry, one buffer per channel, and
//! the transport. It is constructed once and passed around explicitly;
//! there is no process-global encoder state.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buffer::PacketBuffer;
use crate::config::EncoderConfig;
use crate::registry::{FieldId, FieldRegistry};
use crate::transport::Transport;
use crate::types::ValueSource;
use crate::vision::VisionDetection;
use crate::wire::{self, PackOutcome};
use crate::Result;

/// Two-byte marker opening every packet.
pub const PACKET_MAGIC: [u8; 2] = [0xC0, 0xDE];

/// Frame bytes before the payload: magic, command, length field.
pub const HEADER_LEN: usize = 5;

/// Offset of the 2-byte length field within a frame.
const LENGTH_OFFSET: usize = 3;

/// Framing command identifying a packet's payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Schema packet: field ids, wire-type codes, and names.
    Schema,
    /// Structured-data packet: field ids and current values.
    Data,
    /// Vision-data packet: packed object detections.
    Vision,
}

impl Command {
    /// The command byte on the wire.
    pub const fn byte(&self) -> u8 {
        match self {
            Command::Schema => 0x46,
            Command::Data => 0x44,
            Command::Vision => 0x49,
        }
    }
}

/// Accounting for one emission cycle.
///
/// `oversized` and `skipped` are the observable data-loss conditions: an
/// oversized item exceeded a whole buffer, a skipped item was invalid on
/// its own. Both are also logged at the point of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmitSummary {
    /// Packets flushed to the transport, continuations included.
    pub packets: usize,
    /// Items fully packed.
    pub items: usize,
    /// Items rejected on their own merits.
    pub skipped: usize,
    /// Items larger than a whole buffer, dropped for this cycle.
    pub oversized: usize,
}

/// The telemetry encoder: field registry, channel buffers, transport.
///
/// One instance per process, constructed once at startup. The scalar and
/// vision channels keep separate buffers so a large vision snapshot never
/// forces continuation packets onto the scalar stream.
#[derive(Debug)]
pub struct TelemetryEncoder<T: Transport> {
    registry: FieldRegistry,
    telemetry: PacketBuffer,
    vision: PacketBuffer,
    transport: T,
}

impl<T: Transport> TelemetryEncoder<T> {
    /// Build an encoder, performing every allocation it will ever make.
    pub fn new(config: EncoderConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: FieldRegistry::with_capacity(config.max_fields),
            telemetry: PacketBuffer::with_capacity(config.telemetry_capacity),
            vision: PacketBuffer::with_capacity(config.vision_capacity),
            transport,
        })
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Register a named source. See [`FieldRegistry::register`].
    pub fn register(&mut self, name: impl Into<String>, source: ValueSource) -> Result<FieldId> {
        self.registry.register(name, source)
    }

    /// Register a source marked with the reduced-scale encoding hint.
    pub fn register_scaled(
        &mut self,
        name: impl Into<String>,
        source: ValueSource,
    ) -> Result<FieldId> {
        self.registry.register_scaled(name, source)
    }

    /// Emit the schema packet(s) describing every registered field.
    ///
    /// Byte-identical across calls for an unchanged registry, so it can
    /// be re-sent periodically for late-joining hosts.
    pub fn send_schema(&mut self) -> Result<EmitSummary> {
        emit_items(
            &mut self.telemetry,
            &mut self.transport,
            Command::Schema,
            self.registry.iter(),
            |buf, field| field.pack_schema(buf),
        )
    }

    /// Emit a structured-data packet cycle with current values.
    ///
    /// Each field's closure is invoked at the moment the field is packed;
    /// there is no snapshot barrier across fields, so values within one
    /// cycle reflect the instant each was read.
    pub fn send_data(&mut self) -> Result<EmitSummary> {
        emit_items(
            &mut self.telemetry,
            &mut self.transport,
            Command::Data,
            self.registry.iter(),
            |buf, field| field.pack_data(buf),
        )
    }

    /// Emit the current vision snapshot on the vision channel.
    ///
    /// Stale sensor slots (`exists == false`) are filtered out before
    /// packing, mirroring the sensor's slot-validity convention.
    pub fn send_detections(&mut self, detections: &[VisionDetection]) -> Result<EmitSummary> {
        emit_items(
            &mut self.vision,
            &mut self.transport,
            Command::Vision,
            detections.iter().filter(|d| d.exists),
            |buf, detection| detection.encode(buf),
        )
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// Clear the buffer and write the frame header with a length placeholder.
fn prepare(buf: &mut PacketBuffer, command: Command) -> Result<()> {
    buf.clear();
    buf.extend_from_slice(&PACKET_MAGIC)?;
    buf.push(command.byte())?;
    buf.extend_from_slice(&[0, 0])?;
    Ok(())
}

/// Backpatch the length field and hand the finished frame to the
/// transport. A packet whose length cannot be patched is never written.
fn flush<T: Transport>(buf: &mut PacketBuffer, transport: &mut T, command: Command) -> Result<()> {
    wire::patch_length(buf, LENGTH_OFFSET)?;
    transport.write_packet(buf.as_slice())?;
    debug!(command = ?command, len = buf.len(), "packet flushed");
    Ok(())
}

/// The shared chunking loop over any item sequence and packer.
fn emit_items<T, I, F>(
    buf: &mut PacketBuffer,
    transport: &mut T,
    command: Command,
    items: I,
    mut pack: F,
) -> Result<EmitSummary>
where
    T: Transport,
    I: IntoIterator,
    I::Item: Copy,
    F: FnMut(&mut PacketBuffer, I::Item) -> PackOutcome,
{
    let mut summary = EmitSummary::default();
    prepare(buf, command)?;
    for item in items {
        match pack(buf, item) {
            PackOutcome::Packed => summary.items += 1,
            PackOutcome::Skipped => summary.skipped += 1,
            PackOutcome::InsufficientSpace => {
                flush(buf, transport, command)?;
                summary.packets += 1;
                prepare(buf, command)?;
                // Same item, fresh buffer
                match pack(buf, item) {
                    PackOutcome::Packed => summary.items += 1,
                    PackOutcome::Skipped => summary.skipped += 1,
                    PackOutcome::InsufficientSpace => {
                        warn!(
                            command = ?command,
                            capacity = buf.capacity(),
                            "item larger than a whole buffer, dropped"
                        );
                        summary.oversized += 1;
                    }
                }
            }
        }
    }
    flush(buf, transport, command)?;
    summary.packets += 1;
    Ok(summary)
}
