//! Vision detection records and their dense wire encoding.
//!
//! A detection's identity travels in a single byte: the object kind in the
//! top 2 bits, the object id in the bottom 6. Geometry and score follow as
//! varints (sensor resolution keeps them small), the angle as a raw
//! float32, and fiducial tags append their four corner points. The whole
//! entry is appended all-or-nothing: the codec sizes the record before
//! touching the buffer, so a failed fit never leaves partial bytes behind.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buffer::PacketBuffer;
use crate::wire::{self, PackOutcome};
use crate::{EncodeError, Result};

/// Kind of a recognized vision object, carried in the top 2 bits of the
/// identifier byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisionKind {
    /// Color-signature blob, tag `00`
    ColorBlob,
    /// Color-code marker, tag `01`
    CodeMarker,
    /// Model-classified object, tag `10`
    ModelObject,
    /// Fiducial (AprilTag-style) tag, tag `11`; carries corner points
    FiducialTag,
}

impl VisionKind {
    /// The 2-bit wire tag, unshifted.
    pub const fn tag_bits(&self) -> u8 {
        match self {
            VisionKind::ColorBlob => 0b00,
            VisionKind::CodeMarker => 0b01,
            VisionKind::ModelObject => 0b10,
            VisionKind::FiducialTag => 0b11,
        }
    }

    /// Convert a raw sensor kind code at the acquisition boundary.
    ///
    /// Sensors can report kinds this wire format cannot express; that is a
    /// per-item condition, so the caller drops the one detection and keeps
    /// the rest of the snapshot.
    pub fn from_raw(code: u8) -> Result<Self> {
        match code {
            0 => Ok(VisionKind::ColorBlob),
            1 => Ok(VisionKind::CodeMarker),
            2 => Ok(VisionKind::ModelObject),
            3 => Ok(VisionKind::FiducialTag),
            _ => {
                warn!(code, "unknown detection kind, item skipped");
                Err(EncodeError::UnknownDetectionKind { code })
            }
        }
    }
}

/// One corner of a fiducial tag's quad, in sensor pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CornerPoint {
    pub x: u16,
    pub y: u16,
}

/// A single recognized object pulled from the vision sensor.
///
/// Geometry is in sensor pixels (320x240 domain), `score` is 0-100,
/// `angle` is degrees normalized to 0-360. `corners` is required exactly
/// when `kind` is [`VisionKind::FiducialTag`]. The `exists` flag mirrors
/// the sensor's slot-validity convention: stale slots stay in the
/// snapshot array and are skipped at emission time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisionDetection {
    pub exists: bool,
    pub kind: VisionKind,
    /// Object id, 0-63. Wider ids are masked to 6 bits.
    pub id: u8,
    pub origin_x: u16,
    pub origin_y: u16,
    pub center_x: u16,
    pub center_y: u16,
    pub width: u16,
    pub height: u16,
    pub score: u16,
    pub angle: f32,
    pub corners: Option<[CornerPoint; 4]>,
}

impl VisionDetection {
    /// Worst-case wire size of one detection: identifier byte, seven
    /// 2-byte varints, float32 angle, eight 2-byte corner varints.
    pub const MAX_WIRE_SIZE: usize = 1 + 7 * 2 + 4 + 8 * 2;

    /// The combined kind+id byte: kind tag in the top 2 bits, id in the
    /// bottom 6.
    pub fn identifier_byte(&self) -> u8 {
        if self.id > 0x3F {
            debug!(id = self.id, "detection id wider than 6 bits, truncated");
        }
        (self.kind.tag_bits() << 6) | (self.id & 0x3F)
    }

    fn varint_fields(&self) -> [u16; 7] {
        [
            self.origin_x,
            self.origin_y,
            self.center_x,
            self.center_y,
            self.width,
            self.height,
            self.score,
        ]
    }

    /// Exact encoded size of this detection, without writing anything.
    pub fn wire_size(&self) -> usize {
        let mut size = 1 + 4;
        for value in self.varint_fields() {
            size += wire::varint_size(value);
        }
        if self.kind == VisionKind::FiducialTag {
            if let Some(corners) = &self.corners {
                for corner in corners {
                    size += wire::varint_size(corner.x) + wire::varint_size(corner.y);
                }
            }
        }
        size
    }

    /// Append this detection's wire entry.
    ///
    /// Returns [`PackOutcome::InsufficientSpace`] exactly when the entry
    /// would exceed the buffer's remaining capacity, checked before any
    /// byte is written. A fiducial record missing its corners, or one
    /// whose geometry escapes the varint domain, is reported and skipped.
    pub fn encode(&self, buf: &mut PacketBuffer) -> PackOutcome {
        if self.kind == VisionKind::FiducialTag && self.corners.is_none() {
            warn!(id = self.id, "fiducial detection without corners, item skipped");
            return PackOutcome::Skipped;
        }
        if self.varint_fields().iter().any(|&v| v > wire::MAX_VARINT)
            || self.corners_out_of_range()
        {
            warn!(id = self.id, "detection geometry out of varint range, item skipped");
            return PackOutcome::Skipped;
        }
        if self.wire_size() > buf.remaining() {
            return PackOutcome::InsufficientSpace;
        }
        // The size check above guarantees every append below fits.
        if self.encode_fields(buf).is_err() {
            return PackOutcome::InsufficientSpace;
        }
        PackOutcome::Packed
    }

    fn corners_out_of_range(&self) -> bool {
        self.kind == VisionKind::FiducialTag
            && self
                .corners
                .iter()
                .flatten()
                .any(|c| c.x > wire::MAX_VARINT || c.y > wire::MAX_VARINT)
    }

    fn encode_fields(&self, buf: &mut PacketBuffer) -> Result<()> {
        buf.push(self.identifier_byte())?;
        for value in self.varint_fields() {
            wire::pack_varint(buf, value)?;
        }
        wire::pack_f32(buf, self.angle)?;
        if self.kind == VisionKind::FiducialTag {
            if let Some(corners) = &self.corners {
                for corner in corners {
                    wire::pack_varint(buf, corner.x)?;
                    wire::pack_varint(buf, corner.y)?;
                }
            }
        }
        Ok(())
    }
}
