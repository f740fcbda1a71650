//! Encoder configuration.

use serde::{Deserialize, Serialize};

use crate::emitter::HEADER_LEN;
use crate::vision::VisionDetection;
use crate::wire::{MAX_PAYLOAD_LEN, MAX_VARINT};
use crate::{EncodeError, Result};

/// Capacities for the encoder's fixed allocations.
///
/// Everything here is sized once at construction; nothing grows
/// afterwards. The defaults mirror a small embedded deployment: a scalar
/// channel of 104 bytes, a vision channel holding a full 24-object sensor
/// snapshot at worst-case entry size, and room for 50 registered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Capacity in bytes of the scalar telemetry channel buffer.
    pub telemetry_capacity: usize,
    /// Capacity in bytes of the vision channel buffer.
    pub vision_capacity: usize,
    /// Maximum number of registered fields.
    pub max_fields: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            telemetry_capacity: 104,
            vision_capacity: 24 * VisionDetection::MAX_WIRE_SIZE,
            max_fields: 50,
        }
    }
}

impl EncoderConfig {
    /// Check the capacities against the wire format's structural limits.
    ///
    /// Each channel buffer must hold a packet header plus at least one
    /// byte of payload, and must stay small enough that a full buffer's
    /// payload is always representable in the 15-bit length field. That
    /// upper bound is what makes the emitter's backpatch infallible.
    pub fn validate(&self) -> Result<()> {
        for (label, capacity) in
            [("telemetry", self.telemetry_capacity), ("vision", self.vision_capacity)]
        {
            if capacity <= HEADER_LEN {
                return Err(EncodeError::config(format!(
                    "{label} capacity {capacity} cannot hold a packet header"
                )));
            }
            if capacity > HEADER_LEN + MAX_PAYLOAD_LEN {
                return Err(EncodeError::config(format!(
                    "{label} capacity {capacity} exceeds the maximum framed payload"
                )));
            }
        }
        if self.max_fields == 0 {
            return Err(EncodeError::config("registry capacity must be at least 1"));
        }
        if self.max_fields > MAX_VARINT as usize + 1 {
            return Err(EncodeError::config(format!(
                "registry capacity {} exceeds the varint id range",
                self.max_fields
            )));
        }
        Ok(())
    }
}
