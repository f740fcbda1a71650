//! Error types for telemetry encoding.
//!
//! All errors implement the `std::error::Error` trait and carry structured
//! context. The encoder is designed to degrade rather than halt: every
//! condition here either recovers internally (continuation packets), or is
//! reported to the caller while the telemetry stream keeps flowing.
//!
//! ## Error Categories
//!
//! - **Capacity Errors**: an append would exceed a buffer's fixed capacity;
//!   recovered by the continuation-packet protocol
//! - **Range Errors**: a varint input or a packet payload exceeds the
//!   15-bit wire limit
//! - **Detection Errors**: a sensor reported an object kind the wire
//!   format cannot express
//! - **Registry Errors**: field registration past the fixed capacity
//! - **Config Errors**: encoder construction with invalid capacities
//! - **Transport Errors**: the byte sink rejected a completed packet
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use downlink::EncodeError;
//!
//! let error = EncodeError::buffer_full(12, 3);
//! if error.is_retryable() {
//!     // flush the current packet and try again with a fresh buffer
//! }
//! ```

use thiserror::Error;

/// Result type alias for encoding operations.
pub type Result<T, E = EncodeError> = std::result::Result<T, E>;

/// Main error type for telemetry encoding operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("Buffer full: need {needed} bytes, {remaining} remaining")]
    BufferFull { needed: usize, remaining: usize },

    #[error("Value {value} out of varint range (max 32767) in {context}")]
    ValueOutOfRange { value: u32, context: &'static str },

    #[error("Packet payload of {payload_len} bytes exceeds the 15-bit length field")]
    PayloadTooLarge { payload_len: usize },

    #[error("Unknown detection kind code {code:#04x}")]
    UnknownDetectionKind { code: u8 },

    #[error("Field registry full ({capacity} fields): cannot register '{name}'")]
    RegistryFull { capacity: usize, name: String },

    #[error("Invalid encoder configuration: {reason}")]
    Config { reason: String },

    #[error("Transport write failed: {context}")]
    Transport {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl EncodeError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// A full buffer recovers by flushing and starting a continuation
    /// packet; a transport write may succeed on a later cycle. Range,
    /// registry, and configuration errors are domain mistakes that retry
    /// cannot fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            EncodeError::BufferFull { .. } => true,
            EncodeError::Transport { .. } => true,
            EncodeError::ValueOutOfRange { .. } => false,
            EncodeError::PayloadTooLarge { .. } => false,
            EncodeError::UnknownDetectionKind { .. } => false,
            EncodeError::RegistryFull { .. } => false,
            EncodeError::Config { .. } => false,
        }
    }

    /// Helper constructor for capacity failures.
    pub fn buffer_full(needed: usize, remaining: usize) -> Self {
        EncodeError::BufferFull { needed, remaining }
    }

    /// Helper constructor for varint range failures.
    pub fn value_out_of_range(value: u32, context: &'static str) -> Self {
        EncodeError::ValueOutOfRange { value, context }
    }

    /// Helper constructor for configuration failures.
    pub fn config(reason: impl Into<String>) -> Self {
        EncodeError::Config { reason: reason.into() }
    }

    /// Helper constructor for transport failures with context.
    pub fn transport(context: impl Into<String>, source: std::io::Error) -> Self {
        EncodeError::Transport { context: context.into(), source }
    }
}

impl From<std::io::Error> for EncodeError {
    fn from(err: std::io::Error) -> Self {
        EncodeError::Transport { context: "packet write".to_string(), source: err }
    }
}
