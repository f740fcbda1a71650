//! Transport boundary for completed packets.
//!
//! The encoder hands every finished frame (header plus payload) to a
//! [`Transport`]. This is the only blocking call in an emission cycle;
//! latency and failure semantics belong to the implementation. The core
//! ships a buffered standard-output transport, matching the original
//! deployment where the host tails the device's stdout stream, and an
//! in-memory capture transport for tests and benches.

use std::io::{self, Write};

use tracing::trace;

use crate::Result;

/// Byte sink for completed packets.
pub trait Transport {
    /// Write one complete frame. Called only with fully built, length-
    /// patched packets, never with partial data.
    fn write_packet(&mut self, frame: &[u8]) -> Result<()>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_packet(&mut self, frame: &[u8]) -> Result<()> {
        (**self).write_packet(frame)
    }
}

/// Streams packets to standard output, flushing after every frame so the
/// host sees a packet as soon as it is complete.
#[derive(Debug)]
pub struct StdoutTransport {
    out: io::Stdout,
}

impl StdoutTransport {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Transport for StdoutTransport {
    fn write_packet(&mut self, frame: &[u8]) -> Result<()> {
        let mut handle = self.out.lock();
        handle.write_all(frame)?;
        handle.flush()?;
        trace!(len = frame.len(), "packet written to stdout");
        Ok(())
    }
}

/// Records every frame in memory. Used by tests and benches to assert on
/// exact packet boundaries and bytes.
#[derive(Debug, Default)]
pub struct CaptureTransport {
    frames: Vec<Vec<u8>>,
}

impl CaptureTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames in write order.
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Transport for CaptureTransport {
    fn write_packet(&mut self, frame: &[u8]) -> Result<()> {
        self.frames.push(frame.to_vec());
        Ok(())
    }
}
