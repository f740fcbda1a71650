//! Fixed-capacity packet buffer.
//!
//! [`PacketBuffer`] is an append-only byte sequence over storage allocated
//! once at construction. It never reallocates: an append that would exceed
//! capacity fails without touching the contents, which is what lets the
//! packet emitter treat "buffer full" as a recoverable signal rather than
//! an error. `clear()` resets the length between packets while the storage
//! lives for the encoder's lifetime.

use crate::{EncodeError, Result};

/// Append-only byte buffer with a capacity fixed at construction.
#[derive(Debug)]
pub struct PacketBuffer {
    storage: Box<[u8]>,
    len: usize,
}

impl PacketBuffer {
    /// Allocate a buffer of exactly `capacity` bytes. This is the only
    /// allocation the buffer ever performs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { storage: vec![0u8; capacity].into_boxed_slice(), len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes still available before the buffer is full.
    pub fn remaining(&self) -> usize {
        self.capacity() - self.len
    }

    /// Reset length to zero. Storage is retained.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The written portion of the buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// Append a single byte.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len >= self.capacity() {
            return Err(EncodeError::buffer_full(1, 0));
        }
        self.storage[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    /// Append a byte slice. On failure nothing is written.
    pub fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.remaining() {
            return Err(EncodeError::buffer_full(bytes.len(), self.remaining()));
        }
        self.storage[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
        Ok(())
    }

    /// Overwrite already-written bytes at `offset`. Used to backpatch the
    /// packet length field once the payload size is known.
    pub(crate) fn overwrite(&mut self, offset: usize, bytes: &[u8]) -> Result<()> {
        let end = offset + bytes.len();
        if end > self.len {
            return Err(EncodeError::buffer_full(end, self.len));
        }
        self.storage[offset..end].copy_from_slice(bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn append_within_capacity() {
        let mut buf = PacketBuffer::with_capacity(4);
        assert!(buf.is_empty());
        buf.push(0xC0).unwrap();
        buf.extend_from_slice(&[0xDE, 0x46]).unwrap();
        assert_eq!(buf.as_slice(), &[0xC0, 0xDE, 0x46]);
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn append_past_capacity_is_rejected_and_leaves_contents() {
        let mut buf = PacketBuffer::with_capacity(3);
        buf.extend_from_slice(&[1, 2]).unwrap();

        let err = buf.extend_from_slice(&[3, 4]).unwrap_err();
        assert!(matches!(err, EncodeError::BufferFull { needed: 2, remaining: 1 }));
        // Failed append writes nothing, not even the part that would fit
        assert_eq!(buf.as_slice(), &[1, 2]);

        buf.push(3).unwrap();
        assert!(buf.push(4).is_err());
        assert_eq!(buf.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn clear_resets_length_only() {
        let mut buf = PacketBuffer::with_capacity(8);
        buf.extend_from_slice(&[1, 2, 3]).unwrap();
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), 8);
        buf.extend_from_slice(&[9]).unwrap();
        assert_eq!(buf.as_slice(), &[9]);
    }

    #[test]
    fn overwrite_patches_written_bytes() {
        let mut buf = PacketBuffer::with_capacity(8);
        buf.extend_from_slice(&[0, 0, 0, 0]).unwrap();
        buf.overwrite(1, &[0xAB, 0xCD]).unwrap();
        assert_eq!(buf.as_slice(), &[0, 0xAB, 0xCD, 0]);
    }

    #[test]
    fn overwrite_past_written_region_is_rejected() {
        let mut buf = PacketBuffer::with_capacity(8);
        buf.extend_from_slice(&[0, 0]).unwrap();
        assert!(buf.overwrite(1, &[1, 2]).is_err());
        assert_eq!(buf.as_slice(), &[0, 0]);
    }

    proptest! {
        #[test]
        fn length_never_exceeds_capacity(
            capacity in 0usize..64,
            writes in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..16), 0..16)
        ) {
            let mut buf = PacketBuffer::with_capacity(capacity);
            for chunk in &writes {
                let before = buf.len();
                match buf.extend_from_slice(chunk) {
                    Ok(()) => prop_assert_eq!(buf.len(), before + chunk.len()),
                    Err(_) => prop_assert_eq!(buf.len(), before),
                }
                prop_assert!(buf.len() <= buf.capacity());
            }
        }
    }
}
