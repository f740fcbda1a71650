//! Field registry: named, typed telemetry sources.
//!
//! Producers register each data source once at startup and the registry
//! assigns dense, ascending field ids in registration order. Iteration
//! order is registration order is transmission order, stable across
//! calls. The registry has a fixed capacity; registration past it is
//! reported and leaves the registry unmodified, so the offending field is
//! simply never transmitted.
//!
//! Per-field byte costs for both packet kinds are computed at
//! registration and accumulated, giving the emitter exact pre-flight
//! sizes without touching the value closures.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::buffer::PacketBuffer;
use crate::types::{ScalarValue, ValueSource, WireType};
use crate::wire::{self, MAX_VARINT, PackOutcome};
use crate::{EncodeError, Result};

/// Identifier assigned to a field at registration. Dense, 0-based,
/// ascending in registration order, immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(pub u16);

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One registered telemetry source with its precomputed wire costs.
#[derive(Debug)]
pub struct FieldDescriptor {
    id: FieldId,
    name: String,
    source: ValueSource,
    scaled: bool,
    schema_size: usize,
    data_size: usize,
}

impl FieldDescriptor {
    fn new(id: FieldId, name: String, source: ValueSource, scaled: bool) -> Self {
        // id varint + type byte + name + NUL terminator
        let schema_size = wire::varint_size(id.0) + 1 + name.len() + 1;
        // id varint + fixed-width value
        let data_size = wire::varint_size(id.0) + source.wire_type().size();
        Self { id, name, source, scaled, schema_size, data_size }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_type(&self) -> WireType {
        self.source.wire_type()
    }

    /// Whether the schema entry advertises the reduced-scale encoding hint.
    pub fn scaled(&self) -> bool {
        self.scaled
    }

    /// Byte cost of this field's schema packet entry.
    pub fn schema_size(&self) -> usize {
        self.schema_size
    }

    /// Byte cost of this field's data packet entry.
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Read the current value through the source closure.
    pub fn sample(&self) -> ScalarValue {
        self.source.sample()
    }

    /// Append this field's schema entry: id varint, type code byte (top
    /// bit set when scaled), name bytes, NUL terminator.
    pub(crate) fn pack_schema(&self, buf: &mut PacketBuffer) -> PackOutcome {
        if self.schema_size > buf.remaining() {
            return PackOutcome::InsufficientSpace;
        }
        let code = if self.scaled {
            self.wire_type().code() | WireType::SCALED_BIT
        } else {
            self.wire_type().code()
        };
        if pack_schema_entry(buf, self.id, code, &self.name).is_err() {
            return PackOutcome::InsufficientSpace;
        }
        PackOutcome::Packed
    }

    /// Append this field's data entry: id varint, then the value read at
    /// this exact moment.
    pub(crate) fn pack_data(&self, buf: &mut PacketBuffer) -> PackOutcome {
        if self.data_size > buf.remaining() {
            return PackOutcome::InsufficientSpace;
        }
        if wire::pack_varint(buf, self.id.0).and_then(|()| self.sample().pack(buf)).is_err() {
            return PackOutcome::InsufficientSpace;
        }
        PackOutcome::Packed
    }
}

fn pack_schema_entry(buf: &mut PacketBuffer, id: FieldId, code: u8, name: &str) -> Result<()> {
    wire::pack_varint(buf, id.0)?;
    buf.push(code)?;
    buf.extend_from_slice(name.as_bytes())?;
    buf.push(0)
}

/// Ordered, fixed-capacity collection of [`FieldDescriptor`]s.
#[derive(Debug)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    capacity: usize,
    schema_size: usize,
    data_size: usize,
}

impl FieldRegistry {
    /// Create a registry holding at most `capacity` fields. The storage
    /// is allocated once here. Capacities past the varint id range are
    /// clamped so every assigned id stays encodable.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_VARINT as usize + 1);
        Self { fields: Vec::with_capacity(capacity), capacity, schema_size: 0, data_size: 0 }
    }

    /// Register a named source and assign it the next sequential id.
    ///
    /// A full registry is reported and left unmodified; the caller may
    /// ignore the error, in which case the field is excluded from all
    /// future packets.
    pub fn register(&mut self, name: impl Into<String>, source: ValueSource) -> Result<FieldId> {
        self.register_with(name, source, false)
    }

    /// Like [`register`](Self::register), marking the field as eligible
    /// for a reduced-scale encoding on the host side.
    pub fn register_scaled(
        &mut self,
        name: impl Into<String>,
        source: ValueSource,
    ) -> Result<FieldId> {
        self.register_with(name, source, true)
    }

    fn register_with(
        &mut self,
        name: impl Into<String>,
        source: ValueSource,
        scaled: bool,
    ) -> Result<FieldId> {
        let name = name.into();
        if self.fields.len() >= self.capacity {
            warn!(capacity = self.capacity, name = %name, "registry full, field not tracked");
            return Err(EncodeError::RegistryFull { capacity: self.capacity, name });
        }
        let id = FieldId(self.fields.len() as u16);
        let descriptor = FieldDescriptor::new(id, name, source, scaled);
        debug!(
            %id,
            name = %descriptor.name,
            wire_type = ?descriptor.wire_type(),
            "field registered"
        );
        self.schema_size += descriptor.schema_size;
        self.data_size += descriptor.data_size;
        self.fields.push(descriptor);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total byte cost of all schema entries across continuation packets.
    pub fn schema_size(&self) -> usize {
        self.schema_size
    }

    /// Total byte cost of all data entries across continuation packets.
    pub fn data_size(&self) -> usize {
        self.data_size
    }

    pub fn get(&self, id: FieldId) -> Option<&FieldDescriptor> {
        self.fields.get(id.0 as usize)
    }

    /// Registration-order traversal, stable across calls.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
        self.fields.iter()
    }
}
