//! Core types for telemetry scalars.
//!
//! The typed layer maps registered sources onto the wire format:
//! - [`WireType`] enumerates the supported scalar representations with
//!   their ASCII schema codes and fixed data widths
//! - [`ScalarValue`] is the runtime value sampled from a source
//! - [`ValueSource`] is a tagged sum of per-type zero-argument closures,
//!   which keeps heterogeneous registration ergonomic without any
//!   run-time type identification

mod scalar;
mod wire_type;

pub use scalar::{ScalarValue, ValueSource};
pub use wire_type::WireType;
