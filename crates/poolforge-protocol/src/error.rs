//! Error types for the protocol layer.
//!
//! Each crate in Poolforge defines its own error enum. When you see a
//! `ProtocolError`, the problem is in serialization/deserialization, not
//! in pool bookkeeping or the allocation service.

/// Failures while converting values to or from bytes.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A value could not be written out.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Bytes did not parse as the expected shape: bad JSON, a missing
    /// field, or a body cut short.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}
