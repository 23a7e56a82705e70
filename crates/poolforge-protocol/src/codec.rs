//! Byte encoding for values sent to and read from the allocation service.
//!
//! The allocation service is a Kubernetes-style REST endpoint, so the only
//! implementation today is [`JsonCodec`]. The allocator holds a codec
//! rather than calling `serde_json` directly so its request and response
//! handling stays format-agnostic.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to bytes and decodes them back.
///
/// Codecs live inside the allocator, which is shared across Tokio
/// worker threads, hence `Send + Sync + 'static`.
pub trait Codec: Send + Sync + 'static {
    /// Writes `value` out as bytes.
    ///
    /// # Errors
    /// `ProtocolError::Encode` if the value cannot be represented.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Parses `data` as a `T`.
    ///
    /// # Errors
    /// `ProtocolError::Decode` if `data` is not a valid `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// JSON [`Codec`] over `serde_json`. Requires the `json` feature (on by
/// default).
///
/// ## Example
///
/// ```rust
/// use poolforge_protocol::{Codec, JsonCodec, PoolId, PoolResult};
///
/// let codec = JsonCodec;
/// let result = PoolResult::open(PoolId(7), Vec::new(), 2);
///
/// let bytes = codec.encode(&result).unwrap();
/// let decoded: PoolResult = codec.decode(&bytes).unwrap();
/// assert_eq!(result, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
