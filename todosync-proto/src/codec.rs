//! JSON encoding and decoding for collection payloads.
//!
//! The remote collection speaks plain JSON. These helpers keep the
//! `serde_json` error surface out of the callers and give them a single
//! [`CodecError`] to map.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization of a request body failed.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A response body was not the expected JSON shape.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Encodes a request body as JSON bytes.
///
/// # Errors
///
/// Returns `CodecError::Serialization` if the value cannot be serialized.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    serde_json::to_vec(value).map_err(|e| CodecError::Serialization(e.to_string()))
}

/// Decodes a JSON response body.
///
/// # Errors
///
/// Returns `CodecError::Malformed` if the bytes are not valid JSON for `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
}
