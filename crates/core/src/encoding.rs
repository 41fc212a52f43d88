//! Canonical byte encoding of ledger values.
//!
//! The fee of a transaction is a function of its encoded length, so the
//! encoder must be deterministic: one logical value, one byte string.

use bincode::Options;
use serde::Serialize;
use thiserror::Error;

/// Errors reported by an [`Encoder`].
#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("encoder backend failed: {0}")]
    Backend(String),
}

/// A deterministic, canonical encoder.
pub trait Encoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodingError>;

    /// Length of the encoding of `value`.
    fn encoded_len<T: Serialize + ?Sized>(&self, value: &T) -> Result<usize, EncodingError> {
        self.encode(value).map(|bytes| bytes.len())
    }
}

/// bincode with variable-width integers.
///
/// Integers are written in 1, 3, 5 or 9 bytes depending on magnitude, so a
/// fee's own width depends on its value just as it does on a CBOR ledger.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeEncoder;

impl Encoder for BincodeEncoder {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, EncodingError> {
        Ok(bincode::DefaultOptions::new()
            .with_varint_encoding()
            .with_little_endian()
            .serialize(value)?)
    }
}
