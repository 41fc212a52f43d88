//! Builder errors.

use txcraft_core::{Coin, CryptoError, EncodingError, HashError};
use thiserror::Error;

/// Errors that can occur while balancing or building a transaction.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("insufficient input (available {available}, required {required}, short by {shortfall})")]
    InsufficientInput {
        available: Coin,
        required: Coin,
        shortfall: Coin,
    },

    #[error("fee does not balance the transaction (fee {fee}, required {required})")]
    FeeMismatch { fee: Coin, required: Coin },

    #[error("missing signing keys")]
    MissingSigningKeys,

    #[error("coin arithmetic overflow")]
    AmountOverflow,

    #[error("encoding failed: {0}")]
    Encoding(#[from] EncodingError),

    #[error("hashing failed: {0}")]
    Hashing(#[from] HashError),

    #[error("signing failed: {0}")]
    Signing(#[from] CryptoError),
}

pub type Result<T> = std::result::Result<T, BuilderError>;
