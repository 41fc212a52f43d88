//! Core ledger primitives for txcraft.
//!
//! This crate provides the types a transaction is assembled from and the
//! services the builder relies on:
//! - Coin amounts with checked arithmetic
//! - Inputs, outputs, certificates, metadata and the transaction body
//! - Protocol parameters (fee coefficients, deposits, minimum UTXO)
//! - Canonical encoding, hashing and ed25519 signing

pub mod coin;
pub mod crypto;
pub mod encoding;
pub mod hash;
pub mod params;
pub mod transaction;

// Re-export commonly used types at the crate root
pub use coin::Coin;
pub use crypto::{Address, CryptoError, Keypair, PublicKey, Signature, Signer};
pub use encoding::{BincodeEncoder, Encoder, EncodingError};
pub use hash::{hash, Blake3Hasher, Hash, HashError, Hasher, H256};
pub use params::{ParamsError, ProtocolParams};
pub use transaction::{
    AuxiliaryData, Certificate, Metadatum, Transaction, TransactionBody, TransactionError,
    TxInput, TxOutput, VKeyWitness, WitnessSet,
};
