//! Transaction body, witnesses and the parts a transaction is built from.

use crate::coin::Coin;
use crate::crypto::{Address, PublicKey, Signature};
use crate::encoding::{BincodeEncoder, Encoder, EncodingError};
use crate::hash::{Blake3Hasher, Hash, HashError, Hasher};
use crate::params::ProtocolParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur while hashing or verifying a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Hashing(#[from] HashError),

    #[error("witness {0} does not verify against the body hash")]
    InvalidWitness(usize),
}

/// A reference to a previously produced output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    /// Hash of the transaction that produced the output.
    pub tx_hash: Hash,
    /// Position of the output within that transaction.
    pub index: u32,
    /// Value of the referenced output. Bookkeeping only; the ledger already
    /// knows it, so it is not part of the encoded body.
    #[serde(skip)]
    pub amount: Coin,
}

impl TxInput {
    pub fn new(tx_hash: Hash, index: u32, amount: Coin) -> Self {
        Self {
            tx_hash,
            index,
            amount,
        }
    }
}

/// A new output: value locked to an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: Address,
    pub amount: Coin,
}

impl TxOutput {
    pub fn new(address: Address, amount: Coin) -> Self {
        Self { address, amount }
    }
}

/// Delegation certificates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Certificate {
    StakeRegistration { credential: Hash },
    StakeDeregistration { credential: Hash },
    StakeDelegation { credential: Hash, pool: Hash },
}

impl Certificate {
    /// Deposit this certificate locks when the transaction is applied.
    pub fn deposit(&self, params: &ProtocolParams) -> Coin {
        match self {
            Certificate::StakeRegistration { .. } => params.key_deposit,
            Certificate::StakeDeregistration { .. } | Certificate::StakeDelegation { .. } => {
                Coin::ZERO
            }
        }
    }
}

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metadatum {
    Int(i64),
    Bytes(Vec<u8>),
    Text(String),
    List(Vec<Metadatum>),
    Map(Vec<(Metadatum, Metadatum)>),
}

/// Transaction metadata keyed by label.
///
/// Only the hash of its encoding is committed to in the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuxiliaryData {
    pub metadata: BTreeMap<u64, Metadatum>,
}

impl AuxiliaryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, label: u64, value: Metadatum) -> Self {
        self.metadata.insert(label, value);
        self
    }
}

/// The signed part of a transaction. Its encoding determines both the fee
/// and the transaction id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionBody {
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub fee: Coin,
    /// Slot after which the transaction is no longer valid.
    pub ttl: Option<u64>,
    pub certificates: Vec<Certificate>,
    pub auxiliary_data_hash: Option<Hash>,
}

impl TransactionBody {
    /// Sum of input values, `None` on overflow.
    pub fn total_input(&self) -> Option<Coin> {
        Coin::checked_sum(self.inputs.iter().map(|input| input.amount))
    }

    /// Sum of output values, `None` on overflow.
    pub fn total_output(&self) -> Option<Coin> {
        Coin::checked_sum(self.outputs.iter().map(|output| output.amount))
    }

    /// Sum of certificate deposits, `None` on overflow.
    pub fn total_deposits(&self, params: &ProtocolParams) -> Option<Coin> {
        Coin::checked_sum(self.certificates.iter().map(|cert| cert.deposit(params)))
    }

    /// Hash of the canonical encoding of this body.
    pub fn hash_with<E: Encoder, H: Hasher>(
        &self,
        encoder: &E,
        hasher: &H,
    ) -> Result<Hash, TransactionError> {
        let bytes = encoder.encode(self)?;
        Ok(hasher.hash(&bytes)?)
    }
}

/// A public key and its signature over the body hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VKeyWitness {
    pub vkey: PublicKey,
    pub signature: Signature,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WitnessSet {
    pub vkey_witnesses: Vec<VKeyWitness>,
}

/// A complete, signed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub body: TransactionBody,
    pub witness_set: WitnessSet,
    pub is_valid: bool,
    pub auxiliary_data: Option<AuxiliaryData>,
}

impl Transaction {
    /// Transaction id: the Blake3 hash of the bincode-encoded body.
    pub fn id(&self) -> Result<Hash, TransactionError> {
        self.body.hash_with(&BincodeEncoder, &Blake3Hasher)
    }

    /// Check every witness signature against the body hash, computed with
    /// the default encoder and hasher.
    pub fn verify_witnesses(&self) -> Result<(), TransactionError> {
        self.verify_witnesses_with(&BincodeEncoder, &Blake3Hasher)
    }

    /// Check every witness signature against the body hash computed with
    /// the given services. They must be the ones the transaction was built
    /// with.
    pub fn verify_witnesses_with<E: Encoder, H: Hasher>(
        &self,
        encoder: &E,
        hasher: &H,
    ) -> Result<(), TransactionError> {
        let id = self.body.hash_with(encoder, hasher)?;
        for (index, witness) in self.witness_set.vkey_witnesses.iter().enumerate() {
            witness
                .vkey
                .verify_digest(&id, &witness.signature)
                .map_err(|_| TransactionError::InvalidWitness(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{Keypair, Signer};
    use crate::hash::hash;

    fn sample_body() -> TransactionBody {
        TransactionBody {
            inputs: vec![TxInput::new(hash(b"prev"), 0, Coin::new(5_000_000))],
            outputs: vec![TxOutput::new(Address::from_bytes([2u8; 20]), Coin::new(3_000_000))],
            fee: Coin::new(180_000),
            ttl: Some(1_000),
            certificates: vec![],
            auxiliary_data_hash: None,
        }
    }

    #[test]
    fn test_deposit_per_certificate_kind() {
        let params = ProtocolParams::default();
        let credential = hash(b"stake key");
        let registration = Certificate::StakeRegistration { credential };
        let deregistration = Certificate::StakeDeregistration { credential };
        let delegation = Certificate::StakeDelegation {
            credential,
            pool: hash(b"pool"),
        };

        assert_eq!(registration.deposit(&params), params.key_deposit);
        assert_eq!(deregistration.deposit(&params), Coin::ZERO);
        assert_eq!(delegation.deposit(&params), Coin::ZERO);
    }

    #[test]
    fn test_body_totals() {
        let params = ProtocolParams::default();
        let mut body = sample_body();
        body.certificates.push(Certificate::StakeRegistration {
            credential: hash(b"a"),
        });
        body.certificates.push(Certificate::StakeRegistration {
            credential: hash(b"b"),
        });

        assert_eq!(body.total_input(), Some(Coin::new(5_000_000)));
        assert_eq!(body.total_output(), Some(Coin::new(3_000_000)));
        assert_eq!(body.total_deposits(&params), Some(Coin::new(4_000_000)));
    }

    #[test]
    fn test_input_amount_not_encoded() {
        let encoder = BincodeEncoder;
        let a = TxInput::new(hash(b"prev"), 1, Coin::new(1));
        let b = TxInput::new(hash(b"prev"), 1, Coin::new(9_999_999));
        assert_eq!(encoder.encode(&a).unwrap(), encoder.encode(&b).unwrap());
    }

    #[test]
    fn test_body_hash_changes_with_fee() {
        let body = sample_body();
        let mut other = body.clone();
        other.fee = Coin::new(180_001);

        let h1 = body.hash_with(&BincodeEncoder, &Blake3Hasher).unwrap();
        let h2 = other.hash_with(&BincodeEncoder, &Blake3Hasher).unwrap();
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_verify_witnesses() {
        let keypair = Keypair::generate();
        let body = sample_body();
        let id = body.hash_with(&BincodeEncoder, &Blake3Hasher).unwrap();
        let tx = Transaction {
            body,
            witness_set: WitnessSet {
                vkey_witnesses: vec![VKeyWitness {
                    vkey: keypair.public_key(),
                    signature: keypair.sign_digest(&id).unwrap(),
                }],
            },
            is_valid: true,
            auxiliary_data: None,
        };

        assert!(tx.verify_witnesses().is_ok());

        let mut tampered = tx.clone();
        tampered.body.fee = Coin::new(1);
        assert!(matches!(
            tampered.verify_witnesses(),
            Err(TransactionError::InvalidWitness(0))
        ));
    }

    #[test]
    fn test_auxiliary_data_ordering_is_canonical() {
        let a = AuxiliaryData::new()
            .with_entry(674, Metadatum::Text("memo".into()))
            .with_entry(1, Metadatum::Int(-5));
        let b = AuxiliaryData::new()
            .with_entry(1, Metadatum::Int(-5))
            .with_entry(674, Metadatum::Text("memo".into()));

        let encoder = BincodeEncoder;
        assert_eq!(encoder.encode(&a).unwrap(), encoder.encode(&b).unwrap());
    }
}
