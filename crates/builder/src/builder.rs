//! The transaction builder.
//!
//! Parts are accumulated without validation. Balance is settled by
//! [`TransactionBuilder::add_change_if_needed`] (or a fee set by hand), and
//! [`TransactionBuilder::build`] checks the balance, hashes the body and
//! signs it with every key supplied.

use crate::balance::{self, Resolution, PLACEHOLDER_FEE};
use crate::error::{BuilderError, Result};
use crate::fee;
use tracing::{debug, trace};
use txcraft_core::{
    Address, AuxiliaryData, BincodeEncoder, Blake3Hasher, Certificate, Coin, Encoder, Hash,
    Hasher, ProtocolParams, Signer, Transaction, TransactionBody, TxInput, TxOutput, VKeyWitness,
    WitnessSet,
};

/// Accumulates the parts of a single transaction and builds it.
///
/// The encoder determines the size the fee is charged on and the bytes the
/// body hash is taken over; the hasher produces that hash.
pub struct TransactionBuilder<E = BincodeEncoder, H = Blake3Hasher> {
    params: ProtocolParams,
    body: TransactionBody,
    auxiliary_data: Option<AuxiliaryData>,
    signers: Vec<Box<dyn Signer>>,
    encoder: E,
    hasher: H,
}

impl TransactionBuilder {
    /// Create a builder using bincode encoding and Blake3 hashing.
    pub fn new(params: ProtocolParams) -> Self {
        Self::with_services(params, BincodeEncoder, Blake3Hasher)
    }
}

impl<E: Encoder, H: Hasher> TransactionBuilder<E, H> {
    /// Create a builder with a custom encoder and hasher.
    ///
    /// Check the result with [`Transaction::verify_witnesses_with`] using the
    /// same services.
    pub fn with_services(params: ProtocolParams, encoder: E, hasher: H) -> Self {
        Self {
            params,
            body: TransactionBody::default(),
            auxiliary_data: None,
            signers: Vec::new(),
            encoder,
            hasher,
        }
    }

    /// Add an input to spend.
    pub fn add_input(&mut self, input: TxInput) -> &mut Self {
        self.body.inputs.push(input);
        self
    }

    /// Add several inputs, in order.
    pub fn add_inputs<I: IntoIterator<Item = TxInput>>(&mut self, inputs: I) -> &mut Self {
        self.body.inputs.extend(inputs);
        self
    }

    /// Add an output.
    pub fn add_output(&mut self, output: TxOutput) -> &mut Self {
        self.body.outputs.push(output);
        self
    }

    /// Add several outputs, in order.
    pub fn add_outputs<I: IntoIterator<Item = TxOutput>>(&mut self, outputs: I) -> &mut Self {
        self.body.outputs.extend(outputs);
        self
    }

    /// Add a certificate. Stake registrations lock a deposit.
    pub fn add_certificate(&mut self, certificate: Certificate) -> &mut Self {
        self.body.certificates.push(certificate);
        self
    }

    /// Attach metadata. Replaces any previously set.
    pub fn set_auxiliary_data(&mut self, data: AuxiliaryData) -> &mut Self {
        self.auxiliary_data = Some(data);
        self
    }

    /// Set the slot after which the transaction is invalid.
    pub fn set_ttl(&mut self, ttl: u64) -> &mut Self {
        self.body.ttl = Some(ttl);
        self
    }

    /// Set the fee by hand. Overwritten by `add_change_if_needed`.
    pub fn set_fee(&mut self, fee: Coin) -> &mut Self {
        self.body.fee = fee;
        self
    }

    /// Add a key to sign the transaction with. Witnesses are produced in
    /// the order keys are added.
    pub fn add_signing_key<S: Signer + 'static>(&mut self, key: S) -> &mut Self {
        self.signers.push(Box::new(key));
        self
    }

    /// Protocol parameters the fee and deposits are computed from.
    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// Inputs added so far.
    pub fn inputs(&self) -> &[TxInput] {
        &self.body.inputs
    }

    /// Outputs, including the change output once resolved.
    pub fn outputs(&self) -> &[TxOutput] {
        &self.body.outputs
    }

    /// Certificates added so far.
    pub fn certificates(&self) -> &[Certificate] {
        &self.body.certificates
    }

    /// Current fee.
    pub fn fee(&self) -> Coin {
        self.body.fee
    }

    /// Current time-to-live, if set.
    pub fn ttl(&self) -> Option<u64> {
        self.body.ttl
    }

    /// Total deposit locked by the certificates added so far.
    pub fn total_deposits(&self) -> Result<Coin> {
        self.body
            .total_deposits(&self.params)
            .ok_or(BuilderError::AmountOverflow)
    }

    /// Minimum fee of the transaction as currently assembled, measured with
    /// the placeholder fee in place. Does not balance or modify the builder.
    pub fn min_fee(&self) -> Result<Coin> {
        let mut body = self.body.clone();
        body.fee = PLACEHOLDER_FEE;
        body.auxiliary_data_hash = self.auxiliary_data_hash()?;
        fee::min_fee(&self.encoder, &self.params, &body)
    }

    /// Settle the fee, adding a change output to `change_address` as the
    /// first output when the leftover value can pay for one.
    ///
    /// Inputs and outputs must already be in place. A leftover too small to
    /// stand as an output is added to the fee instead. On error the builder
    /// is left unchanged.
    pub fn add_change_if_needed(&mut self, change_address: Address) -> Result<Resolution> {
        let deposits = self.total_deposits()?;
        let auxiliary_data_hash = self.auxiliary_data_hash()?;
        let previous_hash =
            std::mem::replace(&mut self.body.auxiliary_data_hash, auxiliary_data_hash);

        let encoder = &self.encoder;
        let params = &self.params;
        let resolution = balance::resolve_change(
            &mut self.body,
            deposits,
            change_address,
            |body| fee::min_fee(encoder, params, body),
            |output| fee::min_utxo(encoder, params, output),
        );
        if resolution.is_err() {
            self.body.auxiliary_data_hash = previous_hash;
        }
        resolution
    }

    /// Check the balance with the current fee and produce the signed
    /// transaction.
    pub fn build(mut self) -> Result<Transaction> {
        self.check_balance()?;

        if self.signers.is_empty() {
            return Err(BuilderError::MissingSigningKeys);
        }

        self.body.auxiliary_data_hash = self.auxiliary_data_hash()?;
        let body_bytes = self.encoder.encode(&self.body)?;
        let body_hash = self.hasher.hash(&body_bytes)?;
        debug!(
            %body_hash,
            size = body_bytes.len(),
            fee = %self.body.fee,
            signers = self.signers.len(),
            "signing transaction body"
        );

        let vkey_witnesses = self
            .signers
            .iter()
            .map(|signer| -> Result<VKeyWitness> {
                let vkey = signer.public_key();
                trace!(?vkey, "adding witness");
                Ok(VKeyWitness {
                    signature: signer.sign_digest(&body_hash)?,
                    vkey,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Transaction {
            body: self.body,
            witness_set: WitnessSet { vkey_witnesses },
            is_valid: true,
            auxiliary_data: self.auxiliary_data,
        })
    }

    fn check_balance(&self) -> Result<()> {
        let input_amount = self.body.total_input().ok_or(BuilderError::AmountOverflow)?;
        let total_produced = self
            .body
            .total_output()
            .and_then(|total| total.checked_add(self.body.fee))
            .and_then(|total| total.checked_add(self.total_deposits().ok()?))
            .ok_or(BuilderError::AmountOverflow)?;

        if total_produced > input_amount {
            return Err(BuilderError::InsufficientInput {
                available: input_amount,
                required: total_produced,
                shortfall: Coin::new(total_produced.value() - input_amount.value()),
            });
        }
        if total_produced < input_amount {
            let unclaimed = Coin::new(input_amount.value() - total_produced.value());
            return Err(BuilderError::FeeMismatch {
                fee: self.body.fee,
                required: self
                    .body
                    .fee
                    .checked_add(unclaimed)
                    .ok_or(BuilderError::AmountOverflow)?,
            });
        }
        Ok(())
    }

    fn auxiliary_data_hash(&self) -> Result<Option<Hash>> {
        match &self.auxiliary_data {
            Some(data) => {
                let bytes = self.encoder.encode(data)?;
                Ok(Some(self.hasher.hash(&bytes)?))
            }
            None => Ok(None),
        }
    }
}
