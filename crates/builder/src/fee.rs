//! Size-based fee and minimum-UTXO measurement.

use crate::error::{BuilderError, Result};
use txcraft_core::{Coin, Encoder, ProtocolParams, TransactionBody, TxOutput};

/// Minimum fee for `body` as currently populated:
/// `min_fee_a * len(encode(body)) + min_fee_b`.
///
/// Only the body is measured. Witnesses are not part of the fee-defining
/// size.
pub fn min_fee<E: Encoder>(
    encoder: &E,
    params: &ProtocolParams,
    body: &TransactionBody,
) -> Result<Coin> {
    let size = encoder.encoded_len(body)?;
    params.linear_fee(size).ok_or(BuilderError::AmountOverflow)
}

/// Minimum value `output` may carry given its encoded size.
pub fn min_utxo<E: Encoder>(
    encoder: &E,
    params: &ProtocolParams,
    output: &TxOutput,
) -> Result<Coin> {
    let size = encoder.encoded_len(output)?;
    params.min_utxo(size).ok_or(BuilderError::AmountOverflow)
}
