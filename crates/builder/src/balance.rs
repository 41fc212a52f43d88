//! Fee and change resolution.
//!
//! The fee depends on the encoded size of the body, the size depends on
//! whether a change output exists, and the change amount depends on the fee.
//! The cycle is cut with a fixed number of measurements:
//!
//! 1. Measure the body with a placeholder fee of realistic width.
//! 2. If change is left over and large enough to be an output, prepend it
//!    and measure once more.
//! 3. If the second measurement eats the change below the dust threshold,
//!    roll the output back and burn the change into the fee.
//!
//! No branch leaves `inputs == outputs + fee + deposits` unsatisfied.

use crate::error::{BuilderError, Result};
use tracing::debug;
use txcraft_core::{Address, Coin, TransactionBody, TxOutput};

/// Fee set on the body before the first measurement. It encodes with the
/// same width as any fee between 65 536 and 2^32 - 1.
pub const PLACEHOLDER_FEE: Coin = Coin::new(200_000);

/// Which branch the resolution took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Inputs cover outputs, deposits and the minimum fee exactly.
    Exact { fee: Coin },
    /// The leftover was too small for its own output and went to the fee.
    Burned { fee: Coin, burned: Coin },
    /// A change output was prepended to the outputs.
    Change { fee: Coin, change: Coin },
}

impl Resolution {
    /// Fee written into the body.
    pub fn fee(&self) -> Coin {
        match *self {
            Resolution::Exact { fee }
            | Resolution::Burned { fee, .. }
            | Resolution::Change { fee, .. } => fee,
        }
    }
}

/// Settle the fee of `body` and insert a change output to `change_address`
/// when the leftover can afford one.
///
/// `min_fee` measures the minimum fee of a candidate body; `min_utxo` the
/// minimum value of a candidate output. On error the body's fee and outputs
/// are left as they were.
///
/// Sums that do not fit in a `u64` fail with [`BuilderError::AmountOverflow`].
/// This includes `outputs + fee + deposits` exceeding `u64::MAX`, even when
/// the inputs are plainly short, since the shortfall itself would not fit.
pub fn resolve_change<F, M>(
    body: &mut TransactionBody,
    deposits: Coin,
    change_address: Address,
    mut min_fee: F,
    mut min_utxo: M,
) -> Result<Resolution>
where
    F: FnMut(&TransactionBody) -> Result<Coin>,
    M: FnMut(&TxOutput) -> Result<Coin>,
{
    let input_amount = body.total_input().ok_or(BuilderError::AmountOverflow)?;
    let output_amount = body.total_output().ok_or(BuilderError::AmountOverflow)?;

    let previous_fee = body.fee;
    body.fee = PLACEHOLDER_FEE;
    let first_fee = match min_fee(body) {
        Ok(fee) => fee,
        Err(err) => {
            body.fee = previous_fee;
            return Err(err);
        }
    };

    let total_produced = output_amount
        .checked_add(first_fee)
        .and_then(|total| total.checked_add(deposits));
    let total_produced = match total_produced {
        Some(total) if total <= input_amount => total,
        Some(total) => {
            body.fee = previous_fee;
            return Err(BuilderError::InsufficientInput {
                available: input_amount,
                required: total,
                shortfall: Coin::new(total.value() - input_amount.value()),
            });
        }
        None => {
            body.fee = previous_fee;
            return Err(BuilderError::AmountOverflow);
        }
    };
    debug!(%input_amount, %output_amount, %deposits, min_fee = %first_fee, "measured body");

    if input_amount == total_produced {
        body.fee = first_fee;
        debug!(fee = %first_fee, "inputs balance exactly, no change");
        return Ok(Resolution::Exact { fee: first_fee });
    }

    let change = Coin::new(input_amount.value() - total_produced.value());
    // change <= input_amount and first_fee <= input_amount, so this only
    // overflows for inputs near u64::MAX.
    let burn_fee = first_fee.checked_add(change);
    let burn = |body: &mut TransactionBody| -> Result<Resolution> {
        let fee = burn_fee.ok_or(BuilderError::AmountOverflow)?;
        body.fee = fee;
        debug!(%change, %fee, "change below minimum UTXO, burned into fee");
        Ok(Resolution::Burned { fee, burned: change })
    };

    let change_output = TxOutput::new(change_address, change);
    let change_min_utxo = match min_utxo(&change_output) {
        Ok(min) => min,
        Err(err) => {
            body.fee = previous_fee;
            return Err(err);
        }
    };
    if change < change_min_utxo {
        return burn(body);
    }

    body.outputs.insert(0, change_output);
    let second_fee = match min_fee(body) {
        Ok(fee) => fee,
        Err(err) => {
            body.outputs.remove(0);
            body.fee = previous_fee;
            return Err(err);
        }
    };

    let adjusted_change = change
        .checked_add(first_fee)
        .and_then(|total| total.checked_sub(second_fee));
    match adjusted_change {
        Some(adjusted) if adjusted >= change_min_utxo => {
            body.outputs[0].amount = adjusted;
            body.fee = second_fee;
            debug!(change = %adjusted, fee = %second_fee, "added change output");
            Ok(Resolution::Change {
                fee: second_fee,
                change: adjusted,
            })
        }
        _ => {
            body.outputs.remove(0);
            burn(body)
        }
    }
}
