//! Protocol parameters governing fees, deposits and the minimum UTXO value.

use crate::coin::Coin;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes of ledger bookkeeping charged per UTXO entry on top of the
/// encoded output itself.
pub const UTXO_ENTRY_OVERHEAD: u64 = 160;

/// Errors raised while loading protocol parameters.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("invalid protocol parameters: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ledger protocol parameters used by the transaction builder.
///
/// Field names follow the camelCase JSON published by ledger nodes, so a
/// parameters dump can be loaded with [`ProtocolParams::from_json`]. Fields
/// missing from the JSON take their [`Default`] value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProtocolParams {
    /// Fee per encoded byte.
    pub min_fee_a: Coin,
    /// Constant fee component.
    pub min_fee_b: Coin,
    /// Deposit locked by each stake registration certificate.
    pub key_deposit: Coin,
    /// Price of one byte of UTXO storage.
    pub coins_per_utxo_byte: Coin,
    /// Absolute floor for any output's value.
    pub min_utxo_value: Coin,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            min_fee_a: Coin::new(44),
            min_fee_b: Coin::new(155_381),
            key_deposit: Coin::new(2_000_000),
            coins_per_utxo_byte: Coin::new(4_310),
            min_utxo_value: Coin::new(1_000_000),
        }
    }
}

impl ProtocolParams {
    /// Parse parameters from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Linear fee for a transaction body of `size` encoded bytes:
    /// `min_fee_a * size + min_fee_b`.
    pub fn linear_fee(&self, size: usize) -> Option<Coin> {
        self.min_fee_a
            .checked_mul(u64::try_from(size).ok()?)?
            .checked_add(self.min_fee_b)
    }

    /// Minimum value an output of `output_size` encoded bytes may carry.
    pub fn min_utxo(&self, output_size: usize) -> Option<Coin> {
        let bytes = UTXO_ENTRY_OVERHEAD.checked_add(u64::try_from(output_size).ok()?)?;
        let by_size = self.coins_per_utxo_byte.checked_mul(bytes)?;
        Some(by_size.max(self.min_utxo_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_fee() {
        let params = ProtocolParams::default();
        assert_eq!(params.linear_fee(0), Some(Coin::new(155_381)));
        assert_eq!(params.linear_fee(200), Some(Coin::new(155_381 + 44 * 200)));
    }

    #[test]
    fn test_linear_fee_overflow() {
        let params = ProtocolParams {
            min_fee_a: Coin::new(u64::MAX),
            ..ProtocolParams::default()
        };
        assert_eq!(params.linear_fee(2), None);
    }

    #[test]
    fn test_min_utxo_uses_floor_for_small_outputs() {
        let params = ProtocolParams::default();
        // (160 + 30) * 4310 = 818_900 < 1_000_000
        assert_eq!(params.min_utxo(30), Some(Coin::new(1_000_000)));
    }

    #[test]
    fn test_min_utxo_grows_with_size() {
        let params = ProtocolParams {
            min_utxo_value: Coin::ZERO,
            ..ProtocolParams::default()
        };
        assert_eq!(params.min_utxo(40), Some(Coin::new(200 * 4_310)));
        assert!(params.min_utxo(41) > params.min_utxo(40));
    }

    #[test]
    fn test_from_json_partial() {
        let params = ProtocolParams::from_json(
            r#"{ "minFeeA": 40, "minFeeB": 150000, "keyDeposit": 500000 }"#,
        )
        .unwrap();
        assert_eq!(params.min_fee_a, Coin::new(40));
        assert_eq!(params.min_fee_b, Coin::new(150_000));
        assert_eq!(params.key_deposit, Coin::new(500_000));
        assert_eq!(params.coins_per_utxo_byte, Coin::new(4_310));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(ProtocolParams::from_json("{ \"minFeeA\": \"lots\" }").is_err());
    }
}
