use proptest::prelude::*;

use txcraft_builder::{BuilderError, TransactionBuilder};
use txcraft_core::{
    hash, Address, BincodeEncoder, Certificate, Coin, Encoder, Keypair, ProtocolParams, TxInput,
    TxOutput,
};

const CHANGE: Address = Address([0xCC; 20]);

#[derive(Debug, Clone)]
struct Plan {
    inputs: Vec<u64>,
    outputs: Vec<(u8, u64)>,
    registrations: usize,
}

/// Strategy for a transaction plan whose own outputs respect the default
/// minimum UTXO.
fn arb_plan() -> impl Strategy<Value = Plan> {
    (
        prop::collection::vec(1_000_000u64..40_000_000, 1..4),
        prop::collection::vec((any::<u8>(), 1_000_000u64..8_000_000), 1..4),
        0usize..3,
    )
        .prop_map(|(inputs, outputs, registrations)| Plan {
            inputs,
            outputs,
            registrations,
        })
}

fn builder_for(plan: &Plan) -> TransactionBuilder {
    let mut builder = TransactionBuilder::new(ProtocolParams::default());
    for (index, amount) in plan.inputs.iter().enumerate() {
        builder.add_input(TxInput::new(hash(b"funding"), index as u32, Coin::new(*amount)));
    }
    for (tag, amount) in &plan.outputs {
        builder.add_output(TxOutput::new(Address([*tag; 20]), Coin::new(*amount)));
    }
    for i in 0..plan.registrations {
        builder.add_certificate(Certificate::StakeRegistration {
            credential: hash(&[i as u8]),
        });
    }
    builder
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn resolved_transactions_balance(plan in arb_plan()) {
        let mut builder = builder_for(&plan);
        match builder.add_change_if_needed(CHANGE) {
            Ok(_) => {
                builder.add_signing_key(Keypair::from_private_key(&[3u8; 32]));
                let tx = builder.build().unwrap();
                let params = ProtocolParams::default();

                let produced = tx.body.total_output()
                    .and_then(|total| total.checked_add(tx.body.fee))
                    .and_then(|total| total.checked_add(tx.body.total_deposits(&params)?))
                    .unwrap();
                prop_assert_eq!(tx.body.total_input().unwrap(), produced);

                for output in &tx.body.outputs {
                    let size = BincodeEncoder.encoded_len(output).unwrap();
                    prop_assert!(output.amount >= params.min_utxo(size).unwrap());
                }
            }
            Err(BuilderError::InsufficientInput { available, required, shortfall }) => {
                prop_assert_eq!(available.checked_add(shortfall), Some(required));
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn resolution_is_idempotent(plan in arb_plan()) {
        let mut builder = builder_for(&plan);
        if builder.add_change_if_needed(CHANGE).is_ok() {
            let fee = builder.fee();
            let outputs = builder.outputs().to_vec();

            builder.add_change_if_needed(CHANGE).unwrap();
            prop_assert_eq!(builder.fee(), fee);
            prop_assert_eq!(builder.outputs(), outputs.as_slice());
        }
    }

    #[test]
    fn adding_an_output_never_lowers_min_fee(plan in arb_plan(), amount in 1_000_000u64..8_000_000) {
        let mut builder = builder_for(&plan);
        let before = builder.min_fee().unwrap();
        builder.add_output(TxOutput::new(Address([0xEE; 20]), Coin::new(amount)));
        let after = builder.min_fee().unwrap();
        prop_assert!(before <= after);
    }
}
