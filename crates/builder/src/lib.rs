//! Fee-balanced transaction building for txcraft.
//!
//! - **Builder**: accumulates inputs, outputs, certificates, metadata and keys
//! - **Balance**: settles the size-dependent fee and the change output
//! - **Fee**: linear fee and minimum-UTXO measurement over the encoded form
//!
//! # Example
//!
//! ```rust,no_run
//! use txcraft_builder::TransactionBuilder;
//! use txcraft_core::{hash, Coin, Keypair, ProtocolParams, TxInput, TxOutput};
//!
//! let keypair = Keypair::generate();
//! let recipient = Keypair::generate().address();
//!
//! let mut builder = TransactionBuilder::new(ProtocolParams::default());
//! builder
//!     .add_input(TxInput::new(hash(b"funding tx"), 0, Coin::new(10_000_000)))
//!     .add_output(TxOutput::new(recipient, Coin::new(4_000_000)))
//!     .set_ttl(50_000_000);
//! builder.add_change_if_needed(keypair.address()).unwrap();
//! builder.add_signing_key(keypair);
//!
//! let tx = builder.build().unwrap();
//! ```

pub mod balance;
pub mod builder;
pub mod error;
pub mod fee;

// Re-export commonly used types
pub use balance::{resolve_change, Resolution, PLACEHOLDER_FEE};
pub use builder::TransactionBuilder;
pub use error::{BuilderError, Result};
