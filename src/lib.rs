//! Rust client for Plasma child chains (protocol v0.1 "Ari").
//!
//! Builds, signs and submits UTXO transactions through a watcher service,
//! and merges fragmented UTXO sets over several rounds.
//!
//! # Quick start
//!
//! ```no_run
//! use plasma_utxo::{parse_address, LocalSigner, PlasmaApi, Signer, TransportType, U256};
//!
//! let api = PlasmaApi::new(&TransportType::Http("http://localhost:7434".into()))?;
//! let signer = LocalSigner::from_hex("0xac32ae83a4067291cda7a268e316376338bef6b63f66d10b8b516c76093c677e")?;
//!
//! for balance in api.get_balance(&signer.address())? {
//!     println!("{:?}: {:?}", balance.currency, balance.amount());
//! }
//!
//! let recipient = parse_address("0xdd15a3ba1287a1069be49a6ebee9ebdb84eafd31")?;
//! let currency = parse_address("0x3e967151f952ec2bef08107e108747f715bb8b70")?;
//! let receipt = api.transfer(&signer, &recipient, &currency, U256::from(1))?;
//! println!("included in block {}", receipt.blknum);
//! # Ok::<(), plasma_utxo::PlasmaError>(())
//! ```
//!
//! # Modules
//!
//! - [`api`] -- high-level [`PlasmaApi`] facade
//! - [`transport`] -- watcher communication (HTTP)
//! - [`tx`] -- [`Transaction`], its RLP encoding and the transfer builder
//! - [`selection`] -- coin selection
//! - [`consolidator`] -- multi-round UTXO merging
//! - [`signer`] -- [`Signer`] trait and [`LocalSigner`]
//! - [`utxo`] -- [`Utxo`] and [`Balance`]
//! - [`types`] -- [`Position`], [`Signature`], [`TransactionReceipt`]
//!
//! # Feature flags
//!
//! - `http` (default) -- blocking HTTP transport
//! - `local-signer` (default) -- in-memory secp256k1 signer

pub mod api;
pub(crate) mod commands;
pub mod consolidator;
pub mod error;
pub mod rpc;
pub mod selection;
pub mod signer;
pub mod transport;
pub mod tx;
pub mod types;
pub mod utxo;

pub use api::{transfer, ChainQuery, ChallengeData, ExitData, PlasmaApi, TransactionSubmitter};
pub use consolidator::{ConsolidationState, Consolidator, FailedSubmission};
pub use error::{PlasmaError, TransportError};
pub use ethereum_types::{Address, H256, U256};
pub use selection::select_inputs;
#[cfg(feature = "local-signer")]
pub use signer::LocalSigner;
pub use signer::Signer;
pub use transport::TransportType;
pub use tx::builder::{build, build_merge, build_transfer};
pub use tx::{OutputValue, Transaction, TransactionInput, TransactionOutput, MAX_INPUTS, MAX_OUTPUTS};
pub use types::{parse_address, parse_amount, Position, Signature, TransactionReceipt, ZERO_ADDRESS};
pub use utxo::{Balance, BalanceValue, Utxo, UtxoValue};
