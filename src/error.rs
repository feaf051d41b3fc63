//! Error types and watcher error payload mapping.

use ethereum_types::{Address, U256};
use thiserror::Error;

use crate::rpc::ErrorData;

/// Errors returned by the library.
#[derive(Debug, Error)]
pub enum PlasmaError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("watcher returned error {code}: {description}")]
    Rpc { code: String, description: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: U256, available: U256 },

    #[error(
        "funds ({available}) cover {required} only across several transactions, consolidate first"
    )]
    InsufficientSingleTxFunds { required: U256, available: U256 },

    #[error("malformed transaction encoding: {0}")]
    MalformedEncoding(String),

    #[error("missing signature for input {index}")]
    MissingSignature { index: usize },

    #[error("transaction submission failed ({code}): {description}")]
    SubmissionFailed { code: String, description: String },

    #[error("too many {kind} (max {max})")]
    CapacityExceeded { kind: &'static str, max: usize },

    #[error("cannot mix currencies in one transaction: expected {expected:?}, found {found:?}")]
    MixedCurrency { expected: Address, found: Address },

    #[error("no input UTXOs given")]
    NoInputs,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid UTXO position: {0}")]
    InvalidPosition(String),

    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("signer {0:?} owns none of the transaction inputs")]
    UnknownSigner(Address),

    #[error("signing failed: {0}")]
    Signer(String),
}

impl PlasmaError {
    /// Map an unsuccessful watcher response. Failed submissions get their own
    /// variant so callers can tell them apart from query failures.
    pub fn from_error_data(route: &str, data: &ErrorData) -> Self {
        let code = data.code.clone().unwrap_or_else(|| "unknown".into());
        let description = data.summary();
        if route == crate::commands::submit_transaction::ROUTE {
            Self::SubmissionFailed { code, description }
        } else {
            Self::Rpc { code, description }
        }
    }

    pub(crate) fn malformed(err: rlp::DecoderError) -> Self {
        Self::MalformedEncoding(err.to_string())
    }
}

/// Transport-level errors (HTTP, connection, body decoding).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    #[error("cannot decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unsupported transport: {0}")]
    Unsupported(String),
}
