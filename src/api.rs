//! High-level API - [`PlasmaApi`] wraps a watcher connection and exposes
//! all supported operations.

use ethereum_types::{Address, U256};
use log::info;

use crate::commands;
use crate::error::PlasmaError;
use crate::signer::Signer;
use crate::transport::{self, Transport, TransportType};
use crate::tx::{builder, Transaction};
use crate::types::{to_hex, Position, TransactionReceipt};
use crate::utxo::{Balance, Utxo};

pub use crate::commands::get_challenge_data::ChallengeData;
pub use crate::commands::get_exit_data::ExitData;

/// Read access to child-chain state.
pub trait ChainQuery {
    fn get_utxos(&self, address: &Address) -> Result<Vec<Utxo>, PlasmaError>;
    fn get_balance(&self, address: &Address) -> Result<Vec<Balance>, PlasmaError>;
}

/// Submission of signed transactions.
pub trait TransactionSubmitter {
    fn submit_transaction(&self, tx: &Transaction) -> Result<TransactionReceipt, PlasmaError>;
}

/// High-level interface to a Plasma watcher.
pub struct PlasmaApi {
    transport: Box<dyn Transport>,
}

impl PlasmaApi {
    pub fn new(transport_type: &TransportType) -> Result<Self, PlasmaError> {
        let transport = transport::open(transport_type)?;
        Ok(Self { transport })
    }

    /// Useful for testing or injecting a custom transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Unspent outputs of `address`, in watcher order.
    pub fn get_utxos(&self, address: &Address) -> Result<Vec<Utxo>, PlasmaError> {
        commands::get_utxos::exec(self.transport.as_ref(), address)
    }

    pub fn get_balance(&self, address: &Address) -> Result<Vec<Balance>, PlasmaError> {
        commands::get_balance::exec(self.transport.as_ref(), address)
    }

    /// Submit a fully signed transaction.
    pub fn submit_transaction(&self, tx: &Transaction) -> Result<TransactionReceipt, PlasmaError> {
        let signed = tx.encode_signed()?;
        let receipt = commands::submit_transaction::exec(self.transport.as_ref(), &signed)?;
        info!(
            "transaction {} included in block {} at index {}",
            to_hex(receipt.txhash.as_bytes()),
            receipt.blknum,
            receipt.txindex
        );
        Ok(receipt)
    }

    /// Submit an already encoded signed transaction.
    pub fn submit_encoded(&self, signed_tx: &[u8]) -> Result<TransactionReceipt, PlasmaError> {
        commands::submit_transaction::exec(self.transport.as_ref(), signed_tx)
    }

    pub fn get_exit_data(&self, position: Position) -> Result<ExitData, PlasmaError> {
        commands::get_exit_data::exec(self.transport.as_ref(), position)
    }

    pub fn get_challenge_data(&self, position: Position) -> Result<ChallengeData, PlasmaError> {
        commands::get_challenge_data::exec(self.transport.as_ref(), position)
    }

    /// Fetch the signer's UTXOs, build a transfer, sign and submit it.
    /// See [`transfer`].
    pub fn transfer(
        &self,
        signer: &dyn Signer,
        recipient: &Address,
        currency: &Address,
        amount: U256,
    ) -> Result<TransactionReceipt, PlasmaError> {
        transfer(self, self, signer, recipient, currency, amount)
    }
}

/// Pay `amount` of `currency` to `recipient` from the signer's UTXOs as
/// reported by `query`, submitting through `submitter`.
///
/// Fails with [`PlasmaError::InsufficientSingleTxFunds`] when the
/// balance is there but spread over too many UTXOs; run a
/// [`Consolidator`](crate::Consolidator) first in that case.
pub fn transfer(
    query: &dyn ChainQuery,
    submitter: &dyn TransactionSubmitter,
    signer: &dyn Signer,
    recipient: &Address,
    currency: &Address,
    amount: U256,
) -> Result<TransactionReceipt, PlasmaError> {
    let sender = signer.address();
    let utxos = query.get_utxos(&sender)?;
    let mut tx = builder::build(sender, *recipient, *currency, amount, &utxos)?;
    tx.sign_with(signer)?;
    submitter.submit_transaction(&tx)
}

impl ChainQuery for PlasmaApi {
    fn get_utxos(&self, address: &Address) -> Result<Vec<Utxo>, PlasmaError> {
        PlasmaApi::get_utxos(self, address)
    }

    fn get_balance(&self, address: &Address) -> Result<Vec<Balance>, PlasmaError> {
        PlasmaApi::get_balance(self, address)
    }
}

impl TransactionSubmitter for PlasmaApi {
    fn submit_transaction(&self, tx: &Transaction) -> Result<TransactionReceipt, PlasmaError> {
        PlasmaApi::submit_transaction(self, tx)
    }
}
