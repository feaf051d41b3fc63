//! Multi-round UTXO consolidation.
//!
//! A transaction spends at most [`MAX_INPUTS`] outputs, so merging a large
//! UTXO set takes several rounds. Each round splits the pending UTXOs into
//! chunks of four, queues one merge transaction per chunk with more than one
//! member, and carries singletons over. Once the queued transactions are
//! signed, [`Consolidator::process_transactions`] submits them and folds the
//! resulting outputs back into the pending set for the next round.
//!
//! ```no_run
//! # use plasma_utxo::{Consolidator, ConsolidationState, PlasmaApi, TransportType, LocalSigner, Signer};
//! # let api = PlasmaApi::new(&TransportType::Http("http://localhost:7434".into()))?;
//! # let signer = LocalSigner::from_hex("0xac32ae83a4067291cda7a268e316376338bef6b63f66d10b8b516c76093c677e")?;
//! # let currency = plasma_utxo::ZERO_ADDRESS;
//! let utxos = api.get_utxos(&signer.address())?;
//! let mut consolidator = Consolidator::new(&api, signer.address(), currency, &utxos, None)?;
//! while consolidator.can_merge() {
//!     consolidator.sign_transactions(&signer)?;
//!     consolidator.process_transactions()?;
//! }
//! assert_eq!(consolidator.state(), ConsolidationState::Converged);
//! # Ok::<(), plasma_utxo::PlasmaError>(())
//! ```

use ethereum_types::{Address, U256};
use log::{info, warn};

use crate::api::TransactionSubmitter;
use crate::error::PlasmaError;
use crate::signer::Signer;
use crate::tx::builder::build_merge;
use crate::tx::{Transaction, MAX_INPUTS};
use crate::types::address_hex;
use crate::utxo::{total_amount, Utxo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsolidationState {
    /// Merge transactions are queued and waiting to be signed and processed.
    Merging,
    /// A single UTXO holding the target balance remains.
    Converged,
    /// Nothing left to merge, but the target balance was not reached.
    /// Usually a submission failed; see
    /// [`failed_submissions`](Consolidator::failed_submissions).
    Stalled,
}

/// A merge transaction the watcher did not accept.
#[derive(Debug)]
pub struct FailedSubmission {
    pub round: usize,
    pub transaction: Transaction,
    pub error: PlasmaError,
}

pub struct Consolidator<'a> {
    submitter: &'a dyn TransactionSubmitter,
    owner: Address,
    currency: Address,
    target_balance: U256,
    pending_utxos: Vec<Utxo>,
    transactions: Vec<Transaction>,
    merged_utxo: Option<Utxo>,
    failed_submissions: Vec<FailedSubmission>,
    round: usize,
    state: ConsolidationState,
}

impl std::fmt::Debug for Consolidator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consolidator")
            .field("owner", &self.owner)
            .field("currency", &self.currency)
            .field("target_balance", &self.target_balance)
            .field("pending_utxos", &self.pending_utxos)
            .field("transactions", &self.transactions)
            .field("merged_utxo", &self.merged_utxo)
            .field("failed_submissions", &self.failed_submissions)
            .field("round", &self.round)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> Consolidator<'a> {
    /// Start a session over `owner`'s fungible `currency` UTXOs.
    ///
    /// With `target`, only the smallest UTXOs needed to reach it are merged;
    /// without, all of them.
    pub fn new(
        submitter: &'a dyn TransactionSubmitter,
        owner: Address,
        currency: Address,
        utxos: &[Utxo],
        target: Option<U256>,
    ) -> Result<Self, PlasmaError> {
        let mut candidates: Vec<Utxo> = utxos
            .iter()
            .filter(|u| u.owner == owner && u.currency == currency)
            .filter(|u| u.amount().map_or(false, |a| !a.is_zero()))
            .cloned()
            .collect();
        if candidates.is_empty() {
            return Err(PlasmaError::NoInputs);
        }

        if let Some(target) = target {
            if target.is_zero() {
                return Err(PlasmaError::InvalidArgument("consolidation target is zero".into()));
            }
            candidates.sort_by_key(|u| u.amount().unwrap_or_default());
            let mut sum = U256::zero();
            let needed = candidates
                .iter()
                .position(|u| {
                    sum = sum.saturating_add(u.amount().unwrap_or_default());
                    sum >= target
                })
                .map_or(candidates.len(), |i| i + 1);
            candidates.truncate(needed);
        }

        let target_balance = total_amount(&candidates)?;
        info!(
            "consolidating {} utxos of {} for {} into {}",
            candidates.len(),
            address_hex(&currency),
            address_hex(&owner),
            target_balance
        );

        let mut consolidator = Self {
            submitter,
            owner,
            currency,
            target_balance,
            pending_utxos: candidates,
            transactions: Vec::new(),
            merged_utxo: None,
            failed_submissions: Vec::new(),
            round: 0,
            state: ConsolidationState::Merging,
        };
        consolidator.prepare_round()?;
        Ok(consolidator)
    }

    fn prepare_round(&mut self) -> Result<(), PlasmaError> {
        self.transactions.clear();

        if let [single] = self.pending_utxos.as_slice() {
            if single.amount() == Some(self.target_balance) {
                info!("consolidation converged on {} after {} rounds", self.target_balance, self.round);
                self.merged_utxo = Some(single.clone());
                self.state = ConsolidationState::Converged;
                return Ok(());
            }
        }
        if self.pending_utxos.len() <= 1 {
            warn!(
                "consolidation stalled in round {} ({} failed submissions)",
                self.round,
                self.failed_submissions.len()
            );
            self.state = ConsolidationState::Stalled;
            return Ok(());
        }

        let pending = std::mem::take(&mut self.pending_utxos);
        for chunk in pending.chunks(MAX_INPUTS) {
            match chunk {
                [single] => self.pending_utxos.push(single.clone()),
                _ => self.transactions.push(build_merge(self.owner, self.currency, chunk)?),
            }
        }
        self.round += 1;
        self.state = ConsolidationState::Merging;
        info!(
            "round {}: {} merge transactions, {} utxos carried over",
            self.round,
            self.transactions.len(),
            self.pending_utxos.len()
        );
        Ok(())
    }

    /// Sign every queued transaction with `signer`.
    pub fn sign_transactions(&mut self, signer: &dyn Signer) -> Result<(), PlasmaError> {
        for tx in &mut self.transactions {
            tx.sign_with(signer)?;
        }
        Ok(())
    }

    /// Submit the queued transactions and prepare the next round.
    ///
    /// Fails with [`PlasmaError::MissingSignature`] before submitting
    /// anything if a queued transaction is not fully signed. Rejected
    /// submissions do not fail the call; they are recorded and the session
    /// ends up [`Stalled`](ConsolidationState::Stalled) if the target can no
    /// longer be reached.
    pub fn process_transactions(&mut self) -> Result<ConsolidationState, PlasmaError> {
        if self.transactions.is_empty() {
            return Ok(self.state);
        }
        for tx in &self.transactions {
            tx.encode_signed()?;
        }

        for tx in std::mem::take(&mut self.transactions) {
            match self.submitter.submit_transaction(&tx) {
                Ok(receipt) => {
                    let merged = tx
                        .outputs()
                        .first()
                        .and_then(|out| out.amount().map(|amount| (out, amount)))
                        .map(|(out, amount)| {
                            Utxo::fungible(receipt.blknum, receipt.txindex, 0, out.owner, out.currency, amount)
                        })
                        .ok_or_else(|| PlasmaError::InvalidArgument("merge transaction without output".into()))?;
                    self.pending_utxos.push(merged);
                }
                Err(error) => {
                    warn!("round {}: merge submission failed: {error}", self.round);
                    self.failed_submissions.push(FailedSubmission {
                        round: self.round,
                        transaction: tx,
                        error,
                    });
                }
            }
        }

        self.prepare_round()?;
        Ok(self.state)
    }

    /// Sign and process rounds until nothing is left to merge.
    pub fn run(&mut self, signer: &dyn Signer) -> Result<ConsolidationState, PlasmaError> {
        while self.can_merge() {
            self.sign_transactions(signer)?;
            self.process_transactions()?;
        }
        Ok(self.state)
    }

    pub fn state(&self) -> ConsolidationState {
        self.state
    }

    pub fn can_merge(&self) -> bool {
        !self.transactions.is_empty()
    }

    pub fn all_consolidated(&self) -> bool {
        self.merged_utxo
            .as_ref()
            .map_or(false, |u| u.amount() == Some(self.target_balance))
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Queued transactions, for signing with an external signer.
    pub fn transactions_mut(&mut self) -> &mut [Transaction] {
        &mut self.transactions
    }

    pub fn pending_utxos(&self) -> &[Utxo] {
        &self.pending_utxos
    }

    pub fn merged_utxo(&self) -> Option<&Utxo> {
        self.merged_utxo.as_ref()
    }

    pub fn failed_submissions(&self) -> &[FailedSubmission] {
        &self.failed_submissions
    }

    pub fn round(&self) -> usize {
        self.round
    }

    pub fn target_balance(&self) -> U256 {
        self.target_balance
    }
}
