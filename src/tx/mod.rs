//! Plasma transactions.
//!
//! A transaction has four input slots and four output slots. Only the
//! populated slots are stored; the encoder pads the rest with empty
//! sentinels so the wire shape is always fixed (see [`encoding`]).
//!
//! Signatures are keyed by the owner of each input: signing with one key
//! fills every slot that owner spends.

pub mod builder;
pub mod encoding;

use ethereum_types::{Address, U256};

use crate::error::PlasmaError;
use crate::types::{keccak256, Signature, ZERO_ADDRESS};
use crate::utxo::Utxo;

pub const MAX_INPUTS: usize = 4;
pub const MAX_OUTPUTS: usize = 4;

/// Reference to the output being spent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionInput {
    pub blknum: u64,
    pub txindex: u16,
    pub oindex: u16,
}

impl TransactionInput {
    pub const EMPTY: Self = Self {
        blknum: 0,
        txindex: 0,
        oindex: 0,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl From<&Utxo> for TransactionInput {
    fn from(utxo: &Utxo) -> Self {
        Self {
            blknum: utxo.blknum,
            txindex: utxo.txindex,
            oindex: utxo.oindex,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub owner: Address,
    pub currency: Address,
    pub value: OutputValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputValue {
    Fungible(U256),
    /// Not encodable yet.
    NonFungible(Vec<U256>),
}

impl TransactionOutput {
    pub fn fungible(owner: Address, currency: Address, amount: U256) -> Self {
        Self {
            owner,
            currency,
            value: OutputValue::Fungible(amount),
        }
    }

    pub fn empty() -> Self {
        Self::fungible(ZERO_ADDRESS, ZERO_ADDRESS, U256::zero())
    }

    pub fn is_empty(&self) -> bool {
        self.owner.is_zero()
            && self.currency.is_zero()
            && self.value == OutputValue::Fungible(U256::zero())
    }

    pub fn amount(&self) -> Option<U256> {
        match &self.value {
            OutputValue::Fungible(amount) => Some(*amount),
            OutputValue::NonFungible(_) => None,
        }
    }
}

/// In-memory transaction. Build with [`add_input`](Self::add_input) /
/// [`add_output`](Self::add_output), sign, then encode.
///
/// Equality compares what goes on the wire: inputs, outputs and
/// signatures. Input owners and the currency lock are build-time
/// bookkeeping and do not survive a decode.
#[derive(Debug, Clone, Default)]
pub struct Transaction {
    inputs: Vec<TransactionInput>,
    /// Owner of each input; `None` for inputs that came off the wire.
    senders: Vec<Option<Address>>,
    signatures: Vec<Option<Signature>>,
    outputs: Vec<TransactionOutput>,
    currency: Option<Address>,
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.inputs == other.inputs
            && self.outputs == other.outputs
            && self.signatures == other.signatures
    }
}

impl Eq for Transaction {}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spend `utxo`. All inputs added this way must share one currency.
    pub fn add_input(&mut self, utxo: &Utxo) -> Result<(), PlasmaError> {
        if let Some(expected) = self.currency {
            if expected != utxo.currency {
                return Err(PlasmaError::MixedCurrency {
                    expected,
                    found: utxo.currency,
                });
            }
        }
        self.push_input(TransactionInput::from(utxo), Some(utxo.owner))?;
        self.currency = Some(utxo.currency);
        Ok(())
    }

    /// Spend a bare position; the owner is unknown, so only
    /// [`set_signature_at`](Self::set_signature_at) can sign it.
    pub fn add_raw_input(&mut self, input: TransactionInput) -> Result<(), PlasmaError> {
        self.push_input(input, None)
    }

    fn push_input(
        &mut self,
        input: TransactionInput,
        sender: Option<Address>,
    ) -> Result<(), PlasmaError> {
        if self.inputs.len() >= MAX_INPUTS {
            return Err(PlasmaError::CapacityExceeded {
                kind: "inputs",
                max: MAX_INPUTS,
            });
        }
        if input.is_empty() {
            return Err(PlasmaError::InvalidArgument(
                "input at position 0 is the empty sentinel".into(),
            ));
        }
        self.inputs.push(input);
        self.senders.push(sender);
        self.signatures.push(None);
        Ok(())
    }

    pub fn add_output(&mut self, output: TransactionOutput) -> Result<(), PlasmaError> {
        if self.outputs.len() >= MAX_OUTPUTS {
            return Err(PlasmaError::CapacityExceeded {
                kind: "outputs",
                max: MAX_OUTPUTS,
            });
        }
        if output.is_empty() {
            return Err(PlasmaError::InvalidArgument(format!(
                "output {} is the empty sentinel",
                self.outputs.len()
            )));
        }
        self.outputs.push(output);
        Ok(())
    }

    /// Assign `signature` to every input owned by `owner`. Returns `false`
    /// if `owner` spends none of the inputs.
    pub fn set_signature(&mut self, owner: &Address, signature: Signature) -> bool {
        let mut found = false;
        for (sender, slot) in self.senders.iter().zip(self.signatures.iter_mut()) {
            if sender.as_ref() == Some(owner) {
                *slot = Some(signature);
                found = true;
            }
        }
        found
    }

    pub fn set_signature_at(
        &mut self,
        index: usize,
        signature: Signature,
    ) -> Result<(), PlasmaError> {
        let slot = self.signatures.get_mut(index).ok_or_else(|| {
            PlasmaError::InvalidArgument(format!("no input at index {index} to sign"))
        })?;
        *slot = Some(signature);
        Ok(())
    }

    /// Sign the raw encoding with `signer` and attach the signature to the
    /// signer's inputs.
    pub fn sign_with(&mut self, signer: &dyn crate::signer::Signer) -> Result<(), PlasmaError> {
        let raw = self.encode_raw()?;
        let signature = signer.sign(&raw)?;
        let address = signer.address();
        if !self.set_signature(&address, signature) {
            return Err(PlasmaError::UnknownSigner(address));
        }
        Ok(())
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn signatures(&self) -> &[Option<Signature>] {
        &self.signatures
    }

    /// Currency of the inputs, if they were added from UTXOs.
    pub fn currency(&self) -> Option<Address> {
        self.currency
    }

    /// Distinct input owners, in input order.
    pub fn senders(&self) -> Vec<Address> {
        let mut out: Vec<Address> = Vec::new();
        for sender in self.senders.iter().flatten() {
            if !out.contains(sender) {
                out.push(*sender);
            }
        }
        out
    }

    pub fn is_fully_signed(&self) -> bool {
        self.signatures.iter().all(Option::is_some)
    }

    /// Child-chain transaction hash: keccak256 of the raw encoding. This is
    /// also the digest signers sign.
    pub fn hash(&self) -> Result<[u8; 32], PlasmaError> {
        Ok(keccak256(&self.encode_raw()?))
    }
}
