//! Transfer and merge transaction construction.

use ethereum_types::{Address, U256};

use super::{Transaction, TransactionOutput, MAX_INPUTS};
use crate::error::PlasmaError;
use crate::selection::select_inputs;
use crate::types::address_hex;
use crate::utxo::{total_amount, Utxo};

/// Transfer `amount` of `currency` from `sender` to `recipient`, picking
/// inputs from `utxos` with [`select_inputs`].
pub fn build(
    sender: Address,
    recipient: Address,
    currency: Address,
    amount: U256,
    utxos: &[Utxo],
) -> Result<Transaction, PlasmaError> {
    let inputs = select_inputs(sender, currency, amount, utxos)?;
    build_transfer(sender, recipient, currency, amount, &inputs)
}

/// Transfer spending exactly `inputs`. Output 0 pays the recipient; the
/// change, if any, goes back to `sender` in output 1.
pub fn build_transfer(
    sender: Address,
    recipient: Address,
    currency: Address,
    amount: U256,
    inputs: &[Utxo],
) -> Result<Transaction, PlasmaError> {
    if amount.is_zero() {
        return Err(PlasmaError::InvalidArgument("transfer amount is zero".into()));
    }
    let available = check_inputs(sender, currency, inputs)?;
    if available < amount {
        return Err(PlasmaError::InsufficientFunds {
            required: amount,
            available,
        });
    }

    let mut tx = Transaction::new();
    for utxo in inputs {
        tx.add_input(utxo)?;
    }
    tx.add_output(TransactionOutput::fungible(recipient, currency, amount))?;
    let change = available - amount;
    if !change.is_zero() {
        tx.add_output(TransactionOutput::fungible(sender, currency, change))?;
    }

    log::debug!(
        "built transfer of {} from {} to {} ({} inputs, change {})",
        amount,
        address_hex(&sender),
        address_hex(&recipient),
        inputs.len(),
        change
    );
    Ok(tx)
}

/// Merge `inputs` into a single output owned by `owner`.
pub fn build_merge(
    owner: Address,
    currency: Address,
    inputs: &[Utxo],
) -> Result<Transaction, PlasmaError> {
    let total = check_inputs(owner, currency, inputs)?;

    let mut tx = Transaction::new();
    for utxo in inputs {
        tx.add_input(utxo)?;
    }
    tx.add_output(TransactionOutput::fungible(owner, currency, total))?;
    Ok(tx)
}

/// Shared input checks; returns the summed amount.
fn check_inputs(owner: Address, currency: Address, inputs: &[Utxo]) -> Result<U256, PlasmaError> {
    if inputs.is_empty() {
        return Err(PlasmaError::NoInputs);
    }
    if inputs.len() > MAX_INPUTS {
        return Err(PlasmaError::CapacityExceeded {
            kind: "inputs",
            max: MAX_INPUTS,
        });
    }
    for utxo in inputs {
        if utxo.currency != currency {
            return Err(PlasmaError::MixedCurrency {
                expected: currency,
                found: utxo.currency,
            });
        }
        if utxo.owner != owner {
            return Err(PlasmaError::InvalidArgument(format!(
                "input {}/{}/{} is owned by {}",
                utxo.blknum,
                utxo.txindex,
                utxo.oindex,
                address_hex(&utxo.owner)
            )));
        }
        if !utxo.is_fungible() {
            return Err(PlasmaError::InvalidArgument(format!(
                "input {}/{}/{} is non-fungible",
                utxo.blknum, utxo.txindex, utxo.oindex
            )));
        }
    }
    total_amount(inputs)
}
