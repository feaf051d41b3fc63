//! RLP wire format, protocol version 0.1.
//!
//! ```text
//! raw    = [inputs[4], outputs[4]]
//! signed = [signatures[4], inputs[4], outputs[4]]
//! input  = [blknum, txindex, oindex]
//! output = [owner, currency, amount]
//! ```
//!
//! Unused slots carry empty sentinels: `[0, 0, 0]` for inputs, zero
//! addresses and a zero amount for outputs, and an empty string for
//! signatures. Decoding only accepts the canonical form, so a decoded
//! transaction re-encodes to the same bytes.

use ethereum_types::{Address, U256};
use rlp::{Rlp, RlpStream};

use super::{OutputValue, Transaction, TransactionInput, TransactionOutput, MAX_INPUTS, MAX_OUTPUTS};
use crate::error::PlasmaError;
use crate::types::{decode_hex, to_hex, Signature};

pub const PROTOCOL_VERSION: &str = "0.1";

impl Transaction {
    /// Unsigned encoding; this is what gets signed.
    pub fn encode_raw(&self) -> Result<Vec<u8>, PlasmaError> {
        let mut stream = RlpStream::new_list(2);
        append_inputs(&mut stream, self.inputs());
        append_outputs(&mut stream, self.outputs())?;
        Ok(stream.out().to_vec())
    }

    /// Signed encoding. Every populated input must carry a signature.
    pub fn encode_signed(&self) -> Result<Vec<u8>, PlasmaError> {
        if let Some(index) = self.signatures().iter().position(Option::is_none) {
            return Err(PlasmaError::MissingSignature { index });
        }

        let mut stream = RlpStream::new_list(3);
        stream.begin_list(MAX_INPUTS);
        for slot in 0..MAX_INPUTS {
            match self.signatures().get(slot).copied().flatten() {
                Some(signature) => {
                    stream.append(&signature.0.to_vec());
                }
                None => {
                    stream.append_empty_data();
                }
            }
        }
        append_inputs(&mut stream, self.inputs());
        append_outputs(&mut stream, self.outputs())?;
        Ok(stream.out().to_vec())
    }

    /// `0x`-hex of [`encode_signed`](Self::encode_signed), the form
    /// `transaction.submit` expects.
    pub fn encode_signed_hex(&self) -> Result<String, PlasmaError> {
        Ok(to_hex(&self.encode_signed()?))
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PlasmaError> {
        decode(bytes)
    }

    pub fn decode_hex(s: &str) -> Result<Self, PlasmaError> {
        let bytes = decode_hex(s)?;
        decode(&bytes)
    }
}

fn append_inputs(stream: &mut RlpStream, inputs: &[TransactionInput]) {
    stream.begin_list(MAX_INPUTS);
    for slot in 0..MAX_INPUTS {
        let input = inputs.get(slot).copied().unwrap_or(TransactionInput::EMPTY);
        stream.begin_list(3);
        stream.append(&input.blknum);
        stream.append(&input.txindex);
        stream.append(&input.oindex);
    }
}

fn append_outputs(stream: &mut RlpStream, outputs: &[TransactionOutput]) -> Result<(), PlasmaError> {
    let empty = TransactionOutput::empty();
    stream.begin_list(MAX_OUTPUTS);
    for slot in 0..MAX_OUTPUTS {
        let output = outputs.get(slot).unwrap_or(&empty);
        let amount = match &output.value {
            OutputValue::Fungible(amount) => amount,
            OutputValue::NonFungible(_) => {
                return Err(PlasmaError::NotImplemented("non-fungible output encoding"));
            }
        };
        stream.begin_list(3);
        stream.append(&output.owner);
        stream.append(&output.currency);
        stream.append(amount);
    }
    Ok(())
}

/// Decode a raw or signed transaction.
pub fn decode(bytes: &[u8]) -> Result<Transaction, PlasmaError> {
    let rlp = Rlp::new(bytes);
    let total = rlp.payload_info().map_err(PlasmaError::malformed)?.total();
    if total != bytes.len() {
        return Err(PlasmaError::MalformedEncoding(format!(
            "{} trailing bytes after transaction",
            bytes.len().saturating_sub(total)
        )));
    }
    if !rlp.is_list() {
        return Err(PlasmaError::MalformedEncoding("transaction is not a list".into()));
    }

    let (signatures, inputs_rlp, outputs_rlp) = match rlp.item_count().map_err(PlasmaError::malformed)? {
        2 => (None, at(&rlp, 0)?, at(&rlp, 1)?),
        3 => (Some(decode_signatures(&at(&rlp, 0)?)?), at(&rlp, 1)?, at(&rlp, 2)?),
        n => {
            return Err(PlasmaError::MalformedEncoding(format!(
                "expected 2 or 3 top-level items, got {n}"
            )));
        }
    };

    let inputs = decode_inputs(&inputs_rlp)?;
    let outputs = decode_outputs(&outputs_rlp)?;

    let mut tx = Transaction::new();
    for input in &inputs {
        tx.add_raw_input(*input)?;
    }
    for output in outputs {
        tx.add_output(output)?;
    }

    if let Some(signatures) = signatures {
        for (slot, signature) in signatures.into_iter().enumerate() {
            match (signature, slot < inputs.len()) {
                (Some(signature), true) => tx.set_signature_at(slot, signature)?,
                (Some(_), false) => {
                    return Err(PlasmaError::MalformedEncoding(format!(
                        "signature in slot {slot} has no input"
                    )));
                }
                (None, true) => {
                    return Err(PlasmaError::MalformedEncoding(format!(
                        "input {slot} is not signed"
                    )));
                }
                (None, false) => {}
            }
        }
    }

    Ok(tx)
}

fn at<'a>(rlp: &Rlp<'a>, index: usize) -> Result<Rlp<'a>, PlasmaError> {
    rlp.at(index).map_err(PlasmaError::malformed)
}

fn expect_list(rlp: &Rlp<'_>, len: usize, what: &str) -> Result<(), PlasmaError> {
    if !rlp.is_list() {
        return Err(PlasmaError::MalformedEncoding(format!("{what} is not a list")));
    }
    let count = rlp.item_count().map_err(PlasmaError::malformed)?;
    if count != len {
        return Err(PlasmaError::MalformedEncoding(format!(
            "{what} has {count} items, expected {len}"
        )));
    }
    Ok(())
}

fn decode_signatures(rlp: &Rlp<'_>) -> Result<Vec<Option<Signature>>, PlasmaError> {
    expect_list(rlp, MAX_INPUTS, "signature list")?;
    (0..MAX_INPUTS)
        .map(|slot| {
            let data = at(rlp, slot)?.data().map_err(PlasmaError::malformed)?;
            match data.len() {
                0 => Ok(None),
                Signature::LEN => Signature::from_slice(data).map(Some),
                n => Err(PlasmaError::MalformedEncoding(format!(
                    "signature {slot} is {n} bytes"
                ))),
            }
        })
        .collect()
}

/// Populated inputs, in order. Empty slots may only trail.
fn decode_inputs(rlp: &Rlp<'_>) -> Result<Vec<TransactionInput>, PlasmaError> {
    expect_list(rlp, MAX_INPUTS, "input list")?;
    let mut inputs = Vec::with_capacity(MAX_INPUTS);
    let mut seen_empty = false;
    for slot in 0..MAX_INPUTS {
        let item = at(rlp, slot)?;
        expect_list(&item, 3, "input")?;
        let input = TransactionInput {
            blknum: item.val_at(0).map_err(PlasmaError::malformed)?,
            txindex: item.val_at(1).map_err(PlasmaError::malformed)?,
            oindex: item.val_at(2).map_err(PlasmaError::malformed)?,
        };
        if input.is_empty() {
            seen_empty = true;
        } else if seen_empty {
            return Err(PlasmaError::MalformedEncoding(format!(
                "input {slot} follows an empty slot"
            )));
        } else {
            inputs.push(input);
        }
    }
    Ok(inputs)
}

fn decode_outputs(rlp: &Rlp<'_>) -> Result<Vec<TransactionOutput>, PlasmaError> {
    expect_list(rlp, MAX_OUTPUTS, "output list")?;
    let mut outputs = Vec::with_capacity(MAX_OUTPUTS);
    let mut seen_empty = false;
    for slot in 0..MAX_OUTPUTS {
        let item = at(rlp, slot)?;
        expect_list(&item, 3, "output")?;
        let owner: Address = item.val_at(0).map_err(PlasmaError::malformed)?;
        let currency: Address = item.val_at(1).map_err(PlasmaError::malformed)?;
        let amount: U256 = item.val_at(2).map_err(PlasmaError::malformed)?;
        let output = TransactionOutput::fungible(owner, currency, amount);
        if output.is_empty() {
            seen_empty = true;
        } else if seen_empty {
            return Err(PlasmaError::MalformedEncoding(format!(
                "output {slot} follows an empty slot"
            )));
        } else {
            outputs.push(output);
        }
    }
    Ok(outputs)
}
