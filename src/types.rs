//! Core types: UTXO positions, signatures, keccak hashing, address and
//! amount parsing.

use ethereum_types::{Address, H256, U256};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sha3::{Digest, Keccak256};

use crate::error::PlasmaError;

pub const ZERO_ADDRESS: Address = ethereum_types::H160([0u8; 20]);

const BLOCK_OFFSET: u128 = 1_000_000_000;
const TX_OFFSET: u128 = 10_000;

/// Single integer identifying an output:
/// `blknum * 10^9 + txindex * 10^4 + oindex`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(pub u128);

impl Position {
    pub fn compose(blknum: u64, txindex: u16, oindex: u16) -> Result<Self, PlasmaError> {
        if u128::from(oindex) >= TX_OFFSET {
            return Err(PlasmaError::InvalidPosition(format!(
                "output index {oindex} must be below {TX_OFFSET}"
            )));
        }
        // u16 txindex always stays below 10^5, so blocks never overlap.
        Ok(Self(
            u128::from(blknum) * BLOCK_OFFSET + u128::from(txindex) * TX_OFFSET + u128::from(oindex),
        ))
    }

    /// Inverse of [`compose`](Self::compose): `(blknum, txindex, oindex)`.
    pub fn decompose(self) -> Result<(u64, u16, u16), PlasmaError> {
        let blknum = u64::try_from(self.0 / BLOCK_OFFSET).map_err(|_| {
            PlasmaError::InvalidPosition(format!("block number of {} overflows u64", self.0))
        })?;
        let rest = self.0 % BLOCK_OFFSET;
        let txindex = u16::try_from(rest / TX_OFFSET).map_err(|_| {
            PlasmaError::InvalidPosition(format!("tx index of {} overflows u16", self.0))
        })?;
        let oindex = (rest % TX_OFFSET) as u16;
        Ok((blknum, txindex, oindex))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 65-byte recoverable secp256k1 signature, `r || s || v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; 65]);

impl Signature {
    pub const LEN: usize = 65;

    pub fn from_slice(bytes: &[u8]) -> Result<Self, PlasmaError> {
        let sig: [u8; 65] = bytes.try_into().map_err(|_| {
            PlasmaError::InvalidArgument(format!(
                "signature must be {} bytes, got {}",
                Self::LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(sig))
    }

    pub fn from_hex(s: &str) -> Result<Self, PlasmaError> {
        let bytes = decode_hex(s)?;
        Self::from_slice(&bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `0x`-prefixed lowercase hex.
pub fn to_hex(data: &[u8]) -> String {
    format!("0x{}", hex::encode(data))
}

/// Accepts hex with or without the `0x` prefix.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, PlasmaError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(digits).map_err(|e| PlasmaError::InvalidArgument(format!("bad hex {s:?}: {e}")))
}

pub fn parse_address(s: &str) -> Result<Address, PlasmaError> {
    let bytes = decode_hex(s)?;
    if bytes.len() != 20 {
        return Err(PlasmaError::InvalidArgument(format!(
            "address must be 20 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}

/// Full `0x...` form; `Display` on `Address` abbreviates.
pub fn address_hex(address: &Address) -> String {
    to_hex(address.as_bytes())
}

/// Parse a decimal or `0x`-hex amount string.
pub fn parse_amount(s: &str) -> Result<U256, PlasmaError> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some("") => Err("no hex digits".to_string()),
        None if s.is_empty() => Err("empty string".to_string()),
        Some(digits) => U256::from_str_radix(digits, 16).map_err(|e| format!("{e:?}")),
        None => U256::from_dec_str(s).map_err(|e| format!("{e:?}")),
    };
    parsed.map_err(|e| PlasmaError::InvalidArgument(format!("bad amount {s:?}: {e}")))
}

/// Watcher numbers arrive as JSON integers of any size, decimal strings or
/// hex strings. `serde_json` keeps the digits of large integers intact
/// (`arbitrary_precision`), so they go through [`parse_amount`] as text.
fn value_to_u256<E: serde::de::Error>(value: Value) -> Result<U256, E> {
    match value {
        Value::Number(n) => parse_amount(&n.to_string()).map_err(E::custom),
        Value::String(s) => parse_amount(&s).map_err(E::custom),
        other => Err(E::custom(format!("expected a number, got {other}"))),
    }
}

pub(crate) fn de_opt_u256<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Value>::deserialize(deserializer)?
        .map(value_to_u256)
        .transpose()
}

pub(crate) fn de_opt_u256_vec<'de, D>(deserializer: D) -> Result<Option<Vec<U256>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<Value>>::deserialize(deserializer)?
        .map(|ids| ids.into_iter().map(value_to_u256).collect())
        .transpose()
}

pub(crate) fn de_opt_position<'de, D>(deserializer: D) -> Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = de_opt_u256(deserializer)?;
    value
        .map(|v| {
            if v.bits() > 128 {
                return Err(serde::de::Error::custom(format!("position {v} too large")));
            }
            Ok(Position(v.as_u128()))
        })
        .transpose()
}

pub(crate) fn de_position<'de, D>(deserializer: D) -> Result<Position, D::Error>
where
    D: Deserializer<'de>,
{
    de_opt_position(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing position"))
}

pub(crate) fn de_hex_bytes<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    decode_hex(&s).map_err(serde::de::Error::custom)
}

pub(crate) fn de_signature<'de, D>(deserializer: D) -> Result<Signature, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Signature::from_hex(&s).map_err(serde::de::Error::custom)
}

/// Where the child chain put a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionReceipt {
    pub blknum: u64,
    pub txindex: u16,
    pub txhash: H256,
}
