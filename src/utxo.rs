//! UTXO and balance data as reported by the watcher.
//!
//! The watcher's JSON shape decides the variant: an `amount` field means a
//! fungible output, `tokenid` (or `tokenids` for balances) a non-fungible one.

use ethereum_types::{Address, U256};
use serde::Deserialize;

use crate::error::PlasmaError;
use crate::types::{self, Position};

/// Unspent transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    pub blknum: u64,
    pub txindex: u16,
    pub oindex: u16,
    pub owner: Address,
    pub currency: Address,
    pub value: UtxoValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtxoValue {
    Fungible { amount: U256 },
    NonFungible { token_ids: Vec<U256> },
}

impl Utxo {
    pub fn fungible(
        blknum: u64,
        txindex: u16,
        oindex: u16,
        owner: Address,
        currency: Address,
        amount: U256,
    ) -> Self {
        Self {
            blknum,
            txindex,
            oindex,
            owner,
            currency,
            value: UtxoValue::Fungible { amount },
        }
    }

    pub fn position(&self) -> Result<Position, PlasmaError> {
        Position::compose(self.blknum, self.txindex, self.oindex)
    }

    /// `None` for non-fungible outputs.
    pub fn amount(&self) -> Option<U256> {
        match &self.value {
            UtxoValue::Fungible { amount } => Some(*amount),
            UtxoValue::NonFungible { .. } => None,
        }
    }

    pub fn is_fungible(&self) -> bool {
        matches!(self.value, UtxoValue::Fungible { .. })
    }
}

/// Wire shape of one `account.get_utxos` entry.
#[derive(Debug, Deserialize)]
struct RawUtxo {
    blknum: u64,
    txindex: u16,
    oindex: u16,
    owner: Address,
    currency: Address,
    #[serde(default, deserialize_with = "types::de_opt_position")]
    utxo_pos: Option<Position>,
    #[serde(default, deserialize_with = "types::de_opt_u256")]
    amount: Option<U256>,
    #[serde(default, deserialize_with = "types::de_opt_u256_vec")]
    tokenid: Option<Vec<U256>>,
}

impl TryFrom<RawUtxo> for Utxo {
    type Error = String;

    fn try_from(raw: RawUtxo) -> Result<Self, Self::Error> {
        let value = match (raw.amount, raw.tokenid) {
            (Some(amount), _) => UtxoValue::Fungible { amount },
            (None, Some(token_ids)) => UtxoValue::NonFungible { token_ids },
            (None, None) => {
                return Err("unsupported utxo format: neither amount nor tokenid".into());
            }
        };

        let utxo = Utxo {
            blknum: raw.blknum,
            txindex: raw.txindex,
            oindex: raw.oindex,
            owner: raw.owner,
            currency: raw.currency,
            value,
        };

        if let Some(reported) = raw.utxo_pos {
            let computed = utxo.position().map_err(|e| e.to_string())?;
            if computed != reported {
                return Err(format!(
                    "utxo_pos {reported} does not match blknum/txindex/oindex ({computed})"
                ));
            }
        }

        Ok(utxo)
    }
}

impl<'de> Deserialize<'de> for Utxo {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawUtxo::deserialize(deserializer)?;
        Utxo::try_from(raw).map_err(serde::de::Error::custom)
    }
}

/// Per-currency balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balance {
    pub currency: Address,
    pub value: BalanceValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceValue {
    Fungible { amount: U256 },
    NonFungible { token_ids: Vec<U256> },
}

impl Balance {
    pub fn amount(&self) -> Option<U256> {
        match &self.value {
            BalanceValue::Fungible { amount } => Some(*amount),
            BalanceValue::NonFungible { .. } => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawBalance {
    currency: Address,
    #[serde(default, deserialize_with = "types::de_opt_u256")]
    amount: Option<U256>,
    #[serde(default, deserialize_with = "types::de_opt_u256_vec")]
    tokenids: Option<Vec<U256>>,
}

impl<'de> Deserialize<'de> for Balance {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawBalance::deserialize(deserializer)?;
        let value = match (raw.amount, raw.tokenids) {
            (Some(amount), _) => BalanceValue::Fungible { amount },
            (None, Some(token_ids)) => BalanceValue::NonFungible { token_ids },
            (None, None) => {
                return Err(serde::de::Error::custom(
                    "unsupported balance format: neither amount nor tokenids",
                ));
            }
        };
        Ok(Balance {
            currency: raw.currency,
            value,
        })
    }
}

/// Sum of fungible amounts; non-fungible entries are skipped.
pub fn total_amount<'a>(utxos: impl IntoIterator<Item = &'a Utxo>) -> Result<U256, PlasmaError> {
    utxos
        .into_iter()
        .filter_map(Utxo::amount)
        .try_fold(U256::zero(), |acc, a| acc.checked_add(a))
        .ok_or_else(|| PlasmaError::InvalidArgument("sum of utxo amounts overflows 256 bits".into()))
}
