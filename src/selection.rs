//! Coin selection.
//!
//! Finds the input set whose sum covers an amount with the smallest
//! overshoot. Singles and pairs are searched exhaustively with a two-pointer
//! scan over the sorted amounts; a synthetic zero at the front lets the same
//! scan consider single UTXOs. Only when no pair covers the amount do we fall
//! back to three or four inputs.

use ethereum_types::{Address, U256};

use crate::error::PlasmaError;
use crate::tx::MAX_INPUTS;
use crate::utxo::Utxo;

/// Pick inputs owned by `owner` in `currency` covering `amount`.
///
/// The result is ordered by ascending amount.
pub fn select_inputs(
    owner: Address,
    currency: Address,
    amount: U256,
    utxos: &[Utxo],
) -> Result<Vec<Utxo>, PlasmaError> {
    if amount.is_zero() {
        return Err(PlasmaError::InvalidArgument("amount to select is zero".into()));
    }

    let mut candidates: Vec<&Utxo> = utxos
        .iter()
        .filter(|u| u.owner == owner && u.currency == currency)
        .filter(|u| u.amount().map_or(false, |a| !a.is_zero()))
        .collect();
    // stable: equal amounts keep watcher order
    candidates.sort_by_key(|u| u.amount().unwrap_or_default());

    // only compared and reported, so a saturated total is still correct
    let available = candidates
        .iter()
        .filter_map(|u| u.amount())
        .fold(U256::zero(), |acc, a| acc.saturating_add(a));
    if available < amount {
        return Err(PlasmaError::InsufficientFunds {
            required: amount,
            available,
        });
    }

    let amounts: Vec<U256> = candidates
        .iter()
        .map(|u| u.amount().unwrap_or_default())
        .collect();

    if let Some(picked) = best_pair(&amounts, amount).or_else(|| best_of_largest(&amounts, amount)) {
        log::debug!(
            "selected {} of {} utxos covering {}",
            picked.len(),
            candidates.len(),
            amount
        );
        return Ok(picked.into_iter().map(|i| candidates[i].clone()).collect());
    }

    Err(PlasmaError::InsufficientSingleTxFunds {
        required: amount,
        available,
    })
}

/// Minimum-overshoot single or pair, as indices into `amounts` (sorted
/// ascending).
fn best_pair(amounts: &[U256], target: U256) -> Option<Vec<usize>> {
    // slot 0 is the synthetic zero; slot i + 1 is amounts[i]
    let value = |slot: usize| if slot == 0 { U256::zero() } else { amounts[slot - 1] };

    let mut best: Option<(U256, usize, usize)> = None;
    let (mut left, mut right) = (0usize, amounts.len());
    while left < right {
        let sum = value(left).saturating_add(value(right));
        if sum >= target {
            if best.map_or(true, |(b, _, _)| sum < b) {
                best = Some((sum, left, right));
            }
            if sum == target {
                break;
            }
            right -= 1;
        } else {
            left += 1;
        }
    }

    best.map(|(_, left, right)| {
        if left == 0 {
            vec![right - 1]
        } else {
            vec![left - 1, right - 1]
        }
    })
}

/// Fallback for three or more inputs: start from the `k` largest amounts
/// and swap each pick for the smallest unused amount that keeps the sum
/// covering `target`.
fn best_of_largest(amounts: &[U256], target: U256) -> Option<Vec<usize>> {
    for k in 3..=MAX_INPUTS.min(amounts.len()) {
        let mut picked: Vec<usize> = (amounts.len() - k..amounts.len()).collect();
        let mut sum = picked
            .iter()
            .fold(U256::zero(), |acc, &i| acc.saturating_add(amounts[i]));
        if sum < target {
            continue;
        }

        for slot in 0..k {
            let rest = sum - amounts[picked[slot]];
            let replacement = (0..amounts.len())
                .filter(|i| !picked.contains(i))
                .find(|&i| rest.saturating_add(amounts[i]) >= target);
            if let Some(i) = replacement {
                if amounts[i] < amounts[picked[slot]] {
                    picked[slot] = i;
                    sum = rest + amounts[i];
                }
            }
        }

        picked.sort_unstable();
        return Some(picked);
    }
    None
}
