//! Change-making over the catalog denominations.
//!
//! A greedy pass (largest denomination first) answers almost every real coin
//! set. When it leaves a remainder, a fewest-coins search over the same
//! denominations decides whether the amount is representable at all.

use crate::Amount;
use crate::model::Denomination;

/// Largest amount, in multiples of the denominations' common step, the exact search will visit.
const SEARCH_LIMIT: i64 = 100_000;

/// Change handed back for an owed amount.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Change {
    /// Coins and notes, highest value first.
    pub coins: Vec<Denomination>,
    /// Part of the owed amount that could not be covered.
    pub remainder: Amount,
}

impl Change {
    pub fn is_exact(&self) -> bool {
        self.remainder.is_zero()
    }
}

/// Compute change for `owed` from `denominations`, which must be ordered by descending value.
///
/// Every denomination is assumed to be in unlimited supply. Denominations
/// without a positive value are never handed out. When no exact combination
/// exists the greedy partial result is returned with a non-zero remainder.
pub fn make_change(owed: Amount, denominations: &[Denomination]) -> Change {
    debug_assert!(denominations.windows(2).all(|w| w[0].value >= w[1].value));

    if !owed.is_positive() {
        return Change::default();
    }

    let (counts, remainder) = greedy(owed.scaled(), denominations);
    let (counts, remainder) = if remainder == 0 {
        (counts, remainder)
    } else {
        match fewest_coins(owed.scaled(), denominations) {
            Some(counts) => (counts, 0),
            None => (counts, remainder),
        }
    };

    let coins = denominations
        .iter()
        .zip(counts)
        .flat_map(|(denomination, count)| std::iter::repeat_n(denomination, count))
        .cloned()
        .collect();

    Change {
        coins,
        remainder: Amount::from_scaled(remainder),
    }
}

fn greedy(owed: i64, denominations: &[Denomination]) -> (Vec<usize>, i64) {
    let mut remaining = owed;
    let counts = denominations
        .iter()
        .map(|denomination| {
            let value = denomination.value.scaled();
            if value <= 0 {
                return 0;
            }
            let count = remaining / value;
            remaining -= count * value;
            count as usize
        })
        .collect();
    (counts, remaining)
}

/// Fewest-coins combination summing exactly to `owed`, if one exists within [`SEARCH_LIMIT`].
fn fewest_coins(owed: i64, denominations: &[Denomination]) -> Option<Vec<usize>> {
    let step = denominations
        .iter()
        .map(|d| d.value.scaled())
        .filter(|&value| value > 0)
        .fold(0, gcd);
    if step == 0 || owed % step != 0 || owed / step > SEARCH_LIMIT {
        return None;
    }

    let target = (owed / step) as usize;
    let units: Vec<usize> = denominations
        .iter()
        .map(|d| (d.value.scaled().max(0) / step) as usize)
        .collect();

    // fewest[n]: coins needed for n steps, last[n]: denomination placed last
    let mut fewest = vec![u32::MAX; target + 1];
    let mut last = vec![0usize; target + 1];
    fewest[0] = 0;
    for n in 1..=target {
        for (idx, &size) in units.iter().enumerate() {
            if size == 0 || size > n || fewest[n - size] == u32::MAX {
                continue;
            }
            if fewest[n - size] + 1 < fewest[n] {
                fewest[n] = fewest[n - size] + 1;
                last[n] = idx;
            }
        }
    }

    if fewest[target] == u32::MAX {
        return None;
    }

    let mut counts = vec![0; denominations.len()];
    let mut n = target;
    while n > 0 {
        let idx = last[n];
        counts[idx] += 1;
        n -= units[idx];
    }
    Some(counts)
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}
