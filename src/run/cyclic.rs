//! Deterministic cyclic construction.
//!
//! Card `t` holds `((i * n + j + t * k) mod R) + 1` at row `i`, column `j`,
//! for a step `k` coprime to `R`. No randomness, no registries. Usage counts
//! are only balanced for some parameter combinations, so callers that need
//! a particular frequency plan must check the result against it.

use crate::core::{Card, Uniformity};

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// First step coprime to `r`, searching upward from `start` and wrapping
/// past `r - 1` back to 1.
#[must_use]
pub fn coprime_step(r: u64, start: u64) -> u64 {
    if r <= 1 {
        return 1;
    }
    let mut k = (start % r).max(1);
    for _ in 0..r {
        if gcd(r, k) == 1 {
            return k;
        }
        k = (k + 1) % r;
        if k == 0 {
            k = 1;
        }
    }
    1
}

/// Build `t` cards of `m x n` cyclically, or `None` when the construction
/// does not apply.
///
/// Not applicable when strict uniformity is requested and `R` does not
/// divide `T * m * n`, when `R < m * n`, or when a row would repeat a value.
#[must_use]
pub fn build_cards_cyclic(
    r: u32,
    t: usize,
    m: usize,
    n: usize,
    uniformity: Uniformity,
) -> Option<Vec<Card>> {
    let pool = u64::from(r);
    let cells = (m as u64) * (n as u64);
    let total = (t as u64) * cells;
    if pool == 0 || pool < cells {
        return None;
    }
    if uniformity == Uniformity::Strict && total % pool != 0 {
        return None;
    }

    let k = coprime_step(pool, cells + 1);
    let mut cards = Vec::with_capacity(t);
    for card in 0..t as u64 {
        let mut rows = Vec::with_capacity(m);
        for i in 0..m as u64 {
            let row: Vec<u32> = (0..n as u64)
                .map(|j| ((i * n as u64 + j + card * k) % pool) as u32 + 1)
                .collect();
            let mut distinct = row.clone();
            distinct.sort_unstable();
            distinct.dedup();
            if distinct.len() != row.len() {
                return None;
            }
            rows.push(row);
        }
        cards.push(Card::new(rows));
    }
    Some(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coprime_step() {
        assert_eq!(coprime_step(12, 7), 7);
        assert_eq!(coprime_step(12, 8), 11);
        // A start that is a multiple of r maps to 1.
        assert_eq!(coprime_step(6, 6), 1);
        assert_eq!(coprime_step(1, 5), 1);
    }

    #[test]
    fn test_not_applicable_when_pool_too_small() {
        assert!(build_cards_cyclic(5, 2, 2, 3, Uniformity::Strict).is_none());
        assert!(build_cards_cyclic(5, 2, 2, 3, Uniformity::Near).is_none());
    }

    #[test]
    fn test_not_applicable_when_strict_indivisible() {
        // P = 18, R = 12.
        assert!(build_cards_cyclic(12, 3, 2, 3, Uniformity::Strict).is_none());
        assert!(build_cards_cyclic(12, 3, 2, 3, Uniformity::Near).is_some());
    }

    #[test]
    fn test_cyclic_shapes_and_values() {
        let cards = build_cards_cyclic(12, 4, 2, 3, Uniformity::Strict).unwrap();
        assert_eq!(cards.len(), 4);
        for card in &cards {
            assert_eq!(card.shape(), (2, 3));
            assert!(!card.has_internal_duplicate());
            assert!(card.values().all(|x| (1..=12).contains(&x)));
        }
        // k = 7: card 1 starts at index 7.
        assert_eq!(cards[1].rows()[0], vec![8, 9, 10]);
        assert_eq!(cards[1].rows()[1], vec![11, 12, 1]);
    }

    #[test]
    fn test_cyclic_is_deterministic() {
        let a = build_cards_cyclic(20, 5, 3, 4, Uniformity::Near).unwrap();
        let b = build_cards_cyclic(20, 5, 3, 4, Uniformity::Near).unwrap();
        assert_eq!(a, b);
    }
}
