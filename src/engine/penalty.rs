//! Row ordering by adjacency penalty.
//!
//! Penalty of one ordered row:
//!
//! | pattern                                            | cost |
//! |----------------------------------------------------|------|
//! | horizontal neighbours differing by exactly 1       | 2    |
//! | horizontal neighbours differing by exactly 2       | 1    |
//! | cell differing by exactly 1 from its column anchor | 1    |
//!
//! Column anchors are the values of the card's first row.

use crate::core::CardRng;

/// Horizontal part of the penalty.
#[must_use]
pub fn horizontal_penalty(row: &[u32]) -> u32 {
    row.windows(2)
        .map(|w| match w[0].abs_diff(w[1]) {
            1 => 2,
            2 => 1,
            _ => 0,
        })
        .sum()
}

/// Vertical part of the penalty against the column anchors.
#[must_use]
pub fn vertical_penalty(row: &[u32], anchors: &[u32]) -> u32 {
    row.iter()
        .zip(anchors)
        .filter(|(&x, &a)| x.abs_diff(a) == 1)
        .count() as u32
}

/// Full penalty; anchors are absent for the first row.
#[must_use]
pub fn row_penalty(row: &[u32], anchors: Option<&[u32]>) -> u32 {
    horizontal_penalty(row) + anchors.map_or(0, |a| vertical_penalty(row, a))
}

/// Searches random shuffles of a row for the lowest-penalty ordering.
#[derive(Clone, Copy, Debug)]
pub struct RowOrderer {
    shuffles: u32,
}

impl RowOrderer {
    /// Try up to `shuffles` random orderings per row.
    #[must_use]
    pub fn new(shuffles: u32) -> Self {
        Self { shuffles }
    }

    /// Best ordering of `values` found, with its penalty.
    ///
    /// Orderings are ranked by `(penalty, load(ordering))`; pass a load of
    /// zero to rank by penalty alone. The search keeps the best ordering
    /// seen and stops early once both parts reach zero.
    pub fn order<F>(
        &self,
        values: &[u32],
        anchors: Option<&[u32]>,
        rng: &mut CardRng,
        load: F,
    ) -> (Vec<u32>, u32)
    where
        F: Fn(&[u32]) -> u32,
    {
        let mut best = values.to_vec();
        let mut best_key = (row_penalty(&best, anchors), load(&best));

        let mut candidate = values.to_vec();
        for _ in 0..self.shuffles {
            if best_key == (0, 0) {
                break;
            }
            rng.shuffle(&mut candidate);
            let key = (row_penalty(&candidate, anchors), load(&candidate));
            if key < best_key {
                best_key = key;
                best.copy_from_slice(&candidate);
            }
        }

        (best, best_key.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RngEngine;

    #[test]
    fn test_horizontal_penalty() {
        assert_eq!(horizontal_penalty(&[1, 2, 4]), 3);
        assert_eq!(horizontal_penalty(&[10, 20, 30]), 0);
        assert_eq!(horizontal_penalty(&[5]), 0);
        assert_eq!(horizontal_penalty(&[7, 6, 8]), 2 + 1);
    }

    #[test]
    fn test_vertical_penalty() {
        assert_eq!(vertical_penalty(&[2, 10, 31], &[1, 12, 30]), 2);
        assert_eq!(row_penalty(&[2, 10], Some(&[1, 12])), 1);
        assert_eq!(row_penalty(&[2, 10], None), 0);
    }

    #[test]
    fn test_orderer_finds_zero_penalty() {
        let orderer = RowOrderer::new(200);
        let mut rng = CardRng::new(RngEngine::ChaCha8, 7);

        // Already zero: returned untouched.
        let (row, penalty) = orderer.order(&[10, 20, 5], None, &mut rng, |_| 0);
        assert_eq!(penalty, 0);
        assert_eq!(row, vec![10, 20, 5]);

        let (row, penalty) = orderer.order(&[1, 2, 10, 11], None, &mut rng, |_| 0);
        assert_eq!(penalty, 0);
        assert_eq!(row_penalty(&row, None), 0);
        let mut sorted = row.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 10, 11]);
    }

    #[test]
    fn test_orderer_respects_anchors() {
        let orderer = RowOrderer::new(200);
        let mut rng = CardRng::new(RngEngine::ChaCha8, 11);

        let anchors = [21, 41, 61];
        let (row, penalty) = orderer.order(&[20, 40, 60], Some(&anchors), &mut rng, |_| 0);
        assert_eq!(penalty, 0);
        assert_eq!(vertical_penalty(&row, &anchors), 0);
    }

    #[test]
    fn test_orderer_uses_load_as_tie_break() {
        let orderer = RowOrderer::new(500);
        let mut rng = CardRng::new(RngEngine::ChaCha8, 3);

        // Every ordering has penalty 0; only [30, 10, 50] has load 0.
        let load = |row: &[u32]| u32::from(row != [30, 10, 50]);
        let (row, penalty) = orderer.order(&[10, 30, 50], None, &mut rng, load);
        assert_eq!(penalty, 0);
        assert_eq!(row, vec![30, 10, 50]);
    }

    #[test]
    fn test_orderer_with_zero_shuffles_keeps_input() {
        let orderer = RowOrderer::new(0);
        let mut rng = CardRng::new(RngEngine::ChaCha8, 1);
        let (row, penalty) = orderer.order(&[1, 2, 3], None, &mut rng, |_| 0);
        assert_eq!(row, vec![1, 2, 3]);
        assert_eq!(penalty, 4);
    }
}
