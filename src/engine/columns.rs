//! Bounded column-arrangement search.
//!
//! Row 0 stays fixed. Every later row may be replaced by one of the first
//! `permutation_cap` lexicographic permutations of its own values (starting
//! from its current order). Rows are assigned depth-first; a candidate is
//! pruned as soon as it puts two values differing by exactly 1 into the same
//! column. At full depth the column-sets must also be unseen.
//!
//! Both caps trade completeness for runtime: a card that exhausts them is
//! reported as unarrangeable even if a valid arrangement exists.

use crate::core::sorted_set;
use crate::registry::SetRegistry;

/// Rearranges the rows of a card so its columns are non-adjacent and unseen.
#[derive(Clone, Copy, Debug)]
pub struct ColumnArranger {
    /// Permutations considered per row.
    pub permutation_cap: usize,
    /// Search nodes visited per card before giving up.
    pub search_cap: usize,
}

impl ColumnArranger {
    /// First satisfying arrangement of `rows`, or `None` if the bounded
    /// search finds nothing.
    #[must_use]
    pub fn arrange(&self, rows: &[Vec<u32>], registry: &SetRegistry) -> Option<Vec<Vec<u32>>> {
        let (first, rest) = rows.split_first()?;
        let choices: Vec<Vec<Vec<u32>>> = rest
            .iter()
            .map(|row| permutations(row, self.permutation_cap))
            .collect();

        let mut search = Search {
            choices: &choices,
            registry,
            budget: self.search_cap,
            current: vec![first.clone()],
        };
        if search.descend() {
            Some(search.current)
        } else {
            None
        }
    }
}

struct Search<'a> {
    choices: &'a [Vec<Vec<u32>>],
    registry: &'a SetRegistry,
    budget: usize,
    current: Vec<Vec<u32>>,
}

impl Search<'_> {
    fn descend(&mut self) -> bool {
        let choices = self.choices;
        let depth = self.current.len() - 1;
        if depth == choices.len() {
            return self.columns_unseen();
        }

        for candidate in &choices[depth] {
            if self.budget == 0 {
                return false;
            }
            self.budget -= 1;

            if !self.fits_columns(candidate) {
                continue;
            }
            self.current.push(candidate.clone());
            if self.descend() {
                return true;
            }
            self.current.pop();
        }
        false
    }

    /// No value of `candidate` differs by exactly 1 from a value above it.
    fn fits_columns(&self, candidate: &[u32]) -> bool {
        candidate.iter().enumerate().all(|(j, &x)| {
            self.current
                .iter()
                .all(|row| row.get(j).map_or(true, |&above| above.abs_diff(x) != 1))
        })
    }

    fn columns_unseen(&self) -> bool {
        let width = self.current.first().map_or(0, Vec::len);
        (0..width).all(|j| {
            let column: Vec<u32> = self.current.iter().map(|row| row[j]).collect();
            !self.registry.contains_col_set(&sorted_set(&column))
        })
    }
}

/// Up to `cap` permutations of `values` in lexicographic order of their
/// index sequence, the identity first.
#[must_use]
pub fn permutations(values: &[u32], cap: usize) -> Vec<Vec<u32>> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    let mut out = Vec::new();
    while out.len() < cap {
        out.push(indices.iter().map(|&i| values[i]).collect());
        if !next_permutation(&mut indices) {
            break;
        }
    }
    out
}

/// Advance to the next lexicographic permutation; false after the last one.
fn next_permutation(indices: &mut [usize]) -> bool {
    let Some(pivot) = indices.windows(2).rposition(|w| w[0] < w[1]) else {
        return false;
    };
    let successor = indices
        .iter()
        .rposition(|&x| x > indices[pivot])
        .unwrap_or(pivot + 1);
    indices.swap(pivot, successor);
    indices[pivot + 1..].reverse();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Card, UniqueScope};

    fn arranger() -> ColumnArranger {
        ColumnArranger {
            permutation_cap: 120,
            search_cap: 5000,
        }
    }

    fn has_adjacent_column(rows: &[Vec<u32>]) -> bool {
        let card = Card::new(rows.to_vec());
        let (_, n) = card.shape();
        (0..n).any(|j| {
            let column = card.column(j);
            column
                .iter()
                .any(|&a| column.iter().any(|&b| a.abs_diff(b) == 1))
        })
    }

    #[test]
    fn test_permutations_lexicographic() {
        let perms = permutations(&[7, 8, 9], 10);
        assert_eq!(
            perms,
            vec![
                vec![7, 8, 9],
                vec![7, 9, 8],
                vec![8, 7, 9],
                vec![8, 9, 7],
                vec![9, 7, 8],
                vec![9, 8, 7],
            ]
        );
        assert_eq!(permutations(&[7, 8, 9], 2).len(), 2);
        assert_eq!(permutations(&[3], 5), vec![vec![3]]);
    }

    #[test]
    fn test_arrange_breaks_vertical_adjacency() {
        let rows = vec![vec![1, 10, 20], vec![2, 11, 21]];
        let registry = SetRegistry::new(UniqueScope::cols());

        let arranged = arranger().arrange(&rows, &registry).unwrap();
        assert_eq!(arranged[0], rows[0]);
        assert!(!has_adjacent_column(&arranged));

        let mut second = arranged[1].clone();
        second.sort_unstable();
        assert_eq!(second, vec![2, 11, 21]);
    }

    #[test]
    fn test_arrange_avoids_seen_columns() {
        let mut registry = SetRegistry::new(UniqueScope::cols());
        let seen = Card::new(vec![vec![1, 5], vec![9, 30]]);
        registry.record(&seen, seen.content_hash());

        // Identity would reproduce column {1, 9}.
        let rows = vec![vec![1, 5], vec![9, 40]];
        let arranged = arranger().arrange(&rows, &registry).unwrap();
        assert_eq!(arranged, vec![vec![1, 5], vec![40, 9]]);
    }

    #[test]
    fn test_arrange_fails_when_impossible() {
        // Every placement of 2 sits next to 1 or 3.
        let rows = vec![vec![1, 3], vec![2, 10]];
        let registry = SetRegistry::new(UniqueScope::cols());
        assert!(arranger().arrange(&rows, &registry).is_none());
    }

    #[test]
    fn test_search_cap_limits_work() {
        let rows = vec![vec![1, 10, 20], vec![2, 11, 21]];
        let registry = SetRegistry::new(UniqueScope::cols());
        let starved = ColumnArranger {
            permutation_cap: 120,
            search_cap: 1,
        };
        // The identity is the only node visited and it is adjacent.
        assert!(starved.arrange(&rows, &registry).is_none());
    }

    #[test]
    fn test_single_row_is_untouched() {
        let rows = vec![vec![4, 5, 6]];
        let registry = SetRegistry::new(UniqueScope::cols());
        assert_eq!(arranger().arrange(&rows, &registry), Some(rows));
    }
}
