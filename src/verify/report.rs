//! Post-hoc verification of a finished card list.
//!
//! Everything here is a pure function of the cards; nothing is mutated.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::core::{Card, RowSet, Uniformity, UniqueScope};

use super::stats::{uniformity_test, UniformityTest};

/// Label for how row and column sets are compared.
pub const SET_REPRESENTATION: &str = "sorted_tuple";

/// Collision counts for row-sets and column-sets.
///
/// Counts are computed for both kinds regardless of scope; the `*_checked`
/// flags record which kinds were enforced during generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniquenessReport {
    pub row_sets_checked: bool,
    pub col_sets_checked: bool,
    pub row_set_collisions: u64,
    pub col_set_collisions: u64,
    pub set_representation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformitySummary {
    pub mode: String,
    pub max_minus_min: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatisticalTests {
    pub global: UniformityTest,
}

/// Full verification report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// Occurrences of every number in `1..=R`, zeros included.
    pub frequencies: BTreeMap<u32, u64>,
    /// Per-position occurrence tables keyed `"(i,j)"`.
    pub position_frequencies: BTreeMap<String, BTreeMap<u32, u64>>,
    pub uniqueness: UniquenessReport,
    pub uniformity: UniformitySummary,
    pub tests: StatisticalTests,
    pub ok_no_duplicates_within_cards: bool,
    pub ok_no_identical_cards: bool,
}

impl VerificationReport {
    /// No enforced-scope collision, no repeated value on a card and no
    /// identical cards.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        let u = &self.uniqueness;
        (!u.row_sets_checked || u.row_set_collisions == 0)
            && (!u.col_sets_checked || u.col_set_collisions == 0)
            && self.ok_no_duplicates_within_cards
            && self.ok_no_identical_cards
    }
}

/// Verify `cards` drawn from `1..=r`.
#[must_use]
pub fn verify(cards: &[Card], r: u32, scope: UniqueScope, mode: Uniformity) -> VerificationReport {
    let frequencies = compute_frequencies(cards, r);
    let global = uniformity_test(&frequencies, r, mode.name());

    VerificationReport {
        position_frequencies: compute_position_frequencies(cards, r),
        uniqueness: count_set_collisions(cards, scope),
        uniformity: UniformitySummary {
            mode: mode.name().to_string(),
            max_minus_min: global.max_minus_min,
        },
        tests: StatisticalTests { global },
        ok_no_duplicates_within_cards: check_no_duplicates_within_cards(cards),
        ok_no_identical_cards: check_no_identical_cards(cards),
        frequencies,
    }
}

/// Occurrences per number; every number in `1..=r` is present.
///
/// Values outside the pool are counted under their own key.
#[must_use]
pub fn compute_frequencies(cards: &[Card], r: u32) -> BTreeMap<u32, u64> {
    let mut counts: BTreeMap<u32, u64> = (1..=r).map(|x| (x, 0)).collect();
    for x in cards.iter().flat_map(Card::values) {
        *counts.entry(x).or_insert(0) += 1;
    }
    counts
}

/// Per-position tables, shaped after the first card.
#[must_use]
pub fn compute_position_frequencies(
    cards: &[Card],
    r: u32,
) -> BTreeMap<String, BTreeMap<u32, u64>> {
    let Some(first) = cards.first() else {
        return BTreeMap::new();
    };
    let (m, n) = first.shape();

    let mut tables = BTreeMap::new();
    for i in 0..m {
        for j in 0..n {
            let mut bucket: BTreeMap<u32, u64> = (1..=r).map(|x| (x, 0)).collect();
            for x in cards.iter().filter_map(|card| card.get(i, j)) {
                *bucket.entry(x).or_insert(0) += 1;
            }
            tables.insert(position_key(i, j), bucket);
        }
    }
    tables
}

/// Key for position `(i, j)` in report tables.
#[must_use]
pub fn position_key(i: usize, j: usize) -> String {
    format!("({i},{j})")
}

/// Sum over every signature of (multiplicity - 1).
#[must_use]
pub fn count_set_collisions(cards: &[Card], scope: UniqueScope) -> UniquenessReport {
    UniquenessReport {
        row_sets_checked: scope.row_sets,
        col_sets_checked: scope.col_sets,
        row_set_collisions: excess(cards.iter().flat_map(Card::row_sets)),
        col_set_collisions: excess(cards.iter().flat_map(Card::col_sets)),
        set_representation: SET_REPRESENTATION.to_string(),
    }
}

fn excess(sets: impl Iterator<Item = RowSet>) -> u64 {
    let mut seen: FxHashMap<RowSet, u64> = FxHashMap::default();
    for set in sets {
        *seen.entry(set).or_insert(0) += 1;
    }
    seen.values().map(|&c| c - 1).sum()
}

#[must_use]
pub fn check_no_duplicates_within_cards(cards: &[Card]) -> bool {
    cards.iter().all(|card| !card.has_internal_duplicate())
}

#[must_use]
pub fn check_no_identical_cards(cards: &[Card]) -> bool {
    let mut seen = FxHashSet::default();
    cards.iter().all(|card| seen.insert(card.content_hash()))
}
