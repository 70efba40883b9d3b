//! Global uniqueness registry.
//!
//! Tracks the row-sets and column-sets of accepted cards (only for enabled
//! scopes) and the content hash of every accepted card (always).

use rustc_hash::FxHashSet;

use crate::core::{BuildFailure, Card, RowSet, UniqueScope};

/// Row-sets, column-sets and card hashes seen so far in one attempt.
///
/// ## Example
///
/// ```
/// use bingo_cards::core::{Card, UniqueScope};
/// use bingo_cards::registry::SetRegistry;
///
/// let mut registry = SetRegistry::new(UniqueScope::rows());
/// let card = Card::new(vec![vec![1, 5], vec![9, 3]]);
/// let hash = card.content_hash();
///
/// assert!(registry.first_collision(&card, &hash).is_none());
/// registry.record(&card, hash.clone());
/// assert!(registry.first_collision(&card, &hash).is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SetRegistry {
    scope: UniqueScope,
    row_sets: FxHashSet<RowSet>,
    col_sets: FxHashSet<RowSet>,
    card_hashes: FxHashSet<String>,
}

impl SetRegistry {
    /// Create an empty registry enforcing `scope`.
    #[must_use]
    pub fn new(scope: UniqueScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn scope(&self) -> UniqueScope {
        self.scope
    }

    /// Whether a row-set is already taken. Always false when row-set
    /// uniqueness is disabled.
    #[must_use]
    pub fn contains_row_set(&self, set: &[u32]) -> bool {
        self.scope.row_sets && self.row_sets.contains(set)
    }

    /// Whether a column-set is already taken. Always false when column-set
    /// uniqueness is disabled.
    #[must_use]
    pub fn contains_col_set(&self, set: &[u32]) -> bool {
        self.scope.col_sets && self.col_sets.contains(set)
    }

    #[must_use]
    pub fn contains_card_hash(&self, hash: &str) -> bool {
        self.card_hashes.contains(hash)
    }

    /// First reason `card` may not be accepted, if any.
    ///
    /// The identical-card check applies regardless of scope.
    #[must_use]
    pub fn first_collision(&self, card: &Card, hash: &str) -> Option<BuildFailure> {
        if self.scope.row_sets && card.row_sets().iter().any(|s| self.row_sets.contains(s)) {
            return Some(BuildFailure::RowSetCollision);
        }
        if self.scope.col_sets && card.col_sets().iter().any(|s| self.col_sets.contains(s)) {
            return Some(BuildFailure::ColumnSetCollision);
        }
        if self.card_hashes.contains(hash) {
            return Some(BuildFailure::DuplicateCard);
        }
        None
    }

    /// Merge an accepted card into the registry.
    pub fn record(&mut self, card: &Card, hash: String) {
        if self.scope.row_sets {
            self.row_sets.extend(card.row_sets());
        }
        if self.scope.col_sets {
            self.col_sets.extend(card.col_sets());
        }
        self.card_hashes.insert(hash);
    }

    /// Registered row-sets.
    #[must_use]
    pub fn row_set_count(&self) -> usize {
        self.row_sets.len()
    }

    /// Registered column-sets.
    #[must_use]
    pub fn col_set_count(&self) -> usize {
        self.col_sets.len()
    }

    /// Accepted cards.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.card_hashes.len()
    }
}
