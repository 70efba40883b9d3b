//! Card matrices and their signatures.
//!
//! A card is an `m x n` matrix of distinct pool numbers. Its *row-sets* and
//! *column-sets* are the sorted values of each row and column, used for
//! global collision detection. Its *content hash* is an order-sensitive
//! SHA-256 digest of the matrix, used to forbid identical cards.
//!
//! ```
//! use bingo_cards::core::Card;
//!
//! let card = Card::new(vec![vec![5, 1, 9], vec![2, 7, 4]]);
//!
//! let rows: Vec<Vec<u32>> = card.row_sets().into_iter().map(|s| s.to_vec()).collect();
//! assert_eq!(rows, vec![vec![1, 5, 9], vec![2, 4, 7]]);
//!
//! let cols: Vec<Vec<u32>> = card.col_sets().into_iter().map(|s| s.to_vec()).collect();
//! assert_eq!(cols, vec![vec![2, 5], vec![1, 7], vec![4, 9]]);
//! ```

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smallvec::SmallVec;

/// Sorted values of one row or one column.
pub type RowSet = SmallVec<[u32; 8]>;

/// Prefix used on every digest string emitted by this crate.
pub const HASH_PREFIX: &str = "sha256:";

/// One accepted card. Immutable once built.
///
/// Serializes as the bare matrix (`[[..], [..]]`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Card {
    rows: Vec<Vec<u32>>,
}

impl Card {
    /// Wrap a row-major matrix.
    ///
    /// Rows are expected to have equal length; this is checked in debug builds.
    #[must_use]
    pub fn new(rows: Vec<Vec<u32>>) -> Self {
        debug_assert!(
            rows.windows(2).all(|w| w[0].len() == w[1].len()),
            "card rows must have equal length"
        );
        Self { rows }
    }

    /// Row-major access to the matrix.
    #[must_use]
    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }

    /// Consume the card, returning the matrix.
    #[must_use]
    pub fn into_rows(self) -> Vec<Vec<u32>> {
        self.rows
    }

    /// `(m, n)`: number of rows and columns.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        let m = self.rows.len();
        let n = self.rows.first().map_or(0, Vec::len);
        (m, n)
    }

    /// Value at row `i`, column `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<u32> {
        self.rows.get(i).and_then(|row| row.get(j)).copied()
    }

    /// All values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = u32> + '_ {
        self.rows.iter().flatten().copied()
    }

    /// Values of column `j`, top to bottom.
    #[must_use]
    pub fn column(&self, j: usize) -> Vec<u32> {
        self.rows.iter().filter_map(|row| row.get(j).copied()).collect()
    }

    /// Sorted signature of every row.
    #[must_use]
    pub fn row_sets(&self) -> Vec<RowSet> {
        self.rows.iter().map(|row| sorted_set(row)).collect()
    }

    /// Sorted signature of every column.
    #[must_use]
    pub fn col_sets(&self) -> Vec<RowSet> {
        let (_, n) = self.shape();
        (0..n).map(|j| sorted_set(&self.column(j))).collect()
    }

    /// True if any value appears more than once on this card.
    #[must_use]
    pub fn has_internal_duplicate(&self) -> bool {
        let mut seen = FxHashSet::default();
        !self.values().all(|x| seen.insert(x))
    }

    /// Order-sensitive content digest, `"sha256:<hex>"`.
    ///
    /// The digest input is the compact JSON form of the matrix, so the same
    /// matrix always hashes identically across runs and platforms.
    #[must_use]
    pub fn content_hash(&self) -> String {
        matrix_hash(&self.rows)
    }
}

impl From<Vec<Vec<u32>>> for Card {
    fn from(rows: Vec<Vec<u32>>) -> Self {
        Self::new(rows)
    }
}

/// Sort a slice of values into a set signature.
#[must_use]
pub fn sorted_set(values: &[u32]) -> RowSet {
    let mut set: RowSet = values.iter().copied().collect();
    set.sort_unstable();
    set
}

/// Digest of a raw matrix; see [`Card::content_hash`].
///
/// The payload is the compact JSON of the rows, e.g. `[[1,2],[3,4]]`.
#[must_use]
pub fn matrix_hash(rows: &[Vec<u32>]) -> String {
    let payload = serde_json::to_string(rows).expect("integer matrix serializes to JSON");
    digest_str(&payload)
}

/// Aggregate digest of a card list, sensitive to card order.
///
/// Built from the compact JSON list of per-card hashes in card order.
#[must_use]
pub fn cards_hash(cards: &[Card]) -> String {
    let hashes: Vec<String> = cards.iter().map(Card::content_hash).collect();
    let payload = serde_json::to_string(&hashes).expect("string list serializes to JSON");
    digest_str(&payload)
}

pub(crate) fn digest_str(payload: &str) -> String {
    format!("{HASH_PREFIX}{}", hex::encode(Sha256::digest(payload.as_bytes())))
}
