//! Row selection.
//!
//! Each row is chosen in two phases:
//!
//! 1. **Sampling**: draw random `n`-subsets from a window at the front of the
//!    prioritized pool, rejecting samples with duplicates, used row-sets or
//!    distance violations. The first admissible sample wins.
//! 2. **Slice fallback**: scan contiguous `n`-slices of the whole pool in
//!    priority order and take the first admissible one.
//!
//! Either way the chosen values are then ordered by [`RowOrderer`].
//!
//! Numbers whose remaining budget equals the number of cards still to build
//! are *mandatory*: skipping them would leave budget that can never be
//! spent. Every row takes enough of them that the rows below can still
//! absorb the rest.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::{sorted_set, BuildFailure, CardRng};
use crate::registry::{PositionLoad, SetRegistry};

use super::constraints::{can_add_number, check_row_internal_distance};
use super::penalty::RowOrderer;

/// Everything needed to choose one row of the card under construction.
#[derive(Clone, Copy, Debug)]
pub struct RowRequest<'a> {
    /// Zero-based row index.
    pub row: usize,
    /// Rows still to fill, including this one.
    pub rows_left: usize,
    /// Row width.
    pub width: usize,
    /// Candidates not yet on this card, highest priority first.
    pub pool: &'a [u32],
    /// Mandatory candidates not yet on this card.
    pub mandatory: &'a [u32],
    /// Values already placed on this card.
    pub placed: &'a [u32],
    /// The card's finished first row; `None` while building row 0.
    pub anchors: Option<&'a [u32]>,
}

impl RowRequest<'_> {
    /// Mandatory values this row must take so the rows below can fit the rest.
    #[must_use]
    pub fn mandatory_quota(&self) -> usize {
        let below = (self.rows_left - 1) * self.width;
        self.mandatory.len().saturating_sub(below).min(self.width)
    }
}

/// Row selection parameters shared by every row of a run.
#[derive(Clone, Copy, Debug)]
pub struct RowSelector {
    pub sample_attempts: u32,
    pub min_distance: u32,
    pub position_balance: bool,
    pub orderer: RowOrderer,
}

impl RowSelector {
    /// Choose and order the values of one row.
    pub fn select(
        &self,
        request: &RowRequest<'_>,
        registry: &SetRegistry,
        positions: &PositionLoad,
        rng: &mut CardRng,
    ) -> Result<Vec<u32>, BuildFailure> {
        let values = match self.sample(request, registry, rng) {
            Some(values) => values,
            None => {
                debug!(row = request.row, "row sampling exhausted, scanning slices");
                self.scan_slices(request, registry)
                    .ok_or(BuildFailure::RowSelection { row: request.row })?
            }
        };

        let row = request.row;
        let (ordered, _) = if self.position_balance {
            self.orderer
                .order(&values, request.anchors, rng, |r| positions.row_load(row, r))
        } else {
            self.orderer.order(&values, request.anchors, rng, |_| 0)
        };
        Ok(ordered)
    }

    fn sample(
        &self,
        request: &RowRequest<'_>,
        registry: &SetRegistry,
        rng: &mut CardRng,
    ) -> Option<Vec<u32>> {
        let width = request.width;
        let quota = request.mandatory_quota();
        // Distance constraints need room to spread out; otherwise stay close
        // to the front of the priority order.
        let window_len = if self.min_distance > 0 {
            request.pool.len()
        } else {
            ((request.rows_left + 1) * width).min(request.pool.len())
        };
        let window = &request.pool[..window_len];

        for _ in 0..self.sample_attempts {
            let mut values = rng.sample(request.mandatory, quota);
            let rest: Vec<u32> = window
                .iter()
                .copied()
                .filter(|x| !values.contains(x))
                .collect();
            values.extend(rng.sample(&rest, width - values.len()));

            if values.len() == width && self.admissible(&values, request, registry) {
                return Some(values);
            }
        }
        None
    }

    fn scan_slices(&self, request: &RowRequest<'_>, registry: &SetRegistry) -> Option<Vec<u32>> {
        let quota = request.mandatory_quota();
        let mandatory: FxHashSet<u32> = request.mandatory.iter().copied().collect();

        request
            .pool
            .windows(request.width)
            .filter(|slice| slice.iter().filter(|&&x| mandatory.contains(&x)).count() >= quota)
            .find(|slice| self.admissible(slice, request, registry))
            .map(<[u32]>::to_vec)
    }

    fn admissible(&self, values: &[u32], request: &RowRequest<'_>, registry: &SetRegistry) -> bool {
        let set = sorted_set(values);
        if set.windows(2).any(|w| w[0] == w[1]) {
            return false;
        }
        if registry.contains_row_set(&set) {
            return false;
        }
        self.min_distance == 0
            || (check_row_internal_distance(values, self.min_distance)
                && values
                    .iter()
                    .all(|&x| can_add_number(request.placed, x, self.min_distance)))
    }
}
