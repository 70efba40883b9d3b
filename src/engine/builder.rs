//! Card Construction Engine.
//!
//! One call to [`CardEngine::build_card`] produces one accepted card or a
//! [`CardFailure`]. Each try works on a read-only view of the run state and
//! returns the candidate card; only an accepted card is committed, so a
//! failed try leaves nothing behind.

use std::cmp::Reverse;

use tracing::debug;

use crate::core::{BuildFailure, Card, CardFailure, CardRng, GenerationConfig};
use crate::registry::RunState;

use super::columns::ColumnArranger;
use super::penalty::RowOrderer;
use super::rows::{RowRequest, RowSelector};

/// Builds cards against the budget and registries of one run attempt.
#[derive(Clone, Debug)]
pub struct CardEngine {
    rows: usize,
    width: usize,
    cards: usize,
    card_restarts: u32,
    arrange_columns: bool,
    selector: RowSelector,
    arranger: ColumnArranger,
}

impl CardEngine {
    #[must_use]
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            rows: config.m,
            width: config.n,
            cards: config.t,
            card_restarts: config.card_restarts,
            arrange_columns: config.unique_scope.col_sets && config.m >= 2,
            selector: RowSelector {
                sample_attempts: config.row_sample_attempts,
                min_distance: config.min_distance,
                position_balance: config.position_balance,
                orderer: RowOrderer::new(config.swap_iterations),
            },
            arranger: ColumnArranger {
                permutation_cap: config.column_permutation_cap,
                search_cap: config.column_search_cap,
            },
        }
    }

    /// Build the next card and commit it to `state`.
    ///
    /// Retries the whole card up to `card_restarts` times. Stops at once on
    /// a failure that no restart can fix.
    pub fn build_card(
        &self,
        state: &mut RunState,
        card_index: usize,
        rng: &mut CardRng,
    ) -> Result<(), CardFailure> {
        let mut restarts = 0;
        loop {
            match self.try_build(state, rng) {
                Ok((card, hash)) => {
                    state.commit(card, hash);
                    return Ok(());
                }
                Err(cause) => {
                    restarts += 1;
                    if !cause.is_retryable() || restarts >= self.card_restarts {
                        return Err(CardFailure {
                            card_index,
                            restarts,
                            cause,
                        });
                    }
                    debug!(card = card_index, restarts, %cause, "restarting card");
                }
            }
        }
    }

    /// One try at the next card. Returns the card and its content hash.
    pub fn try_build(
        &self,
        state: &RunState,
        rng: &mut CardRng,
    ) -> Result<(Card, String), BuildFailure> {
        let needed = self.rows * self.width;
        let mut pool = state.budget.available();
        if pool.len() < needed {
            return Err(BuildFailure::BudgetExhausted {
                available: pool.len(),
                needed,
            });
        }

        // Random tie order, then least-used (most remaining) first.
        rng.shuffle(&mut pool);
        pool.sort_by_key(|&x| Reverse(state.budget.get(x)));

        let cards_left = self.cards.saturating_sub(state.cards().len()).max(1) as u32;
        let mandatory: Vec<u32> = pool
            .iter()
            .copied()
            .filter(|&x| state.budget.get(x) >= cards_left)
            .collect();

        let mut rows: Vec<Vec<u32>> = Vec::with_capacity(self.rows);
        let mut placed: Vec<u32> = Vec::with_capacity(needed);
        for row in 0..self.rows {
            let row_pool: Vec<u32> = pool.iter().copied().filter(|x| !placed.contains(x)).collect();
            let row_mandatory: Vec<u32> = mandatory
                .iter()
                .copied()
                .filter(|x| !placed.contains(x))
                .collect();

            let request = RowRequest {
                row,
                rows_left: self.rows - row,
                width: self.width,
                pool: &row_pool,
                mandatory: &row_mandatory,
                placed: &placed,
                anchors: rows.first().map(Vec::as_slice),
            };
            let values = self
                .selector
                .select(&request, &state.registry, &state.positions, rng)?;
            placed.extend_from_slice(&values);
            rows.push(values);
        }

        if self.arrange_columns {
            rows = self
                .arranger
                .arrange(&rows, &state.registry)
                .ok_or(BuildFailure::ColumnArrangement)?;
        }

        let card = Card::new(rows);
        let hash = card.content_hash();
        if let Some(collision) = state.registry.first_collision(&card, &hash) {
            return Err(collision);
        }
        Ok((card, hash))
    }
}
