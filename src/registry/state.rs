//! Exclusively-owned state of one run attempt.

use rustc_hash::FxHashMap;

use crate::core::{Card, GenerationConfig};
use crate::planner::FrequencyPlan;

use super::budget::Budget;
use super::sets::SetRegistry;

/// Placement counts per `(row, column, number)` across accepted cards.
#[derive(Clone, Debug, Default)]
pub struct PositionLoad {
    counts: FxHashMap<(usize, usize, u32), u32>,
}

impl PositionLoad {
    /// How many accepted cards hold `number` at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize, number: u32) -> u32 {
        self.counts.get(&(row, col, number)).copied().unwrap_or(0)
    }

    /// Sum of loads for `values` laid out along row `row`.
    #[must_use]
    pub fn row_load(&self, row: usize, values: &[u32]) -> u32 {
        values
            .iter()
            .enumerate()
            .map(|(col, &x)| self.get(row, col, x))
            .sum()
    }

    pub fn record(&mut self, card: &Card) {
        for (i, row) in card.rows().iter().enumerate() {
            for (j, &x) in row.iter().enumerate() {
                *self.counts.entry((i, j, x)).or_insert(0) += 1;
            }
        }
    }
}

/// Budget, registries and accepted cards for one attempt.
#[derive(Clone, Debug)]
pub struct RunState {
    pub budget: Budget,
    pub registry: SetRegistry,
    pub positions: PositionLoad,
    cards: Vec<Card>,
}

impl RunState {
    /// Fresh, empty state for a new attempt.
    #[must_use]
    pub fn fresh(config: &GenerationConfig, plan: &FrequencyPlan) -> Self {
        Self {
            budget: Budget::from_plan(plan, config.r),
            registry: SetRegistry::new(config.unique_scope),
            positions: PositionLoad::default(),
            cards: Vec::with_capacity(config.t),
        }
    }

    /// Accepted cards so far, in construction order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Consume the state, returning the accepted cards.
    #[must_use]
    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }

    /// Accept a card: spend its numbers, register its sets and hash.
    ///
    /// The caller has already checked it against the registry.
    pub fn commit(&mut self, card: Card, hash: String) {
        for x in card.values() {
            self.budget.decrement(x);
        }
        self.registry.record(&card, hash);
        self.positions.record(&card);
        self.cards.push(card);
    }
}
