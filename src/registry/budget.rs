//! Remaining-uses map for pool numbers.

use crate::planner::FrequencyPlan;

/// Remaining uses per number in `1..=R`.
///
/// Initialized from a [`FrequencyPlan`], decremented as cards are accepted,
/// never negative. A successful run ends with every entry at zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    remaining: Vec<u32>,
}

impl Budget {
    /// Budget for pool `1..=r` seeded from the plan's targets.
    #[must_use]
    pub fn from_plan(plan: &FrequencyPlan, r: u32) -> Self {
        Self {
            remaining: (1..=r).map(|x| plan.get(x)).collect(),
        }
    }

    /// Pool size.
    #[must_use]
    pub fn pool_size(&self) -> u32 {
        self.remaining.len() as u32
    }

    /// Remaining uses for `number` (0 outside the pool).
    #[must_use]
    pub fn get(&self, number: u32) -> u32 {
        number
            .checked_sub(1)
            .and_then(|i| self.remaining.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// Numbers with remaining budget, ascending.
    #[must_use]
    pub fn available(&self) -> Vec<u32> {
        self.remaining
            .iter()
            .enumerate()
            .filter(|(_, &c)| c > 0)
            .map(|(i, _)| i as u32 + 1)
            .collect()
    }

    /// Sum of remaining uses.
    #[must_use]
    pub fn total_remaining(&self) -> u64 {
        self.remaining.iter().map(|&c| u64::from(c)).sum()
    }

    /// True when every entry is zero.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining.iter().all(|&c| c == 0)
    }

    /// Consume one use of `number`.
    ///
    /// Saturates at zero; the engine only places numbers with budget left.
    pub fn decrement(&mut self, number: u32) {
        if let Some(slot) = number
            .checked_sub(1)
            .and_then(|i| self.remaining.get_mut(i as usize))
        {
            debug_assert!(*slot > 0, "decrementing exhausted number {number}");
            *slot = slot.saturating_sub(1);
        }
    }
}
