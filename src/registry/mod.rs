//! Per-attempt run state: budgets, uniqueness registries, accepted cards.
//!
//! ## Key Types
//!
//! - `Budget`: remaining uses per pool number
//! - `SetRegistry`: row-sets, column-sets and card hashes seen so far
//! - `PositionLoad`: how often each number sat at each card position
//! - `RunState`: the bundle above plus accepted cards, owned by one attempt
//!
//! A failed attempt drops its `RunState` wholesale; the next attempt starts
//! from `RunState::fresh`, never from a cleared copy.

pub mod budget;
pub mod sets;
pub mod state;

pub use budget::Budget;
pub use sets::SetRegistry;
pub use state::{PositionLoad, RunState};
