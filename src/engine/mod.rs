//! Card Construction Engine: row selection, row ordering, column
//! arrangement and the per-card restart loop.

pub mod builder;
pub mod columns;
pub mod constraints;
pub mod penalty;
pub mod rows;

pub use builder::CardEngine;
pub use columns::{permutations, ColumnArranger};
pub use constraints::{
    can_add_number, check_card_distances, check_inter_row_distances, check_row_internal_distance,
    violates_min_distance,
};
pub use penalty::{horizontal_penalty, row_penalty, vertical_penalty, RowOrderer};
pub use rows::{RowRequest, RowSelector};
