//! Distance and adjacency checks on card values.
//!
//! A `min_distance` of 0 disables the distance checks: every function then
//! reports the card as valid.

/// True if any two values on the card differ by less than `min_distance`.
#[must_use]
pub fn violates_min_distance(rows: &[Vec<u32>], min_distance: u32) -> bool {
    if min_distance == 0 {
        return false;
    }
    let values: Vec<u32> = rows.iter().flatten().copied().collect();
    values.iter().enumerate().any(|(i, &a)| {
        values[i + 1..]
            .iter()
            .any(|&b| a.abs_diff(b) < min_distance)
    })
}

/// Whether `candidate` keeps at least `min_distance` from every placed value.
#[must_use]
pub fn can_add_number(placed: &[u32], candidate: u32, min_distance: u32) -> bool {
    min_distance == 0 || placed.iter().all(|&x| x.abs_diff(candidate) >= min_distance)
}

/// All pairs inside one row satisfy `min_distance`.
#[must_use]
pub fn check_row_internal_distance(row: &[u32], min_distance: u32) -> bool {
    min_distance == 0
        || row
            .iter()
            .enumerate()
            .all(|(i, &a)| row[i + 1..].iter().all(|&b| a.abs_diff(b) >= min_distance))
}

/// All pairs taken from two different rows satisfy `min_distance`.
#[must_use]
pub fn check_inter_row_distances(rows: &[Vec<u32>], min_distance: u32) -> bool {
    if min_distance == 0 {
        return true;
    }
    rows.iter().enumerate().all(|(i, upper)| {
        rows[i + 1..]
            .iter()
            .all(|lower| upper.iter().all(|&a| can_add_number(lower, a, min_distance)))
    })
}

/// `(valid, violations)`: one violation per offending row, plus one if any
/// cross-row pair is too close.
#[must_use]
pub fn check_card_distances(rows: &[Vec<u32>], min_distance: u32) -> (bool, u32) {
    if min_distance == 0 {
        return (true, 0);
    }
    let mut violations = rows
        .iter()
        .filter(|row| !check_row_internal_distance(row, min_distance))
        .count() as u32;
    if !check_inter_row_distances(rows, min_distance) {
        violations += 1;
    }
    (violations == 0, violations)
}
