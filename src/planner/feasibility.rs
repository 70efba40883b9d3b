//! Cheap precondition checks.
//!
//! These are necessary, not sufficient: passing them does not guarantee the
//! randomized engine will find a solution.

use serde::{Deserialize, Serialize};

use crate::core::{GenerationConfig, Uniformity, UniqueScope};

/// Outcome of a feasibility check with human-readable reasons for failure.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feasibility {
    pub feasible: bool,
    pub reasons: Vec<String>,
}

impl Feasibility {
    fn ok() -> Self {
        Self { feasible: true, reasons: Vec::new() }
    }

    /// Logical AND of two checks, concatenating reasons.
    #[must_use]
    pub fn and(mut self, other: Feasibility) -> Self {
        self.feasible &= other.feasible;
        self.reasons.extend(other.reasons);
        self
    }
}

/// `C(n, k)`, saturating at `u128::MAX`.
#[must_use]
pub fn binomial(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is divisible by (i + 1) at every step.
        acc = match acc.checked_mul(u128::from(n - i)) {
            Some(v) => v / u128::from(i + 1),
            None => return u128::MAX,
        };
    }
    acc
}

/// Strict uniformity is only achievable when `R` divides `P = T * m * n`.
#[must_use]
pub fn check_uniformity_strict(r: u32, t: usize, m: usize, n: usize) -> Feasibility {
    let p = (t as u64) * (m as u64) * (n as u64);
    if r != 0 && p % u64::from(r) == 0 {
        Feasibility::ok()
    } else {
        Feasibility {
            feasible: false,
            reasons: vec!["P % R != 0 for strict uniformity".to_string()],
        }
    }
}

/// Enough distinct sets must exist for the requested uniqueness scopes.
///
/// - row_sets: `T * m <= C(R, n)`
/// - col_sets: `T * n <= C(R, m)`
#[must_use]
pub fn check_uniqueness_capacity(
    r: u32,
    t: usize,
    m: usize,
    n: usize,
    scope: UniqueScope,
) -> Feasibility {
    let mut result = Feasibility::ok();
    let r = u64::from(r);

    if scope.row_sets && ((t * m) as u128) > binomial(r, n as u64) {
        result.feasible = false;
        result.reasons.push("row_sets capacity exceeded: T*m > C(R,n)".to_string());
    }
    if scope.col_sets && ((t * n) as u128) > binomial(r, m as u64) {
        result.feasible = false;
        result.reasons.push("col_sets capacity exceeded: T*n > C(R,m)".to_string());
    }
    result
}

/// All checks relevant to one configuration.
///
/// The strict divisibility check only applies in strict mode.
#[must_use]
pub fn assess(config: &GenerationConfig) -> Feasibility {
    let capacity = check_uniqueness_capacity(
        config.r,
        config.t,
        config.m,
        config.n,
        config.unique_scope,
    );
    match config.uniformity {
        Uniformity::Strict => {
            check_uniformity_strict(config.r, config.t, config.m, config.n).and(capacity)
        }
        Uniformity::Near => capacity,
    }
}
