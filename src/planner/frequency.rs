//! Per-number usage targets.
//!
//! For total demand `P = T * m * n` over a pool of `R` numbers:
//!
//! - **strict**: every number gets `P / R` uses.
//! - **near**: `base = P / R`, `remainder = P mod R`; numbers `1..=remainder`
//!   get `base + 1`, the rest get `base`. The targets always sum to `P`.
//!
//! Strict mode with `P mod R != 0` is not rejected here: the plan falls back
//! to `floor(P / R)` for every number and therefore sums to less than `P`.
//! Callers are expected to run [`check_uniformity_strict`] first.
//!
//! [`check_uniformity_strict`]: super::check_uniformity_strict

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::Uniformity;

/// Target number of uses per pool number, keyed `1..=R`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrequencyPlan {
    targets: BTreeMap<u32, u32>,
}

impl FrequencyPlan {
    /// Target for one number (0 if outside the pool).
    #[must_use]
    pub fn get(&self, number: u32) -> u32 {
        self.targets.get(&number).copied().unwrap_or(0)
    }

    /// Sum of all targets.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.targets.values().map(|&c| u64::from(c)).sum()
    }

    /// Number of pool entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// `(number, target)` in ascending number order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.targets.iter().map(|(&k, &v)| (k, v))
    }

    /// Largest minus smallest target.
    #[must_use]
    pub fn spread(&self) -> u32 {
        let max = self.targets.values().max().copied().unwrap_or(0);
        let min = self.targets.values().min().copied().unwrap_or(0);
        max - min
    }
}

/// `(base, remainder)` of `P = T * m * n` over `R` numbers.
#[must_use]
pub fn near_uniform_targets(r: u32, t: usize, m: usize, n: usize) -> (u64, u64) {
    let p = (t as u64) * (m as u64) * (n as u64);
    let r = u64::from(r.max(1));
    (p / r, p % r)
}

/// Compute usage targets for every number in `1..=r`.
#[must_use]
pub fn build_global_frequencies(
    r: u32,
    t: usize,
    m: usize,
    n: usize,
    mode: Uniformity,
) -> FrequencyPlan {
    let (base, remainder) = near_uniform_targets(r, t, m, n);
    let base = u32::try_from(base).unwrap_or(u32::MAX);

    let targets = match mode {
        Uniformity::Strict => {
            if remainder != 0 {
                warn!(r, remainder, "strict uniformity with P mod R != 0; targets will not cover P");
            }
            (1..=r).map(|x| (x, base)).collect()
        }
        Uniformity::Near => (1..=r)
            .map(|x| {
                let extra = u32::from(u64::from(x) <= remainder);
                (x, base + extra)
            })
            .collect(),
    };

    FrequencyPlan { targets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn gcd(a: usize, b: usize) -> usize {
        if b == 0 {
            a
        } else {
            gcd(b, a % b)
        }
    }

    #[test]
    fn test_near_targets_example() {
        assert_eq!(near_uniform_targets(10, 3, 2, 2), (1, 2));
    }

    #[test]
    fn test_near_distribution_assigns_remainder_to_low_numbers() {
        let plan = build_global_frequencies(10, 3, 2, 2, Uniformity::Near);
        assert_eq!(plan.len(), 10);
        assert_eq!(plan.get(1), 2);
        assert_eq!(plan.get(2), 2);
        assert_eq!(plan.get(3), 1);
        assert_eq!(plan.get(10), 1);
        assert_eq!(plan.total(), 12);
    }

    #[test]
    fn test_strict_exact() {
        let plan = build_global_frequencies(30, 10, 3, 3, Uniformity::Strict);
        assert!(plan.iter().all(|(_, c)| c == 3));
        assert_eq!(plan.total(), 90);
        assert_eq!(plan.spread(), 0);
    }

    // Strict mode silently under-covers P when it does not divide evenly.
    #[test]
    fn test_strict_non_divisible_falls_back_to_floor() {
        let plan = build_global_frequencies(10, 3, 2, 2, Uniformity::Strict);
        assert!(plan.iter().all(|(_, c)| c == 1));
        assert_eq!(plan.total(), 10);
        assert!(plan.total() < 12);
    }

    #[test]
    fn test_out_of_pool_is_zero() {
        let plan = build_global_frequencies(10, 3, 2, 2, Uniformity::Near);
        assert_eq!(plan.get(0), 0);
        assert_eq!(plan.get(11), 0);
    }

    proptest! {
        #[test]
        fn prop_near_sums_to_p_and_spread_at_most_one(
            r in 10u32..=90,
            t in 1usize..=200,
            m in 1usize..=6,
            n in 1usize..=6,
        ) {
            let plan = build_global_frequencies(r, t, m, n, Uniformity::Near);
            prop_assert_eq!(plan.total(), (t * m * n) as u64);
            prop_assert!(plan.spread() <= 1);
        }

        #[test]
        fn prop_strict_equal_when_divisible(
            r in 10u32..=90,
            k in 1usize..=3,
            m in 1usize..=6,
            n in 1usize..=6,
        ) {
            // Smallest T making P divisible by R, times k.
            let t = k * (r as usize / gcd(r as usize, m * n));
            let plan = build_global_frequencies(r, t, m, n, Uniformity::Strict);
            prop_assert_eq!(plan.total(), (t * m * n) as u64);
            prop_assert_eq!(plan.spread(), 0);
        }
    }
}
