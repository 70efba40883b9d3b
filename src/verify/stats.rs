//! Chi-square goodness of fit against uniform usage.
//!
//! The p-value uses the Wilson–Hilferty cube-root transform of the
//! chi-square statistic followed by the standard normal survival function.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name recorded for the p-value approximation.
pub const STATS_ENGINE: &str = "wilson_hilferty";

/// Significance level recorded alongside the test.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Complementary error function, Abramowitz and Stegun 7.1.26.
///
/// Maximum absolute error about 1.5e-7.
#[must_use]
pub fn erfc(x: f64) -> f64 {
    const A1: f64 = 0.254_829_592;
    const A2: f64 = -0.284_496_736;
    const A3: f64 = 1.421_413_741;
    const A4: f64 = -1.453_152_027;
    const A5: f64 = 1.061_405_429;
    const P: f64 = 0.327_591_1;

    let abs_x = x.abs();
    let t = 1.0 / (1.0 + P * abs_x);
    let poly = A1 + t * (A2 + t * (A3 + t * (A4 + t * A5)));
    let tail = t * poly * (-abs_x * abs_x).exp();
    if x < 0.0 {
        2.0 - tail
    } else {
        tail
    }
}

/// `P(Z > z)` for a standard normal `Z`.
#[must_use]
pub fn normal_survival(z: f64) -> f64 {
    0.5 * erfc(z / std::f64::consts::SQRT_2)
}

/// Right-tail p-value of a chi-square statistic with `df` degrees of freedom.
///
/// Returns 1.0 for `df == 0`; always clamped to `[0, 1]`.
#[must_use]
pub fn chi2_wilson_hilferty_pvalue(stat: f64, df: u32) -> f64 {
    if df == 0 {
        return 1.0;
    }
    let k = f64::from(df);
    let t = (stat / k).cbrt();
    let mu = 1.0 - 2.0 / (9.0 * k);
    let sigma = (2.0 / (9.0 * k)).sqrt();
    normal_survival((t - mu) / sigma).clamp(0.0, 1.0)
}

/// Round to six decimal places.
#[must_use]
pub fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Chi-square statistic, degrees of freedom and p-value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chi2 {
    pub stat: f64,
    pub df: u32,
    pub p_value: f64,
}

/// Result of the global uniformity test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UniformityTest {
    pub mode: String,
    pub max_minus_min: u64,
    pub chi2: Chi2,
    pub alpha: f64,
    pub engine: String,
}

/// Test observed per-number counts over `1..=r` against uniform usage.
///
/// Numbers missing from `freqs` count as zero.
#[must_use]
pub fn uniformity_test(freqs: &BTreeMap<u32, u64>, r: u32, mode: &str) -> UniformityTest {
    let observed: Vec<u64> = (1..=r).map(|x| freqs.get(&x).copied().unwrap_or(0)).collect();
    let total: u64 = observed.iter().sum();
    let max_minus_min = match (observed.iter().max(), observed.iter().min()) {
        (Some(max), Some(min)) => max - min,
        _ => 0,
    };

    let chi2 = if total == 0 || r == 0 {
        Chi2 {
            stat: 0.0,
            df: 0,
            p_value: 1.0,
        }
    } else {
        let expected = total as f64 / f64::from(r);
        let stat: f64 = observed
            .iter()
            .map(|&o| (o as f64 - expected).powi(2) / expected)
            .sum();
        let df = r.saturating_sub(1).max(1);
        Chi2 {
            stat: round6(stat),
            df,
            p_value: round6(chi2_wilson_hilferty_pvalue(stat, df)),
        }
    };

    UniformityTest {
        mode: mode.to_string(),
        max_minus_min,
        chi2,
        alpha: DEFAULT_ALPHA,
        engine: STATS_ENGINE.to_string(),
    }
}
