//! Wilcoxon signed-rank test for paired samples.
//!
//! The test ranks the absolute differences `|xᵢ − yᵢ|` and compares the sum
//! of ranks of positive differences against the sum of ranks of negative
//! differences. The statistic is the smaller of the two sums, and the test is
//! always two-sided.
//!
//! Small samples without zero differences and without tied magnitudes use the
//! exact null distribution. Everything else falls back to a normal
//! approximation with tie and zero corrections.

use serde::Serialize;

use crate::{
    StatsError,
    distribution::{ContinuousDistribution, StandardNormal},
    rank::{RankMethod, rank},
};

/// Largest number of ranked differences for which the exact null distribution is used.
pub const EXACT_LIMIT: usize = 50;

/// How zero differences enter the test.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroMethod {
    /// Zeros are ranked along with all other differences but count towards
    /// neither rank sum.
    #[default]
    Pratt,
    /// Zeros are discarded before ranking.
    Wilcox,
}

/// Null distribution that produced the p-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignedRankMethod {
    Exact,
    Normal,
}

/// Outcome of a Wilcoxon signed-rank test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignedRankResult {
    /// `min(R⁺, R⁻)`.
    pub statistic: f64,
    /// Two-sided p-value, or `NaN` if every difference is zero.
    pub p_value: f64,
    pub method: SignedRankMethod,
    /// Number of zero differences in the input.
    pub n_zero: usize,
}

/// Runs the two-sided Wilcoxon signed-rank test on paired samples `x` and `y`.
///
/// Fails if the samples are empty or differ in length. When every difference
/// is zero the test is undefined and the p-value is `NaN`.
///
/// # Examples
///
/// ```
/// use critdd_stats::wilcoxon::{SignedRankMethod, ZeroMethod, wilcoxon_signed_rank};
///
/// let x = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let y = [0.0, 0.0, 6.0, 0.0, 0.0];
/// let result = wilcoxon_signed_rank(&x, &y, ZeroMethod::Pratt).unwrap();
/// assert_eq!(result.statistic, 3.0);
/// assert_eq!(result.method, SignedRankMethod::Exact);
/// assert!((result.p_value - 0.3125).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn wilcoxon_signed_rank(
    x: &[f64],
    y: &[f64],
    zero_method: ZeroMethod,
) -> Result<SignedRankResult, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }
    if x.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let mut diffs = x.iter().zip(y).map(|(a, b)| a - b).collect::<Vec<_>>();
    let n_zero = diffs.iter().filter(|d| **d == 0.0).count();
    if zero_method == ZeroMethod::Wilcox {
        diffs.retain(|d| *d != 0.0);
    }
    if n_zero == x.len() {
        return Ok(SignedRankResult {
            statistic: 0.0,
            p_value: f64::NAN,
            method: SignedRankMethod::Normal,
            n_zero,
        });
    }

    let abs_diffs = diffs.iter().map(|d| d.abs()).collect::<Vec<_>>();
    let ranks = rank(&abs_diffs, RankMethod::Average);
    let (r_plus, r_minus) = diffs
        .iter()
        .zip(&ranks)
        .fold((0.0, 0.0), |(plus, minus), (d, r)| {
            if *d > 0.0 {
                (plus + r, minus)
            } else if *d < 0.0 {
                (plus, minus + r)
            } else {
                (plus, minus)
            }
        });
    let statistic = f64::min(r_plus, r_minus);
    let count = diffs.len();

    // ranks of the non-zero differences; zeros never enter the tie correction
    let nonzero_ranks = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d != 0.0)
        .map(|(_, r)| *r)
        .collect::<Vec<_>>();
    let has_zeros = diffs.len() != nonzero_ranks.len();
    let tie_sizes = tie_group_sizes(&nonzero_ranks);

    if count <= EXACT_LIMIT && !has_zeros && tie_sizes.is_empty() {
        return Ok(SignedRankResult {
            statistic,
            p_value: exact_p_value(count, statistic),
            method: SignedRankMethod::Exact,
            n_zero,
        });
    }

    let countf = count as f64;
    let mut mean = countf * (countf + 1.0) / 4.0;
    let mut var = countf * (countf + 1.0) * (2.0 * countf + 1.0);
    if zero_method == ZeroMethod::Pratt {
        let nz = n_zero as f64;
        mean -= nz * (nz + 1.0) / 4.0;
        var -= nz * (nz + 1.0) * (2.0 * nz + 1.0);
    }
    var -= 0.5
        * tie_sizes
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * (t * t - 1.0)
            })
            .sum::<f64>();
    let se = (var / 24.0).sqrt();
    let p_value = if se > 0.0 {
        let z = (statistic - mean) / se;
        (2.0 * StandardNormal.sf(z.abs())).min(1.0)
    } else {
        f64::NAN
    };

    Ok(SignedRankResult {
        statistic,
        p_value,
        method: SignedRankMethod::Normal,
        n_zero,
    })
}

/// Sizes of all groups of equal values that hold more than one element.
fn tie_group_sizes(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
        .chunk_by(|a, b| a == b)
        .map(<[f64]>::len)
        .filter(|&len| len > 1)
        .collect()
}

/// Two-sided exact p-value of `statistic` for `n` untied, non-zero differences.
///
/// Under the null hypothesis every subset of the ranks `1..=n` is equally
/// likely to be the set of positive differences, so the distribution of the
/// rank sum follows from counting subsets by their sum.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn exact_p_value(n: usize, statistic: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    let mut counts = vec![0.0_f64; max_sum + 1];
    counts[0] = 1.0;
    for r in 1..=n {
        for s in (r..=max_sum).rev() {
            counts[s] += counts[s - r];
        }
    }
    // the statistic is an integer here since there are no ties
    let t = statistic.round() as usize;
    let below = counts[..=t.min(max_sum)].iter().sum::<f64>();
    let total = 2.0_f64.powi(n as i32);
    (2.0 * below / total).min(1.0)
}
