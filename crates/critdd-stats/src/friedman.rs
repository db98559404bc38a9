//! Friedman hypothesis tests.
//!
//! The Friedman test checks the null hypothesis that all `k` treatments have
//! the same distribution over the `n` observations, using only the ranks of
//! the treatments within each observation. Two versions are provided:
//!
//! - [`chi_square_distributed`]: the classical statistic with a chi-square
//!   null distribution and `k - 1` degrees of freedom
//! - [`f_distributed`]: the Iman–Davenport transformation of the classical
//!   statistic with an F null distribution; this is the version used to gate
//!   pairwise testing
//!
//! # Examples
//!
//! ```
//! use critdd_stats::{friedman, matrix::ObservationMatrix};
//!
//! let matrix = ObservationMatrix::from_rows([
//!     [6.0, 4.0, 4.0, 2.0],
//!     [4.0, 3.0, 2.0, 1.0],
//!     [3.0, 3.0, 1.0, 2.0],
//!     [3.0, 2.0, 1.0, 1.0],
//! ])
//! .unwrap();
//! let chi2 = friedman::chi_square_distributed(&matrix, false).unwrap();
//! let f = friedman::f_distributed(&matrix, false).unwrap();
//! assert!((chi2.statistic - 9.525).abs() < 1e-12);
//! assert!(f.p_value <= chi2.p_value);
//! ```

use serde::Serialize;

use crate::{
    StatsError,
    distribution::{ChiSquared, ContinuousDistribution, FisherF},
    matrix::ObservationMatrix,
    rank,
};

/// Result of the chi-square-distributed Friedman test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareFriedmanResult {
    /// Right-tail probability of the statistic.
    pub p_value: f64,
    /// The Friedman statistic `12n/(k(k+1)) · Σ(r̄ⱼ − (k+1)/2)²`.
    pub statistic: f64,
    /// Degrees of freedom (`k - 1`).
    pub n_df: usize,
    /// Average rank of each treatment.
    pub average_ranks: Vec<f64>,
    /// Number of observations.
    pub n: usize,
    /// Whether higher values were ranked as better.
    pub maximize_outcome: bool,
}

/// Result of the F-distributed Friedman test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FDistributedFriedmanResult {
    /// Right-tail probability of the statistic.
    pub p_value: f64,
    /// The statistic `(n − 1)·S / (n(k − 1) − S)` where `S` is the chi-square statistic.
    pub statistic: f64,
    /// The chi-square result this test is derived from; holds the average ranks.
    pub chi_square: ChiSquareFriedmanResult,
    /// Numerator degrees of freedom (`k - 1`).
    pub n_df_1: usize,
    /// Denominator degrees of freedom (`(k - 1)(n - 1)`).
    pub n_df_2: usize,
}

impl FDistributedFriedmanResult {
    /// Average rank of each treatment.
    #[must_use]
    pub fn average_ranks(&self) -> &[f64] {
        &self.chi_square.average_ranks
    }

    /// Whether higher values were ranked as better.
    #[must_use]
    pub fn maximize_outcome(&self) -> bool {
        self.chi_square.maximize_outcome
    }
}

/// Runs the Friedman test in its preferred (F-distributed) version.
pub fn friedman(
    matrix: &ObservationMatrix,
    maximize_outcome: bool,
) -> Result<FDistributedFriedmanResult, StatsError> {
    f_distributed(matrix, maximize_outcome)
}

/// Runs the Friedman test with a chi-square-distributed statistic.
///
/// Fails with [`StatsError::TooFewTreatments`] if the matrix has fewer than
/// three columns.
#[expect(clippy::cast_precision_loss)]
pub fn chi_square_distributed(
    matrix: &ObservationMatrix,
    maximize_outcome: bool,
) -> Result<ChiSquareFriedmanResult, StatsError> {
    let n = matrix.n_rows();
    let k = matrix.n_cols();
    if k < 3 {
        return Err(StatsError::TooFewTreatments { k });
    }

    let average_ranks = rank::average_ranks(matrix, maximize_outcome);
    let (nf, kf) = (n as f64, k as f64);
    let center = (kf + 1.0) / 2.0;
    let sum_sq = average_ranks
        .iter()
        .map(|r| (r - center).powi(2))
        .sum::<f64>();
    let statistic = 12.0 * nf / (kf * (kf + 1.0)) * sum_sq;

    let n_df = k - 1;
    let p_value = ChiSquared::new(n_df as f64)?.sf(statistic);

    Ok(ChiSquareFriedmanResult {
        p_value,
        statistic,
        n_df,
        average_ranks,
        n,
        maximize_outcome,
    })
}

/// Runs the Friedman test with an F-distributed statistic.
///
/// Fails if the matrix has fewer than three columns or fewer than two rows.
/// If every observation ranks the treatments identically, the statistic is
/// infinite and the p-value is zero.
#[expect(clippy::cast_precision_loss)]
pub fn f_distributed(
    matrix: &ObservationMatrix,
    maximize_outcome: bool,
) -> Result<FDistributedFriedmanResult, StatsError> {
    let chi_square = chi_square_distributed(matrix, maximize_outcome)?;
    let n = chi_square.n;
    if n < 2 {
        return Err(StatsError::TooFewObservations { n });
    }
    let k = chi_square.average_ranks.len();
    let nf = n as f64;
    let s = chi_square.statistic;

    let denominator = nf * (k - 1) as f64 - s;
    let statistic = if denominator <= f64::EPSILON * nf * k as f64 {
        f64::INFINITY
    } else {
        (nf - 1.0) * s / denominator
    };

    let n_df_1 = k - 1;
    let n_df_2 = (k - 1) * (n - 1);
    let p_value = FisherF::new(n_df_1 as f64, n_df_2 as f64)?.sf(statistic);

    Ok(FDistributedFriedmanResult {
        p_value,
        statistic,
        chi_square,
        n_df_1,
        n_df_2,
    })
}
