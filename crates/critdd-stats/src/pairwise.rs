//! Pairwise signed-rank tests between treatments.

use crate::{
    StatsError,
    adjustment::{self, Adjustment},
    matrix::ObservationMatrix,
    wilcoxon::{self, ZeroMethod},
};

/// A `k × k` matrix of pairwise p-values.
///
/// Only the strict lower triangle (`i > j`) holds test results. The upper
/// triangle and the diagonal are `NaN`; the test is symmetric, so the pair
/// `(j, i)` is read from `(i, j)`. Entries of the lower triangle may also be
/// `NaN` when the two treatments never differ.
#[derive(Debug, Clone, PartialEq)]
pub struct PairwiseMatrix {
    k: usize,
    p_values: Vec<f64>,
}

impl PairwiseMatrix {
    /// Runs a two-sided Wilcoxon signed-rank test (Pratt zero handling) for
    /// every pair of columns.
    pub fn from_observations(matrix: &ObservationMatrix) -> Result<Self, StatsError> {
        let k = matrix.n_cols();
        let columns = (0..k).map(|col| matrix.column(col)).collect::<Vec<_>>();
        let mut p_values = vec![f64::NAN; k * k];
        for i in 0..k {
            for j in 0..i {
                let result =
                    wilcoxon::wilcoxon_signed_rank(&columns[i], &columns[j], ZeroMethod::Pratt)?;
                p_values[i * k + j] = result.p_value;
            }
        }
        Ok(Self { k, p_values })
    }

    /// Creates a matrix from row-major p-values.
    ///
    /// Entries outside the strict lower triangle are reset to `NaN`.
    ///
    /// # Panics
    ///
    /// Panics if `p_values` does not hold `k * k` values.
    #[must_use]
    pub fn from_raw(k: usize, mut p_values: Vec<f64>) -> Self {
        assert_eq!(p_values.len(), k * k, "expected a {k} x {k} matrix");
        for i in 0..k {
            for j in i..k {
                p_values[i * k + j] = f64::NAN;
            }
        }
        Self { k, p_values }
    }

    /// Number of treatments.
    #[must_use]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Returns the p-value stored at `(i, j)`, `NaN` outside the lower triangle.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below `k`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.k && j < self.k, "index out of bounds");
        self.p_values[i * self.k + j]
    }

    /// Returns the p-value of the unordered pair `{i, j}`.
    #[must_use]
    pub fn pair(&self, i: usize, j: usize) -> f64 {
        if i > j { self.get(i, j) } else { self.get(j, i) }
    }

    /// Iterates over the finite entries as `(i, j, p)`, row by row.
    pub fn finite_entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.p_values
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .map(|(idx, &p)| (idx / self.k, idx % self.k, p))
    }

    /// Number of comparisons with a finite p-value.
    #[must_use]
    pub fn num_comparisons(&self) -> usize {
        self.finite_entries().count()
    }

    /// Returns a matrix with the same sparsity pattern whose finite entries
    /// are adjusted for the number of comparisons.
    #[must_use]
    pub fn adjusted(&self, adjustment: Adjustment) -> Self {
        Self {
            k: self.k,
            p_values: adjustment::adjust(&self.p_values, adjustment),
        }
    }
}
