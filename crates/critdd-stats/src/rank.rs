//! Ranking of observations.
//!
//! Every observation (row) ranks the treatments from 1 to `k`. Tied values
//! share the average of the rank positions they occupy, so the ranks of a
//! row always sum to `k(k+1)/2`. Averaging the ranks of each treatment over
//! all observations gives the average ranks that a critical difference
//! diagram places on its axis.

use crate::matrix::ObservationMatrix;

/// Strategy for handling tied values when ranking.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RankMethod {
    /// Tied values receive the average of their rank positions (fractional ranking).
    #[default]
    Average,
    /// Tied values receive the lowest rank position of their group.
    Min,
    /// Tied values receive the highest rank position of their group.
    Max,
    /// Like `Min`, but ranks increase by one between groups.
    Dense,
    /// Tied values receive consecutive ranks in order of appearance.
    Ordinal,
}

/// Assigns 1-based ranks to `values` in ascending order.
///
/// Returns a vector of the same length as `values`.
///
/// # Examples
///
/// ```
/// use critdd_stats::rank::{RankMethod, rank};
///
/// assert_eq!(rank(&[3.0, 1.0, 2.0, 2.0], RankMethod::Average), vec![4.0, 1.0, 2.5, 2.5]);
/// assert_eq!(rank(&[3.0, 1.0, 2.0, 2.0], RankMethod::Dense), vec![3.0, 1.0, 2.0, 2.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn rank(values: &[f64], method: RankMethod) -> Vec<f64> {
    let n = values.len();
    let mut order = (0..n).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut dense = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        dense += 1.0;
        // positions i..j (0-based) are tied
        for (offset, &idx) in order[i..j].iter().enumerate() {
            ranks[idx] = match method {
                RankMethod::Average => (i + 1 + j) as f64 / 2.0,
                RankMethod::Min => (i + 1) as f64,
                RankMethod::Max => j as f64,
                RankMethod::Dense => dense,
                RankMethod::Ordinal => (i + offset + 1) as f64,
            };
        }
        i = j;
    }
    ranks
}

/// Computes the average rank of each treatment over all observations.
///
/// Each row is ranked with fractional ranking. If `maximize` is `true`, the
/// row is negated first, so that rank 1 always denotes the best treatment.
///
/// # Examples
///
/// ```
/// use critdd_stats::{matrix::ObservationMatrix, rank::average_ranks};
///
/// let matrix = ObservationMatrix::from_rows([[1.0, 2.0, 3.0], [1.0, 3.0, 2.0]]).unwrap();
/// assert_eq!(average_ranks(&matrix, false), vec![1.0, 2.5, 2.5]);
/// assert_eq!(average_ranks(&matrix, true), vec![3.0, 1.5, 1.5]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn average_ranks(matrix: &ObservationMatrix, maximize: bool) -> Vec<f64> {
    let mut sums = vec![0.0; matrix.n_cols()];
    let mut row_buf = Vec::with_capacity(matrix.n_cols());
    for row in matrix.rows() {
        row_buf.clear();
        if maximize {
            row_buf.extend(row.iter().map(|v| -v));
        } else {
            row_buf.extend_from_slice(row);
        }
        for (sum, r) in sums.iter_mut().zip(rank(&row_buf, RankMethod::Average)) {
            *sum += r;
        }
    }
    let n = matrix.n_rows() as f64;
    sums.into_iter().map(|sum| sum / n).collect()
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    #[test]
    fn test_rank_no_ties() {
        assert_eq!(rank(&[3.0, 1.0, 2.0], RankMethod::Average), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_rank_methods_with_ties() {
        let values = [3.0, 1.0, 2.0, 2.0];
        assert_eq!(rank(&values, RankMethod::Average), vec![4.0, 1.0, 2.5, 2.5]);
        assert_eq!(rank(&values, RankMethod::Min), vec![4.0, 1.0, 2.0, 2.0]);
        assert_eq!(rank(&values, RankMethod::Max), vec![4.0, 1.0, 3.0, 3.0]);
        assert_eq!(rank(&values, RankMethod::Dense), vec![3.0, 1.0, 2.0, 2.0]);
        assert_eq!(rank(&values, RankMethod::Ordinal), vec![4.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_rank_all_equal() {
        assert_eq!(rank(&[5.0, 5.0, 5.0], RankMethod::Average), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_rank_empty() {
        assert!(rank(&[], RankMethod::Average).is_empty());
    }

    #[test]
    fn test_negative_zero_ties_with_zero() {
        assert_eq!(rank(&[0.0, -0.0, 1.0], RankMethod::Average), vec![1.5, 1.5, 3.0]);
    }

    #[test]
    fn test_catalyst_average_ranks() {
        let matrix = ObservationMatrix::from_rows([
            [84.5, 78.4, 83.1],
            [82.8, 79.1, 79.9],
            [79.1, 78.0, 77.8],
            [80.2, 76.0, 77.9],
        ])
        .unwrap();
        assert_eq!(average_ranks(&matrix, false), vec![3.0, 1.25, 1.75]);
        assert_eq!(average_ranks(&matrix, true), vec![1.0, 2.75, 2.25]);
    }

    fn random_matrix(rng: &mut Pcg64Mcg, n: usize, k: usize) -> ObservationMatrix {
        // coarse values so that ties occur regularly
        let data = (0..n * k)
            .map(|_| f64::from(rng.random_range(0..6_u8)))
            .collect();
        ObservationMatrix::new(n, k, data).unwrap()
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_average_ranks_sum() {
        let mut rng = Pcg64Mcg::seed_from_u64(42);
        for _ in 0..100 {
            let n = rng.random_range(1..30);
            let k = rng.random_range(3..10);
            let matrix = random_matrix(&mut rng, n, k);
            for maximize in [false, true] {
                let sum = average_ranks(&matrix, maximize).iter().sum::<f64>();
                let expected = (k * (k + 1)) as f64 / 2.0;
                assert!((sum - expected).abs() < 1e-9, "sum={sum}, expected={expected}");
            }
        }
    }

    #[test]
    fn test_maximize_matches_negated_input() {
        let mut rng = Pcg64Mcg::seed_from_u64(7);
        for _ in 0..100 {
            let n = rng.random_range(1..20);
            let k = rng.random_range(3..8);
            let matrix = random_matrix(&mut rng, n, k);
            assert_eq!(
                average_ranks(&matrix, true),
                average_ranks(&matrix.negated(), false)
            );
        }
    }

    #[test]
    fn test_maximize_reverses_ranks() {
        let mut rng = Pcg64Mcg::seed_from_u64(3);
        for _ in 0..50 {
            let matrix = random_matrix(&mut rng, 12, 5);
            let min = average_ranks(&matrix, false);
            let max = average_ranks(&matrix, true);
            for (a, b) in min.iter().zip(&max) {
                assert!((a + b - 6.0).abs() < 1e-9);
            }
        }
    }
}
