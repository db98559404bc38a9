//! Observation matrices.
//!
//! An observation matrix holds paired measurements: every row is one
//! observation (for example one dataset) and every column is one treatment
//! (for example one classifier). The matrix is validated once at construction
//! and is read-only afterwards.

use crate::StatsError;

/// A validated `n × k` matrix of finite measurements, stored row-major.
///
/// # Examples
///
/// ```
/// use critdd_stats::matrix::ObservationMatrix;
///
/// let matrix = ObservationMatrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
/// assert_eq!(matrix.n_rows(), 2);
/// assert_eq!(matrix.n_cols(), 3);
/// assert_eq!(matrix.column(1), vec![2.0, 5.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<f64>,
}

impl ObservationMatrix {
    /// Creates a matrix from row-major data.
    ///
    /// Fails if the matrix is empty, if `data` does not hold exactly
    /// `n_rows * n_cols` values, or if any value is not finite.
    pub fn new(n_rows: usize, n_cols: usize, data: Vec<f64>) -> Result<Self, StatsError> {
        if n_rows == 0 || n_cols == 0 {
            return Err(StatsError::EmptyMatrix);
        }
        let expected = n_rows * n_cols;
        if data.len() != expected {
            return Err(StatsError::DataLength {
                n_rows,
                n_cols,
                expected,
                actual: data.len(),
            });
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(StatsError::NonFinite {
                row: pos / n_cols,
                col: pos % n_cols,
            });
        }
        Ok(Self {
            n_rows,
            n_cols,
            data,
        })
    }

    /// Creates a matrix from a list of rows, which must all have the same length.
    pub fn from_rows<R>(rows: impl IntoIterator<Item = R>) -> Result<Self, StatsError>
    where
        R: AsRef<[f64]>,
    {
        let mut data = vec![];
        let mut n_cols = None;
        let mut n_rows = 0;
        for (i, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *n_cols.get_or_insert(row.len());
            if row.len() != expected {
                return Err(StatsError::RaggedRow {
                    row: i,
                    expected,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
            n_rows += 1;
        }
        Self::new(n_rows, n_cols.unwrap_or(0), data)
    }

    /// Number of observations (`n`).
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of treatments (`k`).
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns the value of observation `row` for treatment `col`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.n_rows && col < self.n_cols, "index out of bounds");
        self.data[row * self.n_cols + col]
    }

    /// Returns one observation across all treatments.
    #[must_use]
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }

    /// Iterates over all observations.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_cols)
    }

    /// Returns all observations of one treatment.
    #[must_use]
    pub fn column(&self, col: usize) -> Vec<f64> {
        self.rows().map(|row| row[col]).collect()
    }

    /// Returns the `k × n` transpose of this matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let data = (0..self.n_cols).flat_map(|col| self.column(col)).collect();
        Self {
            n_rows: self.n_cols,
            n_cols: self.n_rows,
            data,
        }
    }

    /// Returns the element-wise negation of this matrix.
    ///
    /// Ranking the negated matrix in ascending order is ranking the original
    /// matrix in descending order.
    #[must_use]
    pub fn negated(&self) -> Self {
        Self {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            data: self.data.iter().map(|v| -v).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows() {
        let matrix = ObservationMatrix::from_rows([[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(matrix.n_cols(), 2);
        assert_eq!(matrix.get(2, 1), 6.0);
        assert_eq!(matrix.row(1), &[3.0, 4.0]);
        assert_eq!(matrix.column(0), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = ObservationMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            StatsError::RaggedRow {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_empty_rejected() {
        let rows: Vec<Vec<f64>> = vec![];
        assert_eq!(
            ObservationMatrix::from_rows(rows).unwrap_err(),
            StatsError::EmptyMatrix
        );
        assert_eq!(
            ObservationMatrix::from_rows(vec![Vec::<f64>::new()]).unwrap_err(),
            StatsError::EmptyMatrix
        );
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ObservationMatrix::new(2, 2, vec![1.0, 2.0, f64::NAN, 4.0]).unwrap_err();
        assert_eq!(err, StatsError::NonFinite { row: 1, col: 0 });
        assert!(ObservationMatrix::new(1, 1, vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_data_length_checked() {
        assert!(matches!(
            ObservationMatrix::new(2, 2, vec![1.0, 2.0, 3.0]),
            Err(StatsError::DataLength { expected: 4, actual: 3, .. })
        ));
    }

    #[test]
    fn test_transpose() {
        let matrix = ObservationMatrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        let t = matrix.transpose();
        assert_eq!(t.n_rows(), 3);
        assert_eq!(t.n_cols(), 2);
        assert_eq!(t.row(0), &[1.0, 4.0]);
        assert_eq!(t.row(2), &[3.0, 6.0]);
        assert_eq!(t.transpose(), matrix);
    }

    #[test]
    fn test_negated() {
        let matrix = ObservationMatrix::from_rows([[1.0, -2.0]]).unwrap();
        assert_eq!(matrix.negated().row(0), &[-1.0, 2.0]);
    }
}
