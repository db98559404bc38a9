//! Statistical core for critical difference diagrams.
//!
//! This crate provides the hypothesis tests behind a critical difference diagram:
//!
//! - **Observation matrices**: Validated `n × k` matrices of paired measurements
//! - **Ranking**: Fractional ranking per observation and average ranks per treatment
//! - **Friedman test**: Chi-square and F-distributed omnibus tests
//! - **Wilcoxon signed-rank test**: Paired two-sided test with exact and normal null distributions
//! - **Pairwise tests**: Signed-rank p-values for every pair of treatments
//! - **Multiple testing adjustment**: Holm step-down and Bonferroni corrections
//! - **Distributions**: Chi-square, F and standard normal tail probabilities
//!
//! # Modules
//!
//! - [`matrix`]: The [`ObservationMatrix`](matrix::ObservationMatrix) input type
//! - [`rank`]: Ranking methods and average ranks
//! - [`distribution`]: Special functions and continuous distributions
//! - [`friedman`]: Friedman omnibus tests
//! - [`wilcoxon`]: Wilcoxon signed-rank test
//! - [`pairwise`]: Pairwise p-value matrices
//! - [`adjustment`]: Multiple testing adjustments
//!
//! # Examples
//!
//! ## Running the Friedman test
//!
//! ```
//! use critdd_stats::{friedman, matrix::ObservationMatrix};
//!
//! let matrix = ObservationMatrix::from_rows(vec![
//!     vec![84.5, 78.4, 83.1],
//!     vec![82.8, 79.1, 79.9],
//!     vec![79.1, 78.0, 77.8],
//!     vec![80.2, 76.0, 77.9],
//! ])
//! .unwrap();
//! let result = friedman::chi_square_distributed(&matrix, false).unwrap();
//! assert!((result.statistic - 6.5).abs() < 1e-12);
//! assert!(result.p_value < 0.05);
//! ```
//!
//! ## Adjusting pairwise p-values
//!
//! ```
//! use critdd_stats::{adjustment::Adjustment, matrix::ObservationMatrix, pairwise::PairwiseMatrix};
//!
//! let matrix = ObservationMatrix::from_rows(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![1.5, 2.5, 3.5],
//!     vec![1.2, 2.4, 3.1],
//!     vec![1.1, 2.2, 3.9],
//! ])
//! .unwrap();
//! let raw = PairwiseMatrix::from_observations(&matrix).unwrap();
//! let holm = raw.adjusted(Adjustment::Holm);
//! assert!(holm.get(1, 0) >= raw.get(1, 0));
//! assert!(holm.get(0, 1).is_nan());
//! ```

pub mod adjustment;
pub mod distribution;
pub mod friedman;
pub mod matrix;
pub mod pairwise;
pub mod rank;
pub mod wilcoxon;

/// Errors raised when the input of a statistical routine is invalid.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatsError {
    #[display("observation matrix must have at least one row and one column")]
    EmptyMatrix,
    #[display("row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[display("matrix data has {actual} values, expected {expected} ({n_rows} x {n_cols})")]
    DataLength {
        n_rows: usize,
        n_cols: usize,
        expected: usize,
        actual: usize,
    },
    #[display("value at row {row}, column {col} is not finite")]
    NonFinite { row: usize, col: usize },
    #[display("the Friedman test requires at least 3 treatments, got {k}")]
    TooFewTreatments { k: usize },
    #[display("the F-distributed Friedman test requires at least 2 observations, got {n}")]
    TooFewObservations { n: usize },
    #[display("paired samples differ in length ({left} vs {right})")]
    LengthMismatch { left: usize, right: usize },
    #[display("paired samples must not be empty")]
    EmptySample,
    #[display("unknown adjustment method '{name}', expected 'holm' or 'bonferroni'")]
    UnknownAdjustment { name: String },
    #[display("invalid distribution parameter: {reason}")]
    InvalidParameter { reason: &'static str },
}
