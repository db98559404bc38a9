//! Critical difference diagrams: groups of indistinguishable treatments.
//!
//! This crate turns an observation matrix into the content of a critical
//! difference diagram, that is the average rank of every treatment and the
//! groups of treatments whose performance is not significantly different.
//!
//! # Overview
//!
//! The analysis runs in two stages:
//!
//! 1. **Construction** ([`diagram::Diagram::new`]): Ranks the treatments, runs
//!    the Friedman test and the raw pairwise signed-rank tests once
//! 2. **Group queries** ([`diagram::Diagram::groups`]): For a significance
//!    level and an adjustment method, gates on the Friedman test, adjusts the
//!    pairwise p-values and extracts groups from the resulting
//!    [`groups::SignificanceGraph`]
//!
//! [`batch::DiagramBatch`] runs the same analysis for several matrices over
//! the same treatments, which are drawn together on one 2-D axis.
//!
//! # Modules
//!
//! - [`clique`]: Maximal clique enumeration
//! - [`groups`]: Significance graphs and group extraction
//! - [`diagram`]: A single diagram and the group query parameters
//! - [`batch`]: Several diagrams over the same treatments
//!
//! # Examples
//!
//! ```
//! use critdd_diagram::{CriticalDifference, PlotData, diagram::{Diagram, GroupQuery}};
//! use critdd_stats::matrix::ObservationMatrix;
//!
//! let matrix = ObservationMatrix::from_rows([
//!     [0.1, 0.4, 0.5],
//!     [0.2, 0.3, 0.9],
//!     [0.1, 0.6, 0.7],
//!     [0.3, 0.5, 0.8],
//! ])
//! .unwrap();
//! let diagram = Diagram::new(&matrix, None, false).unwrap();
//! match diagram.plot_data(&GroupQuery::default()).unwrap() {
//!     PlotData::Single { average_ranks, groups } => {
//!         assert_eq!(average_ranks, vec![1.0, 2.0, 3.0]);
//!         assert!(!groups.is_empty());
//!     }
//!     PlotData::Stacked { .. } => unreachable!(),
//! }
//! ```

use critdd_stats::StatsError;

use crate::{diagram::GroupQuery, groups::Group};

pub mod batch;
pub mod clique;
pub mod diagram;
pub mod groups;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum DiagramError {
    #[display("{_0}")]
    Stats(StatsError),
    #[display("expected {expected} treatment names, got {actual}")]
    TreatmentNamesMismatch { expected: usize, actual: usize },
    #[display("expected {expected} diagram names, got {actual}")]
    DiagramNamesMismatch { expected: usize, actual: usize },
    #[display("diagram {diagram} has {actual} treatments, expected {expected}")]
    TreatmentCountMismatch {
        diagram: usize,
        expected: usize,
        actual: usize,
    },
    #[display("a diagram batch needs at least one observation matrix")]
    EmptyBatch,
    #[display("significance level must lie in (0, 1), got {alpha}")]
    InvalidAlpha { alpha: f64 },
}

impl From<StatsError> for DiagramError {
    fn from(err: StatsError) -> Self {
        Self::Stats(err)
    }
}

/// What a renderer needs to draw a diagram.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotData {
    /// One diagram: one rank per treatment and its groups.
    Single {
        average_ranks: Vec<f64>,
        groups: Vec<Group>,
    },
    /// Several diagrams on one axis: ranks as `m × k`, one group list per diagram.
    Stacked {
        diagram_names: Vec<String>,
        average_ranks: Vec<Vec<f64>>,
        groups: Vec<Vec<Group>>,
    },
}

/// Common interface of single and stacked diagrams.
pub trait CriticalDifference {
    fn treatment_names(&self) -> &[String];

    /// Whether higher outcomes were ranked as better.
    fn maximize_outcome(&self) -> bool;

    /// Computes ranks and groups for rendering.
    fn plot_data(&self, query: &GroupQuery) -> Result<PlotData, DiagramError>;
}
