//! A single critical difference diagram.
//!
//! [`Diagram`] runs the expensive part of the analysis once: the Friedman
//! test, which yields the average ranks, and the raw pairwise signed-rank
//! tests. Groups depend on the significance level and the adjustment method,
//! so they are computed on demand for each [`GroupQuery`].
//!
//! # Examples
//!
//! ```
//! use critdd_diagram::diagram::{Diagram, GroupQuery};
//! use critdd_stats::matrix::ObservationMatrix;
//!
//! let matrix = ObservationMatrix::from_rows([
//!     [84.5, 78.4, 83.1],
//!     [82.8, 79.1, 79.9],
//!     [79.1, 78.0, 77.8],
//!     [80.2, 76.0, 77.9],
//! ])
//! .unwrap();
//! let names = vec!["A".to_owned(), "B".to_owned(), "C".to_owned()];
//! let diagram = Diagram::new(&matrix, Some(names), true).unwrap();
//! assert_eq!(diagram.average_ranks(), &[1.0, 2.75, 2.25]);
//!
//! // with only four observations no pair is significantly different
//! let groups = diagram.group_names(&GroupQuery::default()).unwrap();
//! assert_eq!(groups, vec![vec!["A", "B", "C"]]);
//! ```

use critdd_stats::{
    adjustment::Adjustment,
    friedman::{self, FDistributedFriedmanResult},
    matrix::ObservationMatrix,
    pairwise::PairwiseMatrix,
};
use serde::{Deserialize, Serialize};

use crate::{
    CriticalDifference, DiagramError, PlotData,
    groups::{self, Group, SignificanceGraph},
};

/// Parameters of a group query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GroupQuery {
    /// Significance level; a pair is indistinguishable if its adjusted p-value is at least `alpha`.
    pub alpha: f64,
    pub adjustment: Adjustment,
    /// Whether groups with a single member are returned.
    pub singletons: bool,
}

impl Default for GroupQuery {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            adjustment: Adjustment::Holm,
            singletons: true,
        }
    }
}

impl GroupQuery {
    /// Fails unless `alpha` lies strictly between 0 and 1.
    pub fn validate(&self) -> Result<(), DiagramError> {
        if self.alpha > 0.0 && self.alpha < 1.0 {
            Ok(())
        } else {
            Err(DiagramError::InvalidAlpha { alpha: self.alpha })
        }
    }
}

/// Default display name of treatment `i`.
#[must_use]
pub fn default_treatment_name(i: usize) -> String {
    format!("treatment {i}")
}

/// Checks a user-supplied name list against the expected count, or generates default names.
pub(crate) fn resolve_treatment_names(
    names: Option<Vec<String>>,
    k: usize,
) -> Result<Vec<String>, DiagramError> {
    match names {
        Some(names) if names.len() != k => Err(DiagramError::TreatmentNamesMismatch {
            expected: k,
            actual: names.len(),
        }),
        Some(names) => Ok(names),
        None => Ok((0..k).map(default_treatment_name).collect()),
    }
}

/// A regular critical difference diagram over one observation matrix.
#[derive(Debug, Clone)]
pub struct Diagram {
    treatment_names: Vec<String>,
    friedman: FDistributedFriedmanResult,
    pairwise: PairwiseMatrix,
}

impl Diagram {
    /// Analyzes an `n × k` observation matrix.
    ///
    /// `treatment_names` must hold `k` names if given. With `maximize` set,
    /// higher values are better and receive lower ranks.
    pub fn new(
        matrix: &ObservationMatrix,
        treatment_names: Option<Vec<String>>,
        maximize: bool,
    ) -> Result<Self, DiagramError> {
        let treatment_names = resolve_treatment_names(treatment_names, matrix.n_cols())?;
        let friedman = friedman::friedman(matrix, maximize)?;
        let pairwise = PairwiseMatrix::from_observations(matrix)?;
        tracing::debug!(
            n = matrix.n_rows(),
            k = matrix.n_cols(),
            p_value = friedman.p_value,
            "analyzed observation matrix"
        );
        Ok(Self {
            treatment_names,
            friedman,
            pairwise,
        })
    }

    #[must_use]
    pub fn k(&self) -> usize {
        self.treatment_names.len()
    }

    #[must_use]
    pub fn average_ranks(&self) -> &[f64] {
        self.friedman.average_ranks()
    }

    #[must_use]
    pub fn treatment_names(&self) -> &[String] {
        &self.treatment_names
    }

    #[must_use]
    pub fn maximize_outcome(&self) -> bool {
        self.friedman.maximize_outcome()
    }

    /// The omnibus test that gates the pairwise analysis.
    #[must_use]
    pub fn friedman(&self) -> &FDistributedFriedmanResult {
        &self.friedman
    }

    /// Unadjusted pairwise p-values.
    #[must_use]
    pub fn pairwise_tests(&self) -> &PairwiseMatrix {
        &self.pairwise
    }

    /// Returns the groups of statistically indistinguishable treatments.
    ///
    /// If the Friedman test does not reject at `alpha`, all treatments form a
    /// single group and no pairwise test is consulted.
    pub fn groups(&self, query: &GroupQuery) -> Result<Vec<Group>, DiagramError> {
        query.validate()?;

        let ranks = self.average_ranks();
        let mut groups = if self.friedman.p_value >= query.alpha {
            tracing::debug!(
                p_value = self.friedman.p_value,
                alpha = query.alpha,
                "Friedman test does not reject, single group"
            );
            let all = (0..ranks.len()).collect::<Vec<_>>();
            vec![Group::densified(ranks, &all)]
        } else {
            let adjusted = self.pairwise.adjusted(query.adjustment);
            let graph = SignificanceGraph::from_adjusted(&adjusted, query.alpha);
            groups::extract_groups(ranks, &graph)
        };
        if !query.singletons {
            groups.retain(|g| !g.is_singleton());
        }
        Ok(groups)
    }

    /// Like [`groups`](Self::groups), with members replaced by treatment names.
    pub fn group_names(&self, query: &GroupQuery) -> Result<Vec<Vec<String>>, DiagramError> {
        let groups = self.groups(query)?;
        Ok(groups
            .iter()
            .map(|g| {
                g.members
                    .iter()
                    .map(|&i| self.treatment_names[i].clone())
                    .collect()
            })
            .collect())
    }
}

impl CriticalDifference for Diagram {
    fn treatment_names(&self) -> &[String] {
        &self.treatment_names
    }

    fn maximize_outcome(&self) -> bool {
        self.friedman.maximize_outcome()
    }

    fn plot_data(&self, query: &GroupQuery) -> Result<PlotData, DiagramError> {
        Ok(PlotData::Single {
            average_ranks: self.average_ranks().to_vec(),
            groups: self.groups(query)?,
        })
    }
}
