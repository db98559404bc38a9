//! Several diagrams over the same treatments, drawn on one 2-D axis.

use critdd_stats::matrix::ObservationMatrix;
use rayon::prelude::*;

use crate::{
    CriticalDifference, DiagramError, PlotData,
    diagram::{self, Diagram, GroupQuery},
    groups::Group,
};

/// Default display name of diagram `i`.
#[must_use]
pub fn default_diagram_name(i: usize) -> String {
    format!("diagram {i}")
}

/// A sequence of critical difference diagrams sharing the same `k` treatments.
///
/// Each diagram is analyzed independently, for example one per metric or one
/// per experimental setting.
///
/// # Examples
///
/// ```
/// use critdd_diagram::{batch::DiagramBatch, diagram::GroupQuery};
/// use critdd_stats::matrix::ObservationMatrix;
///
/// let accuracy = ObservationMatrix::from_rows([
///     [0.9, 0.8, 0.7],
///     [0.8, 0.7, 0.6],
///     [0.7, 0.9, 0.5],
/// ])
/// .unwrap();
/// let error = ObservationMatrix::from_rows([
///     [0.1, 0.2, 0.3],
///     [0.2, 0.3, 0.4],
///     [0.3, 0.1, 0.5],
/// ])
/// .unwrap();
/// let batch = DiagramBatch::new(&[accuracy, error], None, None, true).unwrap();
/// assert_eq!(batch.len(), 2);
/// assert_eq!(batch.diagram_names(), &["diagram 0", "diagram 1"]);
/// assert_eq!(batch.average_ranks()[0], vec![4.0 / 3.0, 5.0 / 3.0, 3.0]);
/// ```
#[derive(Debug, Clone)]
pub struct DiagramBatch {
    diagram_names: Vec<String>,
    diagrams: Vec<Diagram>,
}

impl DiagramBatch {
    /// Analyzes `m` observation matrices with the same number of columns.
    pub fn new(
        matrices: &[ObservationMatrix],
        diagram_names: Option<Vec<String>>,
        treatment_names: Option<Vec<String>>,
        maximize: bool,
    ) -> Result<Self, DiagramError> {
        let Some(first) = matrices.first() else {
            return Err(DiagramError::EmptyBatch);
        };
        let k = first.n_cols();
        if let Some((diagram, matrix)) = matrices
            .iter()
            .enumerate()
            .find(|(_, matrix)| matrix.n_cols() != k)
        {
            return Err(DiagramError::TreatmentCountMismatch {
                diagram,
                expected: k,
                actual: matrix.n_cols(),
            });
        }

        let diagram_names = match diagram_names {
            Some(names) if names.len() != matrices.len() => {
                return Err(DiagramError::DiagramNamesMismatch {
                    expected: matrices.len(),
                    actual: names.len(),
                });
            }
            Some(names) => names,
            None => (0..matrices.len()).map(default_diagram_name).collect(),
        };
        let treatment_names = diagram::resolve_treatment_names(treatment_names, k)?;

        let diagrams = matrices
            .par_iter()
            .map(|matrix| Diagram::new(matrix, Some(treatment_names.clone()), maximize))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(m = diagrams.len(), k, "analyzed diagram batch");

        Ok(Self {
            diagram_names,
            diagrams,
        })
    }

    /// Number of diagrams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.diagrams.len()
    }

    /// Always `false`; a batch holds at least one diagram.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty()
    }

    #[must_use]
    pub fn get(&self, i: usize) -> Option<&Diagram> {
        self.diagrams.get(i)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Diagram> + '_ {
        self.diagrams.iter()
    }

    #[must_use]
    pub fn diagram_names(&self) -> &[String] {
        &self.diagram_names
    }

    #[must_use]
    pub fn treatment_names(&self) -> &[String] {
        self.diagrams[0].treatment_names()
    }

    #[must_use]
    pub fn maximize_outcome(&self) -> bool {
        self.diagrams[0].maximize_outcome()
    }

    /// Average ranks of every diagram, one row per diagram.
    #[must_use]
    pub fn average_ranks(&self) -> Vec<Vec<f64>> {
        self.diagrams
            .iter()
            .map(|d| d.average_ranks().to_vec())
            .collect()
    }

    /// Groups of every diagram under the same query.
    pub fn groups(&self, query: &GroupQuery) -> Result<Vec<Vec<Group>>, DiagramError> {
        self.diagrams.iter().map(|d| d.groups(query)).collect()
    }
}

impl<'a> IntoIterator for &'a DiagramBatch {
    type Item = &'a Diagram;
    type IntoIter = std::slice::Iter<'a, Diagram>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagrams.iter()
    }
}

impl CriticalDifference for DiagramBatch {
    fn treatment_names(&self) -> &[String] {
        self.diagrams[0].treatment_names()
    }

    fn maximize_outcome(&self) -> bool {
        self.diagrams[0].maximize_outcome()
    }

    fn plot_data(&self, query: &GroupQuery) -> Result<PlotData, DiagramError> {
        Ok(PlotData::Stacked {
            diagram_names: self.diagram_names.clone(),
            average_ranks: self.average_ranks(),
            groups: self.groups(query)?,
        })
    }
}
