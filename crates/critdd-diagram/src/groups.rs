//! Groups of statistically indistinguishable treatments.
//!
//! A group starts as a maximal clique of the [`SignificanceGraph`], that is a
//! set of treatments whose pairwise differences are all non-significant. A
//! diagram draws each group as one bar spanning a rank interval, so the
//! cliques are then normalized into such intervals:
//!
//! 1. **Densification**: every treatment whose average rank lies within the
//!    clique's rank interval joins the group
//! 2. **Deduplication**: cliques that densify to the same interval collapse
//! 3. **Dominance**: a group whose interval lies inside another group's
//!    interval is dropped
//!
//! The remaining groups have pairwise non-nested intervals and are sorted by
//! their interval.

use critdd_stats::pairwise::PairwiseMatrix;
use serde::Serialize;

use crate::clique;

/// Undirected graph over treatments, connecting every pair that is *not*
/// significantly different.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignificanceGraph {
    adjacency: Vec<Vec<bool>>,
}

impl SignificanceGraph {
    /// Connects `i` and `j` iff their adjusted p-value is finite and at least `alpha`.
    #[must_use]
    pub fn from_adjusted(adjusted: &PairwiseMatrix, alpha: f64) -> Self {
        let mut graph = Self::empty(adjusted.k());
        for (i, j, p) in adjusted.finite_entries() {
            if p >= alpha {
                graph.connect(i, j);
            }
        }
        graph
    }

    /// Builds a graph on `k` vertices from an edge list.
    ///
    /// # Panics
    ///
    /// Panics if an edge refers to a vertex not below `k`.
    #[must_use]
    pub fn from_edges(k: usize, edges: &[(usize, usize)]) -> Self {
        let mut graph = Self::empty(k);
        for &(i, j) in edges {
            graph.connect(i, j);
        }
        graph
    }

    fn empty(k: usize) -> Self {
        Self {
            adjacency: vec![vec![false; k]; k],
        }
    }

    fn connect(&mut self, i: usize, j: usize) {
        if i != j {
            self.adjacency[i][j] = true;
            self.adjacency[j][i] = true;
        }
    }

    /// Number of vertices.
    #[must_use]
    pub fn k(&self) -> usize {
        self.adjacency.len()
    }

    #[must_use]
    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        self.adjacency[i][j]
    }

    #[must_use]
    pub fn num_edges(&self) -> usize {
        self.adjacency
            .iter()
            .enumerate()
            .map(|(i, row)| row[..i].iter().filter(|e| **e).count())
            .sum()
    }

    /// All maximal cliques, see [`clique::maximal_cliques`].
    #[must_use]
    pub fn maximal_cliques(&self) -> Vec<Vec<usize>> {
        clique::maximal_cliques(&self.adjacency)
    }
}

/// A set of treatments drawn as one bar, with the rank interval it spans.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    /// Treatment indices, ascending.
    pub members: Vec<usize>,
    pub min_rank: f64,
    pub max_rank: f64,
}

impl Group {
    /// A group of all treatments with an average rank in `[min_rank, max_rank]`.
    #[must_use]
    pub fn spanning(average_ranks: &[f64], min_rank: f64, max_rank: f64) -> Self {
        let members = (0..average_ranks.len())
            .filter(|&i| (min_rank..=max_rank).contains(&average_ranks[i]))
            .collect();
        Self {
            members,
            min_rank,
            max_rank,
        }
    }

    /// The group of the given treatments, densified to their rank interval.
    ///
    /// # Panics
    ///
    /// Panics if `members` is empty.
    #[must_use]
    pub fn densified(average_ranks: &[f64], members: &[usize]) -> Self {
        assert!(!members.is_empty(), "a group needs at least one member");
        let (min_rank, max_rank) = members.iter().map(|&i| average_ranks[i]).fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), r| (lo.min(r), hi.max(r)),
        );
        Self::spanning(average_ranks, min_rank, max_rank)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }

    #[must_use]
    pub fn contains(&self, treatment: usize) -> bool {
        self.members.binary_search(&treatment).is_ok()
    }

    /// Whether this group's interval contains `other`'s interval and is larger.
    #[must_use]
    pub fn dominates(&self, other: &Self) -> bool {
        self.min_rank <= other.min_rank
            && self.max_rank >= other.max_rank
            && (self.min_rank, self.max_rank) != (other.min_rank, other.max_rank)
    }
}

/// Extracts the groups of indistinguishable treatments from a significance graph.
///
/// Runs clique enumeration, densification, deduplication and the dominance
/// filter. The result is sorted by `(min_rank, max_rank)` and always covers
/// every treatment.
///
/// # Examples
///
/// ```
/// use critdd_diagram::groups::{SignificanceGraph, extract_groups};
///
/// // treatment 1 lies between 0 and 2 and joins their group
/// let ranks = [1.0, 2.0, 3.0];
/// let graph = SignificanceGraph::from_edges(3, &[(0, 2)]);
/// let groups = extract_groups(&ranks, &graph);
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].members, vec![0, 1, 2]);
/// ```
///
/// # Panics
///
/// Panics if `average_ranks` and `graph` disagree on the number of treatments.
#[must_use]
pub fn extract_groups(average_ranks: &[f64], graph: &SignificanceGraph) -> Vec<Group> {
    assert_eq!(average_ranks.len(), graph.k(), "one rank per treatment expected");

    let cliques = graph.maximal_cliques();
    let mut groups = cliques
        .iter()
        .map(|clique| Group::densified(average_ranks, clique))
        .collect::<Vec<_>>();
    groups.sort_by(|a, b| {
        a.min_rank
            .total_cmp(&b.min_rank)
            .then(a.max_rank.total_cmp(&b.max_rank))
    });
    groups.dedup();

    let maximal = groups
        .iter()
        .filter(|g| !groups.iter().any(|h| h.dominates(g)))
        .cloned()
        .collect::<Vec<_>>();
    tracing::debug!(
        cliques = cliques.len(),
        groups = maximal.len(),
        "extracted groups"
    );
    maximal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(groups: &[Group]) -> Vec<Vec<usize>> {
        groups.iter().map(|g| g.members.clone()).collect()
    }

    #[test]
    fn test_densification() {
        let graph = SignificanceGraph::from_edges(3, &[(0, 2)]);
        let groups = extract_groups(&[1.0, 2.0, 3.0], &graph);
        assert_eq!(members(&groups), vec![vec![0, 1, 2]]);
        assert_eq!(groups[0].min_rank, 1.0);
        assert_eq!(groups[0].max_rank, 3.0);
    }

    #[test]
    fn test_chain_keeps_overlapping_groups() {
        let graph = SignificanceGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let groups = extract_groups(&[1.0, 2.0, 3.0, 4.0], &graph);
        assert_eq!(members(&groups), vec![vec![0, 1], vec![1, 2], vec![2, 3]]);
    }

    #[test]
    fn test_no_edges_gives_singletons() {
        let graph = SignificanceGraph::from_edges(3, &[]);
        let groups = extract_groups(&[2.0, 1.0, 3.0], &graph);
        assert_eq!(members(&groups), vec![vec![1], vec![0], vec![2]]);
        assert!(groups.iter().all(Group::is_singleton));
    }

    #[test]
    fn test_nested_group_is_dropped() {
        // {1, 2} densifies to itself and lies within {0, 3}'s interval, which densifies to all
        let graph = SignificanceGraph::from_edges(4, &[(1, 2), (0, 3)]);
        let groups = extract_groups(&[1.0, 2.0, 3.0, 4.0], &graph);
        assert_eq!(members(&groups), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn test_duplicates_collapse() {
        // cliques {0, 2} and {1, 2} with ranks 1 and 1 for treatments 0 and 1
        let graph = SignificanceGraph::from_edges(3, &[(0, 2), (1, 2)]);
        let groups = extract_groups(&[1.0, 1.0, 2.0], &graph);
        assert_eq!(members(&groups), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_tied_ranks_join_singletons() {
        // no edges, but two treatments share a rank
        let graph = SignificanceGraph::from_edges(3, &[]);
        let groups = extract_groups(&[1.5, 1.5, 3.0], &graph);
        assert_eq!(members(&groups), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_intervals_are_not_nested() {
        let graph = SignificanceGraph::from_edges(
            6,
            &[(0, 1), (1, 2), (0, 2), (2, 3), (3, 4), (4, 5), (3, 5)],
        );
        let ranks = [1.0, 1.8, 2.5, 3.9, 4.4, 6.0];
        let groups = extract_groups(&ranks, &graph);
        for g in &groups {
            for h in &groups {
                assert!(!g.dominates(h));
            }
        }
        assert_eq!(members(&groups), vec![vec![0, 1, 2], vec![2, 3], vec![3, 4, 5]]);
    }

    #[test]
    fn test_graph_from_adjusted() {
        let p = PairwiseMatrix::from_raw(
            3,
            vec![
                f64::NAN, f64::NAN, f64::NAN, //
                0.5, f64::NAN, f64::NAN, //
                0.01, f64::NAN, f64::NAN,
            ],
        );
        let graph = SignificanceGraph::from_adjusted(&p, 0.05);
        assert!(graph.has_edge(0, 1));
        assert!(graph.has_edge(1, 0));
        assert!(!graph.has_edge(0, 2));
        // NaN entries never form an edge
        assert!(!graph.has_edge(1, 2));
        assert_eq!(graph.num_edges(), 1);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let p = PairwiseMatrix::from_raw(2, vec![f64::NAN, f64::NAN, 0.05, f64::NAN]);
        assert!(SignificanceGraph::from_adjusted(&p, 0.05).has_edge(0, 1));
    }

    #[test]
    fn test_group_contains() {
        let group = Group::spanning(&[1.0, 2.0, 3.0, 4.0], 2.0, 3.0);
        assert_eq!(group.members, vec![1, 2]);
        assert!(group.contains(2));
        assert!(!group.contains(0));
        assert_eq!(group.len(), 2);
    }
}
