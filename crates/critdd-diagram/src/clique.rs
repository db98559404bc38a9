//! Maximal clique enumeration.
//!
//! Bron–Kerbosch with pivoting over a dense boolean adjacency matrix. The
//! graphs handled here have one vertex per treatment, so they are small and
//! dense, and a matrix is the natural representation.

/// Enumerates all maximal cliques of an undirected graph.
///
/// `adjacency` must be a symmetric `k × k` matrix; the diagonal is ignored.
/// Every vertex belongs to at least one returned clique, so an isolated
/// vertex is returned as a singleton. Each clique is sorted, and the list is
/// sorted lexicographically.
///
/// # Examples
///
/// ```
/// use critdd_diagram::clique::maximal_cliques;
///
/// // a path 0 - 1 - 2 and an isolated vertex 3
/// let adjacency = vec![
///     vec![false, true, false, false],
///     vec![true, false, true, false],
///     vec![false, true, false, false],
///     vec![false, false, false, false],
/// ];
/// assert_eq!(maximal_cliques(&adjacency), vec![vec![0, 1], vec![1, 2], vec![3]]);
/// ```
#[must_use]
pub fn maximal_cliques(adjacency: &[Vec<bool>]) -> Vec<Vec<usize>> {
    let k = adjacency.len();
    let mut cliques = vec![];
    let candidates = (0..k).collect::<Vec<_>>();
    bron_kerbosch(adjacency, &mut vec![], candidates, vec![], &mut cliques);
    for clique in &mut cliques {
        clique.sort_unstable();
    }
    cliques.sort();
    cliques
}

fn bron_kerbosch(
    adjacency: &[Vec<bool>],
    clique: &mut Vec<usize>,
    mut candidates: Vec<usize>,
    mut excluded: Vec<usize>,
    cliques: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() {
        if excluded.is_empty() {
            cliques.push(clique.clone());
        }
        return;
    }

    let connected = |u: usize, v: usize| u != v && adjacency[u][v];

    // pivot: the vertex of P ∪ X with the most neighbours in P
    let pivot = candidates
        .iter()
        .chain(&excluded)
        .copied()
        .max_by_key(|&u| candidates.iter().filter(|&&v| connected(u, v)).count());
    let Some(pivot) = pivot else { return };

    let branches = candidates
        .iter()
        .copied()
        .filter(|&v| !connected(pivot, v))
        .collect::<Vec<_>>();

    for v in branches {
        clique.push(v);
        bron_kerbosch(
            adjacency,
            clique,
            candidates.iter().copied().filter(|&u| connected(v, u)).collect(),
            excluded.iter().copied().filter(|&u| connected(v, u)).collect(),
            cliques,
        );
        clique.pop();
        candidates.retain(|&u| u != v);
        excluded.push(v);
    }
}
