//! Graph Builders
//!
//! Build graphs from edge lists, adjacency matrices and incidence matrices.
//! Node names are `node_prefix` followed by the caller's label (edge lists)
//! or the 1-based row/column index (matrices).

use crate::domain::element::Edge;
use crate::domain::graph::{Graph, GraphKind, DEFAULT_GRAPH_NAME};
use crate::domain::id::Id;
use crate::domain::subgraph::Container;
use std::fmt::Display;

fn new_graph(directed: bool) -> Graph {
    let kind = if directed { GraphKind::Digraph } else { GraphKind::Graph };
    Graph::new(DEFAULT_GRAPH_NAME, kind)
}

fn node_id(prefix: &str, label: impl Display) -> Id {
    Id::quoted_if_needed(&format!("{prefix}{label}"))
}

/// One edge per `(source, destination)` pair.
pub fn graph_from_edges<I, A, B>(edges: I, node_prefix: &str, directed: bool) -> Graph
where
    I: IntoIterator<Item = (A, B)>,
    A: Display,
    B: Display,
{
    let mut graph = new_graph(directed);
    for (src, dst) in edges {
        graph.add_edge(Edge::new(node_id(node_prefix, src), node_id(node_prefix, dst)));
    }
    graph
}

/// One edge per non-zero cell. Undirected graphs only read the upper
/// triangle (diagonal included).
pub fn graph_from_adjacency_matrix<T>(matrix: &[Vec<T>], node_prefix: &str, directed: bool) -> Graph
where
    T: PartialEq + Default,
{
    let mut graph = new_graph(directed);
    let zero = T::default();
    for (row_idx, row) in matrix.iter().enumerate() {
        let skip = if directed { 0 } else { row_idx };
        for (col_idx, cell) in row.iter().enumerate().skip(skip) {
            if *cell != zero {
                graph.add_edge(Edge::new(
                    node_id(node_prefix, row_idx + 1),
                    node_id(node_prefix, col_idx + 1),
                ));
            }
        }
    }
    graph
}

/// Each row is an edge; its non-zero columns are the endpoints. In directed
/// graphs a negative entry marks the source.
///
/// Rows that do not touch exactly two nodes are ignored.
pub fn graph_from_incidence_matrix(matrix: &[Vec<i64>], node_prefix: &str, directed: bool) -> Graph {
    let mut graph = new_graph(directed);
    for row in matrix {
        let mut ends: Vec<i64> = row
            .iter()
            .enumerate()
            .filter(|(_, v)| **v != 0)
            .map(|(col, v)| (col as i64 + 1) * v)
            .collect();
        ends.sort_unstable();
        if let [a, b] = ends.as_slice() {
            graph.add_edge(Edge::new(
                node_id(node_prefix, a.abs()),
                node_id(node_prefix, b.abs()),
            ));
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(graph: &Graph) -> Vec<(String, String)> {
        graph
            .get_edges()
            .iter()
            .map(|e| {
                (
                    e.source().text().unwrap_or_default(),
                    e.destination().text().unwrap_or_default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_from_edges() {
        let g = graph_from_edges([(1, 2), (2, 3)], "n", true);
        assert_eq!(g.kind(), GraphKind::Digraph);
        assert_eq!(
            pairs(&g),
            vec![("n1".into(), "n2".into()), ("n2".into(), "n3".into())]
        );
    }

    #[test]
    fn test_from_edges_quotes_odd_names() {
        let g = graph_from_edges([("a b", "c")], "", false);
        assert_eq!(pairs(&g)[0].0, "\"a b\"");
    }

    #[test]
    fn test_from_adjacency_matrix_undirected() {
        let m = vec![vec![0, 1, 1], vec![1, 0, 0], vec![1, 0, 1]];
        let g = graph_from_adjacency_matrix(&m, "", false);
        assert_eq!(
            pairs(&g),
            vec![
                ("1".into(), "2".into()),
                ("1".into(), "3".into()),
                ("3".into(), "3".into())
            ]
        );
    }

    #[test]
    fn test_from_adjacency_matrix_directed() {
        let m = vec![vec![false, true], vec![true, false]];
        let g = graph_from_adjacency_matrix(&m, "v", true);
        assert_eq!(pairs(&g), vec![("v1".into(), "v2".into()), ("v2".into(), "v1".into())]);
    }

    #[test]
    fn test_from_incidence_matrix() {
        let m = vec![vec![-1, 1, 0], vec![0, 1, -1], vec![1, 0, 0]];
        let g = graph_from_incidence_matrix(&m, "", true);
        assert_eq!(pairs(&g), vec![("1".into(), "2".into()), ("3".into(), "2".into())]);
    }
}
