use petgraph::{
    graph::{Graph, IndexType},
    visit::{EdgeRef, NodeIndexable},
    EdgeType,
};

use crate::coloured_graph::ColouredGraph;
use crate::error::CanonError;

// position of each weight among the sorted distinct weights
fn ranks<'a, T: Ord + 'a>(weights: impl IntoIterator<Item = &'a T>) -> Vec<u32> {
    let weights = Vec::from_iter(weights);
    let mut distinct = weights.clone();
    distinct.sort_unstable();
    distinct.dedup();
    weights
        .iter()
        .map(|w| distinct.partition_point(|d| d < w) as u32)
        .collect()
}

/// Coloured graph with the structure of `g`
///
/// Node and edge weights are replaced by their rank among all
/// distinct weights, so isomorphic petgraph graphs give isomorphic
/// coloured graphs.
pub(crate) fn to_coloured<N, E, Ty, Ix>(
    g: &Graph<N, E, Ty, Ix>,
) -> Result<ColouredGraph, CanonError>
where
    N: Ord,
    E: Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    let n = g.node_count();
    let vertex_colours = ranks(g.node_weights());
    let edge_colours = ranks(g.edge_weights());
    let edges = g.edge_references().zip(edge_colours).map(|(e, c)| {
        (g.to_index(e.source()), g.to_index(e.target()), c)
    });
    let builder = if g.is_directed() {
        ColouredGraph::directed(n)
    } else {
        ColouredGraph::undirected(n)
    };
    builder
        .coloured_edges(edges)
        .vertex_colours(vertex_colours)
        .build()
}

/// Move the element at each position `idx` to `new_pos[idx]`
pub(crate) fn apply_perm<T>(slice: &mut [T], mut new_pos: Vec<usize>) {
    const CORRECT_POS: usize = usize::MAX;
    for idx in 0..slice.len() {
        let mut next_idx = new_pos[idx];
        if next_idx == CORRECT_POS {
            continue;
        }
        while next_idx != idx {
            slice.swap(idx, next_idx);
            next_idx = std::mem::replace(&mut new_pos[next_idx], CORRECT_POS);
        }
    }
}

/// Inverse of a permutation
pub(crate) fn inv_perm(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (new, &old) in perm.iter().enumerate() {
        inv[old] = new;
    }
    inv
}

/// Rebuild `g` with node `v` moved to position `relabelling[v]`
///
/// Edges are inserted in increasing order of source, target and
/// weight. Undirected edges start at the endpoint with the smaller
/// index.
pub(crate) fn relabel<N, E, Ty, Ix>(
    g: Graph<N, E, Ty, Ix>,
    relabelling: &[usize],
) -> Graph<N, E, Ty, Ix>
where
    E: Ord,
    Ty: EdgeType,
    Ix: IndexType,
{
    debug_assert_eq!(relabelling.len(), g.node_count());
    let is_directed = g.is_directed();
    let endpoints = Vec::from_iter(
        g.edge_references()
            .map(|e| (g.to_index(e.source()), g.to_index(e.target()))),
    );
    let (nodes, edges) = g.into_nodes_edges();
    let mut node_weights = Vec::from_iter(nodes.into_iter().map(|n| n.weight));
    apply_perm(&mut node_weights, relabelling.to_vec());

    let mut edges = Vec::from_iter(
        endpoints
            .into_iter()
            .zip(edges.into_iter().map(|e| e.weight))
            .map(|((source, target), w)| {
                let mut source = relabelling[source];
                let mut target = relabelling[target];
                if !is_directed && source > target {
                    std::mem::swap(&mut source, &mut target);
                }
                (source, target, w)
            }),
    );
    edges.sort_unstable();

    let mut res = Graph::with_capacity(node_weights.len(), edges.len());
    for w in node_weights {
        res.add_node(w);
    }
    for (source, target, weight) in edges {
        let source = res.from_index(source);
        let target = res.from_index(target);
        res.add_edge(source, target, weight);
    }
    res
}
