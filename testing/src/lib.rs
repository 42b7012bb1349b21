use std::marker::PhantomData;

use petgraph::{
    algo::connected_components,
    graph::{Graph, IndexType},
    visit::{EdgeRef, NodeIndexable},
    EdgeType,
};
use rand::{distributions::Uniform, prelude::*};
use rand_distr::Normal;
use rand_xoshiro::Xoshiro256Plus;

/// Endless supply of small, connected random graphs
pub struct GraphIter<Ty: EdgeType> {
    rng: Xoshiro256Plus,
    node_distr: Uniform<usize>,
    node_wt_distr: Uniform<u8>,
    pub edge_wt_distr: Uniform<u8>,
    edge_distr: Normal<f64>,
    edge_type: PhantomData<Ty>,
}

impl<Ty: EdgeType> GraphIter<Ty> {
    /// Graphs with up to `max_nodes` nodes
    pub fn new(seed: u64, max_nodes: usize) -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(seed),
            node_distr: Uniform::from(1..=max_nodes.max(1)),
            ..Default::default()
        }
    }
}

impl<Ty: EdgeType> Default for GraphIter<Ty> {
    fn default() -> Self {
        Self {
            rng: Xoshiro256Plus::seed_from_u64(0),
            node_distr: Uniform::from(1..10),
            node_wt_distr: Uniform::from(0..3),
            edge_wt_distr: Uniform::from(0..3),
            edge_distr: Normal::new(0.5, 1.0).unwrap(),
            edge_type: PhantomData,
        }
    }
}

impl<Ty: EdgeType> Iterator for GraphIter<Ty> {
    type Item = Graph<u8, u8, Ty>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let rng = &mut self.rng;
            let mut g = Graph::default();
            let nnodes = self.node_distr.sample(rng);
            for _ in 0..nnodes {
                g.add_node(self.node_wt_distr.sample(rng));
            }
            for i in 0..nnodes {
                let start = if Ty::is_directed() { 0 } else { i };
                for j in start..nnodes {
                    let nedges =
                        self.edge_distr.sample(rng).clamp(0.0, 1.0).round() as u64;
                    for _ in 0..nedges {
                        let source = g.from_index(i);
                        let target = g.from_index(j);
                        g.add_edge(source, target, self.edge_wt_distr.sample(rng));
                    }
                }
            }
            if connected_components(&g) == 1 {
                return Some(g);
            }
        }
    }
}

/// Uniformly random permutation of `0..n`
pub fn random_permutation(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut perm = Vec::from_iter(0..n);
    perm.shuffle(rng);
    perm
}

/// Random `(source, target, colour)` edges between `n` vertices
///
/// Each ordered pair, including self-loops, is joined with
/// probability `p`.
pub fn random_coloured_edges(
    n: usize,
    p: f64,
    colours: u32,
    rng: &mut impl Rng,
) -> Vec<(usize, usize, u32)> {
    let mut edges = Vec::new();
    for source in 0..n {
        for target in 0..n {
            if rng.gen_bool(p) {
                edges.push((source, target, rng.gen_range(0..colours.max(1))));
            }
        }
    }
    edges
}

/// Isomorphic copy of `g` with shuffled nodes and edges
pub fn randomize_labels<N, E, Ty, Ix>(
    g: Graph<N, E, Ty, Ix>,
    rng: &mut impl Rng,
) -> Graph<N, E, Ty, Ix>
where
    Ty: EdgeType,
    Ix: IndexType,
{
    let perm = random_permutation(g.node_count(), rng);
    let endpoints = Vec::from_iter(
        g.edge_references()
            .map(|e| (g.to_index(e.source()), g.to_index(e.target()))),
    );
    let (nodes, edges) = g.into_nodes_edges();

    let mut node_weights = Vec::from_iter((0..nodes.len()).map(|_| None));
    for (node, &new) in nodes.into_iter().zip(&perm) {
        node_weights[new] = Some(node.weight);
    }
    let mut edges = Vec::from_iter(
        endpoints
            .into_iter()
            .zip(edges.into_iter().map(|e| e.weight))
            .map(|((source, target), w)| (perm[source], perm[target], w)),
    );
    edges.shuffle(rng);

    let mut res = Graph::with_capacity(node_weights.len(), edges.len());
    for w in node_weights.into_iter().flatten() {
        res.add_node(w);
    }
    for (mut source, mut target, w) in edges {
        if !Ty::is_directed() && rng.gen() {
            std::mem::swap(&mut source, &mut target);
        }
        let source = res.from_index(source);
        let target = res.from_index(target);
        res.add_edge(source, target, w);
    }
    res
}
