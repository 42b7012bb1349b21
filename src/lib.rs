//! Canonical graph labelling.
//!
//! Finds [canonical
//! labellings](https://en.wikipedia.org/wiki/Graph_canonization) and
//! automorphism groups of graphs with coloured vertices and edges,
//! using individualisation and refinement. Graphs can be given
//! directly as a [ColouredGraph] or as
//! [petgraph](https://github.com/petgraph/petgraph) graphs.
//!
//! # Example
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use canon_pet::prelude::*;
//!
//! // Two different vertex labellings for the tree graph with two edges
//! let g1 = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2)]);
//! let g2 = UnGraph::<(), ()>::from_edges([(0, 1), (0, 2)]);
//!
//! // There are two equivalent labellings
//! let automorphism_info = g1.clone().try_into_autom_stats().unwrap();
//! assert_eq!(automorphism_info.grpsize(), 2.);
//!
//! // The canonical forms are identical
//! let c1 = g1.clone().into_canon();
//! let c2 = g2.clone().into_canon();
//! assert!(c1.is_identical(&c2));
//!
//! // Alternatively, we can use a dedicated `struct` for canonically
//! // labelled graphs
//! let c1 = CanonGraph::from(g1);
//! let c2 = CanonGraph::from(g2);
//! assert_eq!(c1, c2);
//! ```
//!
//! Without petgraph, vertex colours, edge colours and an initial
//! ordered partition can be given explicitly:
//!
//! ```rust
//! use canon_pet::{canonical_form, ColouredGraph, Options};
//!
//! let g = ColouredGraph::undirected(5)
//!     .edge_list(&[0, 1, 2, 3, 4], &[1, 2, 3, 4, 0])
//!     .partition(vec![vec![0, 1, 2], vec![3, 4]])
//!     .build()?;
//! let canon = canonical_form(&g, &Options::default())?;
//! assert_eq!(canon.relabelling, [0, 2, 1, 4, 3]);
//! assert_eq!(
//!     canon.canonical_edges,
//!     [(2, 0, 0), (2, 1, 0), (3, 0, 0), (4, 1, 0), (4, 3, 0)]
//! );
//! // the same edges, in input order
//! assert_eq!(
//!     canon.mapped_edges,
//!     [(2, 0, 0), (2, 1, 0), (4, 1, 0), (4, 3, 0), (3, 0, 0)]
//! );
//! # Ok::<(), canon_pet::error::CanonError>(())
//! ```
//!
//! # Features
//!
//! * `serde-1`: Enables serialisation of
//!              [CanonGraph](graph::CanonGraph), [Canonical] and
//!              [Certificate] objects using
//!              [serde](https://crates.io/crates/serde).
//!
//! To enable features `feature1`, `feature2` add the following to
//! your Cargo.toml:
//! ```toml
//! [dependencies]
//! canon-pet = { version = "0.1", features = ["feature1", "feature2"] }
//! ```
pub mod autom;
pub mod canon;
mod cmp;
pub mod coloured_graph;
pub mod error;
pub mod graph;
pub mod options;
mod partition;
mod pet_graph;
pub mod prelude;
mod refine;
mod search;
mod select;

pub use canon::{canonical_form, Canonical, IntoCanon, TryIntoCanon};
pub use cmp::IsIdentical;
pub use coloured_graph::{ColouredGraph, GraphBuilder};
pub use error::CanonError;
pub use options::Options;
pub use search::SearchStats;
pub use select::Certificate;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use petgraph::{
        graph::{Graph, IndexType, UnGraph},
        prelude::EdgeIndex,
        EdgeType,
    };

    fn add_edge<N, E, Ty: EdgeType, Ix: IndexType>(
        g: &mut Graph<N, E, Ty, Ix>,
        v1: usize,
        v2: usize,
        wt: E,
    ) -> EdgeIndex<Ix> {
        use petgraph::visit::NodeIndexable;
        g.add_edge(g.from_index(v1), g.from_index(v2), wt)
    }

    // two drawings of the same cubic graph
    fn ladders(n: usize) -> (UnGraph<(), ()>, UnGraph<(), ()>) {
        let mut g1 = UnGraph::<(), ()>::with_capacity(n, 3 * n);
        for _ in 0..n {
            g1.add_node(());
        }

        // Spokes
        for i in (0..n).step_by(2) {
            add_edge(&mut g1, i, i + 1, ());
        }
        // Cycle
        for i in 0..n - 2 {
            add_edge(&mut g1, i, i + 2, ());
        }
        add_edge(&mut g1, 1, n - 2, ());
        add_edge(&mut g1, 0, n - 1, ());

        let mut g2 = UnGraph::<(), ()>::with_capacity(n, 3 * n);
        for _ in 0..n {
            g2.add_node(());
        }

        for i in 0..n {
            add_edge(&mut g2, i, (i + 1) % n, ()); /* Rim */
        }
        for i in 0..(n / 2) {
            add_edge(&mut g2, i, i + n / 2, ()); /* Diagonals */
        }
        (g1, g2)
    }

    #[test]
    fn nautyex8() {
        for n in (2..20).step_by(2) {
            let (g1, g2) = ladders(n);
            let cg1 = g1.into_canon();
            let cg2 = g2.into_canon();
            assert!(cg1.is_identical(&cg2));
        }
    }

    #[test]
    fn nautyex8_coloured() {
        for n in (4..20).step_by(2) {
            let (g1, g2) = ladders(n);
            let options = Options {
                certificate: true,
                ..Default::default()
            };
            let coloured = |g: &UnGraph<(), ()>| {
                let edges = g
                    .raw_edges()
                    .iter()
                    .map(|e| (e.source().index(), e.target().index()));
                ColouredGraph::undirected(g.node_count())
                    .edges(edges)
                    .build()
                    .unwrap()
            };
            let c1 = canonical_form(&coloured(&g1), &options).unwrap();
            let c2 = canonical_form(&coloured(&g2), &options).unwrap();
            assert!(c1.is_identical(&c2));
            let (s1, s2) = (c1.autom_stats.grpsize(), c2.autom_stats.grpsize());
            assert!((s1 - s2).abs() < 1e-6 * s1);
        }
    }
}
